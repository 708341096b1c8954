//! Snapshot storage
//!
//! Holds the serialized scene for the lifetime of one play session.

use crate::config::SnapshotStorage;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File name used under the system temp directory
const DEFAULT_SNAPSHOT_FILE: &str = "snapshot.scene";

/// Transient byte store for the play-mode snapshot
pub trait SnapshotStore {
    /// Replace the stored bytes
    fn write(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Stored bytes, `None` when empty
    fn read(&self) -> io::Result<Option<Vec<u8>>>;

    /// Drop the stored bytes; clearing an empty store succeeds
    fn clear(&mut self) -> io::Result<()>;
}

/// Keeps the snapshot in memory
#[derive(Debug, Default, Clone)]
pub struct MemorySnapshotStore {
    bytes: Option<Vec<u8>>,
}

impl MemorySnapshotStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.bytes = Some(bytes.to_vec());
        Ok(())
    }

    fn read(&self) -> io::Result<Option<Vec<u8>>> {
        Ok(self.bytes.clone())
    }

    fn clear(&mut self) -> io::Result<()> {
        self.bytes = None;
        Ok(())
    }
}

/// Keeps the snapshot in a file
#[derive(Debug, Clone)]
pub struct TempFileSnapshotStore {
    path: PathBuf,
}

impl TempFileSnapshotStore {
    /// Store at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<temp_dir>/snapshot.scene`
    pub fn default_path() -> PathBuf {
        std::env::temp_dir().join(DEFAULT_SNAPSHOT_FILE)
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for TempFileSnapshotStore {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}

impl SnapshotStore for TempFileSnapshotStore {
    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        fs::write(&self.path, bytes)
    }

    fn read(&self) -> io::Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn clear(&mut self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        }
    }
}

/// Store described by engine configuration
pub fn store_from_config(storage: &SnapshotStorage) -> Box<dyn SnapshotStore> {
    match storage {
        SnapshotStorage::Memory => Box::new(MemorySnapshotStore::new()),
        SnapshotStorage::TempFile { path } => Box::new(
            path.clone()
                .map_or_else(TempFileSnapshotStore::default, TempFileSnapshotStore::new),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(store: &mut dyn SnapshotStore) {
        assert_eq!(store.read().unwrap(), None);
        store.write(b"first").unwrap();
        store.write(b"second").unwrap();
        assert_eq!(store.read().unwrap().as_deref(), Some(&b"second"[..]));
        store.clear().unwrap();
        assert_eq!(store.read().unwrap(), None);
        store.clear().unwrap();
    }

    #[test]
    fn test_memory_store() {
        exercise(&mut MemorySnapshotStore::new());
    }

    #[test]
    fn test_temp_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = TempFileSnapshotStore::new(dir.path().join("snapshot.scene"));
        exercise(&mut store);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_store_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("play.scene");
        let mut store = store_from_config(&SnapshotStorage::TempFile {
            path: Some(path.clone()),
        });
        store.write(b"bytes").unwrap();
        assert!(path.exists());
    }
}
