//! Sidecar-file asset database

use super::{AssetError, AssetGuid, AssetResolver};
use crate::config::AssetConfig;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const GUID_EXTENSION: &str = "guid";

/// GUID <-> relative path maps for one project root
///
/// Every asset `dir/name.ext` owns a sidecar `dir/name.guid` holding its GUID
/// as text. [`AssetDatabase::rebuild`] creates missing sidecars, deletes
/// sidecars whose asset is gone and reloads both maps from disk.
#[derive(Debug, Default)]
pub struct AssetDatabase {
    root: Option<PathBuf>,
    extensions: Vec<String>,
    guid_to_path: HashMap<AssetGuid, PathBuf>,
    path_to_guid: HashMap<PathBuf, AssetGuid>,
}

impl AssetDatabase {
    /// Database over `root`, tracking files with the given extensions
    pub fn new(root: impl Into<PathBuf>, extensions: Vec<String>) -> Self {
        Self {
            root: Some(root.into()),
            extensions,
            ..Self::default()
        }
    }

    /// Database with no backing directory; populate with [`Self::register`]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Database described by engine configuration
    pub fn from_config(config: &AssetConfig) -> Self {
        config.root.as_ref().map_or_else(Self::in_memory, |root| {
            Self::new(root.clone(), config.extensions.clone())
        })
    }

    /// Project root, if any
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Number of known assets
    pub fn len(&self) -> usize {
        self.guid_to_path.len()
    }

    /// Whether no assets are known
    pub fn is_empty(&self) -> bool {
        self.guid_to_path.is_empty()
    }

    /// Insert a mapping without touching disk, returning its new GUID
    pub fn register(&mut self, relative_path: impl Into<PathBuf>) -> AssetGuid {
        let path = relative_path.into();
        if let Some(existing) = self.path_to_guid.get(&path) {
            return *existing;
        }
        let guid = AssetGuid::new();
        self.insert(guid, path);
        guid
    }

    fn insert(&mut self, guid: AssetGuid, path: PathBuf) {
        self.guid_to_path.insert(guid, path.clone());
        self.path_to_guid.insert(path, guid);
    }

    fn is_tracked(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|tracked| tracked == ext))
    }

    /// Rescan the project root
    ///
    /// Returns the number of assets found.
    pub fn rebuild(&mut self) -> Result<usize, AssetError> {
        let root = self.root.clone().ok_or(AssetError::NoRoot)?;

        self.guid_to_path.clear();
        self.path_to_guid.clear();

        let mut assets = Vec::new();
        let mut sidecars = Vec::new();
        for entry in WalkDir::new(&root).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.into_path();
            if path.extension().and_then(|ext| ext.to_str()) == Some(GUID_EXTENSION) {
                sidecars.push(path);
            } else if self.is_tracked(&path) {
                assets.push(path);
            }
        }

        let mut created = 0;
        for asset in &assets {
            let sidecar = asset.with_extension(GUID_EXTENSION);
            let guid = match read_sidecar(&sidecar)? {
                Some(guid) => guid,
                None => {
                    let guid = AssetGuid::new();
                    fs::write(&sidecar, guid.to_string()).map_err(|source| AssetError::Io {
                        path: sidecar.clone(),
                        source,
                    })?;
                    created += 1;
                    guid
                }
            };
            let relative = asset.strip_prefix(&root).unwrap_or(asset).to_path_buf();
            if let Some(previous) = self.guid_to_path.get(&guid) {
                warn!(
                    "GUID {guid} claimed by both {} and {}, keeping the first",
                    previous.display(),
                    relative.display()
                );
                continue;
            }
            self.insert(guid, relative);
        }

        let mut orphaned = 0;
        for sidecar in sidecars {
            let has_asset = assets
                .iter()
                .any(|asset| asset.with_extension(GUID_EXTENSION) == sidecar);
            if !has_asset {
                fs::remove_file(&sidecar).map_err(|source| AssetError::Io {
                    path: sidecar.clone(),
                    source,
                })?;
                orphaned += 1;
            }
        }

        if created > 0 || orphaned > 0 {
            debug!("Asset rebuild wrote {created} GUID files, removed {orphaned} orphans");
        }
        info!("Asset database indexed {} assets under {}", self.len(), root.display());
        Ok(self.len())
    }
}

/// Parse a sidecar; `None` when missing or unreadable as a GUID
fn read_sidecar(path: &Path) -> Result<Option<AssetGuid>, AssetError> {
    if !path.exists() {
        return Ok(None);
    }
    let text = fs::read_to_string(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let guid = AssetGuid::parse(&text);
    if guid.is_none() {
        warn!("Replacing malformed GUID file {}", path.display());
    }
    Ok(guid)
}

impl AssetResolver for AssetDatabase {
    fn path_for_guid(&self, guid: AssetGuid) -> Option<PathBuf> {
        self.guid_to_path.get(&guid).cloned()
    }

    fn guid_for_path(&self, path: &Path) -> Option<AssetGuid> {
        self.path_to_guid.get(path).copied()
    }
}
