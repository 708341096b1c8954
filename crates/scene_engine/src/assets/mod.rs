//! Asset identity and resolution
//!
//! Components never hold file paths. They store an [`AssetGuid`] and ask an
//! [`AssetResolver`] for the path when they need it, so assets can move on
//! disk without breaking scenes.

mod database;

pub use database::AssetDatabase;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

/// Stable asset identity, stored in `.guid` sidecar files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetGuid(Uuid);

impl AssetGuid {
    /// Fresh random GUID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse the textual form written to sidecar files
    pub fn parse(text: &str) -> Option<Self> {
        Uuid::parse_str(text.trim()).ok().map(Self)
    }
}

impl Default for AssetGuid {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AssetGuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// GUID <-> path lookup
///
/// Paths are relative to the project root.
pub trait AssetResolver {
    /// Path of the asset with this GUID, if known
    fn path_for_guid(&self, guid: AssetGuid) -> Option<PathBuf>;

    /// GUID of the asset at this relative path, if known
    fn guid_for_path(&self, path: &Path) -> Option<AssetGuid>;

    /// Whether the GUID is known
    fn contains(&self, guid: AssetGuid) -> bool {
        self.path_for_guid(guid).is_some()
    }
}

/// Asset database errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// `rebuild` called on a database with no project root
    #[error("asset database has no project root")]
    NoRoot,

    /// Filesystem error on a specific path
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Offending path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Directory walk failed
    #[error("failed to walk asset directory: {0}")]
    Walk(#[from] walkdir::Error),
}
