//! # Engine Configuration
//!
//! Settings consumed by [`crate::Engine`]. Every section has serde defaults
//! so a config file only needs to name what it changes.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::Config;
use crate::scene::RemovalPolicy;

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log filter handed to the host's logger
    pub logging: LoggingConfig,

    /// Scene behaviour
    pub scene: SceneConfig,

    /// Play session settings
    pub play: PlayConfig,

    /// Asset database location
    pub assets: AssetConfig,

    /// Scene file output
    pub serialization: SerializationConfig,

    /// Size of the game view, used for the scene camera's aspect ratio
    pub viewport: ViewportConfig,
}

impl Config for EngineConfig {}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `env_logger` filter string, e.g. `info` or `scene_engine=debug`
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// Scene configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// What happens to children when a GameObject is removed
    pub removal_policy: RemovalPolicy,

    /// Whether new scenes get a main camera and a directional light
    pub new_scene_defaults: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            removal_policy: RemovalPolicy::default(),
            new_scene_defaults: true,
        }
    }
}

/// Where play-mode snapshots live
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SnapshotStorage {
    /// Keep the snapshot bytes in memory
    #[default]
    Memory,
    /// Write the snapshot to a file; `None` uses `<temp_dir>/snapshot.scene`
    TempFile {
        /// Explicit snapshot path
        path: Option<PathBuf>,
    },
}

/// Play session configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayConfig {
    /// Snapshot storage backend
    pub snapshot: SnapshotStorage,
}

/// Asset database configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Project root to scan; no scan happens when unset
    pub root: Option<PathBuf>,

    /// File extensions (without dot) that count as assets
    pub extensions: Vec<String>,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: None,
            extensions: ["scene", "glb", "gltf", "rs"].iter().map(ToString::to_string).collect(),
        }
    }
}

/// Scene file output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializationConfig {
    /// Indent scene files for readability
    pub pretty: bool,
}

impl Default for SerializationConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Game view size
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl ViewportConfig {
    /// Width over height, 1.0 for a degenerate viewport
    #[allow(clippy::cast_precision_loss)]
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}
