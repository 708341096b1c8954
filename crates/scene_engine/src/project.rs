//! Project files
//!
//! A project is a directory of assets plus one small file naming the project
//! and the scene to open at startup. The scene is stored by GUID, so it can
//! be moved or renamed without editing the project file.

use crate::assets::AssetGuid;
use crate::config::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Contents of a project file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectData {
    /// Display name
    pub project_name: String,

    /// Scene opened when the project loads; a fresh scene when `None`
    pub first_scene: Option<AssetGuid>,
}

impl ProjectData {
    /// Project with no startup scene
    pub fn named(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            first_scene: None,
        }
    }
}

impl Default for ProjectData {
    fn default() -> Self {
        Self::named("New Project")
    }
}

impl Config for ProjectData {}

/// A project file that has been opened by the engine
#[derive(Debug, Clone)]
pub struct LoadedProject {
    path: PathBuf,
    root: PathBuf,
    data: ProjectData,
}

impl LoadedProject {
    pub(crate) fn new(path: &Path, data: ProjectData) -> Self {
        Self {
            path: path.to_path_buf(),
            root: project_root(path),
            data,
        }
    }

    /// Project file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the project file; the asset root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Project file contents
    pub const fn data(&self) -> &ProjectData {
        &self.data
    }

    /// Mutable project file contents; written by `Engine::save_project`
    pub fn data_mut(&mut self) -> &mut ProjectData {
        &mut self.data
    }
}

/// Parent directory of a project file, `.` for a bare file name
pub(crate) fn project_root(path: &Path) -> PathBuf {
    path.parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}
