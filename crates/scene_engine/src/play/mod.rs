//! Play mode
//!
//! Entering play snapshots the loaded scene through the serializer; stopping
//! rebuilds the scene from that snapshot, so nothing done while playing
//! survives into the authored scene.

mod scene_manager;
mod snapshot;
mod state;

pub use scene_manager::SceneManager;
pub use snapshot::{store_from_config, MemorySnapshotStore, SnapshotStore, TempFileSnapshotStore};
pub use state::{PlayAction, PlayState};

use crate::scene::SceneError;
use crate::serialization::SerializationError;
use thiserror::Error;

/// Play-session errors
#[derive(Error, Debug)]
pub enum PlayError {
    /// Operation needs a loaded scene
    #[error("no scene is loaded")]
    NoSceneLoaded,

    /// Action not allowed in the current state
    #[error("cannot {action} while {from}")]
    InvalidTransition {
        /// State at the time of the request
        from: PlayState,
        /// Requested action
        action: PlayAction,
    },

    /// Stop requested but the snapshot is gone
    #[error("no play-mode snapshot to restore")]
    MissingSnapshot,

    /// Scene replacement or save attempted during a session
    #[error("not allowed while {0}")]
    SessionActive(PlayState),

    /// Building a scene failed
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// Snapshot or scene file could not be encoded or decoded
    #[error(transparent)]
    Serialization(#[from] SerializationError),

    /// Snapshot storage failed
    #[error("snapshot storage error: {0}")]
    Snapshot(#[from] std::io::Error),
}
