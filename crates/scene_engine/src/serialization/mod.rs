//! Scene persistence
//!
//! The scene model only depends on the [`SceneSerializer`] capability. The
//! format-independent [`SceneDocument`] records what is persisted; the RON
//! serializer turns documents into bytes and back. The same path serves
//! scene files and play-mode snapshots.

mod document;
mod ron_serializer;

pub use document::{ComponentRecord, GameObjectRecord, SceneDocument, TransformRecord, FORMAT_VERSION};
pub use ron_serializer::RonSceneSerializer;

use crate::scene::{FieldError, GameObjectId, Scene, SceneError};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Scene <-> bytes
pub trait SceneSerializer {
    /// Encode every GameObject, its Transform and its persisted component fields
    fn serialize_scene(&self, scene: &Scene) -> Result<Vec<u8>, SerializationError>;

    /// Decode into a fresh scene; nothing is returned unless the whole input is valid
    fn deserialize_scene(&self, bytes: &[u8]) -> Result<Scene, SerializationError>;

    /// Serialize `scene` to a file
    fn save_to_file(&self, scene: &Scene, path: &Path) -> Result<(), SerializationError> {
        let bytes = self.serialize_scene(scene)?;
        fs::write(path, bytes)?;
        Ok(())
    }

    /// Deserialize a scene file
    fn load_from_file(&self, path: &Path) -> Result<Scene, SerializationError> {
        let bytes = fs::read(path)?;
        self.deserialize_scene(&bytes)
    }
}

/// Errors from encoding or decoding scenes
#[derive(Error, Debug)]
pub enum SerializationError {
    /// Malformed RON input
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    /// RON encoding failed
    #[error("RON write error: {0}")]
    RonWrite(#[from] ron::Error),

    /// Input is not UTF-8
    #[error("scene data is not UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Reading or writing a scene file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Document written by an incompatible version
    #[error("unsupported scene format version {0}")]
    UnsupportedVersion(u32),

    /// Two records share an id
    #[error("duplicate game object id {0}")]
    DuplicateId(GameObjectId),

    /// A child list names an id with no record
    #[error("{parent} lists unknown child {child}")]
    UnknownChild {
        /// Record holding the child list
        parent: GameObjectId,
        /// Missing id
        child: GameObjectId,
    },

    /// An id appears in more than one child list, or twice in one
    #[error("game object {0} is listed as a child more than once")]
    ChildListedTwice(GameObjectId),

    /// Child lists form a cycle through this id
    #[error("hierarchy cycle through {0}")]
    CyclicHierarchy(GameObjectId),

    /// Component kind not in the registry
    #[error("unknown component kind '{0}'")]
    UnknownComponentKind(String),

    /// A persisted field was rejected by its component
    #[error("bad field on {kind}: {source}")]
    Field {
        /// Component kind
        kind: String,
        /// Rejection reason
        #[source]
        source: FieldError,
    },

    /// Scene rejected a component or link while building
    #[error("scene error: {0}")]
    Component(#[from] SceneError),
}
