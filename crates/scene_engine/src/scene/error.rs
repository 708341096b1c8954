//! Scene error types

use super::{ComponentId, GameObjectHandle, GameObjectId};
use thiserror::Error;

/// Errors from structural scene operations.
///
/// Whenever one of these is returned the scene is left exactly as it was.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// Parenting would make an object its own ancestor
    #[error("cannot parent {child} under {parent}: it would create a cycle")]
    Cycle {
        /// Object being reparented
        child: GameObjectId,
        /// Requested parent
        parent: GameObjectId,
    },

    /// Handle was issued by a different scene
    #[error("handle {0:?} belongs to another scene")]
    ForeignObject(GameObjectHandle),

    /// Handle refers to an object that no longer exists
    #[error("handle {0:?} refers to a removed game object")]
    StaleHandle(GameObjectHandle),

    /// An object with this id already exists in the scene
    #[error("game object id {0} is already in use")]
    DuplicateId(GameObjectId),

    /// No object with this id exists in the scene
    #[error("no game object with id {0}")]
    NotFound(GameObjectId),

    /// Removal was rejected because the object still has children
    #[error("game object {id} still has {count} children")]
    HasChildren {
        /// Object that was to be removed
        id: GameObjectId,
        /// Number of direct children
        count: usize,
    },

    /// Component kind allows only one instance per object
    #[error("game object already has a {kind} component")]
    DuplicateComponent {
        /// Component kind tag
        kind: &'static str,
    },

    /// Component kind is not in the registry
    #[error("unknown component kind '{0}'")]
    UnknownComponentKind(String),

    /// Component id is not attached to the object
    #[error("game object {id} has no component {component}")]
    MissingComponent {
        /// Object addressed
        id: GameObjectId,
        /// Component addressed
        component: ComponentId,
    },

    /// Parent world matrix cannot be inverted
    #[error("parent of {0} has a singular world matrix")]
    DegenerateParent(GameObjectId),
}
