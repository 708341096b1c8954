//! Deferred structural edits
//!
//! Anything that restructures the scene while it is being walked (hierarchy
//! drag-and-drop, delete, scripts spawning objects) records a
//! [`SceneCommand`] instead of mutating in place. The scene applies the
//! queue in one batch between passes. Commands address objects by stable id
//! so earlier commands in the same flush cannot invalidate later ones.

use super::{ComponentId, GameObjectId};
use std::collections::VecDeque;

/// One structural edit
#[derive(Debug, Clone, PartialEq)]
pub enum SceneCommand {
    /// Create an object; the id is chosen at enqueue time
    CreateGameObject {
        /// Id of the object to create
        id: GameObjectId,
        /// Display name
        name: String,
        /// Parent, `None` for a root
        parent: Option<GameObjectId>,
    },
    /// Remove an object under the scene's removal policy
    RemoveGameObject(GameObjectId),
    /// Move an object in the hierarchy
    Reparent {
        /// Object to move
        child: GameObjectId,
        /// New parent, `None` for root
        new_parent: Option<GameObjectId>,
        /// Keep the world pose instead of the local pose
        keep_world_pose: bool,
    },
    /// Attach a registered component kind
    AddComponent {
        /// Object to attach to
        target: GameObjectId,
        /// Registry kind tag
        kind: String,
    },
    /// Detach a component
    RemoveComponent {
        /// Owning object
        target: GameObjectId,
        /// Component to remove
        component: ComponentId,
    },
    /// Toggle an object
    SetEnabled {
        /// Object to toggle
        target: GameObjectId,
        /// New flag
        enabled: bool,
    },
    /// Rename an object
    Rename {
        /// Object to rename
        target: GameObjectId,
        /// New name
        name: String,
    },
}

/// FIFO queue of [`SceneCommand`]s
#[derive(Debug, Default, Clone)]
pub struct SceneCommands {
    queue: VecDeque<SceneCommand>,
}

impl SceneCommands {
    /// Empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command
    pub fn push(&mut self, command: SceneCommand) {
        self.queue.push_back(command);
    }

    /// Queue creation of a new object and return the id it will have
    pub fn create_game_object(
        &mut self,
        name: impl Into<String>,
        parent: Option<GameObjectId>,
    ) -> GameObjectId {
        let id = GameObjectId::new();
        self.push(SceneCommand::CreateGameObject {
            id,
            name: name.into(),
            parent,
        });
        id
    }

    /// Queue removal of an object
    pub fn remove_game_object(&mut self, id: GameObjectId) {
        self.push(SceneCommand::RemoveGameObject(id));
    }

    /// Queue a reparent that keeps the local pose
    pub fn reparent(&mut self, child: GameObjectId, new_parent: Option<GameObjectId>) {
        self.push(SceneCommand::Reparent {
            child,
            new_parent,
            keep_world_pose: false,
        });
    }

    /// Queue a reparent that keeps the world pose
    pub fn reparent_keep_world(&mut self, child: GameObjectId, new_parent: Option<GameObjectId>) {
        self.push(SceneCommand::Reparent {
            child,
            new_parent,
            keep_world_pose: true,
        });
    }

    /// Queue attaching a component by kind tag
    pub fn add_component(&mut self, target: GameObjectId, kind: impl Into<String>) {
        self.push(SceneCommand::AddComponent {
            target,
            kind: kind.into(),
        });
    }

    /// Queue removing a component
    pub fn remove_component(&mut self, target: GameObjectId, component: ComponentId) {
        self.push(SceneCommand::RemoveComponent { target, component });
    }

    /// Queue an enabled-flag change
    pub fn set_enabled(&mut self, target: GameObjectId, enabled: bool) {
        self.push(SceneCommand::SetEnabled { target, enabled });
    }

    /// Queue a rename
    pub fn rename(&mut self, target: GameObjectId, name: impl Into<String>) {
        self.push(SceneCommand::Rename {
            target,
            name: name.into(),
        });
    }

    /// Number of queued commands
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drop everything queued
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Queued commands in FIFO order
    pub fn iter(&self) -> impl Iterator<Item = &SceneCommand> {
        self.queue.iter()
    }

    pub(crate) fn pop(&mut self) -> Option<SceneCommand> {
        self.queue.pop_front()
    }
}

/// Outcome of a flush
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FlushReport {
    /// Commands applied
    pub applied: usize,
    /// Commands rejected and skipped
    pub failed: usize,
}

impl FlushReport {
    /// Whether every command was applied
    pub const fn is_clean(&self) -> bool {
        self.failed == 0
    }
}
