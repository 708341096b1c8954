//! Identifiers for scene objects
//!
//! [`GameObjectId`] is the persistent identity written to scene files.
//! [`GameObjectHandle`] is the in-memory address of a live object: a
//! generational arena key tagged with the [`SceneId`] that issued it, so a
//! handle can neither outlive its object nor be used against another scene.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

slotmap::new_key_type! {
    /// Arena key of a GameObject inside one scene
    pub struct ObjectKey;
}

/// Stable GameObject identity, survives save and reload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameObjectId(Uuid);

impl GameObjectId {
    /// Fresh random id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Underlying UUID
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for GameObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GameObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identity of one `Scene` instance; never persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneId(Uuid);

impl SceneId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Address of a live GameObject in a specific scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameObjectHandle {
    scene: SceneId,
    key: ObjectKey,
}

impl GameObjectHandle {
    pub(crate) const fn new(scene: SceneId, key: ObjectKey) -> Self {
        Self { scene, key }
    }

    /// Scene that issued this handle
    pub const fn scene(&self) -> SceneId {
        self.scene
    }

    pub(crate) const fn key(&self) -> ObjectKey {
        self.key
    }
}

/// Component address inside one GameObject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u32);

impl ComponentId {
    /// The Transform, present on every GameObject
    pub const TRANSFORM: Self = Self(0);

    pub(crate) const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw numeric value
    pub const fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
