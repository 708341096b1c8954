//! Active-light index
//!
//! The scene keeps its own list of light components instead of lights
//! registering themselves anywhere global. The index is invalidated by any
//! edit that could add, remove or re-enable a light and is rebuilt lazily
//! from the scene's own objects.

use super::components::LightKind;
use super::{ComponentId, GameObjectHandle};
use crate::foundation::math::{Color, Vec3};

/// A light resolved to world space for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSample {
    /// GameObject carrying the light
    pub owner: GameObjectHandle,
    /// Light type
    pub kind: LightKind,
    /// World position
    pub position: Vec3,
    /// World direction the light points along
    pub direction: Vec3,
    /// Light color
    pub color: Color,
    /// Intensity multiplier
    pub brightness: f32,
    /// Reach for point and spot lights
    pub range: f32,
    /// Spot cone angle in degrees
    pub angle: f32,
    /// Spot edge softness
    pub softness: f32,
}

/// Cached `(owner, component)` pairs of every Light in a scene
#[derive(Debug, Default, Clone)]
pub struct LightIndex {
    entries: Vec<(GameObjectHandle, ComponentId)>,
    valid: bool,
}

impl LightIndex {
    /// Empty, invalid index
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `entries` reflects the scene
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Mark stale
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    /// Replace the entries and mark valid
    pub fn rebuild(&mut self, entries: impl IntoIterator<Item = (GameObjectHandle, ComponentId)>) {
        self.entries.clear();
        self.entries.extend(entries);
        self.valid = true;
    }

    /// Indexed lights, insertion order
    pub fn entries(&self) -> &[(GameObjectHandle, ComponentId)] {
        &self.entries
    }
}
