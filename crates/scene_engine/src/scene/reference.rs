//! Weak references by stable id
//!
//! A reference stores only an id. Resolving it goes through the scene or the
//! asset resolver and yields `None` once the target is gone, never a dangling
//! handle. Scrubbing helpers clear reference fields whose target no longer
//! exists.

use super::fields::{FieldValue, Inspectable, WidgetKind};
use super::{GameObjectHandle, GameObjectId, Scene};
use crate::assets::{AssetGuid, AssetResolver};
use std::path::PathBuf;

/// Weak reference to a GameObject
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GameObjectRef(pub Option<GameObjectId>);

impl GameObjectRef {
    /// Reference to `id`
    pub const fn to(id: GameObjectId) -> Self {
        Self(Some(id))
    }

    /// Referenced id, if set
    pub const fn id(&self) -> Option<GameObjectId> {
        self.0
    }

    /// Live handle of the target in `scene`
    pub fn resolve(&self, scene: &Scene) -> Option<GameObjectHandle> {
        self.0.and_then(|id| scene.find_game_object(id))
    }
}

/// Weak reference to an asset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AssetRef(pub Option<AssetGuid>);

impl AssetRef {
    /// Reference to `guid`
    pub const fn to(guid: AssetGuid) -> Self {
        Self(Some(guid))
    }

    /// Referenced GUID, if set
    pub const fn guid(&self) -> Option<AssetGuid> {
        self.0
    }

    /// Path of the target asset
    pub fn resolve(&self, resolver: &dyn AssetResolver) -> Option<PathBuf> {
        self.0.and_then(|guid| resolver.path_for_guid(guid))
    }
}

/// Clear every GameObject reference field whose target fails `is_live`.
///
/// Returns the number of fields cleared.
pub(crate) fn clear_object_references<T: Inspectable + ?Sized>(
    target: &mut T,
    is_live: impl Fn(GameObjectId) -> bool,
) -> usize {
    let mut cleared = 0;
    for descriptor in target.field_descriptors() {
        if descriptor.widget != WidgetKind::ObjectReference {
            continue;
        }
        if let Some(FieldValue::GameObject(Some(id))) = target.get_field(descriptor.name) {
            if !is_live(id)
                && target
                    .set_field(descriptor.name, FieldValue::GameObject(None))
                    .is_ok()
            {
                cleared += 1;
            }
        }
    }
    cleared
}

/// Clear every asset reference field the resolver cannot resolve.
pub(crate) fn clear_asset_references<T: Inspectable + ?Sized>(
    target: &mut T,
    resolver: &dyn AssetResolver,
) -> usize {
    let mut cleared = 0;
    for descriptor in target.field_descriptors() {
        if descriptor.widget != WidgetKind::AssetReference {
            continue;
        }
        if let Some(FieldValue::Asset(Some(guid))) = target.get_field(descriptor.name) {
            if !resolver.contains(guid)
                && target
                    .set_field(descriptor.name, FieldValue::Asset(None))
                    .is_ok()
            {
                cleared += 1;
            }
        }
    }
    cleared
}
