//! Component trait and lifecycle contexts

use super::commands::SceneCommands;
use super::fields::Inspectable;
use super::lighting::LightSample;
use super::transform::Transform;
use super::{ComponentId, GameObjectHandle, GameObjectId};
use crate::foundation::math::Mat4;
use crate::render::{FrameView, Renderer};
use std::any::Any;
use std::fmt;

/// Context for `start` and `update`
///
/// Structural edits go through `commands`; they are applied by the scene
/// after the current pass, never while it is iterating.
pub struct UpdateContext<'a> {
    /// Seconds since the previous frame, zero for `start`
    pub delta_time: f32,
    /// Owning GameObject
    pub owner: GameObjectHandle,
    /// Owning GameObject's stable id
    pub owner_id: GameObjectId,
    /// Owner's Transform
    pub transform: &'a mut Transform,
    /// Deferred structural edits
    pub commands: &'a mut SceneCommands,
}

/// Context for `render`
pub struct RenderContext<'a> {
    /// Owning GameObject
    pub owner: GameObjectHandle,
    /// Owner's world matrix for this frame
    pub world_matrix: Mat4,
    /// View/projection supplied by the host, passed through unchanged
    pub frame: &'a FrameView,
    /// Active lights, enabled objects only
    pub lights: &'a [LightSample],
    /// Draw sink
    pub renderer: &'a mut dyn Renderer,
}

/// Behaviour unit attached to a GameObject
///
/// Every hook has an empty default, so a component implements only the subset
/// of Start/Update/Render it needs.
pub trait Component: Inspectable + Any + fmt::Debug {
    /// Registry kind tag, also the tag written to scene files
    fn kind(&self) -> &'static str;

    /// Whether several instances may live on one GameObject
    fn allows_multiple(&self) -> bool {
        true
    }

    /// Called once when the scene starts, or on attach to a started scene
    fn start(&mut self, _ctx: &mut UpdateContext<'_>) {}

    /// Called every simulated frame while the owner is enabled
    fn update(&mut self, _ctx: &mut UpdateContext<'_>) {}

    /// Called every rendered frame while the owner is enabled
    fn render(&mut self, _ctx: &mut RenderContext<'_>) {}

    /// Called once when the component is removed or its scene is disposed
    fn dispose(&mut self) {}

    /// Upcast for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A component together with its id and owner
#[derive(Debug)]
pub struct AttachedComponent {
    id: ComponentId,
    owner: GameObjectHandle,
    inner: Box<dyn Component>,
    started: bool,
    disposed: bool,
}

impl AttachedComponent {
    pub(crate) fn new(id: ComponentId, owner: GameObjectHandle, inner: Box<dyn Component>) -> Self {
        Self {
            id,
            owner,
            inner,
            started: false,
            disposed: false,
        }
    }

    /// Id within the owning GameObject
    pub const fn id(&self) -> ComponentId {
        self.id
    }

    /// Owning GameObject, fixed at attach time
    pub const fn owner(&self) -> GameObjectHandle {
        self.owner
    }

    /// Kind tag of the inner component
    pub fn kind(&self) -> &'static str {
        self.inner.kind()
    }

    /// Inner component
    pub fn component(&self) -> &dyn Component {
        self.inner.as_ref()
    }

    /// Inner component, mutable
    pub fn component_mut(&mut self) -> &mut dyn Component {
        self.inner.as_mut()
    }

    /// Downcast to a concrete component type
    pub fn downcast_ref<T: Component>(&self) -> Option<&T> {
        self.inner.as_any().downcast_ref::<T>()
    }

    /// Downcast to a concrete component type, mutable
    pub fn downcast_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.inner.as_any_mut().downcast_mut::<T>()
    }

    /// Whether `start` has been called
    pub const fn is_started(&self) -> bool {
        self.started
    }

    pub(crate) fn mark_started(&mut self) {
        self.started = true;
    }

    pub(crate) fn dispose(&mut self) {
        if !self.disposed {
            self.disposed = true;
            self.inner.dispose();
        }
    }
}
