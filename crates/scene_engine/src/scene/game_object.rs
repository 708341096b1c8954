//! GameObject
//!
//! A GameObject owns exactly one [`Transform`] and an ordered list of
//! components. Insertion order is dispatch order for start, update and
//! render. The Transform is not part of the list; it cannot be removed and
//! is always addressed as [`ComponentId::TRANSFORM`].

use super::commands::SceneCommands;
use super::component::{AttachedComponent, Component, RenderContext, UpdateContext};
use super::lighting::LightSample;
use super::reference::{clear_asset_references, clear_object_references};
use super::registry::ComponentRegistry;
use super::transform::Transform;
use super::{ComponentId, GameObjectHandle, GameObjectId, SceneError};
use crate::assets::AssetResolver;
use crate::foundation::math::Mat4;
use crate::render::{FrameView, Renderer};
use log::{debug, warn};

/// Scene entity
#[derive(Debug)]
pub struct GameObject {
    /// Display name
    pub name: String,
    /// Disabled objects get no update or render calls
    pub enabled: bool,
    id: GameObjectId,
    handle: GameObjectHandle,
    transform: Transform,
    components: Vec<AttachedComponent>,
    next_component: u32,
    started: bool,
}

impl GameObject {
    pub(crate) fn new(id: GameObjectId, name: String, handle: GameObjectHandle) -> Self {
        Self {
            name,
            enabled: true,
            id,
            handle,
            transform: Transform::new(handle),
            components: Vec::new(),
            next_component: ComponentId::TRANSFORM.raw() + 1,
            started: false,
        }
    }

    /// Stable id
    pub const fn id(&self) -> GameObjectId {
        self.id
    }

    /// Live handle in the owning scene
    pub const fn handle(&self) -> GameObjectHandle {
        self.handle
    }

    /// The Transform
    pub const fn transform(&self) -> &Transform {
        &self.transform
    }

    /// The Transform, for local pose edits
    ///
    /// Hierarchy links are only changed through the scene.
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// Whether `start` has run on this object
    pub const fn is_started(&self) -> bool {
        self.started
    }

    /// Attached components in dispatch order, Transform excluded
    pub fn components(&self) -> &[AttachedComponent] {
        &self.components
    }

    /// Attach a default-constructed `T`
    pub fn add_component<T: Component + Default>(&mut self) -> Result<&mut T, SceneError> {
        self.add_component_with(T::default())
    }

    /// Attach `component`
    pub fn add_component_with<T: Component>(&mut self, component: T) -> Result<&mut T, SceneError> {
        let owner = self.id;
        let id = self.add_boxed_component(Box::new(component))?;
        self.component_mut(id)
            .and_then(AttachedComponent::downcast_mut::<T>)
            .ok_or(SceneError::MissingComponent {
                id: owner,
                component: id,
            })
    }

    /// Attach an already boxed component
    ///
    /// Fails with `DuplicateComponent` when the component's kind allows a
    /// single instance and one is already attached.
    pub fn add_boxed_component(&mut self, component: Box<dyn Component>) -> Result<ComponentId, SceneError> {
        let kind = component.kind();
        if !component.allows_multiple() && self.components.iter().any(|c| c.kind() == kind) {
            return Err(SceneError::DuplicateComponent { kind });
        }
        let id = ComponentId::from_raw(self.next_component);
        self.next_component += 1;
        self.components
            .push(AttachedComponent::new(id, self.handle, component));
        debug!("Attached {kind} {id} to '{}'", self.name);
        Ok(id)
    }

    /// Attach a component created from the registry
    pub fn add_component_of_kind(
        &mut self,
        registry: &ComponentRegistry,
        kind: &str,
    ) -> Result<ComponentId, SceneError> {
        let component = registry
            .create(kind)
            .ok_or_else(|| SceneError::UnknownComponentKind(kind.to_string()))?;
        self.add_boxed_component(component)
    }

    /// Dispose and detach a component
    ///
    /// Returns `false`, changing nothing, for the Transform or an id that is
    /// not attached.
    pub fn remove_component(&mut self, id: ComponentId) -> bool {
        if id == ComponentId::TRANSFORM {
            warn!("Ignoring request to remove the Transform of '{}'", self.name);
            return false;
        }
        let Some(index) = self.components.iter().position(|c| c.id() == id) else {
            return false;
        };
        let mut removed = self.components.remove(index);
        removed.dispose();
        debug!("Removed {} {id} from '{}'", removed.kind(), self.name);
        true
    }

    /// Attached component by id
    pub fn component(&self, id: ComponentId) -> Option<&AttachedComponent> {
        self.components.iter().find(|c| c.id() == id)
    }

    /// Attached component by id, mutable
    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut AttachedComponent> {
        self.components.iter_mut().find(|c| c.id() == id)
    }

    /// First component of type `T`
    pub fn get_component<T: Component>(&self) -> Option<&T> {
        self.components.iter().find_map(AttachedComponent::downcast_ref::<T>)
    }

    /// First component of type `T`, mutable
    pub fn get_component_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.components
            .iter_mut()
            .find_map(AttachedComponent::downcast_mut::<T>)
    }

    /// Every component of type `T` with its id
    pub fn get_components<T: Component>(&self) -> impl Iterator<Item = (ComponentId, &T)> {
        self.components
            .iter()
            .filter_map(|c| c.downcast_ref::<T>().map(|inner| (c.id(), inner)))
    }

    /// Start every component not yet started
    ///
    /// Not gated by `enabled`. Components attached after the first call are
    /// started by the next call or by the next `update`.
    pub fn start(&mut self, commands: &mut SceneCommands) {
        self.started = true;
        let Self {
            id,
            handle,
            transform,
            components,
            ..
        } = self;
        for component in components.iter_mut().filter(|c| !c.is_started()) {
            component.mark_started();
            let mut ctx = UpdateContext {
                delta_time: 0.0,
                owner: *handle,
                owner_id: *id,
                transform: &mut *transform,
                commands: &mut *commands,
            };
            component.component_mut().start(&mut ctx);
        }
    }

    /// Update every component, skipped entirely while disabled
    pub fn update(&mut self, delta_time: f32, commands: &mut SceneCommands) {
        if !self.enabled {
            return;
        }
        if self.started {
            self.start(commands);
        }
        let Self {
            id,
            handle,
            transform,
            components,
            ..
        } = self;
        for component in components.iter_mut() {
            let mut ctx = UpdateContext {
                delta_time,
                owner: *handle,
                owner_id: *id,
                transform: &mut *transform,
                commands: &mut *commands,
            };
            component.component_mut().update(&mut ctx);
        }
    }

    /// Render every component, skipped entirely while disabled
    pub fn render(
        &mut self,
        world_matrix: Mat4,
        frame: &FrameView,
        lights: &[LightSample],
        renderer: &mut dyn Renderer,
    ) {
        if !self.enabled {
            return;
        }
        for component in &mut self.components {
            let mut ctx = RenderContext {
                owner: self.handle,
                world_matrix,
                frame,
                lights,
                renderer: &mut *renderer,
            };
            component.component_mut().render(&mut ctx);
        }
    }

    /// Dispose every component; safe to call more than once
    pub fn dispose(&mut self) {
        for component in &mut self.components {
            component.dispose();
        }
    }

    /// Clear GameObject references whose target fails `is_live`
    pub(crate) fn scrub_object_references(&mut self, is_live: impl Fn(GameObjectId) -> bool) -> usize {
        self.components
            .iter_mut()
            .map(|c| clear_object_references(c.component_mut(), &is_live))
            .sum()
    }

    /// Clear asset references the resolver does not know
    pub(crate) fn scrub_asset_references(&mut self, resolver: &dyn AssetResolver) -> usize {
        self.components
            .iter_mut()
            .map(|c| clear_asset_references(c.component_mut(), resolver))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::components::{Camera, Light, Spinner};
    use crate::scene::Scene;

    #[test]
    fn test_transform_cannot_be_removed() {
        let mut scene = Scene::new();
        let object = scene.add_game_object();
        assert!(!object.remove_component(ComponentId::TRANSFORM));
        assert!(!object.remove_component(ComponentId::from_raw(42)));
    }

    #[test]
    fn test_component_ids_are_not_reused() {
        let mut scene = Scene::new();
        let object = scene.add_game_object();
        let first = object.add_boxed_component(Box::new(Spinner::default())).unwrap();
        assert!(object.remove_component(first));
        let second = object.add_boxed_component(Box::new(Spinner::default())).unwrap();
        assert_ne!(first, second);
        assert_ne!(second, ComponentId::TRANSFORM);
    }

    #[test]
    fn test_single_camera_per_object() {
        let mut scene = Scene::new();
        let object = scene.add_game_object();
        object.add_component::<Camera>().unwrap();
        assert_eq!(
            object.add_component::<Camera>().err(),
            Some(SceneError::DuplicateComponent { kind: "Camera" })
        );
        object.add_component_with(Light::point()).unwrap();
        object.add_component_with(Light::point()).unwrap();
        assert_eq!(object.components().len(), 3);
    }

    #[test]
    fn test_add_component_of_unknown_kind() {
        let registry = ComponentRegistry::with_builtins();
        let mut scene = Scene::new();
        let object = scene.add_game_object();
        assert_eq!(
            object.add_component_of_kind(&registry, "Teapot"),
            Err(SceneError::UnknownComponentKind("Teapot".to_string()))
        );
        let id = object.add_component_of_kind(&registry, "Spinner").unwrap();
        assert_eq!(object.component(id).map(AttachedComponent::kind), Some("Spinner"));
        assert!(object.get_component::<Spinner>().is_some());
    }
}
