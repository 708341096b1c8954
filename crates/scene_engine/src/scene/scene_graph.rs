//! Scene container
//!
//! The scene owns every GameObject in a generational arena and keeps a
//! separate insertion-order list for deterministic iteration. The hierarchy
//! lives in the Transforms as handle links; every method here that touches
//! links validates first and mutates second, so a rejected edit leaves the
//! tree exactly as it was.

use super::commands::{FlushReport, SceneCommand, SceneCommands};
use super::components::{Camera, Light};
use super::game_object::GameObject;
use super::lighting::{LightIndex, LightSample};
use super::registry::ComponentRegistry;
use super::{GameObjectHandle, GameObjectId, ObjectKey, SceneError, SceneId};
use crate::assets::AssetResolver;
use crate::foundation::math::{forward_of, position_of, right_of, up_of, Mat4, Pose, Vec3};
use crate::render::{FrameView, Renderer};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use std::collections::HashMap;
use std::rc::Rc;

/// What happens to the children of a removed GameObject
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalPolicy {
    /// Remove the object and all of its descendants
    #[default]
    RemoveSubtree,
    /// Move the children to the removed object's parent, keeping local poses
    ReparentToParent,
    /// Refuse to remove an object that has children
    Reject,
}

/// Owned set of GameObjects plus lifecycle dispatch
#[derive(Debug)]
pub struct Scene {
    id: SceneId,
    objects: SlotMap<ObjectKey, GameObject>,
    order: Vec<ObjectKey>,
    by_id: HashMap<GameObjectId, ObjectKey>,
    pending: SceneCommands,
    lights: LightIndex,
    registry: Rc<ComponentRegistry>,
    removal_policy: RemovalPolicy,
    started: bool,
    disposed: bool,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Empty scene using the built-in component registry
    pub fn new() -> Self {
        Self::with_registry(Rc::new(ComponentRegistry::with_builtins()))
    }

    /// Empty scene creating queued components from `registry`
    pub fn with_registry(registry: Rc<ComponentRegistry>) -> Self {
        Self {
            id: SceneId::new(),
            objects: SlotMap::with_key(),
            order: Vec::new(),
            by_id: HashMap::new(),
            pending: SceneCommands::new(),
            lights: LightIndex::new(),
            registry,
            removal_policy: RemovalPolicy::default(),
            started: false,
            disposed: false,
        }
    }

    /// Identity of this scene instance
    pub const fn id(&self) -> SceneId {
        self.id
    }

    /// Registry used for `AddComponent` commands
    pub const fn registry(&self) -> &Rc<ComponentRegistry> {
        &self.registry
    }

    /// Policy used by [`Self::remove_game_object`]
    pub const fn removal_policy(&self) -> RemovalPolicy {
        self.removal_policy
    }

    /// Change the default removal policy
    pub fn set_removal_policy(&mut self, policy: RemovalPolicy) {
        self.removal_policy = policy;
    }

    /// Whether `start` has run
    pub const fn is_started(&self) -> bool {
        self.started
    }

    /// Whether `dispose` has run
    pub const fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Number of GameObjects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the scene has no GameObjects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    // ---- creation and lookup ----

    /// Create a root GameObject named "GameObject"
    pub fn add_game_object(&mut self) -> &mut GameObject {
        self.add_named_game_object("GameObject")
    }

    /// Create a root GameObject with a fresh id
    pub fn add_named_game_object(&mut self, name: impl Into<String>) -> &mut GameObject {
        let key = self.insert_key(GameObjectId::new(), name.into());
        &mut self.objects[key]
    }

    /// Create a root GameObject with a caller-chosen id
    pub fn add_game_object_with_id(
        &mut self,
        id: GameObjectId,
        name: impl Into<String>,
    ) -> Result<&mut GameObject, SceneError> {
        if self.by_id.contains_key(&id) {
            return Err(SceneError::DuplicateId(id));
        }
        let key = self.insert_key(id, name.into());
        Ok(&mut self.objects[key])
    }

    fn insert_key(&mut self, id: GameObjectId, name: String) -> ObjectKey {
        let scene = self.id;
        let key = self
            .objects
            .insert_with_key(|key| GameObject::new(id, name, GameObjectHandle::new(scene, key)));
        self.order.push(key);
        self.by_id.insert(id, key);
        self.lights.invalidate();
        // components attached later are started by the object's next update
        self.start_if_running(key);
        key
    }

    fn key_of(&self, handle: GameObjectHandle) -> Result<ObjectKey, SceneError> {
        if handle.scene() != self.id {
            return Err(SceneError::ForeignObject(handle));
        }
        if !self.objects.contains_key(handle.key()) {
            return Err(SceneError::StaleHandle(handle));
        }
        Ok(handle.key())
    }

    /// Whether `handle` names a live object of this scene
    pub fn contains(&self, handle: GameObjectHandle) -> bool {
        self.key_of(handle).is_ok()
    }

    /// Live handle of the object with this id
    pub fn find_game_object(&self, id: GameObjectId) -> Option<GameObjectHandle> {
        self.by_id
            .get(&id)
            .map(|&key| GameObjectHandle::new(self.id, key))
    }

    /// First object, in insertion order, with this name
    pub fn find_by_name(&self, name: &str) -> Option<GameObjectHandle> {
        self.game_objects()
            .find(|object| object.name == name)
            .map(GameObject::handle)
    }

    /// Object behind a handle
    pub fn game_object(&self, handle: GameObjectHandle) -> Option<&GameObject> {
        let key = self.key_of(handle).ok()?;
        self.objects.get(key)
    }

    /// Object behind a handle, mutable
    pub fn game_object_mut(&mut self, handle: GameObjectHandle) -> Option<&mut GameObject> {
        let key = self.key_of(handle).ok()?;
        // the caller may attach, remove or toggle lights
        self.lights.invalidate();
        self.objects.get_mut(key)
    }

    /// Every object in insertion order
    pub fn game_objects(&self) -> impl Iterator<Item = &GameObject> {
        self.order.iter().filter_map(|&key| self.objects.get(key))
    }

    fn enabled_objects(&self) -> impl Iterator<Item = &GameObject> {
        self.game_objects().filter(|object| object.enabled)
    }

    // ---- hierarchy ----

    /// Objects without a parent, in insertion order
    pub fn roots(&self) -> Vec<GameObjectHandle> {
        self.game_objects()
            .filter(|object| object.transform().is_root())
            .map(GameObject::handle)
            .collect()
    }

    /// Children of `handle` in order; empty for an unknown handle
    pub fn children(&self, handle: GameObjectHandle) -> &[GameObjectHandle] {
        match self.game_object(handle) {
            Some(object) => object.transform().children(),
            None => &[],
        }
    }

    /// Parent of `handle`
    pub fn parent(&self, handle: GameObjectHandle) -> Option<GameObjectHandle> {
        self.game_object(handle)?.transform().parent()
    }

    /// Whether `ancestor` is a strict ancestor of `descendant`
    pub fn is_ancestor(&self, ancestor: GameObjectHandle, descendant: GameObjectHandle) -> bool {
        match (self.key_of(ancestor), self.key_of(descendant)) {
            (Ok(ancestor), Ok(descendant)) => self.is_ancestor_key(ancestor, descendant),
            _ => false,
        }
    }

    fn is_ancestor_key(&self, ancestor: ObjectKey, descendant: ObjectKey) -> bool {
        let mut current = self
            .objects
            .get(descendant)
            .and_then(|object| object.transform().parent());
        while let Some(handle) = current {
            if handle.key() == ancestor {
                return true;
            }
            current = self
                .objects
                .get(handle.key())
                .and_then(|object| object.transform().parent());
        }
        false
    }

    /// Depth-first walk: roots in insertion order, children in child order
    pub fn walk_hierarchy(&self, mut visitor: impl FnMut(&GameObject, usize)) {
        let mut stack: Vec<(ObjectKey, usize)> = self
            .roots()
            .iter()
            .rev()
            .map(|handle| (handle.key(), 0))
            .collect();
        while let Some((key, depth)) = stack.pop() {
            let Some(object) = self.objects.get(key) else {
                continue;
            };
            visitor(object, depth);
            stack.extend(
                object
                    .transform()
                    .children()
                    .iter()
                    .rev()
                    .map(|child| (child.key(), depth + 1)),
            );
        }
    }

    /// Reparent `child`, preserving its local pose
    ///
    /// `None` makes it a root. Reparenting onto the current parent is a
    /// no-op; onto itself or a descendant fails with `Cycle`.
    pub fn set_parent(
        &mut self,
        child: GameObjectHandle,
        new_parent: Option<GameObjectHandle>,
    ) -> Result<(), SceneError> {
        let child_key = self.key_of(child)?;
        let parent_key = new_parent.map(|parent| self.key_of(parent)).transpose()?;
        let old_parent = self.objects[child_key].transform().parent();
        if old_parent == new_parent {
            return Ok(());
        }
        if let Some(parent_key) = parent_key {
            if parent_key == child_key || self.is_ancestor_key(child_key, parent_key) {
                return Err(SceneError::Cycle {
                    child: self.objects[child_key].id(),
                    parent: self.objects[parent_key].id(),
                });
            }
        }

        if let Some(old) = old_parent.and_then(|old| self.objects.get_mut(old.key())) {
            old.transform_mut().remove_child(child);
        }
        if let Some(parent_key) = parent_key {
            self.objects[parent_key].transform_mut().push_child(child);
        }
        let object = &mut self.objects[child_key];
        object.transform_mut().set_parent_link(new_parent);
        debug!("Reparented '{}'", object.name);
        Ok(())
    }

    /// Reparent `child`, adjusting its local pose so its world pose is kept
    pub fn set_parent_keep_world(
        &mut self,
        child: GameObjectHandle,
        new_parent: Option<GameObjectHandle>,
    ) -> Result<(), SceneError> {
        let child_key = self.key_of(child)?;
        let world = self.world_matrix_of(child_key);
        let inverse = match new_parent {
            Some(parent) => {
                let parent_key = self.key_of(parent)?;
                self.world_matrix_of(parent_key)
                    .try_inverse()
                    .ok_or_else(|| SceneError::DegenerateParent(self.objects[parent_key].id()))?
            }
            None => Mat4::identity(),
        };
        self.set_parent(child, new_parent)?;
        self.objects[child_key]
            .transform_mut()
            .set_local_pose(Pose::from_matrix(&(inverse * world)));
        Ok(())
    }

    // ---- matrices ----

    /// Local T*R*S matrix
    pub fn local_matrix(&self, handle: GameObjectHandle) -> Option<Mat4> {
        self.game_object(handle)
            .map(|object| object.transform().local_matrix())
    }

    /// World matrix: `parent_world * local`, identity-rooted
    pub fn world_matrix(&self, handle: GameObjectHandle) -> Option<Mat4> {
        let key = self.key_of(handle).ok()?;
        Some(self.world_matrix_of(key))
    }

    fn world_matrix_of(&self, key: ObjectKey) -> Mat4 {
        let Some(object) = self.objects.get(key) else {
            return Mat4::identity();
        };
        let mut world = object.transform().local_matrix();
        let mut parent = object.transform().parent();
        while let Some(handle) = parent {
            let Some(ancestor) = self.objects.get(handle.key()) else {
                break;
            };
            world = ancestor.transform().local_matrix() * world;
            parent = ancestor.transform().parent();
        }
        world
    }

    /// Adjust the local pose so the world matrix becomes `world`
    ///
    /// The parent is left as it is.
    pub fn set_world_matrix(&mut self, handle: GameObjectHandle, world: &Mat4) -> Result<(), SceneError> {
        let key = self.key_of(handle)?;
        let inverse = match self.objects[key].transform().parent() {
            Some(parent) => {
                let parent_world = self.world_matrix_of(parent.key());
                parent_world
                    .try_inverse()
                    .ok_or_else(|| SceneError::DegenerateParent(self.objects[parent.key()].id()))?
            }
            None => Mat4::identity(),
        };
        self.objects[key]
            .transform_mut()
            .set_local_pose(Pose::from_matrix(&(inverse * world)));
        Ok(())
    }

    /// World-space position
    pub fn world_position(&self, handle: GameObjectHandle) -> Option<Vec3> {
        self.world_matrix(handle).map(|m| position_of(&m))
    }

    /// World +Z, normalised
    pub fn forward(&self, handle: GameObjectHandle) -> Option<Vec3> {
        self.world_matrix(handle).map(|m| forward_of(&m))
    }

    /// World +Y, normalised
    pub fn up(&self, handle: GameObjectHandle) -> Option<Vec3> {
        self.world_matrix(handle).map(|m| up_of(&m))
    }

    /// World +X, normalised
    pub fn right(&self, handle: GameObjectHandle) -> Option<Vec3> {
        self.world_matrix(handle).map(|m| right_of(&m))
    }

    // ---- removal ----

    /// Remove an object under the scene's removal policy
    ///
    /// Returns the number of objects removed.
    pub fn remove_game_object(&mut self, handle: GameObjectHandle) -> Result<usize, SceneError> {
        self.remove_game_object_with(handle, self.removal_policy)
    }

    /// Remove an object under an explicit policy
    pub fn remove_game_object_with(
        &mut self,
        handle: GameObjectHandle,
        policy: RemovalPolicy,
    ) -> Result<usize, SceneError> {
        let key = self.key_of(handle)?;
        let (id, parent, children) = {
            let transform = self.objects[key].transform();
            (
                self.objects[key].id(),
                transform.parent(),
                transform.children().to_vec(),
            )
        };

        let doomed = match policy {
            RemovalPolicy::Reject if !children.is_empty() => {
                return Err(SceneError::HasChildren {
                    id,
                    count: children.len(),
                });
            }
            RemovalPolicy::Reject => vec![key],
            RemovalPolicy::RemoveSubtree => self.subtree(key),
            RemovalPolicy::ReparentToParent => {
                if let Some(parent) = parent.and_then(|p| self.objects.get_mut(p.key())) {
                    let transform = parent.transform_mut();
                    let slot = transform
                        .remove_child(handle)
                        .unwrap_or(transform.children().len());
                    transform.insert_children(slot, &children);
                }
                for child in &children {
                    if let Some(object) = self.objects.get_mut(child.key()) {
                        object.transform_mut().set_parent_link(parent);
                    }
                }
                self.objects[key].transform_mut().take_children();
                vec![key]
            }
        };

        if policy != RemovalPolicy::ReparentToParent {
            if let Some(parent) = parent.and_then(|p| self.objects.get_mut(p.key())) {
                parent.transform_mut().remove_child(handle);
            }
        }

        for doomed_key in &doomed {
            if let Some(mut object) = self.objects.remove(*doomed_key) {
                object.dispose();
                self.by_id.remove(&object.id());
                debug!("Removed game object '{}' ({})", object.name, object.id());
            }
        }
        let objects = &self.objects;
        self.order.retain(|key| objects.contains_key(*key));
        self.lights.invalidate();

        let scrubbed = self.sweep_object_references();
        if scrubbed > 0 {
            debug!("Cleared {scrubbed} references to removed objects");
        }
        Ok(doomed.len())
    }

    /// `root` and its descendants, pre-order
    fn subtree(&self, root: ObjectKey) -> Vec<ObjectKey> {
        let mut keys = Vec::new();
        let mut stack = vec![root];
        while let Some(key) = stack.pop() {
            keys.push(key);
            if let Some(object) = self.objects.get(key) {
                stack.extend(object.transform().children().iter().rev().map(|c| c.key()));
            }
        }
        keys
    }

    // ---- references ----

    /// Clear GameObject references to ids not in this scene
    pub fn sweep_object_references(&mut self) -> usize {
        let by_id = &self.by_id;
        self.objects
            .values_mut()
            .map(|object| object.scrub_object_references(|id| by_id.contains_key(&id)))
            .sum()
    }

    /// Clear dangling GameObject references and asset references `resolver`
    /// cannot resolve
    ///
    /// Returns the number of fields cleared.
    pub fn sweep_broken_references(&mut self, resolver: &dyn AssetResolver) -> usize {
        let objects = self.sweep_object_references();
        let assets: usize = self
            .objects
            .values_mut()
            .map(|object| object.scrub_asset_references(resolver))
            .sum();
        if objects + assets > 0 {
            warn!("Cleared {objects} broken object references and {assets} broken asset references");
        }
        objects + assets
    }

    // ---- lights and cameras ----

    fn refresh_light_index(&mut self) {
        if self.lights.is_valid() {
            return;
        }
        let entries: Vec<_> = self
            .game_objects()
            .flat_map(|object| {
                object
                    .get_components::<Light>()
                    .map(move |(id, _)| (object.handle(), id))
            })
            .collect();
        self.lights.rebuild(entries);
    }

    /// Every Light on an enabled object, in insertion order
    pub fn find_active_lights(&self) -> Vec<(GameObjectHandle, &Light)> {
        if !self.lights.is_valid() {
            return self
                .enabled_objects()
                .flat_map(|object| {
                    object
                        .get_components::<Light>()
                        .map(move |(_, light)| (object.handle(), light))
                })
                .collect();
        }
        self.lights
            .entries()
            .iter()
            .filter_map(|&(handle, component)| {
                let object = self.objects.get(handle.key()).filter(|o| o.enabled)?;
                object
                    .component(component)?
                    .downcast_ref::<Light>()
                    .map(|light| (handle, light))
            })
            .collect()
    }

    /// Active lights resolved to world space
    pub fn light_samples(&self) -> Vec<LightSample> {
        self.find_active_lights()
            .into_iter()
            .map(|(handle, light)| light.sample(handle, &self.world_matrix_of(handle.key())))
            .collect()
    }

    /// First Camera in insertion order, enabled or not
    pub fn find_any_camera(&self) -> Option<(GameObjectHandle, &Camera)> {
        self.game_objects().find_map(|object| {
            object
                .get_component::<Camera>()
                .map(|camera| (object.handle(), camera))
        })
    }

    /// Camera used for rendering
    ///
    /// The first primary Camera on an enabled object, otherwise the first
    /// Camera on an enabled object.
    pub fn find_camera(&self) -> Option<(GameObjectHandle, &Camera)> {
        let mut first = None;
        for object in self.enabled_objects() {
            if let Some(camera) = object.get_component::<Camera>() {
                if camera.primary {
                    return Some((object.handle(), camera));
                }
                first = first.or(Some((object.handle(), camera)));
            }
        }
        first
    }

    /// `(view, projection)` of [`Self::find_camera`]
    pub fn camera_matrices(&self, aspect: f32) -> Option<(Mat4, Mat4)> {
        let (handle, camera) = self.find_camera()?;
        let world = self.world_matrix_of(handle.key());
        Some((camera.view_matrix(&world), camera.projection_matrix(aspect)))
    }

    // ---- deferred edits ----

    /// The scene's own queue, flushed before every pass
    pub fn commands(&mut self) -> &mut SceneCommands {
        &mut self.pending
    }

    /// Apply a queue in FIFO order, draining it
    ///
    /// A rejected command is logged and skipped; later commands still run.
    pub fn apply_commands(&mut self, commands: &mut SceneCommands) -> FlushReport {
        let mut report = FlushReport::default();
        while let Some(command) = commands.pop() {
            match self.apply_command(command) {
                Ok(()) => report.applied += 1,
                Err(err) => {
                    warn!("Skipping scene command: {err}");
                    report.failed += 1;
                }
            }
        }
        if report.applied + report.failed > 0 {
            debug!(
                "Flushed scene commands: {} applied, {} failed",
                report.applied, report.failed
            );
        }
        report
    }

    /// Apply the scene's own queue
    ///
    /// Commands enqueued while flushing wait for the next flush.
    pub fn flush_pending(&mut self) -> FlushReport {
        let mut pending = std::mem::take(&mut self.pending);
        self.apply_commands(&mut pending)
    }

    fn require(&self, id: GameObjectId) -> Result<GameObjectHandle, SceneError> {
        self.find_game_object(id).ok_or(SceneError::NotFound(id))
    }

    fn apply_command(&mut self, command: SceneCommand) -> Result<(), SceneError> {
        match command {
            SceneCommand::CreateGameObject { id, name, parent } => {
                let parent = parent.map(|p| self.require(p)).transpose()?;
                let handle = self.add_game_object_with_id(id, name)?.handle();
                self.set_parent(handle, parent)?;
            }
            SceneCommand::RemoveGameObject(id) => {
                let handle = self.require(id)?;
                self.remove_game_object(handle)?;
            }
            SceneCommand::Reparent {
                child,
                new_parent,
                keep_world_pose,
            } => {
                let child = self.require(child)?;
                let new_parent = new_parent.map(|p| self.require(p)).transpose()?;
                if keep_world_pose {
                    self.set_parent_keep_world(child, new_parent)?;
                } else {
                    self.set_parent(child, new_parent)?;
                }
            }
            SceneCommand::AddComponent { target, kind } => {
                let key = self.require(target)?.key();
                let registry = Rc::clone(&self.registry);
                self.objects[key].add_component_of_kind(&registry, &kind)?;
                self.lights.invalidate();
                self.start_if_running(key);
            }
            SceneCommand::RemoveComponent { target, component } => {
                let key = self.require(target)?.key();
                if !self.objects[key].remove_component(component) {
                    return Err(SceneError::MissingComponent {
                        id: target,
                        component,
                    });
                }
                self.lights.invalidate();
            }
            SceneCommand::SetEnabled { target, enabled } => {
                let key = self.require(target)?.key();
                self.objects[key].enabled = enabled;
            }
            SceneCommand::Rename { target, name } => {
                let key = self.require(target)?.key();
                self.objects[key].name = name;
            }
        }
        Ok(())
    }

    fn start_if_running(&mut self, key: ObjectKey) {
        if !self.started {
            return;
        }
        if let Some(object) = self.objects.get_mut(key) {
            object.start(&mut self.pending);
        }
    }

    // ---- lifecycle ----

    /// Start every object, disabled ones included
    pub fn start(&mut self) {
        if self.disposed {
            return;
        }
        self.flush_pending();
        self.started = true;
        let Self {
            objects,
            order,
            pending,
            ..
        } = self;
        for key in order.iter() {
            if let Some(object) = objects.get_mut(*key) {
                object.start(pending);
            }
        }
        info!("Scene started with {} game objects", self.objects.len());
    }

    /// Update every enabled object in insertion order
    pub fn update(&mut self, delta_time: f32) {
        if self.disposed {
            return;
        }
        self.flush_pending();
        let Self {
            objects,
            order,
            pending,
            ..
        } = self;
        for key in order.iter() {
            if let Some(object) = objects.get_mut(*key) {
                object.update(delta_time, pending);
            }
        }
    }

    /// Render every enabled object in insertion order
    pub fn render(&mut self, frame: &FrameView, renderer: &mut dyn Renderer) {
        if self.disposed {
            return;
        }
        self.flush_pending();
        self.refresh_light_index();
        let lights = self.light_samples();
        let worlds: Vec<(ObjectKey, Mat4)> = self
            .enabled_objects()
            .map(|object| {
                let key = object.handle().key();
                (key, self.world_matrix_of(key))
            })
            .collect();

        renderer.begin_frame(frame);
        for (key, world) in worlds {
            if let Some(object) = self.objects.get_mut(key) {
                object.render(world, frame, &lights, renderer);
            }
        }
        renderer.end_frame();
    }

    /// Dispose every component; later calls do nothing
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        for key in &self.order {
            if let Some(object) = self.objects.get_mut(*key) {
                object.dispose();
            }
        }
        self.pending.clear();
        self.lights.rebuild(std::iter::empty());
        debug!("Scene disposed ({} game objects)", self.objects.len());
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::components::Spinner;
    use approx::assert_relative_eq;

    #[test]
    fn test_add_and_find() {
        let mut scene = Scene::new();
        let id = scene.add_named_game_object("Player").id();
        let handle = scene.find_game_object(id).unwrap();
        assert_eq!(scene.game_object(handle).unwrap().name, "Player");
        assert_eq!(scene.find_by_name("Player"), Some(handle));
        assert_eq!(scene.find_game_object(GameObjectId::new()), None);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut scene = Scene::new();
        let id = scene.add_game_object().id();
        assert!(matches!(
            scene.add_game_object_with_id(id, "Copy"),
            Err(SceneError::DuplicateId(dup)) if dup == id
        ));
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_foreign_and_stale_handles() {
        let mut scene = Scene::new();
        let mut other = Scene::new();
        let local = scene.add_game_object().handle();
        let foreign = other.add_game_object().handle();

        assert_eq!(
            scene.set_parent(local, Some(foreign)),
            Err(SceneError::ForeignObject(foreign))
        );
        assert!(scene.game_object(foreign).is_none());

        scene.remove_game_object(local).unwrap();
        assert_eq!(
            scene.set_parent(local, None),
            Err(SceneError::StaleHandle(local))
        );
    }

    #[test]
    fn test_same_parent_is_noop() {
        let mut scene = Scene::new();
        let a = scene.add_game_object().handle();
        let b = scene.add_game_object().handle();
        scene.set_parent(b, Some(a)).unwrap();
        scene.set_parent(b, Some(a)).unwrap();
        assert_eq!(scene.children(a), &[b]);
    }

    #[test]
    fn test_world_matrix_of_nested_child() {
        let mut scene = Scene::new();
        let a = scene.add_game_object().handle();
        let b = scene.add_game_object().handle();
        scene
            .game_object_mut(a)
            .unwrap()
            .transform_mut()
            .set_local_position(Vec3::new(1.0, 0.0, 0.0));
        scene
            .game_object_mut(b)
            .unwrap()
            .transform_mut()
            .set_local_position(Vec3::new(0.0, 2.0, 0.0));
        scene.set_parent(b, Some(a)).unwrap();
        assert_relative_eq!(
            scene.world_position(b).unwrap(),
            Vec3::new(1.0, 2.0, 0.0),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_degenerate_parent_rejected() {
        let mut scene = Scene::new();
        let parent = scene.add_game_object().handle();
        let child = scene.add_game_object().handle();
        scene.set_parent(child, Some(parent)).unwrap();
        scene
            .game_object_mut(parent)
            .unwrap()
            .transform_mut()
            .set_local_scale(Vec3::zeros());
        let before = *scene.game_object(child).unwrap().transform().local_pose();
        assert!(matches!(
            scene.set_world_matrix(child, &Mat4::identity()),
            Err(SceneError::DegenerateParent(_))
        ));
        assert_eq!(*scene.game_object(child).unwrap().transform().local_pose(), before);
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let mut scene = Scene::new();
        scene.add_game_object().add_component::<Spinner>().unwrap();
        scene.dispose();
        scene.dispose();
        assert!(scene.is_disposed());
    }
}
