//! Scene manager
//!
//! Owns the loaded scene and the play session around it. The host calls
//! [`SceneManager::frame`] once per frame: pending edits are flushed, the
//! scene is updated only while playing, and it is rendered in every state.

use super::snapshot::SnapshotStore;
use super::{PlayAction, PlayError, PlayState};
use crate::assets::AssetResolver;
use crate::foundation::math::{Mat4, Vec3};
use crate::render::{FrameView, Renderer};
use crate::scene::components::{Camera, Light};
use crate::scene::{ComponentRegistry, RemovalPolicy, Scene};
use crate::serialization::SceneSerializer;
use log::{error, info, warn};
use std::path::Path;
use std::rc::Rc;

/// Current scene plus Play/Pause/Stop state
pub struct SceneManager {
    registry: Rc<ComponentRegistry>,
    serializer: Box<dyn SceneSerializer>,
    snapshots: Box<dyn SnapshotStore>,
    loaded: Option<Scene>,
    state: PlayState,
    has_snapshot: bool,
    removal_policy: RemovalPolicy,
    new_scene_defaults: bool,
}

impl SceneManager {
    /// Manager with no scene loaded
    pub fn new(
        registry: Rc<ComponentRegistry>,
        serializer: Box<dyn SceneSerializer>,
        snapshots: Box<dyn SnapshotStore>,
    ) -> Self {
        Self {
            registry,
            serializer,
            snapshots,
            loaded: None,
            state: PlayState::Stopped,
            has_snapshot: false,
            removal_policy: RemovalPolicy::default(),
            new_scene_defaults: true,
        }
    }

    /// Removal policy applied to every scene this manager installs
    pub fn set_removal_policy(&mut self, policy: RemovalPolicy) {
        self.removal_policy = policy;
        if let Some(scene) = self.loaded.as_mut() {
            scene.set_removal_policy(policy);
        }
    }

    /// Whether new scenes get a default camera and light
    pub fn set_new_scene_defaults(&mut self, enabled: bool) {
        self.new_scene_defaults = enabled;
    }

    /// Current state
    pub const fn state(&self) -> PlayState {
        self.state
    }

    /// Whether a play-mode snapshot is held
    pub const fn has_snapshot(&self) -> bool {
        self.has_snapshot
    }

    /// Registry shared with loaded scenes
    pub const fn registry(&self) -> &Rc<ComponentRegistry> {
        &self.registry
    }

    /// Loaded scene
    pub const fn scene(&self) -> Option<&Scene> {
        self.loaded.as_ref()
    }

    /// Loaded scene, mutable
    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.loaded.as_mut()
    }

    fn precondition(err: PlayError) -> PlayError {
        error!("{err}");
        err
    }

    fn require_stopped(&self) -> Result<(), PlayError> {
        if self.state.in_session() {
            return Err(Self::precondition(PlayError::SessionActive(self.state)));
        }
        Ok(())
    }

    fn transition(&self, action: PlayAction) -> Result<PlayState, PlayError> {
        self.state.apply(action).map_err(Self::precondition)
    }

    // ---- scene loading ----

    /// Install `scene`, disposing the previous one
    pub fn load_scene(&mut self, mut scene: Scene) -> Result<(), PlayError> {
        self.require_stopped()?;
        scene.set_removal_policy(self.removal_policy);
        if let Some(mut previous) = self.loaded.take() {
            previous.dispose();
        }
        info!("Loaded scene with {} game objects", scene.len());
        self.loaded = Some(scene);
        Ok(())
    }

    /// Install an empty scene, with a camera and light unless disabled
    pub fn create_and_load_new_scene(&mut self) -> Result<(), PlayError> {
        self.require_stopped()?;
        let mut scene = Scene::with_registry(Rc::clone(&self.registry));
        if self.new_scene_defaults {
            let camera = scene.add_named_game_object("Main Camera");
            camera.add_component_with(Camera {
                primary: true,
                ..Camera::default()
            })?;

            let light = scene.add_named_game_object("Directional Light");
            light
                .transform_mut()
                .set_local_euler_angles(Vec3::new(20.0, 135.0, 0.0));
            light.add_component_with(Light::directional())?;
        }
        self.load_scene(scene)
    }

    /// Read a scene file, clear broken references and install it
    ///
    /// The loaded scene is untouched if reading fails.
    pub fn load_scene_file(&mut self, path: &Path, resolver: &dyn AssetResolver) -> Result<(), PlayError> {
        self.require_stopped()?;
        let mut scene = self.serializer.load_from_file(path)?;
        scene.sweep_broken_references(resolver);
        info!("Read scene {}", path.display());
        self.load_scene(scene)
    }

    /// Write the loaded scene to a file; only while stopped
    pub fn save_scene(&self, path: &Path) -> Result<(), PlayError> {
        self.require_stopped()?;
        let scene = self
            .loaded
            .as_ref()
            .ok_or_else(|| Self::precondition(PlayError::NoSceneLoaded))?;
        self.serializer.save_to_file(scene, path)?;
        info!("Saved scene {}", path.display());
        Ok(())
    }

    // ---- play session ----

    /// Snapshot the scene, start it and enter Playing
    ///
    /// If the snapshot cannot be taken nothing is started and the state stays
    /// Stopped.
    pub fn start_playing(&mut self) -> Result<(), PlayError> {
        let next = self.transition(PlayAction::Start)?;
        let Some(scene) = self.loaded.as_mut() else {
            return Err(Self::precondition(PlayError::NoSceneLoaded));
        };
        let bytes = self.serializer.serialize_scene(scene)?;
        self.snapshots.clear()?;
        self.snapshots.write(&bytes)?;
        self.has_snapshot = true;

        scene.start();
        self.state = next;
        info!("Play mode started ({} byte snapshot)", bytes.len());
        Ok(())
    }

    /// Freeze simulation; rendering continues
    pub fn pause_playing(&mut self) -> Result<(), PlayError> {
        self.state = self.transition(PlayAction::Pause)?;
        info!("Play mode paused");
        Ok(())
    }

    /// Resume simulation
    pub fn continue_playing(&mut self) -> Result<(), PlayError> {
        self.state = self.transition(PlayAction::Continue)?;
        info!("Play mode resumed");
        Ok(())
    }

    /// Restore the snapshot and return to Stopped
    ///
    /// The play scene is only replaced once the snapshot has been fully
    /// decoded; on failure the session stays as it was.
    pub fn stop_playing(&mut self) -> Result<(), PlayError> {
        let next = self.transition(PlayAction::Stop)?;
        if !self.has_snapshot {
            return Err(Self::precondition(PlayError::MissingSnapshot));
        }
        let bytes = self
            .snapshots
            .read()?
            .ok_or_else(|| Self::precondition(PlayError::MissingSnapshot))?;
        let mut restored = self.serializer.deserialize_scene(&bytes)?;
        restored.set_removal_policy(self.removal_policy);

        if let Some(mut played) = self.loaded.take() {
            played.dispose();
        }
        self.loaded = Some(restored);

        if let Err(err) = self.snapshots.clear() {
            warn!("Failed to clear play-mode snapshot: {err}");
        }
        self.has_snapshot = false;
        self.state = next;
        info!("Play mode stopped, scene restored");
        Ok(())
    }

    // ---- frame driving ----

    /// Update the scene if Playing; flushes queued edits in every state
    pub fn update(&mut self, delta_time: f32) -> Result<(), PlayError> {
        let playing = self.state == PlayState::Playing;
        let Some(scene) = self.loaded.as_mut() else {
            return Err(Self::precondition(PlayError::NoSceneLoaded));
        };
        if playing {
            scene.update(delta_time);
        } else {
            scene.flush_pending();
        }
        Ok(())
    }

    /// Render the scene in every state
    pub fn render(&mut self, frame: &FrameView, renderer: &mut dyn Renderer) -> Result<(), PlayError> {
        let Some(scene) = self.loaded.as_mut() else {
            return Err(Self::precondition(PlayError::NoSceneLoaded));
        };
        scene.render(frame, renderer);
        Ok(())
    }

    /// One host frame: update (while Playing) then render
    pub fn frame(
        &mut self,
        delta_time: f32,
        view: Mat4,
        projection: Mat4,
        renderer: &mut dyn Renderer,
    ) -> Result<(), PlayError> {
        self.update(delta_time)?;
        self.render(&FrameView::new(delta_time, view, projection), renderer)
    }

    /// Dispose the loaded scene and drop any snapshot
    pub fn shutdown(&mut self) {
        if let Some(mut scene) = self.loaded.take() {
            scene.dispose();
        }
        if self.has_snapshot {
            if let Err(err) = self.snapshots.clear() {
                warn!("Failed to clear play-mode snapshot: {err}");
            }
            self.has_snapshot = false;
        }
        self.state = PlayState::Stopped;
    }
}

impl std::fmt::Debug for SceneManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneManager")
            .field("state", &self.state)
            .field("has_snapshot", &self.has_snapshot)
            .field("loaded", &self.loaded.as_ref().map(Scene::len))
            .finish_non_exhaustive()
    }
}
