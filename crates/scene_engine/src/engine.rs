//! Engine context
//!
//! Every piece of state the scene model needs (component registry, asset
//! database, scene manager, frame timer, configuration) lives in one
//! [`Engine`] value built at startup and torn down at shutdown. Nothing is
//! global.

use crate::application::Application;
use crate::assets::{AssetDatabase, AssetError, AssetGuid, AssetResolver};
use crate::config::{Config, ConfigError, EngineConfig};
use crate::foundation::math::Mat4;
use crate::foundation::time::Timer;
use crate::play::{store_from_config, PlayError, SceneManager};
use crate::project::{project_root, LoadedProject, ProjectData};
use crate::render::Renderer;
use crate::scene::ComponentRegistry;
use crate::serialization::RonSceneSerializer;
use log::{error, info};
use std::path::Path;
use std::rc::Rc;
use thiserror::Error;

/// Engine context
pub struct Engine {
    /// Component kinds available to scenes and scene files
    pub registry: Rc<ComponentRegistry>,

    /// GUID <-> path resolution
    pub assets: AssetDatabase,

    /// Loaded scene and play session
    pub scenes: SceneManager,

    /// Frame timing
    timer: Timer,

    /// Engine configuration
    config: EngineConfig,

    /// Project file opened by `load_project`
    project: Option<LoadedProject>,

    /// Whether the main loop should continue
    running: bool,
}

impl Engine {
    /// Create a new engine instance
    ///
    /// The asset database is rebuilt from disk when `config.assets.root` is
    /// set.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        info!("Initializing engine...");

        let registry = Rc::new(ComponentRegistry::with_builtins());

        let mut assets = AssetDatabase::from_config(&config.assets);
        if assets.root().is_some() {
            assets.rebuild()?;
        }

        let serializer = RonSceneSerializer::from_config(Rc::clone(&registry), &config.serialization);
        let snapshots = store_from_config(&config.play.snapshot);
        let mut scenes = SceneManager::new(Rc::clone(&registry), Box::new(serializer), snapshots);
        scenes.set_removal_policy(config.scene.removal_policy);
        scenes.set_new_scene_defaults(config.scene.new_scene_defaults);

        Ok(Self {
            registry,
            assets,
            scenes,
            timer: Timer::new(),
            config,
            project: None,
            running: true,
        })
    }

    /// Run the main loop with the given application
    pub fn run<T: Application>(
        config: EngineConfig,
        app: &mut T,
        renderer: &mut dyn Renderer,
    ) -> Result<(), EngineError> {
        let mut engine = Self::new(config)?;

        app.initialize(&mut engine)
            .map_err(|e| EngineError::Application(format!("App initialization: {e}")))?;

        info!("Starting main loop...");

        while engine.running {
            let delta_time = engine.timer.delta_time();

            app.update(&mut engine, delta_time)
                .map_err(|e| EngineError::Application(format!("App update: {e}")))?;

            if engine.running {
                engine.frame(renderer)?;
            }
        }

        app.cleanup(&mut engine);
        engine.shutdown();

        info!("Engine shutdown complete");
        Ok(())
    }

    /// Advance the timer and run one frame through the scene's own camera
    ///
    /// Falls back to identity view and projection when the scene has no
    /// usable camera.
    pub fn frame(&mut self, renderer: &mut dyn Renderer) -> Result<(), EngineError> {
        let aspect = self.config.viewport.aspect_ratio();
        let (view, projection) = self
            .scenes
            .scene()
            .and_then(|scene| scene.camera_matrices(aspect))
            .unwrap_or_else(|| (Mat4::identity(), Mat4::identity()));
        self.frame_with(view, projection, renderer)
    }

    /// Advance the timer and run one frame with host-supplied matrices
    pub fn frame_with(
        &mut self,
        view: Mat4,
        projection: Mat4,
        renderer: &mut dyn Renderer,
    ) -> Result<(), EngineError> {
        self.timer.update();
        self.scenes
            .frame(self.timer.delta_time(), view, projection, renderer)?;
        Ok(())
    }

    /// Open a project file
    ///
    /// Rebuilds the asset database rooted at the project file's directory,
    /// then loads the project's first scene, or a new scene when it names
    /// none. On error the previous assets, scene and project stay in place.
    pub fn load_project(&mut self, path: impl AsRef<Path>) -> Result<(), EngineError> {
        let path = path.as_ref();
        if self.scenes.state().in_session() {
            let err = PlayError::SessionActive(self.scenes.state());
            error!("{err}");
            return Err(err.into());
        }

        let data = ProjectData::load_from_file(path)?;
        let root = project_root(path);
        let mut assets = AssetDatabase::new(root.clone(), self.config.assets.extensions.clone());
        assets.rebuild()?;

        match data.first_scene {
            Some(guid) => {
                let relative = assets
                    .path_for_guid(guid)
                    .ok_or(EngineError::MissingStartupScene(guid))?;
                self.scenes.load_scene_file(&root.join(relative), &assets)?;
            }
            None => self.scenes.create_and_load_new_scene()?,
        }

        info!("Opened project '{}' from {}", data.project_name, path.display());
        self.assets = assets;
        self.project = Some(LoadedProject::new(path, data));
        Ok(())
    }

    /// Write a project file with no startup scene and open it
    pub fn create_and_load_new_project(
        &mut self,
        path: impl AsRef<Path>,
        project_name: &str,
    ) -> Result<(), EngineError> {
        let path = path.as_ref();
        ProjectData::named(project_name).save_to_file(path)?;
        self.load_project(path)
    }

    /// Write the open project back to its file
    pub fn save_project(&self) -> Result<(), EngineError> {
        let project = self.project.as_ref().ok_or(EngineError::NoProject)?;
        project.data().save_to_file(project.path())?;
        Ok(())
    }

    /// The open project, if any
    pub const fn project(&self) -> Option<&LoadedProject> {
        self.project.as_ref()
    }

    /// Mutable access to the open project
    pub fn project_mut(&mut self) -> Option<&mut LoadedProject> {
        self.project.as_mut()
    }

    /// Request the main loop to exit after the current frame
    pub fn quit(&mut self) {
        info!("Engine shutdown requested");
        self.running = false;
    }

    /// Whether the main loop is running
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Engine configuration
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get the current frame delta time
    pub fn delta_time(&self) -> f32 {
        self.timer.delta_time()
    }

    /// Number of frames run
    pub fn frame_count(&self) -> u64 {
        self.timer.frame_count()
    }

    /// Dispose the loaded scene and end any play session
    pub fn shutdown(&mut self) {
        self.running = false;
        self.scenes.shutdown();
    }
}

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Asset database could not be built
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    /// Scene or play session error
    #[error("Play error: {0}")]
    Play(#[from] PlayError),

    /// Project file could not be read or written
    #[error("Project file error: {0}")]
    Config(#[from] ConfigError),

    /// Project names a startup scene the asset database does not know
    #[error("Startup scene {0} is not in the asset database")]
    MissingStartupScene(AssetGuid),

    /// No project is open
    #[error("No project is open")]
    NoProject,

    /// Application callback failed
    #[error("Application error: {0}")]
    Application(String),
}
