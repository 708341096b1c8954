//! # Scene Engine
//!
//! The scene model of a small game engine: a tree of GameObjects carrying
//! components, a transform hierarchy, deferred scene edits and an editor
//! Play/Pause/Stop session that reverts the scene when play ends.
//!
//! ## Features
//!
//! - **Transform Hierarchy**: Local poses composed into world matrices
//! - **Component Lifecycle**: Start, update, render and dispose dispatch
//! - **Deferred Edits**: Structural changes queued while the scene iterates
//! - **Play Mode**: Snapshot on play, exact restore on stop
//! - **Scene Files**: Versioned RON documents with GUID asset references
//! - **Projects**: A project file naming the startup scene by GUID
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_engine::prelude::*;
//!
//! struct MyApp;
//!
//! impl Application for MyApp {
//!     fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
//!         engine.scenes.create_and_load_new_scene()?;
//!         engine.scenes.start_playing()?;
//!         Ok(())
//!     }
//!
//!     fn update(&mut self, engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
//!         if engine.frame_count() > 600 {
//!             engine.scenes.stop_playing()?;
//!             engine.quit();
//!         }
//!         Ok(())
//!     }
//!
//!     fn cleanup(&mut self, _engine: &mut Engine) {}
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig::default();
//!     let mut renderer = NullRenderer;
//!     Engine::run(config, &mut MyApp, &mut renderer)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod config;
pub mod foundation;
pub mod play;
pub mod project;
pub mod render;
pub mod scene;
pub mod serialization;

mod application;
mod engine;

pub use application::{AppError, Application};
pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{AssetDatabase, AssetGuid, AssetResolver},
        config::{Config, EngineConfig},
        foundation::{
            math::{Color, Mat4, Pose, Quat, Vec3},
            time::Timer,
        },
        play::{PlayAction, PlayError, PlayState, SceneManager},
        project::{LoadedProject, ProjectData},
        render::{DrawCall, FrameView, NullRenderer, RecordingRenderer, Renderer},
        scene::{
            components::{Camera, Light, LightKind, MeshRenderer, Mover, Spinner},
            AssetRef, Component, ComponentRegistry, FieldDescriptor, FieldError, FieldValue,
            GameObject, GameObjectHandle, GameObjectId, GameObjectRef, Inspectable, RemovalPolicy,
            RenderContext, Scene, SceneCommands, SceneError, UpdateContext, WidgetKind,
        },
        serialization::{RonSceneSerializer, SceneSerializer},
        AppError, Application, Engine, EngineError,
    };
}

#[cfg(test)]
mod tests;
