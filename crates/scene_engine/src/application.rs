//! Application trait and lifecycle management

use crate::engine::{Engine, EngineError};
use crate::play::PlayError;
use thiserror::Error;

/// Application lifecycle trait
///
/// Implement this trait to drive the engine from a host: an editor shell,
/// a headless runner or a test harness.
pub trait Application {
    /// Initialize the application
    ///
    /// Called once after the engine is initialized. Load or create the
    /// starting scene here.
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError>;

    /// Update the application
    ///
    /// Called every frame before the engine runs the scene. Play/Pause/Stop
    /// requests and editor edits belong here.
    ///
    /// # Arguments
    /// * `engine` - Mutable reference to the engine
    /// * `delta_time` - Time since last frame in seconds
    fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError>;

    /// Cleanup the application
    ///
    /// Called once after the main loop exits, before the engine disposes
    /// the loaded scene.
    fn cleanup(&mut self, engine: &mut Engine);
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Engine error propagated to application level
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Play session error
    #[error("Play error: {0}")]
    Play(#[from] PlayError),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),
}
