//! Application trait and lifecycle management

use crate::engine::{Engine, EngineError};
use crate::config::ConfigError;
use crate::scene::SceneError;
use thiserror::Error;

/// Application lifecycle trait
///
/// Implement this trait to drive a scene with the engine's frame loop.
pub trait Application {
    /// Initialize the application
    ///
    /// Called once before the first frame. Use this to build the scene.
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError>;

    /// Update the application
    ///
    /// Called every frame.
    ///
    /// # Arguments
    /// * `engine` - Mutable reference to the engine
    /// * `delta_time` - Time since last frame in seconds
    fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError>;

    /// Cleanup the application
    ///
    /// Called once after the last frame, including when the loop stops on
    /// an error.
    fn cleanup(&mut self, engine: &mut Engine);
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Engine error propagated to application level
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Scene update failed
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),
}
