//! Headless frame loop
//!
//! Drives an [`Application`] frame by frame. Time comes from the wall clock,
//! or from a fixed timestep for reproducible runs; the loop ends when the
//! application calls [`Engine::quit`] or the frame limit is reached.

use crate::{
    application::Application,
    core::config::EngineConfig,
    debug::DebugDrawSystem,
    foundation::time::Timer,
    input::InputCommands,
};
use thiserror::Error;

/// Main engine struct
pub struct Engine {
    /// Debug shapes collected for the current frame
    pub debug: DebugDrawSystem,
    input: InputCommands,
    timer: Timer,
    config: EngineConfig,
    running: bool,
}

impl Engine {
    /// Create a new engine instance
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate().map_err(EngineError::InitializationFailed)?;
        log::info!("Initializing engine...");

        Ok(Self {
            debug: DebugDrawSystem::new(),
            input: InputCommands::empty(),
            timer: Timer::new(),
            config,
            running: true,
        })
    }

    /// Run the engine main loop with the given application
    ///
    /// Returns the number of frames run.
    pub fn run<T: Application>(config: EngineConfig, app: &mut T) -> Result<u64, EngineError> {
        let mut engine = Self::new(config)?;

        app.initialize(&mut engine)
            .map_err(|e| EngineError::ApplicationError(format!("App initialization: {}", e)))?;

        log::info!("Starting main loop...");
        let result = engine.main_loop(app);

        app.cleanup(&mut engine);
        let frames = result?;
        log::info!(
            "Engine shutdown complete after {} frames ({:.1} fps average)",
            frames,
            engine.timer.average_fps()
        );
        Ok(frames)
    }

    fn main_loop<T: Application>(&mut self, app: &mut T) -> Result<u64, EngineError> {
        while self.running {
            if self.config.max_frames.is_some_and(|max| self.timer.frame_count() >= max) {
                log::info!("Frame limit reached");
                break;
            }

            match self.config.fixed_timestep {
                Some(step) => self.timer.advance(step),
                None => self.timer.update(),
            }
            let delta_time = self.timer.delta_time();

            app.update(self, delta_time)
                .map_err(|e| EngineError::ApplicationError(format!("App update: {}", e)))?;

            self.debug.update(delta_time);
        }
        Ok(self.timer.frame_count())
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.running = false;
    }

    /// Whether the loop will run another frame
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Commands active this frame
    pub fn input(&self) -> InputCommands {
        self.input
    }

    /// Replace the commands active this frame
    pub fn set_input(&mut self, input: InputCommands) {
        self.input = input;
    }

    /// Frames started so far
    pub fn frame_count(&self) -> u64 {
        self.timer.frame_count()
    }

    /// Seconds of simulated time
    pub fn total_time(&self) -> f32 {
        self.timer.total_time()
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Engine initialization failed
    #[error("Engine initialization failed: {0}")]
    InitializationFailed(String),

    /// Application error
    #[error("Application error: {0}")]
    ApplicationError(String),
}
