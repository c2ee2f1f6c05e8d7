//! Terrain Collision Demo
//!
//! Flies the camera over generated terrain with a scripted sequence of
//! inputs and logs what the k-d tree reports:
//! - probe rays stop the camera before it enters the ground
//! - shoot rays report the triangle under the crosshair
//! - regeneration rebuilds the tree once on the following frame
//!
//! Usage: `terrain_demo [config.toml|config.ron]`

use terrain_engine::prelude::*;
use terrain_engine::debug::DebugPrimitive;
use terrain_engine::foundation::logging;
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "terrain_demo.toml";

/// One scripted input held for a number of frames
struct ScriptStep {
    frames: u64,
    commands: InputCommands,
    label: &'static str,
}

/// Keys held for `frames` frames, by scripted key name
const SCRIPT: &[(u64, &[&str], &str)] = &[
    (1, &["shoot"], "shoot straight ahead"),
    (60, &["rot_down"], "look down"),
    (1, &["space"], "shoot at the ground"),
    (240, &["w"], "dive towards the ground"),
    (60, &["a", "rot_right"], "strafe while turning"),
    (1, &["regenerate"], "regenerate terrain"),
    (120, &["s", "rot_up"], "climb back out"),
    (1, &["shoot"], "final shot"),
];

fn script() -> Result<Vec<ScriptStep>, DemoError> {
    SCRIPT
        .iter()
        .map(|&(frames, keys, label)| {
            let commands = keys.iter().try_fold(InputCommands::empty(), |held, key| {
                InputCommands::from_key_name(key)
                    .map(|command| held | command)
                    .ok_or_else(|| DemoError::UnknownKey(key.to_string()))
            })?;
            Ok(ScriptStep { frames, commands, label })
        })
        .collect()
}

#[derive(Error, Debug)]
enum DemoError {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Engine(#[from] EngineError),
    #[error("Logger already initialized: {0}")]
    Logger(#[from] log::SetLoggerError),
    #[error("Unknown key in script: {0}")]
    UnknownKey(String),
}

struct TerrainDemo {
    config: TerrainAppConfig,
    scene: Option<TerrainScene>,
    script: Vec<ScriptStep>,
    step_index: usize,
    frames_in_step: u64,
    blocked_frames: u64,
    hits: u32,
    misses: u32,
}

impl TerrainDemo {
    fn new(config: TerrainAppConfig) -> Result<Self, DemoError> {
        Ok(Self {
            config,
            scene: None,
            script: script()?,
            step_index: 0,
            frames_in_step: 0,
            blocked_frames: 0,
            hits: 0,
            misses: 0,
        })
    }

    /// Input for this frame, or `None` once the script is done
    fn next_commands(&mut self) -> Option<InputCommands> {
        let current = self.script.get(self.step_index)?;
        if self.frames_in_step == 0 {
            log::info!("Script: {}", current.label);
        }
        let commands = current.commands;
        self.frames_in_step += 1;
        if self.frames_in_step >= current.frames {
            self.step_index += 1;
            self.frames_in_step = 0;
        }
        Some(commands)
    }
}

impl Application for TerrainDemo {
    fn initialize(&mut self, _engine: &mut Engine) -> Result<(), AppError> {
        let scene = TerrainScene::new(&self.config)?;
        log::info!(
            "Scene ready: {} triangles, camera at {:?}",
            scene.controller().triangle_count(),
            scene.camera().position
        );
        self.scene = Some(scene);
        Ok(())
    }

    fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError> {
        let Some(commands) = self.next_commands() else {
            engine.quit();
            return Ok(());
        };
        engine.set_input(commands);

        let scene = self
            .scene
            .as_mut()
            .ok_or_else(|| AppError::Custom("update before initialize".to_string()))?;
        let outcome = scene.update(engine.input(), delta_time)?;

        if !outcome.blocked.is_empty() {
            self.blocked_frames += 1;
        }
        match outcome.shot {
            Some(Shot::Hit(_)) => self.hits += 1,
            Some(Shot::Miss) => self.misses += 1,
            None => {}
        }

        scene.debug_draw(&mut engine.debug);
        Ok(())
    }

    fn cleanup(&mut self, engine: &mut Engine) {
        if let Some(scene) = &self.scene {
            if let Some(stats) = scene.controller().stats() {
                log::info!(
                    "K-d tree: {} triangles, {} nodes, {} leaves, depth {}",
                    stats.triangle_count,
                    stats.node_count,
                    stats.leaf_count,
                    stats.max_depth
                );
            }
            log::info!("Final camera position: {:?}", scene.camera().position);
        }
        let shot_markers = engine
            .debug
            .shapes()
            .iter()
            .filter(|shape| matches!(shape.primitive, DebugPrimitive::Point { .. }))
            .count();
        log::info!(
            "Frames: {}, blocked: {}, shots hit: {}, missed: {}, debug shapes: {} ({} shot markers still visible)",
            engine.frame_count(),
            self.blocked_frames,
            self.hits,
            self.misses,
            engine.debug.shape_count(),
            shot_markers
        );
    }
}

fn run() -> Result<u64, DemoError> {
    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let mut config = TerrainAppConfig::load_or_default(&path)?;
    config.validate()?;

    logging::init(&config.engine.log_level)?;
    log::info!("Loaded configuration from {}", path);

    // Scripted runs need reproducible frame times
    if config.engine.fixed_timestep.is_none() {
        config.engine.fixed_timestep = Some(1.0 / 60.0);
    }
    let mut demo = TerrainDemo::new(config.clone())?;
    Ok(Engine::run(config.engine, &mut demo)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Terrain Collision Demo ===");
    println!("Scripted fly-over: look, shoot, dive, strafe, regenerate, climb.");
    println!("Set RUST_LOG=debug to see k-d tree rebuild timings.");
    println!();

    let frames = run()?;
    println!("Demo finished after {} frames", frames);
    Ok(())
}
