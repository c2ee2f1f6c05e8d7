//! Terrain scene
//!
//! Ties the pieces together for one frame: optional terrain regeneration,
//! the once-per-tick k-d tree rebuild, then camera movement and shooting
//! against the fresh tree.

use thiserror::Error;

use crate::core::config::{DebugConfig, TerrainAppConfig, TerrainConfig};
use crate::debug::DebugDrawSystem;
use crate::foundation::math::{Vec3, Vec4};
use crate::input::InputCommands;
use crate::spatial::{KdTreeController, SpatialError, KD_TREE_DEBUG_LAYER};
use crate::terrain::{self, TerrainError};
use super::{FlyCamera, MovementOutcome, MovementSystem, Shot, ShotReport};

/// Errors raised while updating the scene
#[derive(Error, Debug)]
pub enum SceneError {
    /// Terrain synthesis failed
    #[error("Terrain generation failed: {0}")]
    Terrain(#[from] TerrainError),

    /// Triangle ingestion or tree build failed
    #[error("Spatial index error: {0}")]
    Spatial(#[from] SpatialError),
}

/// Camera flying over collidable terrain
pub struct TerrainScene {
    terrain: TerrainConfig,
    debug: DebugConfig,
    controller: KdTreeController,
    camera: FlyCamera,
    movement: MovementSystem,
    last_shot: Option<ShotReport>,
    /// Origin and hit point of a shot not yet handed to the debug drawer
    undrawn_shot: Option<(Vec3, Vec3)>,
}

impl TerrainScene {
    /// Build the scene and generate its initial terrain
    ///
    /// The k-d tree is left dirty; it is built on the first [`update`](Self::update).
    pub fn new(config: &TerrainAppConfig) -> Result<Self, SceneError> {
        let mut scene = Self {
            terrain: config.terrain.clone(),
            debug: config.debug.clone(),
            controller: KdTreeController::new(config.kd_tree.clone()),
            camera: FlyCamera::from_config(&config.camera),
            movement: MovementSystem::new(config.movement.clone()),
            last_shot: None,
            undrawn_shot: None,
        };
        scene.regenerate_terrain()?;
        Ok(scene)
    }

    /// Discard all terrain triangles and generate every piece again
    ///
    /// Returns the number of triangles added. The previous shot refers to
    /// discarded triangles and is forgotten. If any piece fails to generate
    /// the current terrain is kept.
    pub fn regenerate_terrain(&mut self) -> Result<usize, SceneError> {
        let triangles = self
            .terrain
            .pieces
            .iter()
            .map(terrain::generate_piece)
            .collect::<Result<Vec<_>, _>>()?
            .concat();

        self.controller.purge_triangles();
        self.last_shot = None;
        self.undrawn_shot = None;

        let added = self.controller.add_triangles(&triangles)?;
        log::info!("Terrain regenerated: {} pieces, {} triangles", self.terrain.pieces.len(), added);
        Ok(added)
    }

    /// Advance the scene by one frame
    pub fn update(&mut self, input: InputCommands, delta_time: f32) -> Result<MovementOutcome, SceneError> {
        if input.contains(InputCommands::REGENERATE) {
            self.regenerate_terrain()?;
        }
        self.controller.update_kd_tree()?;

        let origin = self.camera.position;
        let outcome = self.movement.step(&mut self.camera, input, &self.controller, delta_time);
        match outcome.shot {
            Some(Shot::Hit(report)) => {
                self.last_shot = Some(report);
                self.undrawn_shot = Some((origin, report.point));
            }
            Some(Shot::Miss) => self.last_shot = None,
            None => {}
        }
        Ok(outcome)
    }

    /// Write the tree overlay to `debug` and hand it any new shot
    ///
    /// A shot is drawn once, as a line from the camera to the hit point plus
    /// a marker, and expires after the configured marker duration.
    pub fn debug_draw(&mut self, debug: &mut DebugDrawSystem) {
        if self.debug.render_kd_tree {
            self.controller.debug_draw(debug);
        } else {
            debug.clear_layer(KD_TREE_DEBUG_LAYER);
        }

        if let Some((origin, point)) = self.undrawn_shot.take() {
            let color = Vec4::new(1.0, 1.0, 0.0, 1.0);
            let duration = self.debug.shot_marker_duration;
            debug.draw_line(origin, point, color, duration);
            debug.draw_point(point, 0.25, color, duration);
        }
    }

    /// The camera
    pub fn camera(&self) -> &FlyCamera {
        &self.camera
    }

    /// Mutable access to the camera
    pub fn camera_mut(&mut self) -> &mut FlyCamera {
        &mut self.camera
    }

    /// The k-d tree controller
    pub fn controller(&self) -> &KdTreeController {
        &self.controller
    }

    /// Most recent shot that hit terrain, cleared by a miss or regeneration
    pub fn last_shot(&self) -> Option<&ShotReport> {
        self.last_shot.as_ref()
    }

    /// Turn the k-d tree overlay on or off
    pub fn set_render_kd_tree(&mut self, enabled: bool) {
        self.debug.render_kd_tree = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::TerrainPiece;
    use crate::debug::DebugPrimitive;
    use crate::terrain::TerrainKind;

    fn flat_config() -> TerrainAppConfig {
        TerrainAppConfig {
            terrain: TerrainConfig::default().with_pieces(vec![TerrainPiece {
                kind: TerrainKind::Flat,
                width: 8,
                depth: 8,
                smoothing_passes: 0,
                scale: Vec3::new(20.0, 1.0, 20.0),
                translation: Vec3::new(-10.0, 0.0, -10.0),
                noise_overlay: None,
            }]),
            ..Default::default()
        }
    }

    #[test]
    fn test_first_update_builds_tree() {
        let mut scene = TerrainScene::new(&flat_config()).unwrap();
        assert!(scene.controller().is_dirty());

        scene.update(InputCommands::empty(), 0.016).unwrap();
        assert!(!scene.controller().is_dirty());
        assert_eq!(scene.controller().stats().unwrap().triangle_count, 2 * 7 * 7);
    }

    #[test]
    fn test_shoot_down_hits_ground() {
        let mut scene = TerrainScene::new(&flat_config()).unwrap();
        scene.camera_mut().set_rotation(0.0, -89.0);

        let outcome = scene.update(InputCommands::SHOOT, 0.0).unwrap();
        assert!(matches!(outcome.shot, Some(Shot::Hit(_))));
        let shot = scene.last_shot().unwrap();
        assert!(shot.point.y.abs() < 1e-3);
    }

    #[test]
    fn test_regenerate_clears_last_shot() {
        let mut scene = TerrainScene::new(&flat_config()).unwrap();
        scene.camera_mut().set_rotation(0.0, -89.0);
        scene.update(InputCommands::SHOOT, 0.0).unwrap();
        assert!(scene.last_shot().is_some());

        scene.update(InputCommands::REGENERATE, 0.0).unwrap();
        assert!(scene.last_shot().is_none());
        assert!(!scene.controller().is_dirty());
    }

    #[test]
    fn test_failed_regeneration_keeps_current_terrain() {
        let mut scene = TerrainScene::new(&flat_config()).unwrap();
        scene.camera_mut().set_rotation(0.0, -89.0);
        scene.update(InputCommands::SHOOT, 0.0).unwrap();
        let before = scene.controller().triangle_count();

        scene.terrain.pieces.push(TerrainPiece {
            kind: TerrainKind::Wave { amplitude: 1.0, wavelength: 0.0 },
            ..Default::default()
        });
        let result = scene.regenerate_terrain();

        assert!(matches!(result, Err(SceneError::Terrain(TerrainError::InvalidParameter(_)))));
        assert_eq!(scene.controller().triangle_count(), before);
        assert!(!scene.controller().is_dirty());
        assert!(scene.last_shot().is_some());
    }

    #[test]
    fn test_shot_is_drawn_once_and_expires() {
        let mut scene = TerrainScene::new(&flat_config()).unwrap();
        scene.camera_mut().set_rotation(0.0, -89.0);
        scene.update(InputCommands::SHOOT, 0.0).unwrap();
        let mut debug = DebugDrawSystem::new();

        scene.debug_draw(&mut debug);
        scene.debug_draw(&mut debug);
        let shapes = debug.shapes();
        assert_eq!(shapes.len(), 2);
        assert!(matches!(shapes[0].primitive, DebugPrimitive::Line { .. }));
        assert!(matches!(shapes[1].primitive, DebugPrimitive::Point { .. }));

        debug.update(DebugConfig::default().shot_marker_duration + 0.1);
        assert_eq!(debug.shape_count(), 0);
    }

    #[test]
    fn test_debug_draw_respects_overlay_switch() {
        let mut scene = TerrainScene::new(&flat_config()).unwrap();
        scene.update(InputCommands::empty(), 0.0).unwrap();
        let mut debug = DebugDrawSystem::new();

        scene.debug_draw(&mut debug);
        assert!(debug.layer(KD_TREE_DEBUG_LAYER).is_empty());

        scene.set_render_kd_tree(true);
        scene.debug_draw(&mut debug);
        assert_eq!(
            debug.layer(KD_TREE_DEBUG_LAYER).len(),
            scene.controller().stats().unwrap().node_count
        );
    }
}
