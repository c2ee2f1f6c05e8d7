//! Collision-aware camera movement
//!
//! Before the camera moves, a short probe ray is cast along every requested
//! direction; a direction whose probe hits terrain is blocked for that
//! frame. A shoot command casts one long ray along the view direction.

use bitflags::bitflags;

use crate::core::config::MovementConfig;
use crate::foundation::math::Vec3;
use crate::input::InputCommands;
use crate::physics::{Ray, Triangle};
use crate::spatial::{RayCaster, TriangleId};
use super::FlyCamera;

bitflags! {
    /// Directions whose probe ray hit geometry this frame
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BlockedDirections: u8 {
        /// Forward probe hit
        const FORWARD = 1 << 0;
        /// Backward probe hit
        const BACK = 1 << 1;
        /// Left probe hit
        const LEFT = 1 << 2;
        /// Right probe hit
        const RIGHT = 1 << 3;
    }
}

/// What a shoot ray struck
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotReport {
    /// Distance from the camera
    pub distance: f32,
    /// World-space hit point
    pub point: Vec3,
    /// Copy of the triangle that was hit
    pub triangle: Triangle,
    /// Id of that triangle, valid until the next terrain regeneration
    pub triangle_id: TriangleId,
}

/// Result of a shoot command
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shot {
    /// The ray struck terrain
    Hit(ShotReport),
    /// Nothing within shoot range
    Miss,
}

/// Everything one movement step decided
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MovementOutcome {
    /// Requested directions that were refused
    pub blocked: BlockedDirections,
    /// Result of the shoot command, if one was issued
    pub shot: Option<Shot>,
}

/// Moves a [`FlyCamera`] without letting it pass through geometry
#[derive(Debug, Clone, Default)]
pub struct MovementSystem {
    config: MovementConfig,
}

impl MovementSystem {
    /// Create a movement system with the given probe ranges
    pub fn new(config: MovementConfig) -> Self {
        Self { config }
    }

    /// Probe and shoot ranges
    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    /// Advance the camera by one frame of input
    ///
    /// Probes use the orientation from the start of the frame; rotation is
    /// applied before translation.
    pub fn step<C>(&self, camera: &mut FlyCamera, input: InputCommands, caster: &C, delta_time: f32) -> MovementOutcome
    where
        C: RayCaster + ?Sized,
    {
        let blocked = self.probe(camera, input, caster);

        let turn = camera.rotation_speed * delta_time;
        let mut yaw = 0.0;
        let mut pitch = 0.0;
        if input.contains(InputCommands::ROT_LEFT) {
            yaw -= turn;
        }
        if input.contains(InputCommands::ROT_RIGHT) {
            yaw += turn;
        }
        if input.contains(InputCommands::ROT_UP) {
            pitch += turn * 0.5;
        }
        if input.contains(InputCommands::ROT_DOWN) {
            pitch -= turn * 0.5;
        }
        if yaw != 0.0 || pitch != 0.0 {
            camera.rotate(yaw, pitch);
        }

        let step = camera.move_speed * delta_time;
        let offset: Vec3 = Self::directions(camera)
            .into_iter()
            .filter(|(command, flag, _)| input.contains(*command) && !blocked.contains(*flag))
            .map(|(_, _, direction)| direction * step)
            .sum();
        if offset != Vec3::zeros() {
            camera.translate(offset);
        }

        let shot = input
            .contains(InputCommands::SHOOT)
            .then(|| self.shoot(camera, caster));

        MovementOutcome { blocked, shot }
    }

    /// Cast one probe per requested direction and collect the blocked ones
    pub fn probe<C>(&self, camera: &FlyCamera, input: InputCommands, caster: &C) -> BlockedDirections
    where
        C: RayCaster + ?Sized,
    {
        let mut blocked = BlockedDirections::empty();
        for (command, flag, direction) in Self::directions(camera) {
            if !input.contains(command) {
                continue;
            }
            let ray = Ray::new(camera.position, direction);
            if caster.is_blocked(&ray, self.config.probe_range) {
                log::debug!("Movement {:?} blocked at {:?}", flag, camera.position);
                blocked |= flag;
            }
        }
        blocked
    }

    /// Cast a ray along the view direction
    pub fn shoot<C>(&self, camera: &FlyCamera, caster: &C) -> Shot
    where
        C: RayCaster + ?Sized,
    {
        let ray = Ray::new(camera.position, camera.forward());
        match caster.cast_ray(&ray, self.config.shoot_range) {
            Some(hit) => {
                log::info!(
                    "Shot hit triangle {} at distance {:.3}, point {:?}",
                    hit.triangle_id.index(),
                    hit.distance,
                    hit.point
                );
                Shot::Hit(ShotReport {
                    distance: hit.distance,
                    point: hit.point,
                    triangle: *hit.triangle,
                    triangle_id: hit.triangle_id,
                })
            }
            None => {
                log::info!("Hit nothing");
                Shot::Miss
            }
        }
    }

    fn directions(camera: &FlyCamera) -> [(InputCommands, BlockedDirections, Vec3); 4] {
        let forward = camera.forward();
        let right = camera.right();
        [
            (InputCommands::FORWARD, BlockedDirections::FORWARD, forward),
            (InputCommands::BACK, BlockedDirections::BACK, -forward),
            (InputCommands::LEFT, BlockedDirections::LEFT, -right),
            (InputCommands::RIGHT, BlockedDirections::RIGHT, right),
        ]
    }
}
