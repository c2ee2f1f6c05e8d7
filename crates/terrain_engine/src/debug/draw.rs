//! Debug drawing primitives and system
//!
//! Shapes are either temporary (expire after a duration) or grouped in a
//! named layer that persists until replaced or cleared. The k-d tree
//! overlay is one such layer, rewritten whenever the tree is rebuilt; shot
//! lines and markers are temporary.

use crate::foundation::math::{Vec3, Vec4};
use crate::spatial::BoundingVolume;
use std::collections::HashMap;

/// Name of a persistent group of debug shapes
pub type DebugLayerId = String;

/// Geometry of a debug shape
#[derive(Clone, Debug, PartialEq)]
pub enum DebugPrimitive {
    /// Line segment from start to end
    Line {
        /// Segment start
        start: Vec3,
        /// Segment end
        end: Vec3,
    },
    /// Axis-aligned wireframe box
    Box {
        /// Minimum corner
        min: Vec3,
        /// Maximum corner
        max: Vec3,
    },
    /// Marker at a position
    Point {
        /// Marker position
        position: Vec3,
        /// Marker size in world units
        size: f32,
    },
}

/// A colored primitive with a remaining lifetime
#[derive(Clone, Debug, PartialEq)]
pub struct DebugShape {
    /// What to draw
    pub primitive: DebugPrimitive,
    /// RGBA color
    pub color: Vec4,
    /// Remaining lifetime in seconds
    pub duration: f32,
}

impl DebugShape {
    /// Wireframe box around a bounding volume
    pub fn bounds(bounds: &BoundingVolume, color: Vec4) -> Self {
        Self {
            primitive: DebugPrimitive::Box { min: bounds.min, max: bounds.max },
            color,
            duration: f32::INFINITY,
        }
    }

    /// Decrease duration by delta_time, returns true if expired
    pub fn tick(&mut self, delta_time: f32) -> bool {
        self.duration -= delta_time;
        self.duration <= 0.0
    }
}

/// Debug drawing system for collecting debug shapes
pub struct DebugDrawSystem {
    temporary_shapes: Vec<DebugShape>,
    layers: HashMap<DebugLayerId, Vec<DebugShape>>,
    /// Master enable/disable flag
    pub enabled: bool,
}

impl DebugDrawSystem {
    /// Create a new debug draw system
    pub fn new() -> Self {
        Self {
            temporary_shapes: Vec::new(),
            layers: HashMap::new(),
            enabled: true,
        }
    }

    /// Draw a line segment (temporary)
    pub fn draw_line(&mut self, start: Vec3, end: Vec3, color: Vec4, duration: f32) {
        self.push_temporary(DebugPrimitive::Line { start, end }, color, duration);
    }

    /// Draw a point marker (temporary)
    pub fn draw_point(&mut self, position: Vec3, size: f32, color: Vec4, duration: f32) {
        self.push_temporary(DebugPrimitive::Point { position, size }, color, duration);
    }

    /// Replace the contents of a persistent layer
    pub fn set_layer(&mut self, id: impl Into<DebugLayerId>, shapes: Vec<DebugShape>) {
        if !self.enabled {
            return;
        }
        self.layers.insert(id.into(), shapes);
    }

    /// Remove a persistent layer
    pub fn clear_layer(&mut self, id: &str) {
        self.layers.remove(id);
    }

    /// Shapes of one persistent layer
    pub fn layer(&self, id: &str) -> &[DebugShape] {
        self.layers.get(id).map_or(&[], Vec::as_slice)
    }

    /// Update shape lifetimes and remove expired temporary shapes
    pub fn update(&mut self, delta_time: f32) {
        if !self.enabled {
            return;
        }
        self.temporary_shapes.retain_mut(|shape| !shape.tick(delta_time));
    }

    /// All shapes to render (temporary and layered)
    pub fn shapes(&self) -> Vec<&DebugShape> {
        if !self.enabled {
            return Vec::new();
        }
        self.temporary_shapes.iter()
            .chain(self.layers.values().flatten())
            .collect()
    }

    /// Get the number of active shapes
    pub fn shape_count(&self) -> usize {
        self.temporary_shapes.len() + self.layers.values().map(Vec::len).sum::<usize>()
    }

    /// Clear all shapes (temporary and layered)
    pub fn clear(&mut self) {
        self.temporary_shapes.clear();
        self.layers.clear();
    }

    fn push_temporary(&mut self, primitive: DebugPrimitive, color: Vec4, duration: f32) {
        if !self.enabled {
            return;
        }
        self.temporary_shapes.push(DebugShape { primitive, color, duration });
    }
}

impl Default for DebugDrawSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temporary_shape_expiration() {
        let mut system = DebugDrawSystem::new();
        system.draw_line(Vec3::zeros(), Vec3::x(), Vec4::new(1.0, 0.0, 0.0, 1.0), 1.0);
        assert_eq!(system.shape_count(), 1);

        system.update(0.5);
        assert_eq!(system.shape_count(), 1);

        system.update(0.6);
        assert_eq!(system.shape_count(), 0);
    }

    #[test]
    fn test_layers_persist_and_replace() {
        let mut system = DebugDrawSystem::new();
        let shape = DebugShape {
            primitive: DebugPrimitive::Point { position: Vec3::zeros(), size: 1.0 },
            color: Vec4::new(0.0, 1.0, 0.0, 1.0),
            duration: f32::INFINITY,
        };
        system.set_layer("overlay", vec![shape.clone(), shape.clone()]);
        for _ in 0..100 {
            system.update(1.0);
        }
        assert_eq!(system.layer("overlay").len(), 2);

        system.set_layer("overlay", vec![shape]);
        assert_eq!(system.shape_count(), 1);

        system.clear_layer("overlay");
        assert!(system.layer("overlay").is_empty());
    }

    #[test]
    fn test_disabled_system_ignores_draws() {
        let mut system = DebugDrawSystem::new();
        system.enabled = false;
        system.draw_point(Vec3::zeros(), 0.5, Vec4::new(1.0, 1.0, 1.0, 1.0), 1.0);
        assert_eq!(system.shape_count(), 0);
        assert!(system.shapes().is_empty());
    }
}
