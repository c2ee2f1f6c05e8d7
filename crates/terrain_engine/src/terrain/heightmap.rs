//! Height maps on a regular grid

use thiserror::Error;

use crate::foundation::math::{constants, utils, Mat4, Vec3};
use crate::physics::Triangle;
use super::{NoiseOp, NoiseOverlay, TerrainKind, ValueNoise};

/// Errors raised while synthesizing terrain
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TerrainError {
    /// The grid has no cells to triangulate
    #[error("Height map needs at least 2x2 points, got {width}x{depth}")]
    GridTooSmall {
        /// Points along X
        width: usize,
        /// Points along Z
        depth: usize,
    },
    /// A generator parameter produced non-finite heights
    #[error("Invalid terrain parameter: {0}")]
    InvalidParameter(String),
}

/// Grid of heights, `width` points along X by `depth` points along Z
///
/// Heights are stored row by row: the point `(i, j)` lives at
/// `j * width + i`.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightMap {
    width: usize,
    depth: usize,
    heights: Vec<f32>,
}

impl HeightMap {
    /// Flat map at height zero
    pub fn flat(width: usize, depth: usize) -> Result<Self, TerrainError> {
        if width < 2 || depth < 2 {
            return Err(TerrainError::GridTooSmall { width, depth });
        }
        Ok(Self {
            width,
            depth,
            heights: vec![0.0; width * depth],
        })
    }

    /// Synthesize a map of the given kind
    pub fn generate(width: usize, depth: usize, kind: &TerrainKind) -> Result<Self, TerrainError> {
        let mut map = Self::flat(width, depth)?;
        match *kind {
            TerrainKind::Flat => {}
            TerrainKind::Wave { amplitude, wavelength } => map.apply_wave(amplitude, wavelength)?,
            TerrainKind::Noise { seed, scale, amplitude } => map.apply_noise(seed, scale, amplitude),
            TerrainKind::Layered { seed, scale, layer_count, layer_height, stepped } => {
                map.apply_layers(seed, scale, layer_count, layer_height, stepped)
            }
        }
        if map.heights.iter().any(|h| !h.is_finite()) {
            return Err(TerrainError::InvalidParameter(format!("{:?} produced non-finite heights", kind)));
        }
        Ok(map)
    }

    /// Points along X
    pub fn width(&self) -> usize {
        self.width
    }

    /// Points along Z
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Height at grid point `(i, j)`
    pub fn height(&self, i: usize, j: usize) -> f32 {
        self.heights[j * self.width + i]
    }

    /// Overwrite the height at grid point `(i, j)`
    pub fn set_height(&mut self, i: usize, j: usize, height: f32) {
        self.heights[j * self.width + i] = height;
    }

    fn apply_wave(&mut self, amplitude: f32, wavelength: f32) -> Result<(), TerrainError> {
        if wavelength == 0.0 {
            return Err(TerrainError::InvalidParameter("wavelength must be non-zero".to_string()));
        }
        let frequency = constants::TAU / self.depth as f32 / wavelength;
        for j in 0..self.depth {
            for i in 0..self.width {
                let height = (i as f32 * frequency).cos() * amplitude * (j as f32 * frequency).cos() * amplitude;
                self.set_height(i, j, height);
            }
        }
        Ok(())
    }

    fn apply_noise(&mut self, seed: u64, scale: f32, amplitude: f32) {
        let noise = ValueNoise::new(seed);
        for j in 1..self.depth - 1 {
            for i in 1..self.width - 1 {
                let value = noise.sample(i as f32 * scale, j as f32 * scale);
                self.set_height(i, j, value * amplitude);
            }
        }
    }

    /// Combine seeded noise with the interior heights
    ///
    /// Border points keep their height.
    pub fn layer_noise(&mut self, overlay: &NoiseOverlay) -> Result<(), TerrainError> {
        let noise = ValueNoise::new(overlay.seed);
        for j in 1..self.depth - 1 {
            for i in 1..self.width - 1 {
                let value = noise.sample(i as f32 * overlay.scale, j as f32 * overlay.scale) * overlay.amplitude;
                let height = match overlay.op {
                    NoiseOp::Add => self.height(i, j) + value,
                    NoiseOp::Multiply => self.height(i, j) * value,
                };
                if !height.is_finite() {
                    return Err(TerrainError::InvalidParameter(format!("{:?} produced non-finite heights", overlay)));
                }
                self.set_height(i, j, height);
            }
        }
        Ok(())
    }

    fn apply_layers(&mut self, seed: u64, scale: f32, layer_count: u32, layer_height: f32, stepped: bool) {
        let noise = ValueNoise::new(seed);
        let layers = layer_count as f32;
        for j in 1..self.depth - 1 {
            for i in 1..self.width - 1 {
                let unit = (noise.sample(i as f32 * scale, j as f32 * scale) + 1.0) * 0.5;
                let level = if stepped { (unit * layers).floor() } else { unit * layers };
                self.set_height(i, j, level * layer_height);
            }
        }
    }

    /// Replace every interior height by the mean of its eight neighbours
    ///
    /// Border points keep their height. All averages read the heights from
    /// before the pass.
    pub fn smoothen(&mut self) {
        let source = self.heights.clone();
        let width = self.width;
        let at = |i: usize, j: usize| source[j * width + i];

        for j in 1..self.depth - 1 {
            for i in 1..self.width - 1 {
                let sum = at(i - 1, j - 1) + at(i, j - 1) + at(i + 1, j - 1)
                    + at(i - 1, j) + at(i + 1, j)
                    + at(i - 1, j + 1) + at(i, j + 1) + at(i + 1, j + 1);
                self.set_height(i, j, sum / 8.0);
            }
        }
    }

    /// Two world-space triangles per grid cell
    ///
    /// The grid is laid out on the unit square in XZ with the raw height on
    /// Y, then mapped through `world`.
    pub fn triangulate(&self, world: &Mat4) -> Vec<Triangle> {
        let sx = 1.0 / (self.width - 1) as f32;
        let sz = 1.0 / (self.depth - 1) as f32;
        let point = |i: usize, j: usize| {
            let local = Vec3::new(i as f32 * sx, self.height(i, j), j as f32 * sz);
            utils::transform_position(world, local)
        };

        let mut triangles = Vec::with_capacity(2 * (self.width - 1) * (self.depth - 1));
        for j in 0..self.depth - 1 {
            for i in 0..self.width - 1 {
                let near_left = point(i, j);
                let near_right = point(i + 1, j);
                let far_left = point(i, j + 1);
                let far_right = point(i + 1, j + 1);

                triangles.push(Triangle::new(far_left, far_right, near_left));
                triangles.push(Triangle::new(near_left, far_right, near_right));
            }
        }
        triangles
    }

    /// Lowest and highest height
    pub fn height_range(&self) -> (f32, f32) {
        self.heights
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &h| (lo.min(h), hi.max(h)))
    }
}
