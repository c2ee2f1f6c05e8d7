//! Seeded 2D value noise

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::foundation::math::utils::{lerp, smoothstep};

const LATTICE_SIZE: usize = 256;

/// Smoothly interpolated random values on an integer lattice
///
/// The same seed always yields the same field, so regenerated terrain is
/// reproducible.
#[derive(Debug, Clone)]
pub struct ValueNoise {
    values: Vec<f32>,
    permutation: Vec<usize>,
}

impl ValueNoise {
    /// Build the lattice for `seed`
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let values = (0..LATTICE_SIZE).map(|_| rng.gen_range(-1.0..=1.0)).collect();
        let mut permutation: Vec<usize> = (0..LATTICE_SIZE).collect();
        for i in (1..LATTICE_SIZE).rev() {
            let j = rng.gen_range(0..=i);
            permutation.swap(i, j);
        }
        Self { values, permutation }
    }

    /// Noise value in [-1, 1] at `(x, y)`
    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let (x0, y0) = (x.floor(), y.floor());
        let (tx, ty) = (smoothstep(x - x0), smoothstep(y - y0));
        let (ix, iy) = (x0 as i64, y0 as i64);

        let c00 = self.lattice(ix, iy);
        let c10 = self.lattice(ix + 1, iy);
        let c01 = self.lattice(ix, iy + 1);
        let c11 = self.lattice(ix + 1, iy + 1);

        lerp(lerp(c00, c10, tx), lerp(c01, c11, tx), ty)
    }

    fn lattice(&self, x: i64, y: i64) -> f32 {
        let wrap = |v: i64| v.rem_euclid(LATTICE_SIZE as i64) as usize;
        let hashed = self.permutation[(self.permutation[wrap(x)] + wrap(y)) % LATTICE_SIZE];
        self.values[hashed]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_field() {
        let a = ValueNoise::new(42);
        let b = ValueNoise::new(42);
        for i in 0..50 {
            let (x, y) = (i as f32 * 0.37, i as f32 * 0.91);
            assert_eq!(a.sample(x, y), b.sample(x, y));
        }
    }

    #[test]
    fn test_values_bounded_and_match_lattice() {
        let noise = ValueNoise::new(1);
        for i in -20..20 {
            for j in -20..20 {
                let value = noise.sample(i as f32 * 0.3, j as f32 * 0.7);
                assert!((-1.0..=1.0).contains(&value));
            }
        }
        assert_eq!(noise.sample(3.0, 4.0), noise.lattice(3, 4));
    }
}
