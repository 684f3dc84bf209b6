use rand::Rng;

use crate::config::validate_screen;
use crate::error::Result;

/// Uniform random positions over the logical screen rectangle
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sampler {
    width: f32,
    height: f32,
}

impl Sampler {
    /// Create a sampler for a `width` x `height` screen. Both must be positive.
    pub fn new(width: f32, height: f32) -> Result<Self> {
        validate_screen(width, height)?;
        Ok(Self { width, height })
    }

    /// Draw `count` raw positions, x in [0, width) and y in [0, height)
    pub fn sample<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<[f32; 2]> {
        (0..count)
            .map(|_| {
                [
                    rng.gen_range(0.0..self.width),
                    rng.gen_range(0.0..self.height),
                ]
            })
            .collect()
    }

    /// Map a raw screen position into normalized device coordinates
    pub fn normalize(&self, raw: [f32; 2]) -> [f32; 2] {
        [
            raw[0] / self.width * 2.0 - 1.0,
            raw[1] / self.height * 2.0 - 1.0,
        ]
    }
}
