use glam::DVec2;
use noise::Perlin;

use crate::config::GenerationConfig;
use crate::noise_util;
use crate::seed::WorldSeed;

const LACUNARITY: f64 = 2.0;
const PERSISTENCE: f64 = 0.5;

/// Converts world XY into a normalized terrain height.
///
/// Holds its own Perlin table, so each chunk worker builds one and never
/// shares it. Sampling is a pure function of coordinates and seed.
pub struct HeightSampler {
    noise: Perlin,
    octaves: u32,
    /// World units per noise unit along X and Y
    scale: DVec2,
    cut: f64,
    invert: bool,
}

impl HeightSampler {
    pub fn new(config: &GenerationConfig, seed: WorldSeed) -> Self {
        let (extent_x, extent_y) = config.chunk_extent();

        Self {
            noise: Perlin::new(seed.value),
            octaves: config.octaves,
            scale: DVec2::new(extent_x as f64, extent_y as f64) / config.frequency,
            cut: config.terrain_cut,
            invert: config.invert_world,
        }
    }

    /// Normalized height in [0, 1] at a world position
    pub fn sample_height(&self, world_x: f64, world_y: f64) -> f64 {
        let point = DVec2::new(world_x, world_y) / self.scale;
        let mut value = noise_util::fbm01(&self.noise, point, self.octaves, LACUNARITY, PERSISTENCE);

        // Plateau everything above the cut
        if value > self.cut {
            value = self.cut;
        }

        if self.invert {
            value = 1.0 - value;
        }

        value
    }
}
