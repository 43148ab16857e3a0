use glam::DVec2;
use noise::{NoiseFn, Perlin};

/// Fractional Brownian Motion (FBM) noise
/// Combines multiple octaves of noise with decreasing amplitude
pub fn fbm(noise: &Perlin, point: DVec2, octaves: u32, lacunarity: f64, persistence: f64) -> f64 {
    let mut value = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_value = 0.0;

    for _ in 0..octaves {
        let sample = point * frequency;

        value += noise.get([sample.x, sample.y]) * amplitude;
        max_value += amplitude;

        amplitude *= persistence;
        frequency *= lacunarity;
    }

    if max_value == 0.0 {
        return 0.0;
    }

    // Normalize to [-1, 1] range
    value / max_value
}

/// FBM remapped to [0, 1]
pub fn fbm01(noise: &Perlin, point: DVec2, octaves: u32, lacunarity: f64, persistence: f64) -> f64 {
    let value = fbm(noise, point, octaves, lacunarity, persistence);
    ((value + 1.0) * 0.5).clamp(0.0, 1.0)
}
