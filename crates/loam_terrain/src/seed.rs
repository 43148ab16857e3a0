use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configured seed value that asks for a fresh random seed on every run
pub const RANDOM_SEED: u32 = 0;

/// Independent random streams derived from one chunk seed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedStream {
    /// Per-vertex height deviation and cross-layer bleed rolls
    Material = 1,
    /// Randomized bleed propagation after all chunks exist
    BlendPropagation = 2,
}

/// World seed structure for procedural generation
/// Provides deterministic random values based on a base seed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldSeed {
    pub value: u32,
}

impl WorldSeed {
    /// Create a new WorldSeed with the given value
    pub fn new(seed: u32) -> Self {
        Self { value: seed }
    }

    /// Resolve a configured seed: `RANDOM_SEED` draws a fresh non-zero seed,
    /// anything else is used as-is.
    pub fn resolve(configured: u32) -> Self {
        if configured == RANDOM_SEED {
            Self::new(rand::thread_rng().gen_range(1..=u32::MAX))
        } else {
            Self::new(configured)
        }
    }

    /// Hash combine function from Boost C++ library
    /// Formula: seed ^ (value + 0x9e3779b9 + (seed << 6) + (seed >> 2))
    pub fn hash_combine(&self, value: u32) -> u32 {
        let seed = self.value;

        seed ^ (value
            .wrapping_add(0x9e3779b9)
            .wrapping_add(seed << 6)
            .wrapping_add(seed >> 2))
    }

    /// Combine this seed with multiple values
    pub fn combine_multiple(&self, values: &[u32]) -> WorldSeed {
        let mut result = self.value;
        for &value in values {
            result = WorldSeed::new(result).hash_combine(value);
        }
        WorldSeed::new(result)
    }

    /// Generate a seed for a specific chunk coordinate with a layer identifier
    pub fn for_layer(&self, x: i32, y: i32, layer: u32) -> WorldSeed {
        self.combine_multiple(&[x as u32, y as u32, layer])
    }

    /// Reproducible random stream for one chunk and one purpose.
    ///
    /// ChaCha8 gives the same sequence on every platform, which the
    /// byte-identical output guarantee relies on.
    pub fn rng_for(&self, x: i32, y: i32, stream: SeedStream) -> ChaCha8Rng {
        let derived = self.for_layer(x, y, stream as u32);
        ChaCha8Rng::seed_from_u64(((self.value as u64) << 32) | derived.value as u64)
    }
}
