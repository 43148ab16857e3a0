use rand::Rng;

use crate::chunk::Chunk;
use crate::chunk_map::ChunkMap;
use crate::config::GenerationConfig;
use crate::material::MaterialClassifier;
use crate::seed::{SeedStream, WorldSeed};

/// Blend centers stay this many cells away from every chunk border, which
/// keeps the 5x5 window inside the chunk and off the seam.
pub const BLEND_MARGIN: usize = 3;

/// Vertices skipped along the row after a blend center
const SKIP_AFTER_CENTER: usize = 2;

/// Randomized bleed propagation over every chunk in the map.
///
/// Each chunk draws from its own stream, so the result does not depend on
/// the order chunks are visited in.
pub fn apply_material_blend(map: &mut ChunkMap, config: &GenerationConfig, seed: WorldSeed) {
    let mut centers = 0;
    for chunk in map.chunks_mut() {
        centers += blend_chunk_materials(chunk, config, seed);
    }
    log::debug!("Material blend spread from {} centers", centers);
}

/// Spread the color of every bled vertex onto its neighborhood.
///
/// A vertex whose color no longer matches its base layer becomes a blend
/// center: each vertex in the surrounding 3x3 block takes the center color
/// with the configured probability, each vertex in the 5x5 block with half
/// of it. Under-water vertices never act as centers. Returns the number of
/// blend centers.
pub fn blend_chunk_materials(chunk: &mut Chunk, config: &GenerationConfig, seed: WorldSeed) -> usize {
    let rows = chunk.vertex_rows;
    let columns = chunk.vertex_columns;
    if rows < 2 * BLEND_MARGIN + 1 || columns < 2 * BLEND_MARGIN + 1 {
        return 0;
    }

    let probability = config.material_blend_probability;
    let classifier = MaterialClassifier::new(config);
    let mut rng = seed.rng_for(chunk.coord.x, chunk.coord.y, SeedStream::BlendPropagation);
    let mut centers = 0;

    for row in BLEND_MARGIN..rows - BLEND_MARGIN {
        let mut skip = 0;

        for column in BLEND_MARGIN..columns - BLEND_MARGIN {
            if skip > 0 {
                skip -= 1;
                continue;
            }

            let index = chunk.vertex_index(row, column);

            if classifier.is_under_water(chunk.heights[index]) {
                continue;
            }

            if chunk.layers[index].matches_weight(chunk.weight(index)) {
                continue;
            }

            let color = chunk.colors[index];
            spread(chunk, &mut rng, row, column, 1, probability, color);
            spread(chunk, &mut rng, row, column, 2, probability / 2.0, color);

            centers += 1;
            skip = SKIP_AFTER_CENTER;
        }
    }

    centers
}

fn spread<R: Rng>(
    chunk: &mut Chunk,
    rng: &mut R,
    row: usize,
    column: usize,
    radius: usize,
    probability: f32,
    color: [f32; 4],
) {
    for r in row - radius..=row + radius {
        for c in column - radius..=column + radius {
            if rng.r#gen::<f32>() < probability {
                let neighbor = chunk.vertex_index(r, c);
                chunk.colors[neighbor] = color;
            }
        }
    }
}
