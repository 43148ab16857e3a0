use crate::chunk::Chunk;
use crate::chunk_map::ChunkMap;
use crate::config::GenerationConfig;
use crate::material::MaterialLayer;

/// Anchors stay this many cells away from every chunk border
pub const SLOPE_MARGIN: usize = 2;

/// Tint steep transitions with the second layer, over every chunk.
pub fn apply_slope_blend(map: &mut ChunkMap, config: &GenerationConfig) {
    let threshold = config.steep_slope_min_height_diff();
    let mut tinted = 0;
    for chunk in map.chunks_mut() {
        tinted += blend_chunk_slopes(chunk, threshold);
    }
    log::debug!("Slope blend tinted {} vertices (threshold {:.3})", tinted, threshold);
}

/// One row-major sweep: every anchor compares itself against its unvisited
/// neighbors and tints those more than `threshold` away in height. A
/// neighbor is visited at most once, whichever anchor reaches it first.
/// Returns the number of tinted vertices.
pub fn blend_chunk_slopes(chunk: &mut Chunk, threshold: f32) -> usize {
    let rows = chunk.vertex_rows;
    let columns = chunk.vertex_columns;
    if rows < 2 * SLOPE_MARGIN + 1 || columns < 2 * SLOPE_MARGIN + 1 {
        return 0;
    }

    let mut processed = vec![false; chunk.vertex_count()];
    processed[0] = true;
    let mut tinted = 0;

    for row in SLOPE_MARGIN..rows - SLOPE_MARGIN {
        for column in SLOPE_MARGIN..columns - SLOPE_MARGIN {
            let has_left = column > 0;
            let has_right = column + 1 < columns;
            let has_up = row > 0;
            let has_down = row + 1 < rows;

            let current_z = chunk.z(chunk.vertex_index(row, column));
            let mut neighbors = Vec::with_capacity(8);

            if has_left {
                neighbors.push((row, column - 1));
                if has_up {
                    neighbors.push((row - 1, column - 1));
                }
                if has_down {
                    neighbors.push((row + 1, column - 1));
                }
            }
            if has_right {
                neighbors.push((row, column + 1));
                if has_up {
                    neighbors.push((row - 1, column + 1));
                }
                if has_down {
                    neighbors.push((row + 1, column + 1));
                }
            }
            if has_up {
                neighbors.push((row - 1, column));
            }
            if has_down {
                neighbors.push((row + 1, column));
            }

            for (r, c) in neighbors {
                let neighbor = chunk.vertex_index(r, c);
                if processed[neighbor] {
                    continue;
                }

                if (chunk.z(neighbor) - current_z).abs() > threshold {
                    chunk.colors[neighbor] = MaterialLayer::Second.color();
                    tinted += 1;
                }
                processed[neighbor] = true;
            }
        }
    }

    tinted
}
