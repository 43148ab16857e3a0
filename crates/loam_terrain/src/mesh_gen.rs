use glam::Vec3;

use crate::chunk::{Chunk, ChunkCoord};
use crate::config::GenerationConfig;
use crate::height::HeightSampler;
use crate::material::MaterialClassifier;
use crate::seed::{SeedStream, WorldSeed};

pub const UP_NORMAL: [f32; 3] = [0.0, 0.0, 1.0];
pub const TERRAIN_TANGENT: [f32; 3] = [0.0, 1.0, 0.0];

/// Generate one terrain chunk mesh.
///
/// Chunk (0, 0) is centered on `origin`; chunk (x, y) is shifted by whole
/// chunk extents. Reads nothing but its arguments, so any number of these can
/// run side by side.
pub fn build_chunk(
    coord: ChunkCoord,
    section_index: u32,
    config: &GenerationConfig,
    seed: WorldSeed,
    origin: Vec3,
) -> Chunk {
    let vertex_rows = config.vertex_rows();
    let vertex_columns = config.vertex_columns();
    let extent = config.chunk_extent();

    let sampler = HeightSampler::new(config, seed);
    let classifier = MaterialClassifier::new(config);
    // Consumed strictly in vertex order
    let mut rng = seed.rng_for(coord.x, coord.y, SeedStream::Material);

    let (center_x, center_y) = coord.world_center(origin, extent);
    let start_x = center_x - extent.0 as f64 / 2.0;
    let start_y = center_y - extent.1 as f64 / 2.0;

    let mut chunk = Chunk::with_capacity(coord, section_index, vertex_rows, vertex_columns);
    let mut max_z = origin.z;

    for row in 0..vertex_rows {
        let world_y = start_y + row as f64 * config.cell_height as f64;

        for column in 0..vertex_columns {
            let world_x = start_x + column as f64 * config.cell_width as f64;

            let height = sampler.sample_height(world_x, world_y);
            let z = origin.z + config.height_ceiling * height as f32;

            let index = chunk.positions.len();
            if z > max_z {
                max_z = z;
                chunk.max_z_vertex = index;
            }

            let is_border = chunk.is_border(row, column);
            let class = classifier.classify_vertex(height as f32, is_border, &mut rng);

            chunk.positions.push([world_x as f32, world_y as f32, z]);
            chunk.normals.push(UP_NORMAL);
            chunk.uvs.push([row as f32, column as f32]);
            chunk.colors.push([0.0, 0.0, 0.0, class.weight]);
            chunk.tangents.push(TERRAIN_TANGENT);
            chunk.heights.push(height as f32);
            chunk.layers.push(class.base);

            if row > 0 {
                push_triangles(&mut chunk.triangles, row, column, vertex_columns);
            }
        }
    }

    log::trace!(
        "Built chunk ({}, {}) as section {}: {} vertices, {} triangles",
        coord.x,
        coord.y,
        section_index,
        chunk.vertex_count(),
        chunk.triangle_count()
    );

    chunk
}

/// Triangles closing the cells to the left of vertex (row, column), against
/// the previous row:
///
/// ```text
///   column = 0    1    2    3  ...
/// row - 1:  +----+----+----+- ...
///           |   /|   /|   /|
///           |  / |  / |  / |
///           | /  | /  | /  |
/// row:      +----+----+----+- ...
/// ```
///
/// Column 0 only opens the first cell; the last column only closes the last
/// one. Every row of cells ends up with exactly two triangles per cell.
fn push_triangles(triangles: &mut Vec<u32>, row: usize, column: usize, vertex_columns: usize) {
    let above = ((row - 1) * vertex_columns + column) as u32;
    let here = (row * vertex_columns + column) as u32;

    if column > 0 {
        triangles.extend_from_slice(&[above, here - 1, here]);
    }

    if column + 1 < vertex_columns {
        triangles.extend_from_slice(&[above, here, above + 1]);
    }
}
