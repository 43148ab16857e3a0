use glam::Vec3;

use crate::material::MaterialLayer;

/// Coordinates for a chunk in chunk space (not world space), relative to the
/// origin chunk
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

impl ChunkCoord {
    pub const ORIGIN: ChunkCoord = ChunkCoord { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// World-space center of this chunk, given the origin chunk's center
    pub fn world_center(&self, origin: Vec3, chunk_extent: (f32, f32)) -> (f64, f64) {
        (
            origin.x as f64 + self.x as f64 * chunk_extent.0 as f64,
            origin.y as f64 + self.y as f64 * chunk_extent.1 as f64,
        )
    }
}

/// One generated terrain tile: parallel per-vertex buffers plus triangles.
///
/// Vertices are stored row-major, `vertex_columns` per row.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub coord: ChunkCoord,
    pub section_index: u32,
    pub vertex_rows: usize,
    pub vertex_columns: usize,

    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub colors: Vec<[f32; 4]>,
    pub tangents: Vec<[f32; 3]>,
    /// Normalized sampled height per vertex, before scaling by the ceiling
    pub heights: Vec<f32>,
    /// Base layer per vertex; colors may drift from it through bleed and blending
    pub layers: Vec<MaterialLayer>,

    /// Flat list of vertex index triples
    pub triangles: Vec<u32>,
    pub max_z_vertex: usize,
}

impl Chunk {
    pub fn with_capacity(coord: ChunkCoord, section_index: u32, vertex_rows: usize, vertex_columns: usize) -> Self {
        let vertex_count = vertex_rows * vertex_columns;
        let triangle_count = 2 * vertex_rows.saturating_sub(1) * vertex_columns.saturating_sub(1);

        Self {
            coord,
            section_index,
            vertex_rows,
            vertex_columns,
            positions: Vec::with_capacity(vertex_count),
            normals: Vec::with_capacity(vertex_count),
            uvs: Vec::with_capacity(vertex_count),
            colors: Vec::with_capacity(vertex_count),
            tangents: Vec::with_capacity(vertex_count),
            heights: Vec::with_capacity(vertex_count),
            layers: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count * 3),
            max_z_vertex: 0,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    #[inline]
    pub fn vertex_index(&self, row: usize, column: usize) -> usize {
        debug_assert!(row < self.vertex_rows && column < self.vertex_columns);
        row * self.vertex_columns + column
    }

    pub fn is_border(&self, row: usize, column: usize) -> bool {
        row == 0 || column == 0 || row + 1 == self.vertex_rows || column + 1 == self.vertex_columns
    }

    pub fn z(&self, index: usize) -> f32 {
        self.positions[index][2]
    }

    /// Material weight currently stored in the vertex color alpha
    pub fn weight(&self, index: usize) -> f32 {
        self.colors[index][3]
    }

    pub fn max_z(&self) -> f32 {
        self.z(self.max_z_vertex)
    }

    /// Vertex indices along one edge, ordered to line up with the opposite
    /// edge of the neighboring chunk
    pub fn edge_vertices(&self, edge: Edge) -> Vec<usize> {
        let last_row = self.vertex_rows - 1;
        let last_column = self.vertex_columns - 1;
        match edge {
            Edge::Left => (0..self.vertex_rows).map(|r| self.vertex_index(r, 0)).collect(),
            Edge::Right => (0..self.vertex_rows).map(|r| self.vertex_index(r, last_column)).collect(),
            Edge::Bottom => (0..self.vertex_columns).map(|c| self.vertex_index(0, c)).collect(),
            Edge::Top => (0..self.vertex_columns).map(|c| self.vertex_index(last_row, c)).collect(),
        }
    }
}

/// Chunk edges; `Bottom` is row 0 (lowest world Y)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
    Bottom,
    Top,
}

impl Edge {
    pub fn opposite(self) -> Edge {
        match self {
            Edge::Left => Edge::Right,
            Edge::Right => Edge::Left,
            Edge::Bottom => Edge::Top,
            Edge::Top => Edge::Bottom,
        }
    }
}
