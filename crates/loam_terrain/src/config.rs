use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TerrainError;
use crate::seed::RANDOM_SEED;

/// Probability that one material shows up on a vertex classified as another.
///
/// Field names read as "<bleeding layer>_on_<base layer>".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BleedProbabilities {
    pub first_on_second: f32,
    pub first_on_third: f32,
    pub second_on_first: f32,
    pub second_on_third: f32,
    pub third_on_first: f32,
    pub third_on_second: f32,
}

impl Default for BleedProbabilities {
    fn default() -> Self {
        Self {
            first_on_second: 0.01,
            first_on_third: 0.01,
            second_on_first: 0.01,
            second_on_third: 0.01,
            third_on_first: 0.01,
            third_on_second: 0.01,
        }
    }
}

/// Everything one generation run reads. Immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Cells per chunk along Y
    pub rows: u32,
    /// Cells per chunk along X
    pub columns: u32,
    pub cell_width: f32,
    pub cell_height: f32,
    /// Chunks per axis from the origin chunk
    pub view_distance: u32,
    /// Generate only the origin chunk
    pub unbounded: bool,

    /// Larger values give smaller, busier features
    pub frequency: f64,
    pub octaves: u32,
    /// World Z above the origin reached by a normalized height of 1
    pub height_ceiling: f32,
    /// Normalized heights above this are flattened to it
    pub terrain_cut: f64,
    pub invert_world: bool,
    /// 0 draws a fresh seed every run
    pub seed: u32,

    pub first_material_max_height: f32,
    pub second_material_max_height: f32,
    pub material_max_deviation: f32,
    pub bleed: BleedProbabilities,

    pub second_material_under_water: bool,
    /// Normalized water height in [0, 1]
    pub water_level: f32,

    pub apply_material_blend: bool,
    pub material_blend_probability: f32,
    pub apply_slope_blend: bool,
    /// Fraction of `height_ceiling` that counts as a steep step between neighbors
    pub slope_height_multiplier: f32,

    /// Upper bound on chunk worker threads; 0 spawns one worker per chunk
    pub max_workers: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            rows: 64,
            columns: 64,
            cell_width: 300.0,
            cell_height: 300.0,
            view_distance: 1,
            unbounded: false,

            frequency: 1.0,
            octaves: 4,
            height_ceiling: 10_000.0,
            terrain_cut: 1.0,
            invert_world: false,
            seed: RANDOM_SEED,

            first_material_max_height: 0.15,
            second_material_max_height: 0.6,
            material_max_deviation: 0.03,
            bleed: BleedProbabilities::default(),

            second_material_under_water: true,
            water_level: 0.1,

            apply_material_blend: true,
            material_blend_probability: 0.5,
            apply_slope_blend: false,
            slope_height_multiplier: 0.02,

            max_workers: 0,
        }
    }
}

fn check_unit(field: &'static str, value: f32) -> Result<(), TerrainError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(TerrainError::invalid(field, format!("must be within [0, 1], got {value}")))
    }
}

impl GenerationConfig {
    /// Parse a (possibly partial) JSON document; missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, TerrainError> {
        let config: GenerationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TerrainError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        log::debug!("Loaded terrain config from {}", path.as_ref().display());
        Self::from_json_str(&text)
    }

    /// Reject out-of-range values. Nothing is clamped.
    pub fn validate(&self) -> Result<(), TerrainError> {
        if self.rows < 1 {
            return Err(TerrainError::invalid("rows", "must be at least 1"));
        }
        if self.columns < 1 {
            return Err(TerrainError::invalid("columns", "must be at least 1"));
        }
        if !(self.cell_width >= 0.5) {
            return Err(TerrainError::invalid("cell_width", "must be at least 0.5"));
        }
        if !(self.cell_height >= 0.5) {
            return Err(TerrainError::invalid("cell_height", "must be at least 0.5"));
        }
        if self.view_distance < 1 {
            return Err(TerrainError::invalid("view_distance", "must be at least 1"));
        }
        if !(0.1..=64.0).contains(&self.frequency) {
            return Err(TerrainError::invalid(
                "frequency",
                format!("must be within [0.1, 64], got {}", self.frequency),
            ));
        }
        if !(1..=16).contains(&self.octaves) {
            return Err(TerrainError::invalid(
                "octaves",
                format!("must be within [1, 16], got {}", self.octaves),
            ));
        }
        if !(self.height_ceiling >= 0.0) {
            return Err(TerrainError::invalid("height_ceiling", "must not be negative"));
        }
        if !(0.0..=1.0).contains(&self.terrain_cut) {
            return Err(TerrainError::invalid(
                "terrain_cut",
                format!("must be within [0, 1], got {}", self.terrain_cut),
            ));
        }

        check_unit("first_material_max_height", self.first_material_max_height)?;
        check_unit("second_material_max_height", self.second_material_max_height)?;
        if self.second_material_max_height < self.first_material_max_height {
            return Err(TerrainError::invalid(
                "second_material_max_height",
                "must not be below first_material_max_height",
            ));
        }
        check_unit("material_max_deviation", self.material_max_deviation)?;

        check_unit("bleed.first_on_second", self.bleed.first_on_second)?;
        check_unit("bleed.first_on_third", self.bleed.first_on_third)?;
        check_unit("bleed.second_on_first", self.bleed.second_on_first)?;
        check_unit("bleed.second_on_third", self.bleed.second_on_third)?;
        check_unit("bleed.third_on_first", self.bleed.third_on_first)?;
        check_unit("bleed.third_on_second", self.bleed.third_on_second)?;

        check_unit("water_level", self.water_level)?;
        check_unit("material_blend_probability", self.material_blend_probability)?;
        check_unit("slope_height_multiplier", self.slope_height_multiplier)?;

        Ok(())
    }

    /// Vertices along one chunk row
    pub fn vertex_columns(&self) -> usize {
        self.columns as usize + 1
    }

    /// Vertex rows in one chunk
    pub fn vertex_rows(&self) -> usize {
        self.rows as usize + 1
    }

    pub fn vertices_per_chunk(&self) -> usize {
        self.vertex_rows() * self.vertex_columns()
    }

    pub fn triangles_per_chunk(&self) -> usize {
        2 * self.rows as usize * self.columns as usize
    }

    /// World-space (width, height) covered by one chunk
    pub fn chunk_extent(&self) -> (f32, f32) {
        (
            self.columns as f32 * self.cell_width,
            self.rows as f32 * self.cell_height,
        )
    }

    pub fn chunks_per_axis(&self) -> u32 {
        if self.unbounded {
            1
        } else {
            2 * self.view_distance + 1
        }
    }

    pub fn chunk_count(&self) -> usize {
        let side = self.chunks_per_axis() as usize;
        side * side
    }

    /// Minimum Z step between neighbors that triggers the slope tint
    pub fn steep_slope_min_height_diff(&self) -> f32 {
        self.height_ceiling * self.slope_height_multiplier
    }
}
