use rand::Rng;

use crate::config::{BleedProbabilities, GenerationConfig};

/// Tolerance used when comparing a vertex color weight against a layer.
pub const LAYER_WEIGHT_TOLERANCE: f32 = 0.1;

/// Bleed rolls never land below this, so a probability of 0 never fires.
const MIN_BLEED_ROLL: f32 = 0.005;

/// One of the three ground materials, encoded into vertex color alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MaterialLayer {
    First = 1,
    Second = 2,
    Third = 3,
}

impl MaterialLayer {
    pub fn weight(self) -> f32 {
        match self {
            MaterialLayer::First => 0.0,
            MaterialLayer::Second => 0.5,
            MaterialLayer::Third => 1.0,
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    /// Layer whose weight lies within `LAYER_WEIGHT_TOLERANCE` of `weight`
    pub fn from_weight(weight: f32) -> Option<Self> {
        [MaterialLayer::First, MaterialLayer::Second, MaterialLayer::Third]
            .into_iter()
            .find(|layer| layer.matches_weight(weight))
    }

    pub fn matches_weight(self, weight: f32) -> bool {
        (weight - self.weight()).abs() <= LAYER_WEIGHT_TOLERANCE
    }

    /// Vertex color carrying this layer (RGB unused)
    pub fn color(self) -> [f32; 4] {
        [0.0, 0.0, 0.0, self.weight()]
    }
}

/// Result of classifying one vertex
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    /// Alpha written into the vertex color
    pub weight: f32,
    /// Layer from height and deviation alone, before bleed
    pub base: MaterialLayer,
}

impl Classification {
    fn plain(layer: MaterialLayer) -> Self {
        Self {
            weight: layer.weight(),
            base: layer,
        }
    }
}

/// Maps normalized heights onto the three material layers.
#[derive(Debug, Clone)]
pub struct MaterialClassifier {
    first_max: f32,
    second_max: f32,
    max_deviation: f32,
    bleed: BleedProbabilities,
    second_under_water: bool,
    water_level: f32,
}

impl MaterialClassifier {
    pub fn new(config: &GenerationConfig) -> Self {
        Self {
            first_max: config.first_material_max_height,
            second_max: config.second_material_max_height,
            max_deviation: config.material_max_deviation,
            bleed: config.bleed,
            second_under_water: config.second_material_under_water,
            water_level: config.water_level,
        }
    }

    pub fn is_under_water(&self, height: f32) -> bool {
        self.second_under_water && height <= self.water_level
    }

    /// Layer from a perturbed height, ignoring bleed and water
    pub fn base_layer(&self, height: f32, deviation: f32) -> MaterialLayer {
        let perturbed = height + deviation;

        if perturbed <= self.first_max {
            MaterialLayer::First
        } else if perturbed >= self.second_max {
            MaterialLayer::Third
        } else {
            MaterialLayer::Second
        }
    }

    pub fn sample_deviation<R: Rng>(&self, rng: &mut R) -> f32 {
        rng.gen_range(-self.max_deviation..=self.max_deviation)
    }

    /// Classify one vertex, drawing its deviation from `rng`.
    ///
    /// Under-water vertices consume nothing from the stream.
    pub fn classify_vertex<R: Rng>(&self, height: f32, is_border: bool, rng: &mut R) -> Classification {
        if self.is_under_water(height) {
            return Classification::plain(MaterialLayer::Second);
        }

        let deviation = self.sample_deviation(rng);
        self.classify(height, deviation, is_border, rng)
    }

    /// Classify with an explicit deviation. Border vertices never bleed so
    /// neighboring chunks meet without a seam.
    pub fn classify<R: Rng>(&self, height: f32, deviation: f32, is_border: bool, rng: &mut R) -> Classification {
        if self.is_under_water(height) {
            return Classification::plain(MaterialLayer::Second);
        }

        let base = self.base_layer(height, deviation);
        if is_border {
            return Classification::plain(base);
        }

        let (a, b) = self.bleed_candidates(base);
        let pick_a = rng.gen_range(MIN_BLEED_ROLL..1.0) <= a.1;
        let pick_b = rng.gen_range(MIN_BLEED_ROLL..1.0) <= b.1;

        let layer = match (pick_a, pick_b) {
            (true, true) => {
                if rng.gen_bool(0.5) {
                    b.0
                } else {
                    a.0
                }
            }
            (true, false) => a.0,
            (false, true) => b.0,
            (false, false) => base,
        };

        Classification {
            weight: layer.weight(),
            base,
        }
    }

    /// The two layers that may bleed onto `base`, with their probabilities
    fn bleed_candidates(&self, base: MaterialLayer) -> ((MaterialLayer, f32), (MaterialLayer, f32)) {
        let p = &self.bleed;
        match base {
            MaterialLayer::First => (
                (MaterialLayer::Second, p.second_on_first),
                (MaterialLayer::Third, p.third_on_first),
            ),
            MaterialLayer::Second => (
                (MaterialLayer::First, p.first_on_second),
                (MaterialLayer::Third, p.third_on_second),
            ),
            MaterialLayer::Third => (
                (MaterialLayer::First, p.first_on_third),
                (MaterialLayer::Second, p.second_on_third),
            ),
        }
    }
}
