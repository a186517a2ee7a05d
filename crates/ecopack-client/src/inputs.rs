//! Product requirement inputs — the four slider-bound scores sent to `/predict`.
//!
//! Every value is coerced on write: rounded to the nearest integer and
//! clamped into `[SCORE_MIN, SCORE_MAX]`. The request body therefore always
//! carries whole numbers regardless of where the value came from (slider,
//! CLI flag, test fixture).

use serde::{Deserialize, Serialize};

/// Lowest accepted requirement score.
pub const SCORE_MIN: u8 = 1;
/// Highest accepted requirement score.
pub const SCORE_MAX: u8 = 10;
/// Starting position of every slider.
pub const SCORE_DEFAULT: u8 = 5;

/// Which of the four requirement scores a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    WeightCapacity,
    ProductStrength,
    Barrier,
    ReusePotential,
}

impl Requirement {
    /// All requirements in display order.
    pub const ALL: [Requirement; 4] = [
        Self::WeightCapacity,
        Self::ProductStrength,
        Self::Barrier,
        Self::ReusePotential,
    ];

    /// Slider caption.
    pub fn label(self) -> &'static str {
        match self {
            Self::WeightCapacity => "Weight Capacity Required",
            Self::ProductStrength => "Product Strength Requirement",
            Self::Barrier => "Barrier Protection Needed",
            Self::ReusePotential => "Reuse Potential",
        }
    }
}

impl std::fmt::Display for Requirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WeightCapacity => write!(f, "weight_capacity_score"),
            Self::ProductStrength => write!(f, "product_strength_req"),
            Self::Barrier => write!(f, "barrier_score"),
            Self::ReusePotential => write!(f, "reuse_potential_score"),
        }
    }
}

/// Coerce an arbitrary number into a valid requirement score.
///
/// NaN maps to [`SCORE_MIN`]; infinities clamp to the nearest bound.
pub fn coerce_score(value: f64) -> u8 {
    if value.is_nan() {
        return SCORE_MIN;
    }
    value.round().clamp(SCORE_MIN as f64, SCORE_MAX as f64) as u8
}

/// Fraction of the slider track that is filled for `score`, in `[0, 1]`.
pub fn fill_fraction(score: u8) -> f64 {
    let score = score.clamp(SCORE_MIN, SCORE_MAX);
    (score - SCORE_MIN) as f64 / (SCORE_MAX - SCORE_MIN) as f64
}

/// The four requirement scores for one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementInputs {
    weight_capacity_score: u8,
    product_strength_req: u8,
    barrier_score: u8,
    reuse_potential_score: u8,
}

impl Default for RequirementInputs {
    fn default() -> Self {
        Self {
            weight_capacity_score: SCORE_DEFAULT,
            product_strength_req: SCORE_DEFAULT,
            barrier_score: SCORE_DEFAULT,
            reuse_potential_score: SCORE_DEFAULT,
        }
    }
}

impl RequirementInputs {
    /// Build from raw values, coercing each one.
    pub fn new(weight: f64, strength: f64, barrier: f64, reuse: f64) -> Self {
        Self {
            weight_capacity_score: coerce_score(weight),
            product_strength_req: coerce_score(strength),
            barrier_score: coerce_score(barrier),
            reuse_potential_score: coerce_score(reuse),
        }
    }

    /// Update one score. Returns the coerced value actually stored.
    pub fn set(&mut self, requirement: Requirement, value: f64) -> u8 {
        let score = coerce_score(value);
        match requirement {
            Requirement::WeightCapacity => self.weight_capacity_score = score,
            Requirement::ProductStrength => self.product_strength_req = score,
            Requirement::Barrier => self.barrier_score = score,
            Requirement::ReusePotential => self.reuse_potential_score = score,
        }
        score
    }

    pub fn get(&self, requirement: Requirement) -> u8 {
        match requirement {
            Requirement::WeightCapacity => self.weight_capacity_score,
            Requirement::ProductStrength => self.product_strength_req,
            Requirement::Barrier => self.barrier_score,
            Requirement::ReusePotential => self.reuse_potential_score,
        }
    }

    pub fn weight_capacity_score(&self) -> u8 {
        self.weight_capacity_score
    }

    pub fn product_strength_req(&self) -> u8 {
        self.product_strength_req
    }

    pub fn barrier_score(&self) -> u8 {
        self.barrier_score
    }

    pub fn reuse_potential_score(&self) -> u8 {
        self.reuse_potential_score
    }
}
