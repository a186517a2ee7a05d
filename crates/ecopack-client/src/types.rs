//! Wire types for the `/predict` exchange.

use serde::{Deserialize, Serialize};

use crate::inputs::RequirementInputs;

/// Request body for `POST /predict`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictRequest {
    pub weight_capacity_score: u8,
    pub product_strength_req: u8,
    pub barrier_score: u8,
    pub reuse_potential_score: u8,
}

impl From<&RequirementInputs> for PredictRequest {
    fn from(inputs: &RequirementInputs) -> Self {
        Self {
            weight_capacity_score: inputs.weight_capacity_score(),
            product_strength_req: inputs.product_strength_req(),
            barrier_score: inputs.barrier_score(),
            reuse_potential_score: inputs.reuse_potential_score(),
        }
    }
}

/// One candidate material as ranked by the prediction service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRecommendation {
    /// Material name, e.g. `"Recycled Cardboard"`.
    pub material: String,
    pub predicted_cost: f64,
    pub predicted_co2: f64,
    /// Server-computed ranking metric; higher is better.
    pub suitability_score: f64,
}
