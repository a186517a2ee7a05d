//! Qualitative ratings for the impact panel.
//!
//! Thresholds are inclusive upper bounds:
//!
//! | Metric | Good     | Moderate  | Poor   |
//! |--------|----------|-----------|--------|
//! | CO₂    | ≤ 55     | ≤ 70      | > 70   |
//! | Cost   | ≤ 2.8    | ≤ 3.8     | > 3.8  |

use serde::{Deserialize, Serialize};

const CO2_GOOD_MAX: f64 = 55.0;
const CO2_MODERATE_MAX: f64 = 70.0;
const COST_GOOD_MAX: f64 = 2.8;
const COST_MODERATE_MAX: f64 = 3.8;

/// Three-step rating shown under each chart bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rating {
    Good,
    Moderate,
    Poor,
}

impl Rating {
    fn from_thresholds(value: f64, good_max: f64, moderate_max: f64) -> Self {
        if value <= good_max {
            Self::Good
        } else if value <= moderate_max {
            Self::Moderate
        } else {
            Self::Poor
        }
    }

    /// Display color token used by the front end.
    pub fn color(self) -> &'static str {
        match self {
            Self::Good => "green",
            Self::Moderate => "yellow",
            Self::Poor => "red",
        }
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Good => write!(f, "Good"),
            Self::Moderate => write!(f, "Moderate"),
            Self::Poor => write!(f, "Poor"),
        }
    }
}

pub fn co2_label(value: f64) -> Rating {
    Rating::from_thresholds(value, CO2_GOOD_MAX, CO2_MODERATE_MAX)
}

pub fn cost_label(value: f64) -> Rating {
    Rating::from_thresholds(value, COST_GOOD_MAX, COST_MODERATE_MAX)
}
