//! EcoPack client library.
//!
//! Collects four product requirement scores, asks the EcoPackAI prediction
//! service for ranked packaging materials, and derives what the results
//! panel and impact chart show.
//!
//! ## Modules
//!
//! | Module          | Purpose                                              |
//! |-----------------|------------------------------------------------------|
//! | `inputs`        | Requirement scores and their coercion policy         |
//! | `types`         | `/predict` request and response types                |
//! | `service`       | `PredictionService` trait and reqwest implementation |
//! | `state_machine` | idle / loading / success / failed transitions        |
//! | `controller`    | submit, select, derived cost/CO₂, reveal events      |
//! | `labels`        | Good / Moderate / Poor ratings                       |
//! | `view`          | Ranked cards, impact chart, text rendering           |

pub mod config;
pub mod controller;
pub mod errors;
pub mod inputs;
pub mod labels;
pub mod service;
pub mod state_machine;
pub mod types;
pub mod view;

pub use config::ClientConfig;
pub use controller::{Completion, PendingRequest, PredictionController, ViewEvent};
pub use errors::PredictionError;
pub use inputs::{Requirement, RequirementInputs};
pub use labels::{co2_label, cost_label, Rating};
pub use service::{HttpPredictionService, PredictionService};
pub use state_machine::PredictionStatus;
pub use types::{MaterialRecommendation, PredictRequest};
