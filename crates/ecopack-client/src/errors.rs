//! Prediction error taxonomy.
//!
//! Transport and payload failures all surface to the user as one generic
//! notice. The variant is kept so logs can say what actually went wrong.

use std::time::Duration;

use thiserror::Error;

/// The single message shown for any failed prediction.
pub const GENERIC_FAILURE_MESSAGE: &str = "Could not fetch recommendations. Please try again.";

#[derive(Debug, Error)]
pub enum PredictionError {
    /// Connection refused, DNS failure, reset, etc.
    #[error("network failure: {0}")]
    Network(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Service answered with a non-2xx status.
    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Body was not a list of recommendations.
    #[error("could not decode response: {0}")]
    Decode(String),

    #[error("service returned no recommendations")]
    EmptyResult,

    #[error("no recommendation at position {index} (list has {len})")]
    InvalidSelection { index: usize, len: usize },

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl PredictionError {
    /// Whether this error ends a `submit()` in the `failed` state.
    pub fn is_request_failure(&self) -> bool {
        matches!(
            self,
            Self::Network(_)
                | Self::Timeout(_)
                | Self::Status { .. }
                | Self::Decode(_)
                | Self::EmptyResult
        )
    }

    /// Short machine-friendly cause for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Timeout(_) => "timeout",
            Self::Status { .. } => "status",
            Self::Decode(_) => "decode",
            Self::EmptyResult => "empty_result",
            Self::InvalidSelection { .. } => "invalid_selection",
            Self::Configuration(_) => "configuration",
        }
    }

    /// Text presented to the user. Request failures are not distinguished.
    pub fn user_message(&self) -> String {
        if self.is_request_failure() {
            GENERIC_FAILURE_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }
}
