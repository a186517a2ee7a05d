//! Prediction status state machine — explicit states and legal transition guards.
//!
//! ```text
//! Idle    → Loading
//! Loading → Success | Failed | Loading (superseded by a newer submit)
//! Success → Loading
//! Failed  → Loading
//! ```
//!
//! Every transition is recorded so a session can be replayed in logs.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionStatus {
    /// Nothing submitted yet.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// Last request returned at least one recommendation.
    Success,
    /// Last request failed or came back empty.
    Failed,
}

impl PredictionStatus {
    /// Whether a request has settled (no request in flight, at least one sent).
    pub fn is_settled(self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }
}

impl fmt::Display for PredictionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Loading => write!(f, "loading"),
            Self::Success => write!(f, "success"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

fn is_legal_transition(from: PredictionStatus, to: PredictionStatus) -> bool {
    use PredictionStatus::*;

    matches!(
        (from, to),
        (Idle, Loading)
            | (Loading, Success)
            | (Loading, Failed)
            | (Loading, Loading)
            | (Success, Loading)
            | (Failed, Loading)
    )
}

/// A single recorded status transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub from: PredictionStatus,
    pub to: PredictionStatus,
    /// Submission sequence number the transition belongs to.
    pub seq: u64,
    pub at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Error returned when an illegal transition is attempted.
#[derive(Debug, Clone)]
pub struct IllegalTransition {
    pub from: PredictionStatus,
    pub to: PredictionStatus,
}

impl fmt::Display for IllegalTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Illegal status transition: {} → {}", self.from, self.to)
    }
}

impl std::error::Error for IllegalTransition {}

/// Tracks the current status and the full transition log.
#[derive(Debug, Default)]
pub struct StatusMachine {
    current: PredictionStatus,
    transitions: Vec<TransitionRecord>,
}

impl StatusMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> PredictionStatus {
        self.current
    }

    /// Attempt to advance to `to`.
    pub fn advance(
        &mut self,
        to: PredictionStatus,
        seq: u64,
        reason: Option<&str>,
    ) -> Result<(), IllegalTransition> {
        if !is_legal_transition(self.current, to) {
            return Err(IllegalTransition {
                from: self.current,
                to,
            });
        }

        tracing::debug!(from = %self.current, to = %to, seq, "Status transition");

        self.transitions.push(TransitionRecord {
            from: self.current,
            to,
            seq,
            at: Utc::now(),
            reason: reason.map(String::from),
        });
        self.current = to;
        Ok(())
    }

    pub fn transitions(&self) -> &[TransitionRecord] {
        &self.transitions
    }

    /// One-line history, e.g. `idle → loading → success (2 transitions)`.
    pub fn summary(&self) -> String {
        let mut states = vec![PredictionStatus::Idle.to_string()];
        states.extend(self.transitions.iter().map(|t| t.to.to_string()));
        format!(
            "{} ({} transitions)",
            states.join(" → "),
            self.transitions.len()
        )
    }
}
