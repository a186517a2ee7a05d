//! Prediction request controller.
//!
//! Owns the requirement inputs and the client-held prediction result, and
//! drives the `/predict` round trip:
//!
//! ```text
//! submit()
//!   → begin_submit()      — status → loading, clear notice, number the request
//!   → service.predict()   — single attempt, bounded by request_timeout
//!   → complete(seq, ..)   — apply only if seq is still the latest
//!   → reveal after delay  — ViewEvent::RevealResults on the event channel
//! ```
//!
//! Recommendations are only replaced on success. A failure leaves the
//! previous cards and selection in place and raises a transient notice.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::errors::PredictionError;
use crate::inputs::{Requirement, RequirementInputs};
use crate::labels::{co2_label, cost_label, Rating};
use crate::service::PredictionService;
use crate::state_machine::{PredictionStatus, StatusMachine, TransitionRecord};
use crate::types::{MaterialRecommendation, PredictRequest};

/// Presentation events emitted by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    /// Bring the results region into view. Sent `reveal_delay` after a
    /// submission settles, whether it succeeded or failed.
    RevealResults { seq: u64 },
}

/// A numbered submission awaiting its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRequest {
    pub seq: u64,
    pub request: PredictRequest,
}

/// What `complete()` did with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The response was for the latest submission and has been applied.
    Applied(PredictionStatus),
    /// A newer submission exists (or this one already settled); ignored.
    Stale,
}

#[derive(Debug, Clone)]
struct ErrorNotice {
    message: String,
    raised_at: Instant,
}

pub struct PredictionController {
    service: Arc<dyn PredictionService>,
    inputs: RequirementInputs,
    recommendations: Vec<MaterialRecommendation>,
    selected: Option<usize>,
    status: StatusMachine,
    notice: Option<ErrorNotice>,
    show_all: bool,
    issued_seq: u64,
    request_timeout: Duration,
    reveal_delay: Duration,
    notice_ttl: Duration,
    events: Option<mpsc::UnboundedSender<ViewEvent>>,
}

impl PredictionController {
    pub fn new(service: Arc<dyn PredictionService>, config: &ClientConfig) -> Self {
        Self {
            service,
            inputs: RequirementInputs::default(),
            recommendations: Vec::new(),
            selected: None,
            status: StatusMachine::new(),
            notice: None,
            show_all: false,
            issued_seq: 0,
            request_timeout: config.request_timeout,
            reveal_delay: config.reveal_delay,
            notice_ttl: config.notice_ttl,
            events: None,
        }
    }

    /// Receive [`ViewEvent`]s. Replaces any earlier subscriber.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<ViewEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.events = Some(tx);
        rx
    }

    // ── Inputs ───────────────────────────────────────────────────────────

    pub fn inputs(&self) -> &RequirementInputs {
        &self.inputs
    }

    pub fn set_inputs(&mut self, inputs: RequirementInputs) {
        self.inputs = inputs;
    }

    /// Slider change. Returns the coerced value stored.
    pub fn set_input(&mut self, requirement: Requirement, value: f64) -> u8 {
        self.inputs.set(requirement, value)
    }

    // ── Submit ───────────────────────────────────────────────────────────

    /// Run one prediction round trip against the configured service.
    ///
    /// Always ends in `Success` or `Failed`; a service that never answers is
    /// cut off after the request timeout.
    pub async fn submit(&mut self) -> PredictionStatus {
        let pending = self.begin_submit();
        let outcome =
            match tokio::time::timeout(self.request_timeout, self.service.predict(&pending.request))
                .await
            {
                Ok(result) => result,
                Err(_) => Err(PredictionError::Timeout(self.request_timeout)),
            };
        self.complete(pending.seq, outcome);
        self.status()
    }

    /// Enter `Loading` and number a new submission.
    ///
    /// Split from [`complete`](Self::complete) so callers that drive the
    /// request themselves still get stale-response protection.
    pub fn begin_submit(&mut self) -> PendingRequest {
        self.issued_seq += 1;
        let seq = self.issued_seq;
        let superseded = self.status.current() == PredictionStatus::Loading;

        self.notice = None;
        if let Err(e) = self.status.advance(
            PredictionStatus::Loading,
            seq,
            superseded.then_some("superseded in-flight request"),
        ) {
            warn!(error = %e, "Unexpected status transition on submit");
        }

        let request = PredictRequest::from(&self.inputs);
        info!(
            seq,
            weight_capacity_score = request.weight_capacity_score,
            product_strength_req = request.product_strength_req,
            barrier_score = request.barrier_score,
            reuse_potential_score = request.reuse_potential_score,
            "Submitting prediction request"
        );
        PendingRequest { seq, request }
    }

    /// Apply the outcome of submission `seq`.
    pub fn complete(
        &mut self,
        seq: u64,
        outcome: Result<Vec<MaterialRecommendation>, PredictionError>,
    ) -> Completion {
        if seq != self.issued_seq || self.status.current() != PredictionStatus::Loading {
            debug!(seq, latest = self.issued_seq, "Discarding stale prediction response");
            return Completion::Stale;
        }

        let outcome = match outcome {
            Ok(recs) if recs.is_empty() => Err(PredictionError::EmptyResult),
            other => other,
        };

        let status = match outcome {
            Ok(recs) => {
                info!(
                    seq,
                    count = recs.len(),
                    top = %recs[0].material,
                    "Prediction succeeded"
                );
                self.recommendations = recs;
                self.selected = Some(0);
                self.transition(PredictionStatus::Success, seq, None);
                PredictionStatus::Success
            }
            Err(e) => {
                warn!(seq, kind = e.kind(), error = %e, "Prediction failed");
                self.notice = Some(ErrorNotice {
                    message: e.user_message(),
                    raised_at: Instant::now(),
                });
                self.transition(PredictionStatus::Failed, seq, Some(e.kind()));
                PredictionStatus::Failed
            }
        };

        self.schedule_reveal(seq);
        Completion::Applied(status)
    }

    fn transition(&mut self, to: PredictionStatus, seq: u64, reason: Option<&str>) {
        if let Err(e) = self.status.advance(to, seq, reason) {
            warn!(error = %e, "Unexpected status transition");
        }
    }

    fn schedule_reveal(&self, seq: u64) {
        let Some(tx) = self.events.clone() else {
            return;
        };
        let delay = self.reveal_delay;
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(ViewEvent::RevealResults { seq });
                });
            }
            Err(_) => {
                debug!(seq, "No runtime for delayed reveal; sending immediately");
                let _ = tx.send(ViewEvent::RevealResults { seq });
            }
        }
    }

    // ── Selection ────────────────────────────────────────────────────────

    /// Show the detail panel for the recommendation at `index`.
    pub fn select(&mut self, index: usize) -> Result<&MaterialRecommendation, PredictionError> {
        let len = self.recommendations.len();
        if index >= len {
            return Err(PredictionError::InvalidSelection { index, len });
        }
        self.selected = Some(index);
        debug!(index, material = %self.recommendations[index].material, "Selected material");
        Ok(&self.recommendations[index])
    }

    pub fn selected(&self) -> Option<&MaterialRecommendation> {
        self.selected.and_then(|i| self.recommendations.get(i))
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    // ── Derived values ───────────────────────────────────────────────────

    /// CO₂ figure of the selected material; 0 before the first success.
    pub fn co2(&self) -> f64 {
        self.selected().map_or(0.0, |m| m.predicted_co2)
    }

    /// Cost figure of the selected material; 0 before the first success.
    pub fn cost(&self) -> f64 {
        self.selected().map_or(0.0, |m| m.predicted_cost)
    }

    pub fn co2_rating(&self) -> Rating {
        co2_label(self.co2())
    }

    pub fn cost_rating(&self) -> Rating {
        cost_label(self.cost())
    }

    // ── State accessors ──────────────────────────────────────────────────

    pub fn status(&self) -> PredictionStatus {
        self.status.current()
    }

    pub fn is_loading(&self) -> bool {
        self.status() == PredictionStatus::Loading
    }

    pub fn status_history(&self) -> &[TransitionRecord] {
        self.status.transitions()
    }

    pub fn status_summary(&self) -> String {
        self.status.summary()
    }

    pub fn recommendations(&self) -> &[MaterialRecommendation] {
        &self.recommendations
    }

    pub fn show_all(&self) -> bool {
        self.show_all
    }

    pub fn toggle_show_all(&mut self) -> bool {
        self.show_all = !self.show_all;
        self.show_all
    }

    /// The current error notice, if raised and not yet expired.
    pub fn error_message(&self) -> Option<&str> {
        self.notice
            .as_ref()
            .filter(|n| n.raised_at.elapsed() < self.notice_ttl)
            .map(|n| n.message.as_str())
    }

    /// Drop the notice once its display interval has passed.
    pub fn clear_expired_notice(&mut self) {
        if self.error_message().is_none() {
            self.notice = None;
        }
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::GENERIC_FAILURE_MESSAGE;

    struct NeverCalled;

    #[async_trait::async_trait]
    impl PredictionService for NeverCalled {
        async fn predict(
            &self,
            _request: &PredictRequest,
        ) -> Result<Vec<MaterialRecommendation>, PredictionError> {
            Err(PredictionError::Network("not used in these tests".into()))
        }
    }

    fn controller() -> PredictionController {
        PredictionController::new(Arc::new(NeverCalled), &ClientConfig::default())
    }

    fn rec(material: &str, cost: f64, co2: f64, score: f64) -> MaterialRecommendation {
        MaterialRecommendation {
            material: material.to_string(),
            predicted_cost: cost,
            predicted_co2: co2,
            suitability_score: score,
        }
    }

    #[test]
    fn initial_state_has_no_selection() {
        let c = controller();
        assert_eq!(c.status(), PredictionStatus::Idle);
        assert!(c.selected().is_none());
        assert_eq!(c.co2(), 0.0);
        assert_eq!(c.cost(), 0.0);
        assert!(c.error_message().is_none());
    }

    #[test]
    fn complete_success_selects_first() {
        let mut c = controller();
        let pending = c.begin_submit();
        assert!(c.is_loading());
        let done = c.complete(
            pending.seq,
            Ok(vec![rec("Glass", 4.0, 80.0, 3.0), rec("Paper", 2.0, 30.0, 2.0)]),
        );
        assert_eq!(done, Completion::Applied(PredictionStatus::Success));
        assert_eq!(c.selected().unwrap().material, "Glass");
        assert_eq!(c.co2_rating(), Rating::Poor);
        assert_eq!(c.cost_rating(), Rating::Poor);
    }

    #[test]
    fn stale_completion_is_ignored() {
        let mut c = controller();
        let first = c.begin_submit();
        let second = c.begin_submit();
        assert_eq!(c.complete(first.seq, Ok(vec![rec("Old", 1.0, 1.0, 1.0)])), Completion::Stale);
        assert!(c.recommendations().is_empty());
        assert!(c.is_loading());
        assert_eq!(
            c.complete(second.seq, Ok(vec![rec("New", 1.0, 1.0, 1.0)])),
            Completion::Applied(PredictionStatus::Success)
        );
        assert_eq!(c.selected().unwrap().material, "New");
    }

    #[test]
    fn double_completion_is_stale() {
        let mut c = controller();
        let p = c.begin_submit();
        c.complete(p.seq, Ok(vec![rec("A", 1.0, 1.0, 1.0)]));
        assert_eq!(c.complete(p.seq, Err(PredictionError::EmptyResult)), Completion::Stale);
        assert_eq!(c.status(), PredictionStatus::Success);
    }

    #[test]
    fn failure_raises_generic_notice() {
        let mut c = controller();
        let p = c.begin_submit();
        c.complete(p.seq, Err(PredictionError::Network("refused".into())));
        assert_eq!(c.status(), PredictionStatus::Failed);
        assert_eq!(c.error_message(), Some(GENERIC_FAILURE_MESSAGE));
        c.begin_submit();
        assert!(c.error_message().is_none());
    }

    #[test]
    fn select_out_of_range_keeps_selection() {
        let mut c = controller();
        let p = c.begin_submit();
        c.complete(p.seq, Ok(vec![rec("A", 1.0, 10.0, 1.0), rec("B", 3.0, 60.0, 0.5)]));
        let err = c.select(5).unwrap_err();
        assert!(matches!(err, PredictionError::InvalidSelection { index: 5, len: 2 }));
        assert_eq!(c.selected_index(), Some(0));
        assert_eq!(c.select(1).unwrap().material, "B");
        assert_eq!(c.co2(), 60.0);
        assert_eq!(c.cost(), 3.0);
    }

    #[test]
    fn toggle_show_all_flips() {
        let mut c = controller();
        assert!(!c.show_all());
        assert!(c.toggle_show_all());
        assert!(!c.toggle_show_all());
    }

    #[test]
    fn set_input_coerces() {
        let mut c = controller();
        assert_eq!(c.set_input(Requirement::WeightCapacity, 11.0), 10);
        let p = c.begin_submit();
        assert_eq!(p.request.weight_capacity_score, 10);
        assert_eq!(p.request.barrier_score, 5);
    }
}
