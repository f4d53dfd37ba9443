//! Submission controller
//!
//! Single-slot lifecycle for claim submissions:
//! Idle -> Submitting -> Succeeded | Failed.
//!
//! A submission is split into `begin` (validate, clear the previous result,
//! hand out a ticket and the request) and `complete` (apply the outcome).
//! Completions carrying a stale ticket are dropped, so a result can only
//! ever be replaced by the submission started after it.

use crate::error::{SubmitError, TransportError};
use crate::input::InputDrafts;
use crate::model::{AnalysisResult, FailureKind};
use crate::normalize;
use crate::request::{self, OutboundRequest};
use crate::transport::{RawResponse, Transport};
use tracing::{debug, info, warn};

/// Generation stamp linking a completion to the attempt that started it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub(crate) fn from_generation(generation: u64) -> Self {
        Ticket(generation)
    }

    pub fn generation(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Submitting { ticket: Ticket },
    Succeeded,
    Failed,
}

/// A submission that has been started but not completed
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    pub ticket: Ticket,
    pub request: OutboundRequest,
}

#[derive(Debug)]
pub struct SubmissionController {
    state: SubmissionState,
    generation: u64,
    result: Option<AnalysisResult>,
}

impl Default for SubmissionController {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionController {
    pub fn new() -> Self {
        Self {
            state: SubmissionState::Idle,
            generation: 0,
            result: None,
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, SubmissionState::Submitting { .. })
    }

    /// The result currently on display, if any
    pub fn current(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    /// Start a submission from the drafts.
    ///
    /// Rejected with `Busy` while another submission is in flight and with
    /// `Invalid` when the active mode lacks its required input; neither
    /// touches the current state. On success the previous result is gone
    /// before the request is returned.
    pub fn begin(&mut self, drafts: &InputDrafts) -> Result<PendingSubmission, SubmitError> {
        if self.is_submitting() {
            warn!("submission rejected: another one is in flight");
            return Err(SubmitError::Busy);
        }

        let request = request::build_submission(drafts)?;

        self.generation += 1;
        let ticket = Ticket(self.generation);
        self.result = None;
        self.state = SubmissionState::Submitting { ticket };

        debug!(
            generation = ticket.0,
            mode = %drafts.mode(),
            endpoint = request.endpoint.path(),
            "submission started"
        );
        Ok(PendingSubmission { ticket, request })
    }

    /// Apply the outcome of the exchange started by `begin`.
    ///
    /// Returns the new current result, or `None` if the ticket is stale.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        outcome: Result<RawResponse, TransportError>,
    ) -> Option<&AnalysisResult> {
        if self.state != (SubmissionState::Submitting { ticket }) {
            debug!(generation = ticket.0, "discarding stale submission outcome");
            return None;
        }

        let result = resolve_outcome(outcome);
        self.state = if result.is_error() {
            SubmissionState::Failed
        } else {
            SubmissionState::Succeeded
        };
        info!(
            generation = ticket.0,
            verdict = ?result.verdict(),
            failed = result.is_error(),
            "submission finished"
        );

        self.result = Some(result);
        self.result.as_ref()
    }

    /// Forget the current result and invalidate anything in flight
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = SubmissionState::Idle;
        self.result = None;
    }

    /// Run one submission to completion over `transport`
    pub async fn submit<T: Transport + ?Sized>(
        &mut self,
        transport: &T,
        drafts: &InputDrafts,
    ) -> Result<&AnalysisResult, SubmitError> {
        let pending = self.begin(drafts)?;
        let outcome = transport.send(&pending.request).await;
        self.complete(pending.ticket, outcome)
            .ok_or(SubmitError::Superseded)
    }
}

/// Map a transport outcome to a terminal result. Always yields a result.
pub fn resolve_outcome(outcome: Result<RawResponse, TransportError>) -> AnalysisResult {
    match outcome {
        Ok(response) if response.is_success() => normalize::normalize_body(&response.body),
        Ok(response) => {
            warn!(status = response.status, "analysis service returned an error status");
            AnalysisResult::error(
                FailureKind::Server,
                normalize::failure_message(response.status, &response.body),
            )
        }
        Err(e) => {
            warn!(error = %e, "analysis request failed");
            let message = match e {
                TransportError::Timeout => {
                    "The analysis service took too long to respond. Please try again."
                }
                _ => "Could not reach the analysis service. Check your connection and try again.",
            };
            AnalysisResult::error(FailureKind::Transport, message)
        }
    }
}
