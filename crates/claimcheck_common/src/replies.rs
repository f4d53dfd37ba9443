//! Follow-up reply generator
//!
//! Drafts short, shareable rebuttals for a claim already judged false or
//! misleading. Runs its own single-slot lifecycle, independent from the
//! submission controller: Idle -> Generating -> Done | Failed. A failure
//! leaves the previous drafts in place and can simply be retried.

use crate::error::{ReplyError, TransportError};
use crate::model::AnalysisResult;
use crate::normalize;
use crate::request::{self, OutboundRequest};
use crate::submission::Ticket;
use crate::transport::{RawResponse, Transport};
use serde_json::Value;
use tracing::{debug, info, warn};

pub const DEFAULT_REPLY_LANGUAGE: &str = "English";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyState {
    Idle,
    Generating { ticket: Ticket },
    Done,
    Failed { message: String },
}

#[derive(Debug, Clone)]
pub struct PendingReplies {
    pub ticket: Ticket,
    pub request: OutboundRequest,
}

#[derive(Debug)]
pub struct ReplyGenerator {
    state: ReplyState,
    generation: u64,
    drafts: Vec<String>,
}

impl Default for ReplyGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplyGenerator {
    pub fn new() -> Self {
        Self {
            state: ReplyState::Idle,
            generation: 0,
            drafts: Vec::new(),
        }
    }

    pub fn state(&self) -> &ReplyState {
        &self.state
    }

    pub fn is_generating(&self) -> bool {
        matches!(self.state, ReplyState::Generating { .. })
    }

    pub fn drafts(&self) -> &[String] {
        &self.drafts
    }

    pub fn last_error(&self) -> Option<&str> {
        match &self.state {
            ReplyState::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// Start drafting replies for `current`.
    ///
    /// Only a report with a false or misleading verdict qualifies.
    pub fn begin(
        &mut self,
        current: Option<&AnalysisResult>,
        language: &str,
    ) -> Result<PendingReplies, ReplyError> {
        if self.is_generating() {
            return Err(ReplyError::Busy);
        }

        let report = current
            .and_then(AnalysisResult::report)
            .ok_or(ReplyError::NoAnalysis)?;
        if !report.verdict.allows_replies() {
            return Err(ReplyError::NotEligible {
                verdict: report.verdict,
            });
        }

        let language = match language.trim() {
            "" => DEFAULT_REPLY_LANGUAGE,
            other => other,
        };

        self.generation += 1;
        let ticket = Ticket::from_generation(self.generation);
        self.state = ReplyState::Generating { ticket };
        debug!(generation = self.generation, language, "reply generation started");

        Ok(PendingReplies {
            ticket,
            request: request::build_reply_request(&report.raw, language),
        })
    }

    /// Apply the outcome of the exchange started by `begin`.
    ///
    /// Returns false when the ticket is stale and nothing changed.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        outcome: Result<RawResponse, TransportError>,
    ) -> bool {
        if self.state != (ReplyState::Generating { ticket }) {
            debug!(generation = ticket.generation(), "discarding stale reply outcome");
            return false;
        }

        match parse_reply_outcome(outcome) {
            Ok(replies) => {
                info!(count = replies.len(), "replies generated");
                self.drafts = replies;
                self.state = ReplyState::Done;
            }
            Err(message) => {
                warn!(%message, "reply generation failed");
                self.state = ReplyState::Failed { message };
            }
        }
        true
    }

    /// Drop drafts and invalidate anything in flight
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = ReplyState::Idle;
        self.drafts.clear();
    }

    /// Outcome of the last completion as a `Result`
    pub fn outcome(&self) -> Result<&[String], ReplyError> {
        match &self.state {
            ReplyState::Done => Ok(&self.drafts),
            ReplyState::Failed { message } => Err(ReplyError::Failed(message.clone())),
            _ => Err(ReplyError::Superseded),
        }
    }

    /// Run one generation to completion over `transport`
    pub async fn generate<T: Transport + ?Sized>(
        &mut self,
        transport: &T,
        current: Option<&AnalysisResult>,
        language: &str,
    ) -> Result<&[String], ReplyError> {
        let pending = self.begin(current, language)?;
        let outcome = transport.send(&pending.request).await;
        if !self.complete(pending.ticket, outcome) {
            return Err(ReplyError::Superseded);
        }
        self.outcome()
    }
}

/// Extract reply strings, or a displayable failure message
pub fn parse_reply_outcome(
    outcome: Result<RawResponse, TransportError>,
) -> Result<Vec<String>, String> {
    let response = outcome.map_err(|e| match e {
        TransportError::Timeout => "the service took too long to respond".to_string(),
        _ => "could not reach the analysis service".to_string(),
    })?;

    if !response.is_success() {
        return Err(normalize::failure_message(response.status, &response.body));
    }

    let value: Value = serde_json::from_str(&response.body)
        .map_err(|_| "the service returned an unreadable response".to_string())?;
    if let Some(message) = normalize::error_field(&value) {
        return Err(message);
    }

    let replies: Vec<String> = value
        .get("replies")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    if replies.is_empty() {
        return Err("the service returned no replies".to_string());
    }
    Ok(replies)
}
