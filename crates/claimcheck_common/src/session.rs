//! Session - drafts plus both controllers
//!
//! Owns the cross-controller rules: starting a submission clears reply
//! drafts along with the previous result, a successful submission clears
//! the input drafts, and replies are only requested against the result
//! currently on display.

use crate::error::{ReplyError, SubmitError, TransportError};
use crate::input::InputDrafts;
use crate::model::AnalysisResult;
use crate::replies::{PendingReplies, ReplyGenerator, ReplyState, DEFAULT_REPLY_LANGUAGE};
use crate::submission::{PendingSubmission, SubmissionController, SubmissionState, Ticket};
use crate::transport::{RawResponse, Transport};

pub struct Session<T: Transport> {
    transport: T,
    drafts: InputDrafts,
    submission: SubmissionController,
    replies: ReplyGenerator,
    reply_language: String,
}

impl<T: Transport> Session<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            drafts: InputDrafts::new(),
            submission: SubmissionController::new(),
            replies: ReplyGenerator::new(),
            reply_language: DEFAULT_REPLY_LANGUAGE.to_string(),
        }
    }

    /// Transport for callers driving `begin_*` / `complete_*` themselves
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Language used when `generate_replies` is not given one
    pub fn with_reply_language(mut self, language: impl Into<String>) -> Self {
        self.reply_language = language.into();
        self
    }

    pub fn reply_language(&self) -> &str {
        &self.reply_language
    }

    pub fn drafts(&self) -> &InputDrafts {
        &self.drafts
    }

    pub fn drafts_mut(&mut self) -> &mut InputDrafts {
        &mut self.drafts
    }

    pub fn submission_state(&self) -> SubmissionState {
        self.submission.state()
    }

    pub fn reply_state(&self) -> &ReplyState {
        self.replies.state()
    }

    pub fn current_result(&self) -> Option<&AnalysisResult> {
        self.submission.current()
    }

    pub fn reply_drafts(&self) -> &[String] {
        self.replies.drafts()
    }

    /// Whether the reply action is actionable right now
    pub fn can_generate_replies(&self) -> bool {
        !self.replies.is_generating()
            && self
                .current_result()
                .map(AnalysisResult::allows_replies)
                .unwrap_or(false)
    }

    pub fn begin_submission(&mut self) -> Result<PendingSubmission, SubmitError> {
        let pending = self.submission.begin(&self.drafts)?;
        self.replies.reset();
        Ok(pending)
    }

    pub fn complete_submission(
        &mut self,
        ticket: Ticket,
        outcome: Result<RawResponse, TransportError>,
    ) -> Option<&AnalysisResult> {
        let succeeded = !self.submission.complete(ticket, outcome)?.is_error();
        if succeeded {
            self.drafts.clear();
        }
        self.submission.current()
    }

    /// Submit the active drafts and wait for the terminal result
    pub async fn submit(&mut self) -> Result<&AnalysisResult, SubmitError> {
        let pending = self.begin_submission()?;
        let outcome = self.transport.send(&pending.request).await;
        self.complete_submission(pending.ticket, outcome)
            .ok_or(SubmitError::Superseded)
    }

    pub fn begin_replies(&mut self, language: Option<&str>) -> Result<PendingReplies, ReplyError> {
        let language = language.unwrap_or(self.reply_language.as_str());
        self.replies.begin(self.submission.current(), language)
    }

    pub fn complete_replies(
        &mut self,
        ticket: Ticket,
        outcome: Result<RawResponse, TransportError>,
    ) -> bool {
        self.replies.complete(ticket, outcome)
    }

    /// Draft rebuttal replies for the current result
    pub async fn generate_replies(
        &mut self,
        language: Option<&str>,
    ) -> Result<&[String], ReplyError> {
        let pending = self.begin_replies(language)?;
        let outcome = self.transport.send(&pending.request).await;
        if !self.complete_replies(pending.ticket, outcome) {
            return Err(ReplyError::Superseded);
        }
        self.replies.outcome()
    }

    /// Drop the result, replies and drafts; invalidate in-flight work
    pub fn reset(&mut self) {
        self.submission.reset();
        self.replies.reset();
        self.drafts.clear();
    }
}
