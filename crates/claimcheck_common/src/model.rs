//! Display model for analysis results
//!
//! `AnalysisResult` is what the presentation layer consumes. Every section
//! of a report is explicitly optional or possibly empty; renderers check
//! presence, never the raw payload.

use serde::Serialize;
use std::fmt;

/// Shown in place of a missing score. A score of 0 is a real score.
pub const SCORE_PLACEHOLDER: &str = "N/A";

/// Shown when the service gives no explanation
pub const EXPLANATION_PLACEHOLDER: &str = "No explanation was provided.";

/// Classified truthfulness label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    True,
    False,
    Misleading,
    Unknown,
}

impl Verdict {
    /// Classify a free-form verdict label.
    ///
    /// Case-insensitive substring match in fixed priority: "true", then
    /// "false", then "misleading" or "partial". So "Partially True" is
    /// `True` and "False and misleading" is `False`.
    pub fn classify(label: &str) -> Self {
        let lower = label.to_lowercase();
        if lower.contains("true") {
            Verdict::True
        } else if lower.contains("false") {
            Verdict::False
        } else if lower.contains("misleading") || lower.contains("partial") {
            Verdict::Misleading
        } else {
            Verdict::Unknown
        }
    }

    /// Whether rebuttal replies can be drafted for this verdict
    pub fn allows_replies(&self) -> bool {
        matches!(self, Verdict::False | Verdict::Misleading)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::True => "true",
            Verdict::False => "false",
            Verdict::Misleading => "misleading",
            Verdict::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Government or agency contact details. Either half may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OfficialResource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helpline: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalSource {
    pub name: String,
    pub url: String,
}

/// A successfully normalized analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// Verdict label exactly as the service wrote it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict_label: Option<String>,
    pub verdict: Verdict,
    /// 0-100
    pub score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    pub supporting_points: Vec<String>,
    pub refuting_points: Vec<String>,
    pub possible_consequences: Vec<String>,
    pub guidance_tips: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub official_resource: Option<OfficialResource>,
    pub external_sources: Vec<ExternalSource>,
    /// Payload as received; forwarded when drafting replies
    #[serde(skip)]
    pub raw: serde_json::Value,
}

impl Default for Verdict {
    fn default() -> Self {
        Verdict::Unknown
    }
}

impl AnalysisReport {
    pub fn score_display(&self) -> String {
        match self.score {
            Some(score) => score.to_string(),
            None => SCORE_PLACEHOLDER.to_string(),
        }
    }

    pub fn explanation_or_placeholder(&self) -> &str {
        self.explanation.as_deref().unwrap_or(EXPLANATION_PLACEHOLDER)
    }

    /// Label to show for the verdict, falling back to the classification
    pub fn verdict_display(&self) -> &str {
        match &self.verdict_label {
            Some(label) => label,
            None => match self.verdict {
                Verdict::True => "True",
                Verdict::False => "False",
                Verdict::Misleading => "Misleading",
                Verdict::Unknown => "Unverified",
            },
        }
    }

    pub fn has_guidance(&self) -> bool {
        !self.guidance_tips.is_empty() || self.official_resource.is_some()
    }

    /// True when no section carries any content
    pub fn is_empty(&self) -> bool {
        self.verdict_label.is_none()
            && self.score.is_none()
            && self.explanation.is_none()
            && self.supporting_points.is_empty()
            && self.refuting_points.is_empty()
            && self.possible_consequences.is_empty()
            && !self.has_guidance()
            && self.external_sources.is_empty()
    }
}

/// Why a submission ended without a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Network unreachable, timeout, unreadable body
    Transport,
    /// Service reported an error, with or without a readable message
    Server,
    /// 2xx response that was not JSON
    Malformed,
}

/// Terminal outcome of a submission
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisResult {
    Report(AnalysisReport),
    Error {
        failure: FailureKind,
        message: String,
    },
}

impl AnalysisResult {
    pub fn error(failure: FailureKind, message: impl Into<String>) -> Self {
        AnalysisResult::Error {
            failure,
            message: message.into(),
        }
    }

    pub fn report(&self) -> Option<&AnalysisReport> {
        match self {
            AnalysisResult::Report(report) => Some(report),
            AnalysisResult::Error { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            AnalysisResult::Report(_) => None,
            AnalysisResult::Error { message, .. } => Some(message),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, AnalysisResult::Error { .. })
    }

    pub fn verdict(&self) -> Option<Verdict> {
        self.report().map(|r| r.verdict)
    }

    /// Whether the follow-up reply action should be offered
    pub fn allows_replies(&self) -> bool {
        self.verdict().map(|v| v.allows_replies()).unwrap_or(false)
    }
}
