//! Request builder
//!
//! Turns the active mode and its drafts into one outbound request. The base
//! address is not known here; the transport joins it with `Endpoint::path`.

use crate::error::ValidationError;
use crate::input::{ActiveDraft, FileDraft, InputDrafts, SubmissionMode};
use serde_json::json;

/// Service endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    FactCheckText,
    FactCheckUrl,
    FactCheckFile,
    GenerateReply,
}

impl Endpoint {
    pub const fn path(&self) -> &'static str {
        match self {
            Endpoint::FactCheckText => "/fact-check-text",
            Endpoint::FactCheckUrl => "/fact-check-url",
            Endpoint::FactCheckFile => "/fact-check-file",
            Endpoint::GenerateReply => "/generate-reply",
        }
    }

    pub const fn for_mode(mode: SubmissionMode) -> Self {
        match mode {
            SubmissionMode::Text => Endpoint::FactCheckText,
            SubmissionMode::Url => Endpoint::FactCheckUrl,
            SubmissionMode::File => Endpoint::FactCheckFile,
        }
    }

    /// Join with a base address, tolerating a trailing slash
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path())
    }
}

/// One file part of a multipart form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub file: FileDraft,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    pub text_fields: Vec<(String, String)>,
    pub file_parts: Vec<FilePart>,
}

impl MultipartForm {
    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.text_fields.push((name.to_string(), value.into()));
        self
    }

    pub fn file(mut self, name: &str, file: FileDraft) -> Self {
        self.file_parts.push(FilePart {
            field: name.to_string(),
            file,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestPayload {
    Json(serde_json::Value),
    Multipart(MultipartForm),
}

/// Fully-formed request, ready for a transport
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub endpoint: Endpoint,
    pub payload: RequestPayload,
}

/// Build the submission request for the active mode.
///
/// Fails with a `ValidationError` when the mode's required input is
/// missing. The claim draft is sent untrimmed.
pub fn build_submission(drafts: &InputDrafts) -> Result<OutboundRequest, ValidationError> {
    let endpoint = Endpoint::for_mode(drafts.mode());

    let payload = match drafts.active() {
        ActiveDraft::Text { claim } => {
            if claim.trim().is_empty() {
                return Err(ValidationError::EmptyClaim);
            }
            RequestPayload::Json(json!({ "claim": claim }))
        }
        ActiveDraft::Url { url, claim } => {
            if url.trim().is_empty() {
                return Err(ValidationError::EmptyUrl);
            }
            RequestPayload::Json(json!({ "url": url.trim(), "claim": claim }))
        }
        ActiveDraft::File { files, claim } => {
            if files.is_empty() {
                return Err(ValidationError::NoFiles);
            }
            let form = files
                .iter()
                .cloned()
                .fold(MultipartForm::default().text("claim", claim), |form, file| {
                    form.file("files", file)
                });
            RequestPayload::Multipart(form)
        }
    };

    Ok(OutboundRequest { endpoint, payload })
}

/// Build the follow-up request asking for rebuttal replies
pub fn build_reply_request(analysis: &serde_json::Value, language: &str) -> OutboundRequest {
    OutboundRequest {
        endpoint: Endpoint::GenerateReply,
        payload: RequestPayload::Json(json!({
            "analysis": analysis,
            "language": language,
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_request_body() {
        let mut drafts = InputDrafts::new();
        drafts.set_claim("Drinking bleach cures illness");

        let request = build_submission(&drafts).unwrap();
        assert_eq!(request.endpoint, Endpoint::FactCheckText);
        match request.payload {
            RequestPayload::Json(body) => {
                assert_eq!(
                    serde_json::to_string(&body).unwrap(),
                    r#"{"claim":"Drinking bleach cures illness"}"#
                );
            }
            other => panic!("expected JSON payload, got {:?}", other),
        }
    }

    #[test]
    fn test_whitespace_claim_rejected() {
        let mut drafts = InputDrafts::new();
        drafts.set_claim("   \n\t");
        assert_eq!(build_submission(&drafts), Err(ValidationError::EmptyClaim));
    }

    #[test]
    fn test_url_request_carries_context() {
        let mut drafts = InputDrafts::new();
        drafts.select_mode(SubmissionMode::Url);
        drafts.set_url("  https://example.com/story  ");
        drafts.set_claim("headline says X");

        let request = build_submission(&drafts).unwrap();
        assert_eq!(request.endpoint, Endpoint::FactCheckUrl);
        assert_eq!(
            request.payload,
            RequestPayload::Json(json!({
                "url": "https://example.com/story",
                "claim": "headline says X",
            }))
        );
    }

    #[test]
    fn test_url_mode_ignores_claim_for_validation() {
        let mut drafts = InputDrafts::new();
        drafts.set_claim("a claim is not a url");
        drafts.select_mode(SubmissionMode::Url);
        assert_eq!(build_submission(&drafts), Err(ValidationError::EmptyUrl));
    }

    #[test]
    fn test_file_request_repeats_files_field() {
        let mut drafts = InputDrafts::new();
        drafts.select_mode(SubmissionMode::File);
        drafts.attach(FileDraft::new("one.png", vec![1]));
        drafts.attach(FileDraft::new("two.pdf", vec![2]));

        let request = build_submission(&drafts).unwrap();
        assert_eq!(request.endpoint, Endpoint::FactCheckFile);
        let RequestPayload::Multipart(form) = request.payload else {
            panic!("expected multipart payload");
        };
        assert_eq!(form.text_fields, vec![("claim".to_string(), String::new())]);
        let names: Vec<_> = form.file_parts.iter().map(|p| p.file.name.as_str()).collect();
        assert_eq!(names, vec!["one.png", "two.pdf"]);
        assert!(form.file_parts.iter().all(|p| p.field == "files"));
    }

    #[test]
    fn test_file_mode_requires_files() {
        let mut drafts = InputDrafts::new();
        drafts.set_claim("context only");
        drafts.select_mode(SubmissionMode::File);
        assert_eq!(build_submission(&drafts), Err(ValidationError::NoFiles));
    }

    #[test]
    fn test_endpoint_url_join() {
        assert_eq!(
            Endpoint::FactCheckText.url("http://localhost:5000/"),
            "http://localhost:5000/fact-check-text"
        );
        assert_eq!(
            Endpoint::GenerateReply.url("https://api.example.org/v1"),
            "https://api.example.org/v1/generate-reply"
        );
    }

    #[test]
    fn test_reply_request_shape() {
        let analysis = json!({ "claim_analysis": { "verdict": "False" } });
        let request = build_reply_request(&analysis, "Hindi");
        assert_eq!(request.endpoint, Endpoint::GenerateReply);
        assert_eq!(
            request.payload,
            RequestPayload::Json(json!({ "analysis": analysis, "language": "Hindi" }))
        );
    }
}
