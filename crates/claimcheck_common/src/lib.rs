//! Claim Check common library
//!
//! Core of the claim submission pipeline: input drafts, request building,
//! the HTTP transport, the submission and reply controllers, and the
//! normalizer that turns the service's loosely-typed payload into a
//! display model.

pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod normalize;
pub mod replies;
pub mod request;
pub mod session;
pub mod submission;
pub mod transport;

pub use config::{ClaimCheckConfig, ColorMode, ConfigSource};
pub use error::{ConfigError, ReplyError, SubmitError, TransportError, ValidationError};
pub use input::{ActiveDraft, FileDraft, InputDrafts, SubmissionMode};
pub use model::{
    AnalysisReport, AnalysisResult, ExternalSource, FailureKind, OfficialResource, Verdict,
};
pub use replies::{ReplyGenerator, ReplyState, DEFAULT_REPLY_LANGUAGE};
pub use request::{Endpoint, OutboundRequest, RequestPayload};
pub use session::Session;
pub use submission::{SubmissionController, SubmissionState, Ticket};
pub use transport::{HttpTransport, RawResponse, Transport};

/// Local development address of the analysis service
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Version reported in the User-Agent header
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
