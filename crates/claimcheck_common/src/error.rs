//! Error types for Claim Check.

use crate::model::Verdict;
use std::path::PathBuf;
use thiserror::Error;

/// Missing input for the active submission mode.
///
/// These never reach the network; callers show them as guidance.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Enter a claim to check.")]
    EmptyClaim,

    #[error("Enter a URL to check.")]
    EmptyUrl,

    #[error("Attach at least one file to check.")]
    NoFiles,
}

/// Failure to complete an HTTP exchange with the analysis service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Request timed out")]
    Timeout,

    #[error("Service unreachable: {0}")]
    Unreachable(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Failed to read response body: {0}")]
    Body(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("A claim is already being checked. Wait for it to finish.")]
    Busy,

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Submission was superseded before it completed")]
    Superseded,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplyError {
    #[error("Check a claim before generating replies.")]
    NoAnalysis,

    #[error("Replies are only drafted for false or misleading claims (verdict: {verdict}).")]
    NotEligible { verdict: Verdict },

    #[error("Replies are already being generated.")]
    Busy,

    #[error("Could not generate replies: {0}")]
    Failed(String),

    #[error("Reply generation was superseded before it completed")]
    Superseded,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
