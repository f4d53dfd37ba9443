//! Input drafts for the three submission modes
//!
//! Exactly one mode is active at a time. Drafts for the inactive modes are
//! kept so switching back and forth never loses what the user typed; they
//! go away only on an explicit clear or after a successful submission.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

/// Extensions the analysis service accepts for uploads
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "pdf"];

/// Input channel for a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionMode {
    #[default]
    Text,
    Url,
    File,
}

impl SubmissionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionMode::Text => "text",
            SubmissionMode::Url => "url",
            SubmissionMode::File => "file",
        }
    }
}

impl fmt::Display for SubmissionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "claim" => Ok(SubmissionMode::Text),
            "url" | "link" => Ok(SubmissionMode::Url),
            "file" | "files" => Ok(SubmissionMode::File),
            other => Err(format!(
                "Invalid mode: '{}'. Valid values: text, url, file",
                other
            )),
        }
    }
}

/// A file staged for upload
#[derive(Clone, PartialEq, Eq)]
pub struct FileDraft {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl FileDraft {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime = mime_for_name(&name);
        Self { name, mime, bytes }
    }

    /// Read a file from disk, naming it after the final path component
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let draft = Self::new(name, bytes);
        if !draft.is_supported() {
            warn!(
                file = %draft.name,
                "extension not in {:?}; the service may reject it",
                SUPPORTED_EXTENSIONS
            );
        }
        Ok(draft)
    }

    pub fn is_supported(&self) -> bool {
        extension(&self.name)
            .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false)
    }
}

// Bytes are elided so drafts can be logged
impl fmt::Debug for FileDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileDraft")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

fn extension(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

/// MIME type for an upload, by file extension
pub fn mime_for_name(name: &str) -> String {
    mime_guess::from_path(name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// The active mode together with the drafts it needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveDraft<'a> {
    Text { claim: &'a str },
    Url { url: &'a str, claim: &'a str },
    File { files: &'a [FileDraft], claim: &'a str },
}

/// Mode selector plus per-mode drafts
#[derive(Debug, Clone, Default)]
pub struct InputDrafts {
    mode: SubmissionMode,
    claim: String,
    url: String,
    files: Vec<FileDraft>,
}

impl InputDrafts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> SubmissionMode {
        self.mode
    }

    /// Switch the active mode. Other drafts are left alone.
    pub fn select_mode(&mut self, mode: SubmissionMode) {
        self.mode = mode;
    }

    pub fn claim(&self) -> &str {
        &self.claim
    }

    pub fn set_claim(&mut self, claim: impl Into<String>) {
        self.claim = claim.into();
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    pub fn files(&self) -> &[FileDraft] {
        &self.files
    }

    pub fn attach(&mut self, file: FileDraft) {
        self.files.push(file);
    }

    pub fn remove_file(&mut self, index: usize) -> Option<FileDraft> {
        if index < self.files.len() {
            Some(self.files.remove(index))
        } else {
            None
        }
    }

    /// Drop every draft. The active mode is kept.
    pub fn clear(&mut self) {
        self.claim.clear();
        self.url.clear();
        self.files.clear();
    }

    pub fn active(&self) -> ActiveDraft<'_> {
        match self.mode {
            SubmissionMode::Text => ActiveDraft::Text { claim: &self.claim },
            SubmissionMode::Url => ActiveDraft::Url {
                url: &self.url,
                claim: &self.claim,
            },
            SubmissionMode::File => ActiveDraft::File {
                files: &self.files,
                claim: &self.claim,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_switch_keeps_drafts() {
        let mut drafts = InputDrafts::new();
        drafts.set_claim("Vaccines contain microchips");
        drafts.select_mode(SubmissionMode::Url);
        drafts.set_url("https://example.com/post");
        drafts.select_mode(SubmissionMode::File);
        drafts.attach(FileDraft::new("shot.png", vec![1, 2, 3]));

        drafts.select_mode(SubmissionMode::Text);
        assert_eq!(drafts.claim(), "Vaccines contain microchips");
        assert_eq!(drafts.url(), "https://example.com/post");
        assert_eq!(drafts.files().len(), 1);
    }

    #[test]
    fn test_clear_keeps_mode() {
        let mut drafts = InputDrafts::new();
        drafts.select_mode(SubmissionMode::Url);
        drafts.set_url("https://example.com");
        drafts.set_claim("context");
        drafts.clear();

        assert_eq!(drafts.mode(), SubmissionMode::Url);
        assert!(drafts.url().is_empty());
        assert!(drafts.claim().is_empty());
    }

    #[test]
    fn test_active_draft_follows_mode() {
        let mut drafts = InputDrafts::new();
        drafts.set_claim("c");
        drafts.set_url("u");
        assert_eq!(drafts.active(), ActiveDraft::Text { claim: "c" });

        drafts.select_mode(SubmissionMode::Url);
        assert_eq!(drafts.active(), ActiveDraft::Url { url: "u", claim: "c" });
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("TEXT".parse::<SubmissionMode>(), Ok(SubmissionMode::Text));
        assert_eq!("url".parse::<SubmissionMode>(), Ok(SubmissionMode::Url));
        assert_eq!(" files ".parse::<SubmissionMode>(), Ok(SubmissionMode::File));
        assert!("video".parse::<SubmissionMode>().is_err());
    }

    #[test]
    fn test_mime_inference() {
        assert_eq!(mime_for_name("scan.PDF"), "application/pdf");
        assert_eq!(mime_for_name("photo.jpeg"), "image/jpeg");
        assert_eq!(mime_for_name("photo.jpg"), "image/jpeg");
        assert_eq!(mime_for_name("shot.png"), "image/png");
        assert_eq!(mime_for_name("notes.txt"), "text/plain");
        assert_eq!(mime_for_name("README"), "application/octet-stream");
    }

    #[test]
    fn test_supported_extensions() {
        assert!(FileDraft::new("a.png", vec![]).is_supported());
        assert!(!FileDraft::new("a.gif", vec![]).is_supported());
    }

    #[test]
    fn test_remove_file_out_of_range() {
        let mut drafts = InputDrafts::new();
        drafts.attach(FileDraft::new("a.png", vec![0]));
        assert!(drafts.remove_file(3).is_none());
        assert_eq!(drafts.remove_file(0).map(|f| f.name), Some("a.png".to_string()));
        assert!(drafts.files().is_empty());
    }

    #[test]
    fn test_from_path_reads_bytes_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("evidence.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let draft = FileDraft::from_path(&path).unwrap();
        assert_eq!(draft.name, "evidence.pdf");
        assert_eq!(draft.mime, "application/pdf");
        assert_eq!(draft.bytes, b"%PDF-1.4".to_vec());
    }
}
