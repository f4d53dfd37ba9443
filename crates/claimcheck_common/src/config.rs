//! Claim Check configuration
//!
//! Config file: $CLAIMCHECK_CONFIG or ~/.config/claimcheck/config.toml
//! The API base URL can also come from $CLAIMCHECK_API_URL.

use crate::error::ConfigError;
use crate::replies::DEFAULT_REPLY_LANGUAGE;
use crate::DEFAULT_API_URL;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "CLAIMCHECK_CONFIG";
pub const API_URL_ENV: &str = "CLAIMCHECK_API_URL";

/// Color display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color when stdout is a terminal and NO_COLOR is unset
    Auto,
    Always,
    Never,
}

impl Default for ColorMode {
    fn default() -> Self {
        Self::Auto
    }
}

/// Analysis service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyConfig {
    /// Language replies are drafted in
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    DEFAULT_REPLY_LANGUAGE.to_string()
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub color: ColorMode,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClaimCheckConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub replies: ReplyConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Defaults,
    File(PathBuf),
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Defaults => f.write_str("built-in defaults"),
            ConfigSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl ClaimCheckConfig {
    /// Default user config path: ~/.config/claimcheck/config.toml
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("claimcheck").join("config.toml"))
    }

    /// Load configuration
    ///
    /// Priority:
    /// 1. $CLAIMCHECK_CONFIG (must exist)
    /// 2. User config (~/.config/claimcheck/config.toml)
    /// 3. Defaults
    ///
    /// $CLAIMCHECK_API_URL then overrides the base URL.
    pub fn load() -> Result<(Self, ConfigSource), ConfigError> {
        let (mut config, source) = match std::env::var_os(CONFIG_ENV) {
            Some(path) => {
                let path = PathBuf::from(path);
                (Self::load_from(&path)?, ConfigSource::File(path))
            }
            None => match Self::user_config_path().filter(|p| p.exists()) {
                Some(path) => (Self::load_from(&path)?, ConfigSource::File(path)),
                None => (Self::default(), ConfigSource::Defaults),
            },
        };

        if let Ok(url) = std::env::var(API_URL_ENV) {
            config.override_api_url(&url)?;
        }
        config.validate()?;
        Ok((config, source))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ClaimCheckConfig =
            toml::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the base URL (env or command line). Blank values are ignored.
    pub fn override_api_url(&mut self, url: &str) -> Result<(), ConfigError> {
        let url = url.trim();
        if url.is_empty() {
            return Ok(());
        }
        validate_base_url(url)?;
        self.api.base_url = url.to_string();
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_base_url(&self.api.base_url)
    }
}

fn validate_base_url(raw: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let parsed = url::Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(invalid(format!("unsupported scheme '{}'", other))),
    }
    if parsed.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(invalid("query strings and fragments are not allowed".to_string()));
    }
    Ok(())
}
