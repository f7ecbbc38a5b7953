//! Application configuration value object

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::InvalidBackendError;

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// GitHub-hosted repository via the contents API
    #[default]
    GitHub,
    /// Local vault directory
    Vault,
}

impl BackendKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::GitHub => "github",
            Self::Vault => "vault",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = InvalidBackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "github" => Ok(Self::GitHub),
            "vault" => Ok(Self::Vault),
            _ => Err(InvalidBackendError {
                input: s.to_string(),
            }),
        }
    }
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub openai_api_key: Option<String>,
    pub backend: Option<String>,
    pub github_token: Option<String>,
    pub github_repo: Option<String>,
    pub vault_root: Option<String>,
    pub language: Option<String>,
    pub transcription_model: Option<String>,
    pub analysis_model: Option<String>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            openai_api_key: None,
            backend: Some("github".to_string()),
            github_token: None,
            github_repo: None,
            vault_root: None,
            language: Some("en".to_string()),
            transcription_model: Some("gpt-4o-transcribe".to_string()),
            analysis_model: Some("gpt-4o-mini".to_string()),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            openai_api_key: other.openai_api_key.or(self.openai_api_key),
            backend: other.backend.or(self.backend),
            github_token: other.github_token.or(self.github_token),
            github_repo: other.github_repo.or(self.github_repo),
            vault_root: other.vault_root.or(self.vault_root),
            language: other.language.or(self.language),
            transcription_model: other.transcription_model.or(self.transcription_model),
            analysis_model: other.analysis_model.or(self.analysis_model),
        }
    }

    /// Get backend as parsed BackendKind, or default if not set/invalid
    pub fn backend_or_default(&self) -> BackendKind {
        self.backend
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get language hint, or "en" if not set
    pub fn language_or_default(&self) -> &str {
        self.language.as_deref().unwrap_or("en")
    }

    /// Get transcription model, or the default if not set
    pub fn transcription_model_or_default(&self) -> &str {
        self.transcription_model
            .as_deref()
            .unwrap_or("gpt-4o-transcribe")
    }

    /// Get analysis model, or the default if not set
    pub fn analysis_model_or_default(&self) -> &str {
        self.analysis_model.as_deref().unwrap_or("gpt-4o-mini")
    }
}
