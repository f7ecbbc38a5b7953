//! Transcript analysis port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::note::Analysis;

/// Analysis errors.
///
/// A response that fails schema validation is a hard failure; the port
/// never substitutes a default analysis record.
#[derive(Debug, Clone, Error)]
pub enum AnalysisError {
    #[error("Analysis response did not match the expected schema: {0}")]
    Schema(String),

    #[error("Model returned no parseable output")]
    MissingOutput,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("API error (HTTP {status}): {detail}")]
    Api { status: u16, detail: String },
}

/// Port for structured transcript analysis
#[async_trait]
pub trait TranscriptAnalyzer: Send + Sync {
    /// Extract the routing instruction, title, and cleaned content from
    /// a transcript.
    ///
    /// The full list of existing identifiers is passed through so the
    /// model can point `target_page` at a real note instead of inventing
    /// one.
    async fn analyze(
        &self,
        transcript: &str,
        existing_identifiers: &[String],
    ) -> Result<Analysis, AnalysisError>;
}
