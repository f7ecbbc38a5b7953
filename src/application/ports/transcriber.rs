//! Transcription port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::audio::AudioData;

/// Transcription errors
#[derive(Debug, Clone, Error)]
pub enum TranscriptionError {
    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Transcription returned no text")]
    EmptyTranscript,

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    #[error("API error (HTTP {status}): {detail}")]
    Api { status: u16, detail: String },
}

/// Port for audio transcription
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe a voice note recording to plain text.
    ///
    /// # Arguments
    /// * `audio` - The decoded recording
    /// * `language` - ISO language hint passed to the model
    ///
    /// # Returns
    /// The transcript text or an error
    async fn transcribe(&self, audio: &AudioData, language: &str)
        -> Result<String, TranscriptionError>;
}
