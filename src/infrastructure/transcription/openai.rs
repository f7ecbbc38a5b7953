//! OpenAI speech-to-text transcriber adapter

use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;
use tracing::debug;

use crate::application::ports::{Transcriber, TranscriptionError};
use crate::domain::audio::AudioData;

/// OpenAI transcription model to use
const DEFAULT_MODEL: &str = "gpt-4o-transcribe";

/// OpenAI API base URL
const API_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// OpenAI audio transcription adapter
pub struct OpenAiTranscriber {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiTranscriber {
    /// Create a new transcriber with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: API_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Create a new transcriber with a custom model
    pub fn with_model(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::new(api_key)
        }
    }

    /// Override the API base URL (used by tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build the API URL
    fn api_url(&self) -> String {
        format!("{}/audio/transcriptions", self.base_url)
    }

    /// Build the multipart form for an upload
    fn build_form(
        &self,
        audio: &AudioData,
        language: &str,
    ) -> Result<multipart::Form, TranscriptionError> {
        let part = multipart::Part::bytes(audio.data().to_vec())
            .file_name(audio.file_name())
            .mime_str(audio.mime_type().as_str())
            .map_err(|e| TranscriptionError::RequestFailed(e.to_string()))?;

        Ok(multipart::Form::new()
            .part("file", part)
            .text("model", self.model.clone())
            .text("language", language.to_string()))
    }
}

#[async_trait]
impl Transcriber for OpenAiTranscriber {
    async fn transcribe(
        &self,
        audio: &AudioData,
        language: &str,
    ) -> Result<String, TranscriptionError> {
        debug!(size = %audio.human_readable_size(), "uploading audio for transcription");

        let form = self.build_form(audio, language)?;

        let response = self
            .client
            .post(self.api_url())
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionError::RequestFailed(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(TranscriptionError::InvalidApiKey);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TranscriptionError::RateLimited);
        }

        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TranscriptionError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        let response: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::ParseError(e.to_string()))?;

        let trimmed = response.text.trim();
        if trimmed.is_empty() {
            return Err(TranscriptionError::EmptyTranscript);
        }

        Ok(trimmed.to_string())
    }
}
