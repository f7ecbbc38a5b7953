//! OpenAI structured-extraction analyzer adapter
//!
//! Sends the transcript plus the existing note listing to a chat model
//! with a strict JSON-schema response format, and validates the reply
//! into an `Analysis` record. Schema violations are hard failures.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::application::ports::{AnalysisError, TranscriptAnalyzer};
use crate::domain::note::Analysis;

/// OpenAI analysis model to use
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// OpenAI API base URL
const API_BASE_URL: &str = "https://api.openai.com/v1";

// Request types for the chat completions API

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: String,
    json_schema: JsonSchemaFormat,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat {
    name: String,
    strict: bool,
    schema: serde_json::Value,
}

// Response types for the chat completions API

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

/// OpenAI transcript analyzer
pub struct OpenAiAnalyzer {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiAnalyzer {
    /// Create a new analyzer with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: API_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Create a new analyzer with a custom model
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

    fn api_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Build the request body
    fn build_request(&self, transcript: &str, existing: &[String]) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: instructions(existing),
                },
                Message {
                    role: "user".to_string(),
                    content: transcript.to_string(),
                },
            ],
            response_format: ResponseFormat {
                kind: "json_schema".to_string(),
                json_schema: JsonSchemaFormat {
                    name: "VoiceNoteAnalysis".to_string(),
                    strict: true,
                    schema: analysis_schema(),
                },
            },
        }
    }

    /// Parse and validate the model's reply into an Analysis record
    fn parse_analysis(raw: &str) -> Result<Analysis, AnalysisError> {
        let analysis: Analysis =
            serde_json::from_str(raw).map_err(|e| AnalysisError::Schema(e.to_string()))?;

        if !analysis.has_content() {
            return Err(AnalysisError::Schema(
                "analysis content is empty".to_string(),
            ));
        }

        Ok(analysis)
    }
}

#[async_trait]
impl TranscriptAnalyzer for OpenAiAnalyzer {
    async fn analyze(
        &self,
        transcript: &str,
        existing_identifiers: &[String],
    ) -> Result<Analysis, AnalysisError> {
        let body = self.build_request(transcript, existing_identifiers);

        let response = self
            .client
            .post(self.api_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AnalysisError::RequestFailed(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AnalysisError::InvalidApiKey);
        }

        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AnalysisError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        let response: ChatResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::Schema(e.to_string()))?;

        let message = response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or(AnalysisError::MissingOutput)?;

        if let Some(refusal) = message.refusal {
            return Err(AnalysisError::Schema(refusal));
        }

        let raw = message.content.ok_or(AnalysisError::MissingOutput)?;
        debug!(chars = raw.len(), "analysis reply received");

        Self::parse_analysis(&raw)
    }
}

/// System instructions for the analysis call.
///
/// Includes today's date for the implicit daily target and the full
/// existing-file listing so appends point at real notes.
fn instructions(existing: &[String]) -> String {
    let today = Utc::now().date_naive().format("%Y-%m-%d");
    format!(
        "Analyze this voice note transcript to:\n\
         - Identify if there are any instructions at the beginning of the note \
         (like \"append to daily note\" or \"append to [page name including .md extension if provided]\")\n\
         - Clean up the transcript by removing filler words like \"um\", \"uh\", \"like\", etc.\n\
         - Identify entities mentioned that should be wiki-linked using [[entity name]]. Entities may contain spaces.\n\
         - Generate a descriptive title for the note IF it's intended as a new note (instruction type 'new_note'). \
         Titles may contain spaces. If appending, the title can be empty or reflect the instruction.\n\
         - Ensure the output strictly adheres to the VoiceNoteAnalysis schema.\n\
         - If the instruction is 'append_daily', use today's date ({today}) implicitly; do not include it in target_page.\n\
         - If the instruction is 'append_to_page', the target_page must be the full path to the file \
         (e.g., 'folder/My Existing Note.md') or just the filename if at the root level.\n\
         - For context, here is the list of existing markdown files (with their full paths) that could be \
         linked to or appended to: {}\n",
        existing.join(", ")
    )
}

/// JSON schema for the VoiceNoteAnalysis response format
fn analysis_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "instruction": {
                "type": "object",
                "properties": {
                    "type": {
                        "type": "string",
                        "enum": ["new_note", "append_daily", "append_to_page"]
                    },
                    "target_page": { "type": ["string", "null"] }
                },
                "required": ["type", "target_page"],
                "additionalProperties": false
            },
            "title": { "type": "string" },
            "content": { "type": "string" }
        },
        "required": ["instruction", "title", "content"],
        "additionalProperties": false
    })
}
