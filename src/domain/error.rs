//! Domain error types

use thiserror::Error;

/// Error when decoding or materializing a voice note recording
#[derive(Debug, Clone, Error)]
pub enum AudioError {
    #[error("Failed to decode base64 audio: {0}")]
    InvalidBase64(String),

    #[error("Decoded audio is empty")]
    Empty,
}

/// Error when an invalid backend name is provided
#[derive(Debug, Clone, Error)]
#[error("Invalid backend: \"{input}\". Valid backends are: github, vault")]
pub struct InvalidBackendError {
    pub input: String,
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
