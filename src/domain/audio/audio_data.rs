//! Audio data value object

use std::fmt;

use crate::domain::error::AudioError;

/// Supported audio MIME types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioMimeType {
    Webm,
    Ogg,
    Mp3,
    Wav,
    Mp4,
    Flac,
}

impl AudioMimeType {
    /// Get the MIME type string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Webm => "audio/webm",
            Self::Ogg => "audio/ogg",
            Self::Mp3 => "audio/mp3",
            Self::Wav => "audio/wav",
            Self::Mp4 => "audio/mp4",
            Self::Flac => "audio/flac",
        }
    }

    /// Get the file extension
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Webm => "webm",
            Self::Ogg => "ogg",
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Mp4 => "mp4",
            Self::Flac => "flac",
        }
    }

    /// Guess the MIME type from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "webm" => Some(Self::Webm),
            "ogg" | "oga" => Some(Self::Ogg),
            "mp3" => Some(Self::Mp3),
            "wav" => Some(Self::Wav),
            "mp4" | "m4a" => Some(Self::Mp4),
            "flac" => Some(Self::Flac),
            _ => None,
        }
    }
}

impl fmt::Display for AudioMimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for AudioMimeType {
    fn default() -> Self {
        Self::Webm
    }
}

/// Value object representing a decoded voice note recording ready for
/// transcription. Contains raw audio bytes and their MIME type.
#[derive(Debug, Clone)]
pub struct AudioData {
    data: Vec<u8>,
    mime_type: AudioMimeType,
}

impl AudioData {
    /// Create AudioData from raw bytes
    pub fn new(data: Vec<u8>, mime_type: AudioMimeType) -> Self {
        Self { data, mime_type }
    }

    /// Decode a base64-encoded recording.
    ///
    /// Tolerates a `data:...;base64,` URL prefix and surrounding
    /// whitespace, as produced by browser recorders.
    pub fn from_base64(encoded: &str, mime_type: AudioMimeType) -> Result<Self, AudioError> {
        use base64::Engine;

        let payload = match encoded.split_once(',') {
            Some((prefix, rest)) if prefix.starts_with("data:") => rest,
            _ => encoded,
        };
        let payload: String = payload.chars().filter(|c| !c.is_whitespace()).collect();

        let data = base64::engine::general_purpose::STANDARD
            .decode(payload.as_bytes())
            .map_err(|e| AudioError::InvalidBase64(e.to_string()))?;

        if data.is_empty() {
            return Err(AudioError::Empty);
        }

        Ok(Self { data, mime_type })
    }

    /// Get the raw audio data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get the MIME type
    pub fn mime_type(&self) -> AudioMimeType {
        self.mime_type
    }

    /// Suggested upload file name, e.g. `voicenote.webm`
    pub fn file_name(&self) -> String {
        format!("voicenote.{}", self.mime_type.extension())
    }

    /// Get the size in bytes
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Get human-readable size
    pub fn human_readable_size(&self) -> String {
        let bytes = self.size_bytes();
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }
}
