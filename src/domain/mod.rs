//! Domain layer - Core business logic
//!
//! Contains value objects, pure routing/naming logic, and domain errors.
//! This layer has no dependencies on external systems.

pub mod audio;
pub mod config;
pub mod error;
pub mod note;

// Re-export common types
pub use audio::{AudioData, AudioMimeType, ScratchAudio};
pub use config::{AppConfig, BackendKind};
pub use error::*;
pub use note::{Analysis, Instruction, StoredNote, VersionToken};
