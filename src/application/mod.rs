//! Application layer - Use cases and port interfaces
//!
//! Contains the voice note routing engine and trait definitions
//! for external system interactions.

pub mod ports;
pub mod process;

// Re-export use case types
pub use process::{
    PersistedAction, ProcessError, ProcessInput, ProcessOutput, ProcessVoiceNoteUseCase,
};
