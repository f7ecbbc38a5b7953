//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with the OpenAI API, GitHub, and the local filesystem.

pub mod analysis;
pub mod config;
pub mod store;
pub mod transcription;

// Re-export adapters
pub use analysis::OpenAiAnalyzer;
pub use config::XdgConfigStore;
pub use store::{GitHubStore, VaultStore};
pub use transcription::OpenAiTranscriber;
