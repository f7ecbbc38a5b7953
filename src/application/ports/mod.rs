//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod analyzer;
pub mod config;
pub mod store;
pub mod transcriber;

// Re-export common types
pub use analyzer::{AnalysisError, TranscriptAnalyzer};
pub use config::ConfigStore;
pub use store::{FileStore, StoreError};
pub use transcriber::{Transcriber, TranscriptionError};
