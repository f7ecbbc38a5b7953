//! VoxVault - voice note routing for Markdown vaults
//!
//! This crate transcribes a recorded voice note, interprets the routing
//! instruction embedded in it (new note, append to the daily note, or
//! append to a specific page), and persists the result as Markdown in a
//! GitHub repository or a local vault directory.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Value objects, the naming resolver, and domain errors
//! - **Application**: The routing engine use case and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (OpenAI, GitHub, local vault)
//! - **CLI**: Command-line interface and output formatting

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
