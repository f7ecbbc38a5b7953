//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// VoxVault - route voice notes into your Markdown vault
#[derive(Parser, Debug)]
#[command(name = "voxvault")]
#[command(version)]
#[command(about = "Transcribe a voice note, extract its routing instruction, and file it as Markdown")]
#[command(long_about = None)]
pub struct Cli {
    /// Audio file to process, or '-' to read base64 audio from stdin
    #[arg(value_name = "AUDIO")]
    pub audio: Option<PathBuf>,

    /// Storage backend (github or vault)
    #[arg(short, long, value_name = "BACKEND")]
    pub backend: Option<String>,

    /// GitHub repository in owner/repo form
    #[arg(long, value_name = "OWNER/REPO", env = "VOXVAULT_GITHUB_REPO")]
    pub github_repo: Option<String>,

    /// Vault root directory
    #[arg(long, value_name = "DIR", env = "VOXVAULT_VAULT_ROOT")]
    pub vault_root: Option<String>,

    /// Transcription language hint (ISO code)
    #[arg(short, long, value_name = "LANG")]
    pub language: Option<String>,

    /// Config subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "openai_api_key",
    "backend",
    "github_token",
    "github_repo",
    "vault_root",
    "language",
    "transcription_model",
    "analysis_model",
];

/// Check whether a config key is recognized
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn recognizes_config_keys() {
        assert!(is_valid_config_key("backend"));
        assert!(is_valid_config_key("vault_root"));
        assert!(!is_valid_config_key("keystroke"));
    }
}
