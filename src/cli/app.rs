//! Main app runner for processing a voice note

use std::env;
use std::path::Path;
use std::process::ExitCode;

use crate::application::{ProcessInput, ProcessVoiceNoteUseCase};
use crate::application::ports::{ConfigStore, FileStore, Transcriber, TranscriptAnalyzer};
use crate::domain::audio::{AudioData, AudioMimeType, ScratchAudio};
use crate::domain::config::{AppConfig, BackendKind};
use crate::infrastructure::{
    GitHubStore, OpenAiAnalyzer, OpenAiTranscriber, VaultStore, XdgConfigStore,
};

use super::args::Cli;
use super::presenter::Presenter;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Run the voice note pipeline for the parsed CLI arguments
pub async fn run_process(cli: Cli) -> ExitCode {
    let mut presenter = Presenter::new();

    let Some(audio_arg) = cli.audio else {
        presenter.error("No audio input given. Pass a file path or '-' for stdin.");
        return ExitCode::from(EXIT_USAGE_ERROR);
    };

    // Build CLI config from args
    let cli_config = AppConfig {
        backend: cli.backend,
        github_repo: cli.github_repo,
        vault_root: cli.vault_root,
        language: cli.language,
        ..Default::default()
    };
    let config = load_merged_config(cli_config).await;

    let api_key = match config.openai_api_key.clone() {
        Some(key) if !key.is_empty() => key,
        _ => {
            presenter.error(
                "Missing API key. Set OPENAI_API_KEY or run 'voxvault config set openai_api_key <key>'",
            );
            return ExitCode::from(EXIT_ERROR);
        }
    };

    // Materialize the recording
    let input = match load_audio_input(&audio_arg, config.language_or_default()).await {
        Ok(input) => input,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    // Create adapters
    let transcriber =
        OpenAiTranscriber::with_model(&api_key, config.transcription_model_or_default());
    let analyzer = OpenAiAnalyzer::with_model(&api_key, config.analysis_model_or_default());

    presenter.start_spinner("Processing voice note...");

    let result = match config.backend_or_default() {
        BackendKind::GitHub => {
            let Some(repo) = config.github_repo.clone() else {
                presenter.spinner_fail("GitHub backend selected but github_repo is not configured");
                return ExitCode::from(EXIT_USAGE_ERROR);
            };
            let Some(token) = config.github_token.clone() else {
                presenter
                    .spinner_fail("GitHub backend selected but no token found (set GITHUB_TOKEN)");
                return ExitCode::from(EXIT_USAGE_ERROR);
            };
            run_pipeline(transcriber, analyzer, GitHubStore::new(repo, token), input).await
        }
        BackendKind::Vault => {
            let Some(root) = config.vault_root.clone() else {
                presenter.spinner_fail("Vault backend selected but vault_root is not configured");
                return ExitCode::from(EXIT_USAGE_ERROR);
            };
            run_pipeline(transcriber, analyzer, VaultStore::new(root), input).await
        }
    };

    match result {
        Ok(identifier) => {
            presenter.spinner_success(&format!("Saved to {}", identifier));
            presenter.output(&identifier);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(message) => {
            presenter.spinner_fail(&message);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Execute the use case against a concrete store
async fn run_pipeline<T, A, S>(
    transcriber: T,
    analyzer: A,
    store: S,
    input: ProcessInput,
) -> Result<String, String>
where
    T: Transcriber,
    A: TranscriptAnalyzer,
    S: FileStore,
{
    let use_case = ProcessVoiceNoteUseCase::new(transcriber, analyzer, store);
    use_case
        .execute(input)
        .await
        .map(|output| output.identifier)
        .map_err(|e| e.to_string())
}

/// Load the recording from a file path or stdin ('-', base64)
async fn load_audio_input(path: &Path, language: &str) -> Result<ProcessInput, String> {
    if path.as_os_str() == "-" {
        let mut encoded = String::new();
        use tokio::io::AsyncReadExt;
        tokio::io::stdin()
            .read_to_string(&mut encoded)
            .await
            .map_err(|e| format!("Failed to read stdin: {}", e))?;

        return ProcessInput::from_base64(encoded.trim(), AudioMimeType::default(), language)
            .map_err(|e| e.to_string());
    }

    let mime_type = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(AudioMimeType::from_extension)
        .unwrap_or_default();

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    Ok(ProcessInput {
        audio: ScratchAudio::new(AudioData::new(bytes, mime_type)),
        language: language.to_string(),
    })
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|_| AppConfig::empty());

    // Build env config
    let env_config = AppConfig {
        openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|s| !s.is_empty()),
        github_token: env::var("GITHUB_TOKEN").ok().filter(|s| !s.is_empty()),
        ..Default::default()
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}
