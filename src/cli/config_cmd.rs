//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::BackendKind;
use crate::domain::error::ConfigError;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    if !is_valid_config_key(key) {
        return Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        });
    }

    if key == "backend" {
        value
            .parse::<BackendKind>()
            .map_err(|e| ConfigError::ValidationError {
                key: key.to_string(),
                message: e.to_string(),
            })?;
    }

    let mut config = store.load().await?;

    match key {
        "openai_api_key" => config.openai_api_key = Some(value.to_string()),
        "backend" => config.backend = Some(value.to_string()),
        "github_token" => config.github_token = Some(value.to_string()),
        "github_repo" => config.github_repo = Some(value.to_string()),
        "vault_root" => config.vault_root = Some(value.to_string()),
        "language" => config.language = Some(value.to_string()),
        "transcription_model" => config.transcription_model = Some(value.to_string()),
        "analysis_model" => config.analysis_model = Some(value.to_string()),
        _ => unreachable!(), // Already validated
    }

    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    if !is_valid_config_key(key) {
        return Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        });
    }

    let config = store.load().await?;
    let value = config_value(&config, key);

    match value {
        Some(v) => presenter.output(&v),
        None => presenter.info(&format!("{} is not set", key)),
    }
    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        let shown = match config_value(&config, key) {
            Some(v) if *key == "openai_api_key" || *key == "github_token" => redact(&v),
            Some(v) => v,
            None => "(not set)".to_string(),
        };
        presenter.output(&format!("{} = {}", key, shown));
    }
    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().display().to_string());
    Ok(())
}

fn config_value(config: &crate::domain::config::AppConfig, key: &str) -> Option<String> {
    match key {
        "openai_api_key" => config.openai_api_key.clone(),
        "backend" => config.backend.clone(),
        "github_token" => config.github_token.clone(),
        "github_repo" => config.github_repo.clone(),
        "vault_root" => config.vault_root.clone(),
        "language" => config.language.clone(),
        "transcription_model" => config.transcription_model.clone(),
        "analysis_model" => config.analysis_model.clone(),
        _ => None,
    }
}

/// Hide all but the first characters of a secret
fn redact(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    format!("{}...", visible)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redact_keeps_prefix_only() {
        assert_eq!(redact("sk-abcdef123456"), "sk-a...");
    }

    #[test]
    fn config_value_maps_keys() {
        let config = crate::domain::config::AppConfig {
            backend: Some("vault".to_string()),
            ..Default::default()
        };
        assert_eq!(config_value(&config, "backend"), Some("vault".to_string()));
        assert_eq!(config_value(&config, "vault_root"), None);
    }
}
