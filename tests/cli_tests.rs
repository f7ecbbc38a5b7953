//! CLI integration tests

use std::process::Command;

fn voxvault_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_voxvault"))
}

#[test]
fn help_output() {
    let output = voxvault_bin()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("voice note"));
    assert!(stdout.contains("--backend"));
    assert!(stdout.contains("--github-repo"));
    assert!(stdout.contains("--vault-root"));
    assert!(stdout.contains("--language"));
}

#[test]
fn version_output() {
    let output = voxvault_bin()
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("voxvault"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn config_path_command() {
    let output = voxvault_bin()
        .args(["config", "path"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("voxvault"));
    assert!(stdout.contains("config.toml"));
}

#[test]
fn config_help() {
    let output = voxvault_bin()
        .args(["config", "--help"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("init"));
    assert!(stdout.contains("set"));
    assert!(stdout.contains("get"));
    assert!(stdout.contains("list"));
    assert!(stdout.contains("path"));
}

#[test]
fn missing_audio_is_usage_error() {
    let output = voxvault_bin()
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("No audio input"),
        "Expected missing-audio message, got: {}",
        stderr
    );
}

#[test]
fn unreadable_audio_file_errors() {
    let output = voxvault_bin()
        .arg("/nonexistent/recording.webm")
        .env("OPENAI_API_KEY", "test-key")
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Failed to read"),
        "Expected read failure message, got: {}",
        stderr
    );
}

#[test]
fn invalid_config_key_rejected() {
    let output = voxvault_bin()
        .args(["config", "get", "keystroke"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Unknown") || stderr.contains("unknown"),
        "Expected unknown-key error, got: {}",
        stderr
    );
}

// Note: a full pipeline run needs a reachable OpenAI endpoint and is
// covered by the routing and adapter test suites instead.
