//! End-to-end tests for the `dissent` binary.

use assert_cmd::Command;
use predicates::prelude::*;

/// Known provider key variables that would leak a developer's real
/// environment into the tests.
const KEY_VARS: &[&str] = &[
    "OPENROUTER_API_KEY",
    "ANTHROPIC_API_KEY",
    "OPENAI_API_KEY",
    "GOOGLE_API_KEY",
    "XAI_API_KEY",
    "GROQ_API_KEY",
];

fn dissent() -> Command {
    let mut cmd = Command::cargo_bin("dissent").unwrap();
    for var in KEY_VARS {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_help_lists_commands() {
    dissent()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_config_path_prints_default_location() {
    dissent()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".mutual-dissent"))
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_masks_keys() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        "[providers]\nanthropic = \"sk-ant-REDACTED\"\n",
    )
    .unwrap();

    dissent()
        .args(["config", "show", "--config"])
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("sk-ant..."))
        .stdout(predicate::str::contains("0123456789").not())
        .stdout(predicate::str::contains("not configured"));
}

#[test]
fn test_config_show_reports_env_key_source() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "").unwrap();

    dissent()
        .args(["config", "show", "--config"])
        .arg(&config_path)
        .env("GROQ_API_KEY", "gsk-from-environment-12345")
        .assert()
        .success()
        .stdout(predicate::str::contains("env"));
}

#[test]
fn test_missing_config_file_is_an_error() {
    dissent()
        .args(["config", "show", "--config", "/nonexistent/dissent.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_config_init_writes_starter_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let output = temp_dir.path().join("config.toml");

    dissent()
        .args(["config", "init", "--output"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file created"));

    let content = std::fs::read_to_string(&output).unwrap();
    assert!(content.contains("[panel]"));
    assert!(content.contains("[providers]"));
}

#[test]
fn test_config_init_refuses_overwrite_without_force() {
    let temp_dir = tempfile::tempdir().unwrap();
    let output = temp_dir.path().join("config.toml");
    std::fs::write(&output, "keep me").unwrap();

    dissent()
        .args(["config", "init", "--output"])
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    assert_eq!(std::fs::read_to_string(&output).unwrap(), "keep me");
}

#[test]
fn test_ask_rejects_out_of_range_rounds() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "").unwrap();

    dissent()
        .args(["ask", "--rounds", "5", "Q", "--config"])
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("rounds"));
}

#[test]
fn test_ask_rejects_empty_panel() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "[panel]\nmodels = []\n").unwrap();

    dissent()
        .args(["ask", "Q", "--config"])
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("panel is empty"));
}
