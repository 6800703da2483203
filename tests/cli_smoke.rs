#![allow(clippy::unwrap_used)]
//! CLI smoke tests.
//!
//! Every test points `XDG_CONFIG_HOME` at an empty temp dir so the user's
//! own config never leaks in.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[allow(deprecated)]
fn gmc(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("gmc").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env("NO_COLOR", "1")
        .env_remove("GEMINI_API_KEY");
    cmd
}

fn write_config(config_home: &TempDir, contents: &str) {
    let dir = config_home.path().join("gmc");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.toml"), contents).unwrap();
}

#[test]
fn test_help_displays_usage() {
    let home = TempDir::new().unwrap();
    gmc(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Chat with Google Gemini"))
        .stdout(predicate::str::contains("--image"))
        .stdout(predicate::str::contains("--persona"))
        .stdout(predicate::str::contains("--provider"));
}

#[test]
fn test_version_displays_version() {
    let home = TempDir::new().unwrap();
    gmc(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_chat_help() {
    let home = TempDir::new().unwrap();
    gmc(&home)
        .args(["chat", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--persona"));
}

#[test]
fn test_personas_list_shows_presets() {
    let home = TempDir::new().unwrap();
    gmc(&home)
        .arg("personas")
        .assert()
        .success()
        .stdout(predicate::str::contains("Preset personas"))
        .stdout(predicate::str::contains("default"))
        .stdout(predicate::str::contains("concise"))
        .stdout(predicate::str::contains("tutor"))
        .stdout(predicate::str::contains("coder"));
}

#[test]
fn test_personas_list_shows_custom() {
    let home = TempDir::new().unwrap();
    write_config(
        &home,
        "[personas.pirate]\ndescription = \"Talks like a pirate\"\nprompt = \"Arr.\"\n",
    );

    gmc(&home)
        .arg("personas")
        .assert()
        .success()
        .stdout(predicate::str::contains("Custom personas"))
        .stdout(predicate::str::contains("Talks like a pirate"));
}

#[test]
fn test_personas_show_preset() {
    let home = TempDir::new().unwrap();
    gmc(&home)
        .args(["personas", "show", "coder"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Preset persona"))
        .stdout(predicate::str::contains("Prompt:"));
}

#[test]
fn test_personas_show_nonexistent() {
    let home = TempDir::new().unwrap();
    gmc(&home)
        .args(["personas", "show", "nonexistent_persona_xyz"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_providers_lists_builtin() {
    let home = TempDir::new().unwrap();
    gmc(&home)
        .arg("providers")
        .assert()
        .success()
        .stdout(predicate::str::contains("gemini"))
        .stdout(predicate::str::contains("generativelanguage.googleapis.com"));
}

#[test]
fn test_providers_nonexistent() {
    let home = TempDir::new().unwrap();
    gmc(&home)
        .args(["providers", "nonexistent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_configure_show_without_config() {
    let home = TempDir::new().unwrap();
    gmc(&home)
        .args(["configure", "--show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Current defaults"))
        .stdout(predicate::str::contains("(not set)"));
}

#[test]
fn test_broken_config_is_reported() {
    let home = TempDir::new().unwrap();
    write_config(&home, "[gmc\nmodel =");

    gmc(&home)
        .arg("providers")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[test]
fn test_slash_command_rejected_in_one_shot_mode() {
    let home = TempDir::new().unwrap();
    gmc(&home)
        .arg("/credits")
        .assert()
        .failure()
        .stderr(predicate::str::contains("gmc chat"));
}

#[test]
fn test_empty_prompt_rejected() {
    let home = TempDir::new().unwrap();
    gmc(&home)
        .write_stdin("   \n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No question given"));
}

#[test]
fn test_missing_api_key_reports_setup() {
    let home = TempDir::new().unwrap();
    gmc(&home)
        .arg("hello")
        .assert()
        .failure()
        .stderr(predicate::str::contains("GEMINI_API_KEY"));
}

#[test]
fn test_non_image_attachment_rejected() {
    let home = TempDir::new().unwrap();
    let notes = home.path().join("notes.txt");
    fs::write(&notes, "hello").unwrap();
    write_config(
        &home,
        "[gmc]\nprovider = \"local\"\n\n[providers.local]\nendpoint = \"http://127.0.0.1:9\"\n",
    );

    gmc(&home)
        .args(["--image", notes.to_str().unwrap(), "what is this?"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not look like an image"));
}

#[test]
fn test_unreachable_endpoint_exits_unavailable() {
    let home = TempDir::new().unwrap();
    write_config(
        &home,
        "[gmc]\nprovider = \"local\"\n\n[providers.local]\nendpoint = \"http://127.0.0.1:9\"\n",
    );

    gmc(&home)
        .arg("hello")
        .assert()
        .code(69)
        .stderr(predicate::str::contains("Error:"));
}
