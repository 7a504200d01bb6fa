//! Integration tests for the `stockwatch` CLI binary.
//!
//! Argument parsing, completions, config inspection, and a `check` run
//! against a mock inventory endpoint. No chat traffic is involved.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `stockwatch` binary with env isolation.
fn stockwatch_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("stockwatch");
    cmd.env("HOME", "/tmp/stockwatch-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/stockwatch-cli-test-nonexistent")
        .env_remove("RUST_LOG")
        .env_remove("STOCKWATCH_CONFIG")
        .env_remove("STOCKWATCH_URL")
        .env_remove("STOCKWATCH_TOKEN")
        .env_remove("STOCKWATCH_CHAT_ID")
        .env_remove("STOCKWATCH_MESSAGE_ID")
        .env_remove("STOCKWATCH_NOTIFY_SCOPE");
    cmd
}

fn write_config(dir: &Path, url: &str) -> std::path::PathBuf {
    let file = dir.join("stockwatch.toml");
    std::fs::write(
        &file,
        format!(
            r#"
url = "{url}"
keyring = false
token = "123:secret-token"

[[locations]]
id = "L1"
name = "Store One"

[[locations]]
id = "L2"
name = "Store Two"

[[catalog.standard]]
id = "A"
name = "Group1 - Pro"
"#
        ),
    )
    .unwrap();
    file
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = stockwatch_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "Expected 'Usage' in:\n{stderr}");
}

#[test]
fn test_help_flag() {
    stockwatch_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("run")
            .and(predicate::str::contains("check"))
            .and(predicate::str::contains("config")),
    );
}

#[test]
fn test_version_flag() {
    stockwatch_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("stockwatch"));
}

#[test]
fn test_completions_bash() {
    stockwatch_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stockwatch"));
}

#[test]
fn test_unknown_log_format_is_usage_error() {
    stockwatch_cmd()
        .args(["--log-format", "xml", "config", "path"])
        .assert()
        .code(2);
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_honours_flag() {
    stockwatch_cmd()
        .args(["--config", "/etc/stockwatch/custom.toml", "config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/etc/stockwatch/custom.toml"));
}

#[test]
fn test_config_show_redacts_token() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_config(dir.path(), "https://inventory.example.com/stock.json");

    stockwatch_cmd()
        .arg("--config")
        .arg(&file)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Group1 - Pro")
                .and(predicate::str::contains("<redacted>"))
                .and(predicate::str::contains("secret-token").not()),
        );
}

#[test]
fn test_missing_config_file_is_usage_error() {
    stockwatch_cmd()
        .args(["--config", "/nonexistent/stockwatch.toml", "check"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_run_without_chat_id_fails_before_polling() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_config(dir.path(), "https://inventory.example.com/stock.json");

    stockwatch_cmd()
        .arg("--config")
        .arg(&file)
        .arg("run")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("chat_id"));
}

// ── Check ───────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_check_prints_board() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stock.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "updated": 1_700_000_000,
            "stores": {
                "L1": { "A": { "availability": { "unlocked": false } } },
                "L2": { "A": { "availability": { "unlocked": true } } }
            }
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = write_config(dir.path(), &format!("{}/stock.json", server.uri()));

    let output = tokio::task::spawn_blocking(move || {
        stockwatch_cmd()
            .arg("--config")
            .arg(&file)
            .arg("check")
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("🔴🟢 -> Group1 - P\n\n"), "{stdout}");
    assert!(stdout.contains("Last update time: "));
    assert!(stdout.ends_with("(GMT+4)\n"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_check_reports_empty_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = write_config(dir.path(), &format!("{}/stock.json", server.uri()));

    let output = tokio::task::spawn_blocking(move || {
        stockwatch_cmd()
            .arg("--config")
            .arg(&file)
            .arg("check")
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no document"), "{stderr}");
}
