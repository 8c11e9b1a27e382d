//! Integration tests for the `hwmesh` CLI binary.
//!
//! Argument parsing, help output, shell completions, config handling and
//! exit codes. The router is either absent or a wiremock stand-in.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `hwmesh` binary with env isolation.
///
/// Clears all `HWMESH_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn hwmesh_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("hwmesh");
    cmd.env("HOME", "/tmp/hwmesh-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/hwmesh-cli-test-nonexistent")
        .env_remove("HWMESH_PROFILE")
        .env_remove("HWMESH_HOST")
        .env_remove("HWMESH_CONFIG")
        .env_remove("HWMESH_OUTPUT")
        .env_remove("HWMESH_INSECURE")
        .env_remove("HWMESH_TIMEOUT")
        .env_remove("HWMESH_USERNAME")
        .env_remove("HWMESH_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn write_profile(path: &Path, host: &str, port: u16) {
    std::fs::write(
        path,
        format!("[profiles.default]\nhost = \"{host}\"\nport = {port}\n"),
    )
    .unwrap();
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = hwmesh_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    hwmesh_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Huawei")
            .and(predicate::str::contains("filter"))
            .and(predicate::str::contains("switch"))
            .and(predicate::str::contains("devices")),
    );
}

#[test]
fn test_version_flag() {
    hwmesh_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("hwmesh"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    hwmesh_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    hwmesh_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_man_page() {
    hwmesh_cmd()
        .arg("man")
        .assert()
        .success()
        .stdout(predicate::str::contains(".TH hwmesh").and(predicate::str::contains("filter")));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_filter_list_is_validated_before_connecting() {
    let output = hwmesh_cmd()
        .args(["--host", "127.0.0.1:1", "filter", "add", "aa:bb:cc:dd:ee:ff", "--list", "greylist"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("whitelist") && text.contains("blacklist"),
        "Expected possible list values in error:\n{text}"
    );
}

#[test]
fn test_filter_mode_help_lists_values() {
    hwmesh_cmd()
        .args(["filter", "mode", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("whitelist"));
}

#[test]
fn test_invalid_subcommand() {
    let output = hwmesh_cmd().arg("foobar").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_invalid_output_format() {
    let output = hwmesh_cmd()
        .args(["--output", "invalid", "info"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("possible values"),
        "Expected error about valid output formats:\n{text}"
    );
}

#[test]
fn test_missing_password_exits_with_auth_code() {
    hwmesh_cmd()
        .args(["filter", "info"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("No password configured"));
}

#[test]
fn test_unknown_profile() {
    hwmesh_cmd()
        .args(["--profile", "office", "info"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Profile 'office' not found"));
}

#[test]
fn test_unreachable_router_exits_with_connection_code() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    write_profile(&config, "127.0.0.1", 1);

    hwmesh_cmd()
        .env("HWMESH_PASSWORD", "secret")
        .arg("--config")
        .arg(&config)
        .args(["--timeout", "5", "info"])
        .assert()
        .code(7);
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_no_config() {
    hwmesh_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_config_path_honors_flag() {
    hwmesh_cmd()
        .args(["--config", "/tmp/hwmesh-elsewhere.toml", "config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/tmp/hwmesh-elsewhere.toml"));
}

#[test]
fn test_config_set_then_show() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");

    hwmesh_cmd()
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "host", "192.168.8.1"])
        .assert()
        .success();

    hwmesh_cmd()
        .arg("--config")
        .arg(&config)
        .args(["--output", "json", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("192.168.8.1"));
}

#[test]
fn test_config_set_unknown_key() {
    let dir = tempfile::tempdir().unwrap();
    hwmesh_cmd()
        .arg("--config")
        .arg(dir.path().join("config.toml"))
        .args(["config", "set", "site", "default"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown config key"));
}

// ── Subcommand help discovery ───────────────────────────────────────

#[test]
fn test_filter_subcommands_exist() {
    hwmesh_cmd()
        .args(["filter", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("info")
                .and(predicate::str::contains("add"))
                .and(predicate::str::contains("remove"))
                .and(predicate::str::contains("mode"))
                .and(predicate::str::contains("enable"))
                .and(predicate::str::contains("disable")),
        );
}

#[test]
fn test_config_subcommands_exist() {
    hwmesh_cmd()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("path")
                .and(predicate::str::contains("show"))
                .and(predicate::str::contains("set-password")),
        );
}

// ── Against a mock router ───────────────────────────────────────────

async fn mock_router() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/html/index.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<meta name="csrf_param" content="p"><meta name="csrf_token" content="t">"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/system/user_login_nonce"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "err": 0,
            "servernonce": "c0ffee",
            "salt": "a1b2c3d4",
            "iterations": 10,
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/system/user_login_proof"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "err": 0 })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/system/user_logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "errcode": 0 })))
        .mount(&server)
        .await;

    server
}

fn band(label: &str, enabled: bool) -> serde_json::Value {
    json!({
        "FrequencyBand": label,
        "MACAddressControlEnabled": enabled,
        "WMACAddresses": [],
        "BMACAddresses": [],
        "ID": label,
        "MacFilterPolicy": 0
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn test_filter_add_on_disabled_filter_exits_9() {
    let server = mock_router().await;
    Mock::given(method("GET"))
        .and(path("/api/ntwk/wlanfilterenhance"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([band("2.4GHz", false), band("5GHz", false)])),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/ntwk/wlanfilterenhance"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "errcode": 0 })))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    write_profile(&config, "127.0.0.1", server.address().port());

    let output = tokio::task::spawn_blocking(move || {
        hwmesh_cmd()
            .env("HWMESH_PASSWORD", "secret")
            .arg("--config")
            .arg(&config)
            .args(["filter", "add", "aa:bb:cc:dd:ee:ff", "--list", "whitelist"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert_eq!(output.status.code(), Some(9));
    let text = combined_output(&output);
    assert!(text.contains("was not applied"), "{text}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_filter_info_plain() {
    let server = mock_router().await;
    let mut two_ghz = band("2.4GHz", true);
    two_ghz["BMACAddresses"] = json!([{ "MACAddress": "aa:bb:cc:dd:ee:ff", "HostName": "tv" }]);
    Mock::given(method("GET"))
        .and(path("/api/ntwk/wlanfilterenhance"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([two_ghz, band("5GHz", true)])),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    write_profile(&config, "127.0.0.1", server.address().port());

    let output = tokio::task::spawn_blocking(move || {
        hwmesh_cmd()
            .env("HWMESH_PASSWORD", "secret")
            .arg("--config")
            .arg(&config)
            .args(["--output", "plain", "filter", "info"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "2.4GHz blacklist AA:BB:CC:DD:EE:FF"
    );
}
