//! Integration tests for the arcade CLI

use httpmock::prelude::*;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const CATALOG: &str = r#"[
    {"id": "g1", "name": "Game One", "description": "first",
     "windows": "http://files.local/g1-win.zip", "winver": 2,
     "mac": "http://files.local/g1-mac.zip", "macver": 2,
     "linux": "http://files.local/g1-linux.zip", "linuxver": 2},
    {"id": "g2", "name": "Game Two", "description": "second"}
]"#;

/// Write a config file pointing the launcher at `catalog_url` and a temp data dir
fn write_config(dir: &Path, catalog_url: &str) -> std::path::PathBuf {
    let config = format!(
        "[catalog]\nurl = \"{catalog_url}\"\n\n[paths]\ndata_dir = \"{}\"\n\n[network]\nretries = 0\n",
        dir.join("data").display().to_string().replace('\\', "\\\\")
    );
    let path = dir.join("config.toml");
    std::fs::write(&path, config).unwrap();
    path
}

fn arcade(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_arcade"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("ARCADE_CATALOG_URL")
        .env_remove("ARCADE_DATA_DIR")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute arcade")
}

#[test]
fn test_cli_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_arcade"))
        .arg("--version")
        .output()
        .expect("Failed to execute arcade");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("arcade"));
}

#[test]
fn test_cli_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_arcade"))
        .arg("--help")
        .output()
        .expect("Failed to execute arcade");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Download, update and launch games"));
    assert!(stdout.contains("play"));
    assert!(stdout.contains("list"));
    assert!(stdout.contains("serve"));
}

#[test]
fn test_cli_invalid_command() {
    let output = Command::new(env!("CARGO_BIN_EXE_arcade"))
        .arg("invalid-command")
        .output()
        .expect("Failed to execute arcade");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unrecognized subcommand"));
}

#[test]
fn test_json_list_reads_remote_catalog() {
    let server = MockServer::start();
    let catalog = server.mock(|when, then| {
        when.method(GET).path("/experiences.json");
        then.status(200)
            .header("content-type", "application/json")
            .body(CATALOG);
    });

    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), &server.url("/experiences.json"));
    let output = arcade(&config, &["--json", "list"]);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    catalog.assert();

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["type"], "TitleList");
    let titles = json["data"].as_array().unwrap();
    assert_eq!(titles.len(), 2);
    assert_eq!(titles[0]["id"], "g1");
    assert_eq!(titles[0]["version"], "2");
    assert_eq!(titles[0]["action"], "install");
    assert_eq!(titles[0]["downloadable"], true);
    assert_eq!(titles[1]["downloadable"], false);

    // directories are created on first run
    assert!(temp.path().join("data").join("Apps").is_dir());
    assert!(temp.path().join("data").join("Downloads").is_dir());
}

#[test]
fn test_json_list_with_catalog_down_fails() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/experiences.json");
        then.status(503);
    });

    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), &server.url("/experiences.json"));
    let output = arcade(&config, &["--json", "list"]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_json_status_on_fresh_data_dir() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "http://127.0.0.1:9/unused.json");
    let output = arcade(&config, &["--json", "status"]);

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["type"], "Status");
    assert_eq!(json["data"]["installed"].as_array().unwrap().len(), 0);
    assert_eq!(json["data"]["active"].as_array().unwrap().len(), 0);
}

#[test]
fn test_remove_rejects_path_like_title() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "http://127.0.0.1:9/unused.json");
    let output = arcade(&config, &["remove", "../outside"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"));
}

#[test]
fn test_play_index_requires_number() {
    let temp = TempDir::new().unwrap();
    let config = write_config(temp.path(), "http://127.0.0.1:9/unused.json");
    let output = arcade(&config, &["play", "--index", "first"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not a catalog position"));
}
