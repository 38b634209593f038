// Rust guideline compliant 2026-02-07

//! Regression tests for global output flags and error reporting.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn sorm(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sorm"))
        .current_dir(dir)
        .env_remove("SORM_DEFAULT_KEYSPACE")
        .env_remove("SORM_OUTPUT_FORMAT")
        .env_remove("SORM_CREATE_KEYSPACES")
        .env_remove("APPLICATION_ENV")
        .args(args)
        .output()
        .expect("run sorm")
}

fn write_schema(dir: &Path) {
    fs::write(
        dir.join("schema.toml"),
        r#"
[[tables]]
keyspace = "app"
name = "users"
partition_key = ["id"]
columns = [{ name = "id", type = "uuid" }]
"#,
    )
    .expect("write schema");
}

#[test]
fn sorm_check_json_flag_outputs_json() {
    let temp_dir = TempDir::new().expect("temp dir");
    write_schema(temp_dir.path());

    let output = sorm(temp_dir.path(), &["check", "schema.toml", "--json"]);
    assert!(
        output.status.success(),
        "expected success, got status: {:?}\nstderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("JSON output");
    assert_eq!(parsed["valid"], true);
}

#[test]
fn sorm_invalid_config_reports_json_error() {
    let temp_dir = TempDir::new().expect("temp dir");
    write_schema(temp_dir.path());
    fs::write(temp_dir.path().join("sorm.toml"), "output_format = \"yaml\"\n")
        .expect("write config");

    let output = sorm(temp_dir.path(), &["--json", "check", "schema.toml"]);
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    let parsed: serde_json::Value =
        serde_json::from_str(stderr.trim()).expect("error printed as JSON");
    let message = parsed["error"].as_str().expect("error field");
    assert!(message.contains("Invalid config"), "got: {}", message);
}

#[test]
fn sorm_invalid_config_plain_format() {
    let temp_dir = TempDir::new().expect("temp dir");
    write_schema(temp_dir.path());
    fs::write(temp_dir.path().join("sorm.toml"), "create_keyspaces = \"maybe\"\n")
        .expect("write config");

    let output = sorm(temp_dir.path(), &["--format", "plain", "ddl", "schema.toml"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).starts_with("Error: Invalid config"));
    assert!(output.stdout.is_empty());
}

#[test]
fn sorm_broken_schema_reports_cause_once() {
    let temp_dir = TempDir::new().expect("temp dir");
    fs::write(temp_dir.path().join("schema.toml"), "[[tables]\nname = ").expect("write schema");

    let output = sorm(temp_dir.path(), &["--json", "check", "schema.toml"]);
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    let parsed: serde_json::Value =
        serde_json::from_str(stderr.trim()).expect("error printed as JSON");
    let message = parsed["error"].as_str().expect("error field");
    assert!(message.starts_with("Failed to load schema"));
    assert_eq!(message.matches("TOML error").count(), 1);
}

#[test]
fn sorm_init_creates_config() {
    let temp_dir = TempDir::new().expect("temp dir");

    let output = sorm(temp_dir.path(), &["init"]);
    assert!(output.status.success());
    assert!(temp_dir.path().join("sorm.toml").exists());
}
