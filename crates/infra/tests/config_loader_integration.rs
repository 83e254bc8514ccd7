//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files.

use std::io::Write;

use rollcall_domain::EmailPolicy;
use rollcall_infra::config;
use tempfile::NamedTempFile;

fn write_config(contents: &str, extension: &str) -> std::path::PathBuf {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(contents.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension(extension);
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");
    path
}

#[test]
fn test_load_config_from_json_file() {
    let path = write_config(
        r#"{
            "store": {
                "url": "https://demo.supabase.co",
                "api_key": "anon-key",
                "table": "Student",
                "timeout_ms": 5000,
                "max_attempts": 4
            },
            "auth": { "url": "https://auth.example.com/auth/v1" },
            "reconciliation": {
                "operation_timeout_ms": 8000,
                "email_policy": "lowercase"
            }
        }"#,
        "json",
    );

    let config = config::load_from_file(Some(path.clone())).expect("config from JSON");

    assert_eq!(config.store.url, "https://demo.supabase.co");
    assert_eq!(config.store.timeout_ms, 5000);
    assert_eq!(config.store.max_attempts, 4);
    assert_eq!(config.auth_url(), "https://auth.example.com/auth/v1");
    assert_eq!(config.reconciliation.operation_timeout_ms, 8000);
    assert_eq!(config.reconciliation.email_policy, EmailPolicy::Lowercase);

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_with_minimal_fields() {
    let path = write_config(
        r#"
[store]
url = "https://demo.supabase.co"
api_key = "anon-key"
"#,
        "toml",
    );

    let config = config::load_from_file(Some(path.clone())).expect("config from TOML");

    assert_eq!(config.store.table, "Student");
    assert_eq!(config.store.timeout_ms, 3_000);
    assert_eq!(config.store.max_attempts, 3);
    assert_eq!(config.auth_url(), "https://demo.supabase.co/auth/v1");
    assert_eq!(config.reconciliation.email_policy, EmailPolicy::Exact);

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_from_nonexistent_file() {
    let result = config::load_from_file(Some("/nonexistent/rollcall.toml".into()));
    assert!(result.is_err(), "Should fail when file does not exist");
}

#[test]
fn test_load_config_with_invalid_format() {
    let path = write_config("[store\nurl = ", "toml");

    let result = config::load_from_file(Some(path.clone()));
    assert!(result.is_err(), "Should fail with invalid TOML");

    std::fs::remove_file(path).ok();
}
