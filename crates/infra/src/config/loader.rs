//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `ROLLCALL_STORE_URL`: Store project base URL (required)
//! - `ROLLCALL_STORE_API_KEY`: Anonymous API key (required)
//! - `ROLLCALL_STORE_TABLE`: Profile table name (default `Student`)
//! - `ROLLCALL_STORE_TIMEOUT_MS`: Per-request HTTP timeout
//! - `ROLLCALL_STORE_MAX_ATTEMPTS`: Attempts for idempotent requests
//! - `ROLLCALL_AUTH_URL`: Identity provider base URL
//! - `ROLLCALL_OPERATION_TIMEOUT_MS`: Bound for one store round-trip
//! - `ROLLCALL_EMAIL_POLICY`: `exact` or `lowercase`
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./rollcall.json` or `./rollcall.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use rollcall_domain::{Config, EmailPolicy, Result, RollcallError};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `RollcallError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// The store URL and API key are required; everything else falls back to
/// the defaults of [`Config::for_store`].
///
/// # Errors
/// Returns `RollcallError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<Config> {
    let url = env_var("ROLLCALL_STORE_URL")?;
    let api_key = env_var("ROLLCALL_STORE_API_KEY")?;

    let mut config = Config::for_store(url, api_key);

    if let Some(table) = env_opt("ROLLCALL_STORE_TABLE") {
        config.store.table = table;
    }
    if let Some(timeout_ms) = env_parse::<u64>("ROLLCALL_STORE_TIMEOUT_MS", "store timeout")? {
        config.store.timeout_ms = timeout_ms;
    }
    if let Some(attempts) = env_parse::<usize>("ROLLCALL_STORE_MAX_ATTEMPTS", "max attempts")? {
        config.store.max_attempts = attempts;
    }
    config.auth.url = env_opt("ROLLCALL_AUTH_URL");
    if let Some(timeout_ms) =
        env_parse::<u64>("ROLLCALL_OPERATION_TIMEOUT_MS", "operation timeout")?
    {
        config.reconciliation.operation_timeout_ms = timeout_ms;
    }
    if let Some(policy) = env_parse::<EmailPolicy>("ROLLCALL_EMAIL_POLICY", "email policy")? {
        config.reconciliation.email_policy = policy;
    }

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Arguments
/// * `path` - Optional path to config file. If `None`, uses
///   [`probe_config_paths`].
///
/// # Errors
/// Returns `RollcallError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(RollcallError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            RollcallError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| RollcallError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `RollcallError::Config` if format is invalid or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| RollcallError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| RollcallError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(RollcallError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches for config files in the following locations (in order):
/// 1. Current working directory (`./config.{json,toml}`,
///    `./rollcall.{json,toml}`)
/// 2. Parent directories (up to 2 levels)
/// 3. Relative to executable location
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidates_in(dir: &Path) -> Vec<PathBuf> {
    vec![
        dir.join("config.json"),
        dir.join("config.toml"),
        dir.join("rollcall.json"),
        dir.join("rollcall.toml"),
        dir.join("../config.json"),
        dir.join("../config.toml"),
        dir.join("../../config.json"),
        dir.join("../../config.toml"),
    ]
}

/// Get required environment variable
///
/// # Errors
/// Returns `RollcallError::Config` if the variable is not set or blank.
fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        RollcallError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Optional environment variable; blank values count as unset.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Parse an optional environment variable
///
/// # Errors
/// Returns `RollcallError::Config` naming `what` if the value does not parse.
fn env_parse<T>(key: &str, what: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| RollcallError::Config(format!("Invalid {} in {}: {}", what, key, e)))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ALL_VARS: &[&str] = &[
        "ROLLCALL_STORE_URL",
        "ROLLCALL_STORE_API_KEY",
        "ROLLCALL_STORE_TABLE",
        "ROLLCALL_STORE_TIMEOUT_MS",
        "ROLLCALL_STORE_MAX_ATTEMPTS",
        "ROLLCALL_AUTH_URL",
        "ROLLCALL_OPERATION_TIMEOUT_MS",
        "ROLLCALL_EMAIL_POLICY",
    ];

    fn clear_env() {
        for key in ALL_VARS {
            std::env::remove_var(key);
        }
    }

    fn write_temp(contents: &str, extension: &str) -> PathBuf {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(contents.as_bytes()).unwrap();
        let path = temp_file.path().with_extension(extension);
        std::fs::copy(temp_file.path(), &path).unwrap();
        path
    }

    #[test]
    fn test_load_from_env_required_only() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("ROLLCALL_STORE_URL", "https://demo.supabase.co");
        std::env::set_var("ROLLCALL_STORE_API_KEY", "anon-key");

        let config = load_from_env().expect("config from env");
        assert_eq!(config.store.url, "https://demo.supabase.co");
        assert_eq!(config.store.table, "Student");
        assert_eq!(config.store.timeout_ms, 3_000);
        assert_eq!(config.reconciliation.email_policy, EmailPolicy::Exact);
        assert_eq!(config.auth_url(), "https://demo.supabase.co/auth/v1");

        clear_env();
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("ROLLCALL_STORE_URL", "https://demo.supabase.co");
        std::env::set_var("ROLLCALL_STORE_API_KEY", "anon-key");
        std::env::set_var("ROLLCALL_STORE_TABLE", "Students");
        std::env::set_var("ROLLCALL_STORE_TIMEOUT_MS", "2500");
        std::env::set_var("ROLLCALL_STORE_MAX_ATTEMPTS", "5");
        std::env::set_var("ROLLCALL_AUTH_URL", "https://auth.example.com/");
        std::env::set_var("ROLLCALL_OPERATION_TIMEOUT_MS", "4000");
        std::env::set_var("ROLLCALL_EMAIL_POLICY", "Lowercase");

        let config = load_from_env().expect("config from env");
        assert_eq!(config.store.table, "Students");
        assert_eq!(config.store.timeout_ms, 2500);
        assert_eq!(config.store.max_attempts, 5);
        assert_eq!(config.auth_url(), "https://auth.example.com");
        assert_eq!(config.reconciliation.operation_timeout_ms, 4000);
        assert_eq!(config.reconciliation.email_policy, EmailPolicy::Lowercase);

        clear_env();
    }

    #[test]
    fn test_load_from_env_missing_var() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("ROLLCALL_STORE_URL", "https://demo.supabase.co");

        let err = load_from_env().unwrap_err();
        match err {
            RollcallError::Config(msg) => assert!(msg.contains("ROLLCALL_STORE_API_KEY")),
            other => panic!("expected config error, got {:?}", other),
        }

        clear_env();
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("ROLLCALL_STORE_URL", "https://demo.supabase.co");
        std::env::set_var("ROLLCALL_STORE_API_KEY", "anon-key");
        std::env::set_var("ROLLCALL_STORE_TIMEOUT_MS", "soon");

        let result = load_from_env();
        assert!(matches!(result, Err(RollcallError::Config(_))), "Should be a Config error");

        clear_env();
    }

    #[test]
    fn test_load_from_env_invalid_policy() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("ROLLCALL_STORE_URL", "https://demo.supabase.co");
        std::env::set_var("ROLLCALL_STORE_API_KEY", "anon-key");
        std::env::set_var("ROLLCALL_EMAIL_POLICY", "casefold");

        let result = load_from_env();
        assert!(matches!(result, Err(RollcallError::Config(_))));

        clear_env();
    }

    #[test]
    fn test_load_from_file_json() {
        let path = write_temp(
            r#"{
                "store": {
                    "url": "https://demo.supabase.co",
                    "api_key": "anon-key",
                    "timeout_ms": 3000
                },
                "reconciliation": { "email_policy": "lowercase" }
            }"#,
            "json",
        );

        let config = load_from_file(Some(path.clone())).expect("config from JSON file");
        assert_eq!(config.store.timeout_ms, 3000);
        assert_eq!(config.store.max_attempts, 3);
        assert_eq!(config.reconciliation.email_policy, EmailPolicy::Lowercase);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_toml() {
        let path = write_temp(
            r#"
[store]
url = "https://demo.supabase.co"
api_key = "anon-key"
table = "Student"

[auth]
url = "https://auth.example.com"
"#,
            "toml",
        );

        let config = load_from_file(Some(path.clone())).expect("config from TOML file");
        assert_eq!(config.store.table, "Student");
        assert_eq!(config.auth_url(), "https://auth.example.com");

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/config.json")));
        assert!(matches!(result, Err(RollcallError::Config(_))), "Should be a Config error");
    }

    #[test]
    fn test_load_from_file_invalid_json() {
        let path = write_temp(r#"{ "this is": "not valid json" "#, "json");

        let result = load_from_file(Some(path.clone()));
        assert!(result.is_err(), "Should fail with invalid JSON");

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_parse_config_missing_store_section() {
        let result = parse_config("[auth]\nurl = \"https://auth.example.com\"\n", Path::new("x.toml"));
        assert!(matches!(result, Err(RollcallError::Config(_))));
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("some content", Path::new("test.yaml"));
        assert!(result.is_err(), "Should fail with unsupported format");
    }
}
