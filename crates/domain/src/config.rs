//! Configuration structures
//!
//! Loaded by the infrastructure layer from environment variables or a
//! JSON/TOML file; see `rollcall_infra::config`.

use std::borrow::Cow;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    AUTH_PATH, DEFAULT_HTTP_BACKOFF_MS, DEFAULT_HTTP_MAX_ATTEMPTS, DEFAULT_OPERATION_TIMEOUT_MS,
    DEFAULT_STORE_TIMEOUT_MS, PROFILE_TABLE,
};
use crate::impl_domain_label_conversions;

/// Root application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub store: StoreConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub reconciliation: ReconciliationConfig,
}

impl Config {
    /// Config pointing at `url` with defaults for everything else.
    pub fn for_store(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            store: StoreConfig {
                url: url.into(),
                api_key: api_key.into(),
                table: default_table(),
                timeout_ms: default_store_timeout_ms(),
                max_attempts: default_max_attempts(),
            },
            auth: AuthConfig::default(),
            reconciliation: ReconciliationConfig::default(),
        }
    }

    /// Identity provider base URL. Falls back to the store's `/auth/v1`.
    pub fn auth_url(&self) -> String {
        match &self.auth.url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("{}{}", self.store.url.trim_end_matches('/'), AUTH_PATH),
        }
    }
}

/// Remote profile store connection settings
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Project base URL, e.g. `https://project.supabase.co`
    pub url: String,
    /// Anonymous API key sent as `apikey` and bearer token
    pub api_key: String,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_store_timeout_ms")]
    pub timeout_ms: u64,
    /// Total attempts for idempotent requests (initial try + retries)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
}

impl StoreConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_millis(DEFAULT_HTTP_BACKOFF_MS)
    }

    /// Worst case for one retried read: every attempt runs into the request
    /// timeout and every backoff is slept.
    pub fn read_budget(&self) -> Duration {
        let attempts = self.max_attempts.max(1);
        let waits = (1..attempts).map(|retry| backoff_delay(self.backoff(), retry)).sum::<Duration>();
        self.timeout().saturating_mul(attempts as u32).saturating_add(waits)
    }
}

/// Delay before retry number `retry` (1-based): `base`, `2 * base`, `4 * base`...
///
/// The doubling stops after eight steps.
pub fn backoff_delay(base: Duration, retry: usize) -> Duration {
    let shift = retry.saturating_sub(1).min(8) as u32;
    base.saturating_mul(1u32 << shift)
}

// The API key never reaches logs.
impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .field("table", &self.table)
            .field("timeout_ms", &self.timeout_ms)
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

/// Identity provider settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub url: Option<String>,
}

/// Reconciliation service settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationConfig {
    /// Upper bound for a single store round-trip made by the service
    #[serde(default = "default_operation_timeout_ms")]
    pub operation_timeout_ms: u64,
    #[serde(default)]
    pub email_policy: EmailPolicy,
}

impl ReconciliationConfig {
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }
}

impl Config {
    /// True when a store read can use all of its retries before the
    /// reconciliation timeout abandons it.
    pub fn retries_fit_operation_timeout(&self) -> bool {
        self.store.read_budget() <= self.reconciliation.operation_timeout()
    }
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            operation_timeout_ms: default_operation_timeout_ms(),
            email_policy: EmailPolicy::default(),
        }
    }
}

/// How emails are compared against the store's unique key.
///
/// `Exact` leaves the comparison to the store. `Lowercase` normalises on
/// write and on every read so both sides agree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailPolicy {
    #[default]
    Exact,
    Lowercase,
}

impl_domain_label_conversions!(EmailPolicy {
    Exact => "exact",
    Lowercase => "lowercase",
});

impl EmailPolicy {
    /// Apply the policy to an email before it is sent to the store.
    pub fn apply<'a>(&self, email: &'a str) -> Cow<'a, str> {
        match self {
            Self::Exact => Cow::Borrowed(email),
            Self::Lowercase => Cow::Owned(email.trim().to_lowercase()),
        }
    }
}

fn default_table() -> String {
    PROFILE_TABLE.to_string()
}

fn default_store_timeout_ms() -> u64 {
    DEFAULT_STORE_TIMEOUT_MS
}

fn default_max_attempts() -> usize {
    DEFAULT_HTTP_MAX_ATTEMPTS
}

fn default_operation_timeout_ms() -> u64 {
    DEFAULT_OPERATION_TIMEOUT_MS
}
