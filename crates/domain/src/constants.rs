//! Application constants
//!
//! Store schema names and defaults shared by every layer. The table and
//! column names are case-sensitive and must match the remote store exactly.

// Profile table schema
pub const PROFILE_TABLE: &str = "Student";
pub const COLUMN_ID: &str = "id";
pub const COLUMN_EMAIL: &str = "Email";
pub const COLUMN_LAST_NAME: &str = "Nume";
pub const COLUMN_FIRST_NAME: &str = "Prenume";
pub const COLUMN_GROUP: &str = "Grupa";
pub const COLUMN_YEAR: &str = "An";
pub const COLUMN_SPECIALIZATION: &str = "Specializare";

// Store error codes
/// Postgres `unique_violation`. The only authoritative duplicate signal.
pub const UNIQUE_VIOLATION_CODE: &str = "23505";
/// PostgREST: a single object was requested but zero or many rows matched.
pub const SINGLE_ROW_MISMATCH_CODE: &str = "PGRST116";

// Endpoint prefixes under the store base URL
pub const REST_PATH: &str = "/rest/v1";
pub const AUTH_PATH: &str = "/auth/v1";

// Timeouts and retry defaults. Three 3 s attempts plus backoff fit inside
// the 10 s operation bound.
pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 3_000;
pub const DEFAULT_OPERATION_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_HTTP_MAX_ATTEMPTS: usize = 3;
pub const DEFAULT_HTTP_BACKOFF_MS: u64 = 200;

/// Shown in place of profile details when only a placeholder is available.
pub const PROFILE_UNAVAILABLE_INDICATOR: &str = "Profile unavailable";
