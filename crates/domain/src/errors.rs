//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Rollcall
///
/// The first four variants are the reconciliation taxonomy: callers match on
/// them to decide between a user-facing message, a retry, or a degraded view.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum RollcallError {
    /// The email already has a persisted profile.
    #[error("Duplicate profile: {0}")]
    DuplicateProfile(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Connectivity, permission or timeout failure. Retryable.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Anything the layer could not classify. Never swallowed.
    #[error("Unexpected error: {0}")]
    Unexpected(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Authentication error: {0}")]
    Auth(String),
}

impl RollcallError {
    /// Stable label suitable for structured logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::DuplicateProfile(_) => "duplicate_profile",
            Self::NotFound(_) => "not_found",
            Self::StoreUnavailable(_) => "store_unavailable",
            Self::Unexpected(_) => "unexpected",
            Self::Config(_) => "config",
            Self::InvalidInput(_) => "invalid_input",
            Self::Auth(_) => "auth",
        }
    }

    /// Whether retrying the same operation later can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }

    /// Human-readable message for the person using the application.
    pub fn user_message(&self) -> String {
        match self {
            Self::DuplicateProfile(_) => "This email is already registered.".to_string(),
            Self::NotFound(_) => "No profile exists for this email yet.".to_string(),
            Self::StoreUnavailable(_) => {
                "The profile service is unreachable right now. Please try again.".to_string()
            }
            Self::Unexpected(_) => "Something went wrong. Please try again later.".to_string(),
            Self::Config(message) => format!("The application is misconfigured: {message}"),
            Self::InvalidInput(message) => format!("Please check your input: {message}"),
            Self::Auth(message) => format!("Authentication failed: {message}"),
        }
    }
}

/// Result type alias for Rollcall operations
pub type Result<T> = std::result::Result<T, RollcallError>;
