//! Store error classification
//!
//! Maps what a store adapter reports onto the reconciliation taxonomy.

use rollcall_domain::constants::{SINGLE_ROW_MISMATCH_CODE, UNIQUE_VIOLATION_CODE};
use rollcall_domain::{RollcallError, StoreError, StoreErrorBody};

/// Category of a store failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorClass {
    /// The unique constraint on the email column rejected a write
    UniqueViolation,
    /// The store reported that no row matched
    NotFound,
    /// Connectivity, permission or other store-side refusal - retryable
    Unavailable,
    /// Malformed or inconsistent response
    Unexpected,
}

/// Classify a store failure.
///
/// A unique violation is recognised by code `23505` or, only when the store
/// forwarded no code at all, by a message mentioning a duplicate. `PGRST116` means
/// "not found" only when zero rows matched; more than one row means the
/// unique constraint is not holding and is reported as unexpected.
pub fn classify(err: &StoreError) -> StoreErrorClass {
    match err {
        StoreError::Rejected(body) if is_unique_violation(body) => StoreErrorClass::UniqueViolation,
        StoreError::Rejected(body) if body.has_code(SINGLE_ROW_MISMATCH_CODE) => {
            match matched_rows(body) {
                Some(rows) if rows > 1 => StoreErrorClass::Unexpected,
                _ => StoreErrorClass::NotFound,
            }
        }
        StoreError::Rejected(_) | StoreError::Transport(_) => StoreErrorClass::Unavailable,
        StoreError::Malformed(_) => StoreErrorClass::Unexpected,
    }
}

impl StoreErrorClass {
    /// Default mapping into the domain error for `email`.
    pub fn into_error(self, err: &StoreError, email: &str) -> RollcallError {
        match self {
            Self::UniqueViolation => RollcallError::DuplicateProfile(email.to_string()),
            Self::NotFound => RollcallError::NotFound(email.to_string()),
            Self::Unavailable => RollcallError::StoreUnavailable(describe(err)),
            Self::Unexpected => RollcallError::Unexpected(describe(err)),
        }
    }
}

fn is_unique_violation(body: &StoreErrorBody) -> bool {
    match body.code.as_deref() {
        Some(_) => body.has_code(UNIQUE_VIOLATION_CODE),
        None => body.message.to_ascii_lowercase().contains("duplicate"),
    }
}

/// Row count from PostgREST details such as "The result contains 0 rows".
fn matched_rows(body: &StoreErrorBody) -> Option<u64> {
    let details = body.details.as_deref()?;
    details
        .split(|c: char| !c.is_ascii_digit())
        .find(|chunk| !chunk.is_empty())
        .and_then(|digits| digits.parse().ok())
}

/// Human-oriented detail string including the store's details and hint.
pub(crate) fn describe(err: &StoreError) -> String {
    match err {
        StoreError::Rejected(body) => {
            let mut text = err.to_string();
            if let Some(details) = body.details.as_deref().filter(|d| !d.is_empty()) {
                text.push_str(" (");
                text.push_str(details);
                text.push(')');
            }
            if let Some(hint) = body.hint.as_deref().filter(|h| !h.is_empty()) {
                text.push_str(" hint: ");
                text.push_str(hint);
            }
            text
        }
        other => other.to_string(),
    }
}
