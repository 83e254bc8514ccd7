//! Store error types
//!
//! What a profile store adapter reports when a request does not succeed.
//! Classification into the reconciliation taxonomy happens in the core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured error body returned by the store (`{message, code, details, hint}`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl StoreErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), ..Self::default() }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.code.as_deref() == Some(code)
    }
}

/// Failure reported by a profile store adapter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store answered with a structured error.
    #[error("store rejected request [{}]: {}", .0.code.as_deref().unwrap_or("-"), .0.message)]
    Rejected(StoreErrorBody),

    /// The store could not be reached or did not answer in time.
    #[error("store transport failure: {0}")]
    Transport(String),

    /// The store answered with something that could not be decoded.
    #[error("malformed store response: {0}")]
    Malformed(String),
}

impl StoreError {
    pub fn body(&self) -> Option<&StoreErrorBody> {
        match self {
            Self::Rejected(body) => Some(body),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_parses_postgrest_shape() {
        let raw = r#"{"code":"23505","details":"Key (\"Email\")=(a@x.com) already exists.","hint":null,"message":"duplicate key value violates unique constraint \"Student_Email_key\""}"#;
        let body: StoreErrorBody = serde_json::from_str(raw).unwrap();
        assert!(body.has_code("23505"));
        assert!(body.message.starts_with("duplicate key"));
        assert!(body.hint.is_none());
    }

    #[test]
    fn rejected_display_includes_code() {
        let err = StoreError::Rejected(StoreErrorBody::new("permission denied").with_code("42501"));
        assert_eq!(err.to_string(), "store rejected request [42501]: permission denied");
        assert!(err.body().is_some());
        assert!(StoreError::Transport("refused".into()).body().is_none());
    }
}
