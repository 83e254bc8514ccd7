//! Identity types
//!
//! Owned by the identity provider; referenced here only to key profiles.

use serde::{Deserialize, Serialize};

/// Authenticated identity as reported by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque subject id assigned by the provider
    pub subject: String,
    pub email: String,
}

impl Identity {
    pub fn new(subject: impl Into<String>, email: impl Into<String>) -> Self {
        Self { subject: subject.into(), email: email.into() }
    }
}
