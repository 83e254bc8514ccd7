//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use rollcall_domain::{RollcallError, StoreError};

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub RollcallError);

impl From<InfraError> for RollcallError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<RollcallError> for InfraError {
    fn from(value: RollcallError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoRollcallError {
    fn into_rollcall(self) -> RollcallError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → RollcallError */
/* -------------------------------------------------------------------------- */

impl IntoRollcallError for HttpError {
    fn into_rollcall(self) -> RollcallError {
        if self.is_timeout() {
            return RollcallError::StoreUnavailable("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return RollcallError::StoreUnavailable("HTTP connection failure".into());
        }

        if self.is_builder() {
            return RollcallError::Config(format!("invalid HTTP request: {self}"));
        }

        if self.is_decode() {
            return RollcallError::Unexpected(format!("undecodable HTTP response: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => RollcallError::Auth(message),
                404 => RollcallError::NotFound(message),
                429 => RollcallError::StoreUnavailable(message),
                400..=499 => RollcallError::InvalidInput(message),
                _ => RollcallError::StoreUnavailable(message),
            };
        }

        RollcallError::StoreUnavailable(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_rollcall())
    }
}

/* -------------------------------------------------------------------------- */
/* Transport failures → StoreError */
/* -------------------------------------------------------------------------- */

/// Describe a request that never produced an HTTP response as a store error.
///
/// Decoding failures mean the store answered with something unreadable and
/// are reported as malformed; everything else is a transport failure.
pub fn transport_failure(err: RollcallError) -> StoreError {
    match err {
        RollcallError::Unexpected(message) => StoreError::Malformed(message),
        other => StoreError::Transport(other.to_string()),
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
