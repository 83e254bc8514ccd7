//! Port interfaces for profile persistence
//!
//! These traits define the boundary between the reconciliation logic and
//! the remote store that holds one profile row per email.

use async_trait::async_trait;
use rollcall_domain::{ProfileCreationRequest, ProfileRecord, StoreError};

/// Result type returned by store adapters
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Trait for the table-shaped profile store
///
/// Email comparison follows the store's own semantics; callers normalise
/// beforehand if they need a different policy.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Existence probe: does any row carry `email`? Must not fetch full rows.
    async fn email_exists(&self, email: &str) -> StoreResult<bool>;

    /// Insert one row without asking for it back
    async fn insert(&self, request: &ProfileCreationRequest) -> StoreResult<()>;

    /// Fetch the single row for `email`, `None` when there is none
    async fn fetch_by_email(&self, email: &str) -> StoreResult<Option<ProfileRecord>>;

    /// Count-only probe of the profile table
    async fn count(&self) -> StoreResult<u64>;
}
