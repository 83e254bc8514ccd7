//! Port interfaces for the identity provider session
//!
//! The reconciliation layer reads the current identity through this trait
//! and never depends on how the provider manages tokens.

use async_trait::async_trait;
use rollcall_domain::{Identity, Result};

/// Trait exposing the identity provider's current session
#[async_trait]
pub trait SessionBridge: Send + Sync {
    /// Identity of the signed-in person, if any
    fn current_identity(&self) -> Option<Identity>;

    /// Whether the provider is still establishing the session
    fn is_loading(&self) -> bool;

    /// End the current session
    async fn logout(&self) -> Result<()>;
}
