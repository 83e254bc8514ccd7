//! # Rollcall Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (traits) for the profile store and the session bridge
//! - Store error classification
//! - The reconciliation and session services
//!
//! ## Architecture Principles
//! - Only depends on `rollcall-domain`
//! - No HTTP or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod profile;
pub mod session;

// Re-export specific items to avoid ambiguity
pub use profile::classify::{classify, StoreErrorClass};
pub use profile::ports::{ProfileStore, StoreResult};
pub use profile::ReconciliationService;
pub use session::ports::SessionBridge;
pub use session::{ProfileSession, SessionProfile};
