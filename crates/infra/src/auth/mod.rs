//! Identity provider client
//!
//! Password sign-in against the GoTrue-compatible auth endpoint that sits
//! next to the profile store. The resulting session backs the core
//! [`SessionBridge`](rollcall_core::SessionBridge).

pub mod gotrue;

pub use gotrue::{AuthSession, GoTrueSession, SignUpOutcome};
