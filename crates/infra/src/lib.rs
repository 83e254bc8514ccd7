//! # Rollcall Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The HTTP client shared by every remote adapter
//! - Profile store adapters (PostgREST over HTTP, in-memory)
//! - The identity provider session client
//! - Configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `rollcall-core`
//! - Depends on `rollcall-domain` and `rollcall-core`
//! - Contains all "impure" code (network I/O, environment, files)

pub mod auth;
pub mod config;
pub mod errors;
pub mod http;
pub mod store;

// Re-export commonly used items
pub use auth::*;
pub use errors::*;
pub use http::*;
pub use store::*;
