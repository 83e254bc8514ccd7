//! # Rollcall App
//!
//! Command-line shell around the reconciliation layer.
//!
//! This crate contains:
//! - CLI definition and command handlers
//! - Application context (dependency injection)
//! - Logging setup
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture
//! - The only crate that uses `anyhow`

pub mod cli;
pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use cli::{Cli, Command};
pub use context::*;
