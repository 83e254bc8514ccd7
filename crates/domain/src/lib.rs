//! # Rollcall Domain
//!
//! Business domain types and models for Rollcall.
//!
//! This crate contains:
//! - Profile and identity data types
//! - The error taxonomy and Result definition
//! - Configuration structures
//! - Store schema constants
//!
//! ## Architecture
//! - No dependencies on other Rollcall crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
