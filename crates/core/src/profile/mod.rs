//! Profile reconciliation domain

pub mod classify;
pub mod ports;
pub mod service;

pub use ports::*;
pub use service::*;
