//! Session-driven profile restoration

pub mod ports;
pub mod service;

pub use ports::*;
pub use service::*;
