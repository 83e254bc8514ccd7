//! Shell utilities

pub mod logging;
