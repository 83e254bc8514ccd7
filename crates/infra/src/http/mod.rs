//! HTTP client shared by remote adapters

pub mod client;

pub use client::{Delivery, HttpClient, RetryPolicy};
