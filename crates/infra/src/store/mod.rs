//! Profile store adapters

pub mod memory;
pub mod rest;

pub use memory::InMemoryProfileStore;
pub use rest::PostgrestProfileStore;
