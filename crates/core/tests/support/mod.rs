//! Shared test helpers for `rollcall-core` integration tests.
//!
//! These helpers provide an in-memory profile store with fault injection and
//! a static session bridge, so tests can focus on behaviour instead of
//! boilerplate.

#![allow(dead_code)]

pub mod session;
pub mod stores;

use rollcall_domain::ProfileCreationRequest;

/// Profile request used by most scenarios.
pub fn ana_request() -> ProfileCreationRequest {
    request("a@x.com", "Pop", "Ana", "311", 2, "CS")
}

pub fn request(
    email: &str,
    last_name: &str,
    first_name: &str,
    group: &str,
    year: i32,
    specialization: &str,
) -> ProfileCreationRequest {
    ProfileCreationRequest {
        email: email.to_string(),
        last_name: last_name.to_string(),
        first_name: first_name.to_string(),
        group: group.to_string(),
        year,
        specialization: specialization.to_string(),
    }
}
