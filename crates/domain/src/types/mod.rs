//! Domain types and models

pub mod identity;
pub mod profile;
pub mod store;

pub use identity::Identity;
pub use profile::{
    DegradedProfile, LookupOutcome, ProfileCreationRequest, ProfileId, ProfileRecord,
};
pub use store::{StoreError, StoreErrorBody};
