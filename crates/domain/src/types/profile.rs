//! Profile types
//!
//! A profile is the secondary record (name, group, year, specialization)
//! keyed by the identity's email. Field names map onto the store's column
//! names through serde renames.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::PROFILE_UNAVAILABLE_INDICATOR;
use crate::errors::{Result, RollcallError};

/// Store-assigned profile identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(pub i64);

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fields accepted when registering a new profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileCreationRequest {
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Nume")]
    pub last_name: String,
    #[serde(rename = "Prenume")]
    pub first_name: String,
    #[serde(rename = "Grupa")]
    pub group: String,
    #[serde(rename = "An")]
    pub year: i32,
    #[serde(rename = "Specializare")]
    pub specialization: String,
}

impl ProfileCreationRequest {
    /// Reject requests that cannot be keyed.
    pub fn validate(&self) -> Result<()> {
        if self.email.trim().is_empty() {
            return Err(RollcallError::InvalidInput("email is required".into()));
        }
        Ok(())
    }
}

/// A profile as held by the store
///
/// `id` is `None` when the record was synthesised after an insert that did
/// not echo the row back; a later lookup resolves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProfileId>,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Nume")]
    pub last_name: String,
    #[serde(rename = "Prenume")]
    pub first_name: String,
    #[serde(rename = "Grupa")]
    pub group: String,
    #[serde(rename = "An")]
    pub year: i32,
    #[serde(rename = "Specializare")]
    pub specialization: String,
}

impl ProfileRecord {
    /// Build a record from a request whose store id is not known.
    pub fn unpersisted(request: ProfileCreationRequest) -> Self {
        Self::with_id(request, None)
    }

    pub fn with_id(request: ProfileCreationRequest, id: Option<ProfileId>) -> Self {
        Self {
            id,
            email: request.email,
            last_name: request.last_name,
            first_name: request.first_name,
            group: request.group,
            year: request.year,
            specialization: request.specialization,
        }
    }

    pub fn has_known_id(&self) -> bool {
        self.id.is_some()
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// Whether this record carries exactly the fields of `request`.
    pub fn matches_request(&self, request: &ProfileCreationRequest) -> bool {
        self.email == request.email
            && self.last_name == request.last_name
            && self.first_name == request.first_name
            && self.group == request.group
            && self.year == request.year
            && self.specialization == request.specialization
    }
}

/// Placeholder returned when the store has no profile for an email
///
/// Deliberately a separate type from [`ProfileRecord`]: it only knows the
/// email, so it can never be rendered as real profile data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegradedProfile {
    pub email: String,
}

impl DegradedProfile {
    pub fn new(email: impl Into<String>) -> Self {
        Self { email: email.into() }
    }

    /// Label the UI shows instead of profile details.
    pub fn indicator(&self) -> &'static str {
        PROFILE_UNAVAILABLE_INDICATOR
    }
}

/// Outcome of a profile lookup by email
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Exactly one persisted record matched.
    Found(ProfileRecord),
    /// The store authoritatively reported no such record.
    NotFoundDegraded(DegradedProfile),
    /// The store could not answer; no data is implied.
    Failed(RollcallError),
}

impl LookupOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn record(&self) -> Option<&ProfileRecord> {
        match self {
            Self::Found(record) => Some(record),
            _ => None,
        }
    }

    /// Collapse into a `Result`, treating the degraded placeholder as absence.
    pub fn into_result(self) -> Result<Option<ProfileRecord>> {
        match self {
            Self::Found(record) => Ok(Some(record)),
            Self::NotFoundDegraded(_) => Ok(None),
            Self::Failed(err) => Err(err),
        }
    }
}
