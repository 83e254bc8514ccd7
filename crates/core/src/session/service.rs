//! Profile session service - restores the profile for the current identity

use std::sync::Arc;

use rollcall_domain::{DegradedProfile, Identity, LookupOutcome, ProfileRecord, Result, RollcallError};
use tracing::{debug, info};

use super::ports::SessionBridge;
use crate::profile::ReconciliationService;

/// What the application should render for the current session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionProfile {
    SignedOut,
    Loading,
    Ready(ProfileRecord),
    /// Signed in, but only a placeholder exists. Render with the indicator.
    Unavailable(DegradedProfile),
    Failed(RollcallError),
}

impl SessionProfile {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Failed(_))
    }

    pub fn record(&self) -> Option<&ProfileRecord> {
        match self {
            Self::Ready(record) => Some(record),
            _ => None,
        }
    }
}

impl From<LookupOutcome> for SessionProfile {
    fn from(outcome: LookupOutcome) -> Self {
        match outcome {
            LookupOutcome::Found(record) => Self::Ready(record),
            LookupOutcome::NotFoundDegraded(placeholder) => Self::Unavailable(placeholder),
            LookupOutcome::Failed(err) => Self::Failed(err),
        }
    }
}

/// Bridges the identity provider session to the profile store
pub struct ProfileSession {
    bridge: Arc<dyn SessionBridge>,
    profiles: Arc<ReconciliationService>,
}

impl ProfileSession {
    /// Create a new profile session
    pub fn new(bridge: Arc<dyn SessionBridge>, profiles: Arc<ReconciliationService>) -> Self {
        Self { bridge, profiles }
    }

    pub fn identity(&self) -> Option<Identity> {
        self.bridge.current_identity()
    }

    /// Resolve the profile for whoever is signed in
    pub async fn restore(&self) -> SessionProfile {
        if self.bridge.is_loading() {
            debug!("session still loading, profile restore deferred");
            return SessionProfile::Loading;
        }

        let Some(identity) = self.bridge.current_identity() else {
            debug!("no identity, nothing to restore");
            return SessionProfile::SignedOut;
        };

        let profile = SessionProfile::from(self.profiles.lookup_by_email(&identity.email).await);
        info!(
            subject = %identity.subject,
            degraded = profile.is_degraded(),
            "session profile restored"
        );
        profile
    }

    /// End the provider session
    pub async fn logout(&self) -> Result<()> {
        self.bridge.logout().await
    }
}
