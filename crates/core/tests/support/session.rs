//! Static session bridge for session tests

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use rollcall_core::SessionBridge;
use rollcall_domain::{Identity, Result as DomainResult};

/// Session bridge whose state is set by the test.
#[derive(Default)]
pub struct StaticSession {
    identity: Mutex<Option<Identity>>,
    loading: AtomicBool,
}

impl StaticSession {
    pub fn signed_in(email: &str) -> Self {
        let session = Self::default();
        *session.identity.lock() = Some(Identity::new("subject-1", email));
        session
    }

    pub fn loading() -> Self {
        let session = Self::default();
        session.loading.store(true, Ordering::SeqCst);
        session
    }
}

#[async_trait]
impl SessionBridge for StaticSession {
    fn current_identity(&self) -> Option<Identity> {
        self.identity.lock().clone()
    }

    fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    async fn logout(&self) -> DomainResult<()> {
        self.identity.lock().take();
        Ok(())
    }
}
