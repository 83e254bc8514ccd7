//! In-memory profile store with fault injection
//!
//! Enforces the email unique constraint the way the real store does, and
//! lets tests break individual operations.

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rollcall_core::{ProfileStore, StoreResult};
use rollcall_domain::{
    ProfileCreationRequest, ProfileId, ProfileRecord, StoreError, StoreErrorBody,
};

#[derive(Default, Clone)]
struct Faults {
    probe: Option<StoreError>,
    insert: Option<StoreError>,
    fetch: Option<StoreError>,
    count: Option<StoreError>,
    stale_probe: bool,
    insert_delay: Option<Duration>,
    fetch_delay: Option<Duration>,
    panic_on_insert: bool,
}

/// Profile store fake backed by a vector.
#[derive(Default)]
pub struct FakeProfileStore {
    rows: Mutex<Vec<ProfileRecord>>,
    next_id: AtomicI64,
    faults: Mutex<Faults>,
    probes: AtomicUsize,
    inserts: AtomicUsize,
    fetches: AtomicUsize,
}

impl FakeProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a persisted row.
    pub fn with_record(self, request: ProfileCreationRequest) -> Self {
        let id = self.allocate_id();
        self.rows.lock().push(ProfileRecord::with_id(request, Some(id)));
        self
    }

    pub fn fail_probe(self, err: StoreError) -> Self {
        self.faults.lock().probe = Some(err);
        self
    }

    pub fn fail_insert(self, err: StoreError) -> Self {
        self.faults.lock().insert = Some(err);
        self
    }

    pub fn fail_fetch(self, err: StoreError) -> Self {
        self.faults.lock().fetch = Some(err);
        self
    }

    pub fn fail_count(self, err: StoreError) -> Self {
        self.faults.lock().count = Some(err);
        self
    }

    /// Existence probe always answers `false`, as if another client's insert
    /// had not been visible yet.
    pub fn stale_probe(self) -> Self {
        self.faults.lock().stale_probe = true;
        self
    }

    pub fn delay_insert(self, delay: Duration) -> Self {
        self.faults.lock().insert_delay = Some(delay);
        self
    }

    pub fn delay_fetch(self, delay: Duration) -> Self {
        self.faults.lock().fetch_delay = Some(delay);
        self
    }

    pub fn panic_on_insert(self) -> Self {
        self.faults.lock().panic_on_insert = true;
        self
    }

    pub fn rows_for(&self, email: &str) -> usize {
        self.rows.lock().iter().filter(|row| row.email == email).count()
    }

    pub fn insert_calls(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    pub fn probe_calls(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn allocate_id(&self) -> ProfileId {
        ProfileId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn faults(&self) -> Faults {
        self.faults.lock().clone()
    }
}

/// Store error matching what PostgREST returns for a duplicate email.
pub fn unique_violation(email: &str) -> StoreError {
    StoreError::Rejected(
        StoreErrorBody::new("duplicate key value violates unique constraint \"Student_Email_key\"")
            .with_code("23505")
            .with_details(format!("Key (\"Email\")=({email}) already exists.")),
    )
}

pub fn connection_refused() -> StoreError {
    StoreError::Transport("HTTP connection failure".into())
}

#[async_trait]
impl ProfileStore for FakeProfileStore {
    async fn email_exists(&self, email: &str) -> StoreResult<bool> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        let faults = self.faults();
        if let Some(err) = faults.probe {
            return Err(err);
        }
        if faults.stale_probe {
            return Ok(false);
        }
        Ok(self.rows.lock().iter().any(|row| row.email == email))
    }

    async fn insert(&self, request: &ProfileCreationRequest) -> StoreResult<()> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        let faults = self.faults();
        if let Some(delay) = faults.insert_delay {
            tokio::time::sleep(delay).await;
        }
        if faults.panic_on_insert {
            panic!("fake store insert exploded");
        }
        if let Some(err) = faults.insert {
            return Err(err);
        }

        let mut rows = self.rows.lock();
        if rows.iter().any(|row| row.email == request.email) {
            return Err(unique_violation(&request.email));
        }
        let id = self.allocate_id();
        rows.push(ProfileRecord::with_id(request.clone(), Some(id)));
        Ok(())
    }

    async fn fetch_by_email(&self, email: &str) -> StoreResult<Option<ProfileRecord>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let faults = self.faults();
        if let Some(delay) = faults.fetch_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(err) = faults.fetch {
            return Err(err);
        }
        Ok(self.rows.lock().iter().find(|row| row.email == email).cloned())
    }

    async fn count(&self) -> StoreResult<u64> {
        if let Some(err) = self.faults().count {
            return Err(err);
        }
        Ok(self.rows.lock().len() as u64)
    }
}
