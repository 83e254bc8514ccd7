//! Profile reconciliation service - core business logic

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rollcall_domain::constants::DEFAULT_OPERATION_TIMEOUT_MS;
use rollcall_domain::{
    DegradedProfile, EmailPolicy, LookupOutcome, ProfileCreationRequest, ProfileRecord,
    ReconciliationConfig, Result, RollcallError, StoreError,
};
use tracing::{debug, error, info, instrument, warn};

use super::classify::{classify, describe, StoreErrorClass};
use super::ports::{ProfileStore, StoreResult};

/// Reconciles identities with their profile records in the store
///
/// Holds no mutable state; share it through `Arc`. Each store round-trip
/// runs in its own task bounded by `timeout`, so a caller that gives up does
/// not cancel a write already in flight, and a late result is dropped.
pub struct ReconciliationService {
    store: Arc<dyn ProfileStore>,
    timeout: Duration,
    email_policy: EmailPolicy,
}

/// Why a single store call did not produce a value
#[derive(Debug)]
enum CallFailure {
    Store(StoreError),
    TimedOut(Duration),
    Aborted(String),
}

impl CallFailure {
    fn into_error(self, email: &str) -> RollcallError {
        match self {
            Self::Store(err) => classify(&err).into_error(&err, email),
            Self::TimedOut(timeout) => {
                RollcallError::StoreUnavailable(format!("store did not answer within {timeout:?}"))
            }
            Self::Aborted(reason) => {
                RollcallError::Unexpected(format!("store call aborted: {reason}"))
            }
        }
    }
}

impl ReconciliationService {
    /// Create a new reconciliation service over `store`
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self {
            store,
            timeout: Duration::from_millis(DEFAULT_OPERATION_TIMEOUT_MS),
            email_policy: EmailPolicy::default(),
        }
    }

    /// Create a service configured from the reconciliation settings
    pub fn from_config(store: Arc<dyn ProfileStore>, config: &ReconciliationConfig) -> Self {
        Self::new(store)
            .with_timeout(config.operation_timeout())
            .with_email_policy(config.email_policy)
    }

    /// Bound every store round-trip by `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_email_policy(mut self, policy: EmailPolicy) -> Self {
        self.email_policy = policy;
        self
    }

    /// Advisory check whether a profile exists for `email`.
    ///
    /// Any store failure is answered with `false` so registration stays
    /// unblocked during outages. The answer can therefore be a false
    /// negative and must never be used as a uniqueness guarantee.
    #[instrument(skip(self))]
    pub async fn exists_by_email(&self, email: &str) -> bool {
        let key = self.email_policy.apply(email).into_owned();

        match self.call(move |store| async move { store.email_exists(&key).await }).await {
            Ok(exists) => {
                debug!(exists, "existence probe answered");
                exists
            }
            Err(failure) => {
                warn!(error = ?failure, "existence probe failed, treating email as unregistered");
                false
            }
        }
    }

    /// Register a new profile.
    ///
    /// The existence probe is only a fast path: another client can insert the
    /// same email between the probe and the insert. The store's unique
    /// violation is the authoritative duplicate signal and wins over the probe.
    ///
    /// On success the returned record has no id; the insert does not echo the
    /// row back, and a later lookup resolves it.
    ///
    /// # Errors
    /// - `InvalidInput` if the email is empty
    /// - `DuplicateProfile` if the probe or the unique constraint reports one
    /// - `StoreUnavailable` on connectivity, permission or timeout failures
    /// - `Unexpected` on malformed responses or adapter failures
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn create(&self, mut request: ProfileCreationRequest) -> Result<ProfileRecord> {
        request.validate()?;
        request.email = self.email_policy.apply(&request.email).into_owned();

        if self.exists_by_email(&request.email).await {
            warn!("profile already exists, insert skipped");
            return Err(RollcallError::DuplicateProfile(request.email));
        }

        let payload = request.clone();
        match self.call(move |store| async move { store.insert(&payload).await }).await {
            Ok(()) => {
                info!("profile created");
                Ok(ProfileRecord::unpersisted(request))
            }
            Err(CallFailure::Store(err)) => {
                let mapped = match classify(&err) {
                    StoreErrorClass::UniqueViolation => {
                        warn!("duplicate detected by store constraint");
                        RollcallError::DuplicateProfile(request.email)
                    }
                    StoreErrorClass::Unavailable => {
                        RollcallError::StoreUnavailable(describe(&err))
                    }
                    StoreErrorClass::NotFound | StoreErrorClass::Unexpected => {
                        RollcallError::Unexpected(describe(&err))
                    }
                };
                log_failure("create", &mapped);
                Err(mapped)
            }
            Err(failure) => {
                let mapped = failure.into_error(&request.email);
                log_failure("create", &mapped);
                Err(mapped)
            }
        }
    }

    /// Look up the profile for `email`.
    ///
    /// Only a genuine "no such row" answer yields the degraded placeholder;
    /// every other failure is reported as `Failed` with no data attached.
    #[instrument(skip(self))]
    pub async fn lookup_by_email(&self, email: &str) -> LookupOutcome {
        let key = self.email_policy.apply(email).into_owned();
        let query = key.clone();

        match self.call(move |store| async move { store.fetch_by_email(&query).await }).await {
            Ok(Some(record)) => {
                info!(id = ?record.id, "profile found");
                LookupOutcome::Found(record)
            }
            Ok(None) => {
                warn!("no profile stored for email, returning placeholder");
                LookupOutcome::NotFoundDegraded(DegradedProfile::new(key))
            }
            Err(CallFailure::Store(err)) => match classify(&err) {
                StoreErrorClass::NotFound => {
                    warn!(error = %err, "store reported no profile, returning placeholder");
                    LookupOutcome::NotFoundDegraded(DegradedProfile::new(key))
                }
                StoreErrorClass::Unavailable => {
                    let mapped = RollcallError::StoreUnavailable(describe(&err));
                    log_failure("lookup", &mapped);
                    LookupOutcome::Failed(mapped)
                }
                StoreErrorClass::UniqueViolation | StoreErrorClass::Unexpected => {
                    let mapped = RollcallError::Unexpected(describe(&err));
                    log_failure("lookup", &mapped);
                    LookupOutcome::Failed(mapped)
                }
            },
            Err(failure) => {
                let mapped = failure.into_error(&key);
                log_failure("lookup", &mapped);
                LookupOutcome::Failed(mapped)
            }
        }
    }

    /// Count-only probe of the profile table.
    ///
    /// Returns the number of stored profiles when the store answers.
    #[instrument(skip(self))]
    pub async fn check_connection(&self) -> Result<u64> {
        match self.call(|store| async move { store.count().await }).await {
            Ok(count) => {
                info!(count, "profile store reachable");
                Ok(count)
            }
            Err(failure) => {
                let mapped = match failure {
                    CallFailure::Store(err) => match classify(&err) {
                        StoreErrorClass::Unexpected => RollcallError::Unexpected(describe(&err)),
                        _ => RollcallError::StoreUnavailable(describe(&err)),
                    },
                    other => other.into_error(""),
                };
                warn!(error = %mapped, "profile store connection check failed");
                Err(mapped)
            }
        }
    }

    /// Run one store call in its own task, bounded by the service timeout.
    async fn call<T, F, Fut>(&self, operation: F) -> std::result::Result<T, CallFailure>
    where
        F: FnOnce(Arc<dyn ProfileStore>) -> Fut,
        Fut: Future<Output = StoreResult<T>> + Send + 'static,
        T: Send + 'static,
    {
        let handle = tokio::spawn(operation(Arc::clone(&self.store)));

        match tokio::time::timeout(self.timeout, handle).await {
            Ok(Ok(Ok(value))) => Ok(value),
            Ok(Ok(Err(err))) => Err(CallFailure::Store(err)),
            Ok(Err(join_err)) => Err(CallFailure::Aborted(join_err.to_string())),
            Err(_) => Err(CallFailure::TimedOut(self.timeout)),
        }
    }
}

fn log_failure(operation: &'static str, err: &RollcallError) {
    match err {
        RollcallError::Unexpected(_) => {
            error!(operation, error_type = err.label(), error = %err, "profile operation failed")
        }
        _ => warn!(operation, error_type = err.label(), error = %err, "profile operation failed"),
    }
}
