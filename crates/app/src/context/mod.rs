//! Application context - dependency injection container

use std::sync::Arc;

use rollcall_core::{ProfileSession, ProfileStore, ReconciliationService};
use rollcall_domain::{Config, Result};
use rollcall_infra::{config, GoTrueSession, HttpClient, InMemoryProfileStore, PostgrestProfileStore};
use tracing::{info, warn};

use crate::cli::Cli;

/// Store URL assumed for `--memory` runs with no configuration at all: the
/// default address of a local Supabase stack.
pub const LOCAL_STACK_URL: &str = "http://127.0.0.1:54321";

/// Application context - holds all services and dependencies
///
/// Built once per process. The HTTP client, and with it the connection
/// pool, is shared by the store adapter and the identity provider client.
pub struct AppContext {
    pub config: Config,
    pub profiles: Arc<ReconciliationService>,
    pub auth: Arc<GoTrueSession>,
    pub session: ProfileSession,
}

impl AppContext {
    /// Build the context the command line asks for
    ///
    /// With `--memory` and nothing to load (no env vars, no config file on
    /// the probe paths) the identity provider points at [`LOCAL_STACK_URL`].
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config = match &cli.config {
            Some(path) => config::load_from_file(Some(path.clone()))?,
            None if cli.memory => load_or_local_stack()?,
            None => config::load()?,
        };

        if cli.memory {
            return Self::with_store(config, Arc::new(InMemoryProfileStore::new()));
        }
        Self::new_with_config(config)
    }

    /// Wire the remote profile store described by `config`
    pub fn new_with_config(config: Config) -> Result<Self> {
        let http = Arc::new(HttpClient::for_store(&config.store)?);
        let store = Arc::new(PostgrestProfileStore::new(Arc::clone(&http), &config.store)?);
        info!(table = %config.store.table, url = %store.table_url(), "using remote profile store");

        Self::assemble(config, http, store)
    }

    /// Wire an explicit profile store, keeping the remote identity provider
    pub fn with_store(config: Config, store: Arc<dyn ProfileStore>) -> Result<Self> {
        let http = Arc::new(HttpClient::for_store(&config.store)?);
        info!("using injected profile store");

        Self::assemble(config, http, store)
    }

    fn assemble(config: Config, http: Arc<HttpClient>, store: Arc<dyn ProfileStore>) -> Result<Self> {
        if !config.retries_fit_operation_timeout() {
            warn!(
                read_budget_ms = config.store.read_budget().as_millis() as u64,
                operation_timeout_ms = config.reconciliation.operation_timeout_ms,
                "store retries exceed the operation timeout; late attempts will be abandoned"
            );
        }

        let profiles = Arc::new(ReconciliationService::from_config(store, &config.reconciliation));
        let auth = Arc::new(GoTrueSession::new(http, config.auth_url(), config.store.api_key.clone()));
        let session = ProfileSession::new(auth.clone(), Arc::clone(&profiles));

        Ok(Self { config, profiles, auth, session })
    }
}

fn load_or_local_stack() -> Result<Config> {
    match config::load() {
        Ok(config) => Ok(config),
        Err(err) if config::probe_config_paths().is_none() => {
            warn!(error = %err, url = LOCAL_STACK_URL, "no configuration found, assuming local stack");
            Ok(Config::for_store(LOCAL_STACK_URL, ""))
        }
        Err(err) => Err(err),
    }
}
