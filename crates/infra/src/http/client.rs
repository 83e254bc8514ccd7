use std::time::Duration;

use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use rollcall_domain::{backoff_delay, RollcallError, StoreConfig};
use tracing::debug;

use crate::errors::InfraError;

/// Whether a request may be replayed after a transient failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Reads: replayed on connect errors, timeouts and 5xx answers.
    Retryable,
    /// Writes: sent once. A replay could collide with a first attempt the
    /// server already applied.
    AtMostOnce,
}

/// How many times a retryable request is tried and how long to wait between tries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub base_backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, base_backoff: Duration) -> Self {
        Self { max_attempts: max_attempts.max(1), base_backoff }
    }

    fn attempts(&self, delivery: Delivery) -> usize {
        match delivery {
            Delivery::Retryable => self.max_attempts,
            Delivery::AtMostOnce => 1,
        }
    }
}

/// Shared HTTP client for the store and identity provider adapters.
///
/// Built once per process; the inner reqwest client pools connections.
#[derive(Clone)]
pub struct HttpClient {
    inner: ReqwestClient,
    retry: RetryPolicy,
}

/// Result of one attempt before the retry decision.
enum Attempt {
    Answered(Response),
    ServerError(Response),
    Failed(reqwest::Error),
}

impl HttpClient {
    /// Client with a per-request `timeout` and the given retry policy.
    ///
    /// # Errors
    /// Returns `Config` if the TLS backend cannot be initialised.
    pub fn new(timeout: Duration, retry: RetryPolicy) -> Result<Self, RollcallError> {
        let inner = ReqwestClient::builder()
            .timeout(timeout)
            .user_agent(concat!("rollcall/", env!("CARGO_PKG_VERSION")))
            .no_proxy()
            .build()
            .map_err(into_rollcall)?;

        Ok(Self { inner, retry })
    }

    /// Client tuned by the store's timeout and attempt settings.
    pub fn for_store(config: &StoreConfig) -> Result<Self, RollcallError> {
        Self::new(config.timeout(), RetryPolicy::new(config.max_attempts, config.backoff()))
    }

    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.inner.request(method, url)
    }

    /// Send a request, replaying it only when `delivery` allows.
    ///
    /// Once attempts run out the last response is returned as is, 5xx
    /// included, so adapters can read the error body.
    pub async fn send(
        &self,
        builder: RequestBuilder,
        delivery: Delivery,
    ) -> Result<Response, RollcallError> {
        let attempts = self.retry.attempts(delivery);

        for attempt in 1..attempts {
            // Streaming bodies cannot be replayed.
            let Some(replay) = builder.try_clone() else {
                break;
            };

            match self.attempt(replay, attempt).await? {
                Attempt::Answered(response) => return Ok(response),
                Attempt::ServerError(_) => {}
                Attempt::Failed(err) if is_transient(&err) => {}
                Attempt::Failed(err) => return Err(into_rollcall(err)),
            }

            let delay = backoff_delay(self.retry.base_backoff, attempt);
            debug!(attempt, delay_ms = delay.as_millis() as u64, "retrying store request");
            tokio::time::sleep(delay).await;
        }

        match self.attempt(builder, attempts).await? {
            Attempt::Answered(response) | Attempt::ServerError(response) => Ok(response),
            Attempt::Failed(err) => Err(into_rollcall(err)),
        }
    }

    async fn attempt(&self, builder: RequestBuilder, attempt: usize) -> Result<Attempt, RollcallError> {
        let request = builder.build().map_err(into_rollcall)?;
        let method = request.method().clone();
        let url = request.url().clone();

        match self.inner.execute(request).await {
            Ok(response) => {
                let status = response.status();
                debug!(attempt, %method, %url, %status, "HTTP response");
                if status.is_server_error() {
                    Ok(Attempt::ServerError(response))
                } else {
                    Ok(Attempt::Answered(response))
                }
            }
            Err(err) => {
                debug!(attempt, %method, %url, error = %err, "HTTP request failed");
                Ok(Attempt::Failed(err))
            }
        }
    }
}

fn is_transient(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}

fn into_rollcall(err: reqwest::Error) -> RollcallError {
    InfraError::from(err).into()
}
