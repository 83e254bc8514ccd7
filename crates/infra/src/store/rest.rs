//! PostgREST profile store
//!
//! Talks to the `Student` table through the store's REST endpoint. Every
//! request carries the anonymous key both as `apikey` and as bearer token.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_RANGE};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use rollcall_core::{ProfileStore, StoreResult};
use rollcall_domain::constants::{COLUMN_EMAIL, COLUMN_ID, REST_PATH};
use rollcall_domain::{
    ProfileCreationRequest, ProfileRecord, Result, RollcallError, StoreConfig, StoreError,
    StoreErrorBody,
};
use tracing::{debug, instrument};
use url::Url;

use crate::errors::transport_failure;
use crate::http::{Delivery, HttpClient};

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const PREFER: &str = "Prefer";

/// [`ProfileStore`] backed by a PostgREST table
pub struct PostgrestProfileStore {
    http: Arc<HttpClient>,
    table_url: Url,
    api_key: String,
}

impl PostgrestProfileStore {
    /// Create a store over an existing client.
    ///
    /// # Errors
    /// Returns `Config` if the store URL or table name do not form a valid URL.
    pub fn new(http: Arc<HttpClient>, config: &StoreConfig) -> Result<Self> {
        let base = config.url.trim_end_matches('/');
        let raw = format!("{base}{REST_PATH}/{}", config.table);
        let table_url = Url::parse(&raw)
            .map_err(|err| RollcallError::Config(format!("invalid store URL '{raw}': {err}")))?;

        if config.api_key.trim().is_empty() {
            return Err(RollcallError::Config("store API key is empty".into()));
        }

        Ok(Self { http, table_url, api_key: config.api_key.clone() })
    }

    pub fn table_url(&self) -> &Url {
        &self.table_url
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.http
            .request(method, self.table_url.clone())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Send `builder` and turn transport failures and error statuses into
    /// store errors.
    async fn dispatch(&self, builder: RequestBuilder, delivery: Delivery) -> StoreResult<Response> {
        let response = self.http.send(builder, delivery).await.map_err(transport_failure)?;
        ensure_success(response).await
    }

    fn email_filter(email: &str) -> (&'static str, String) {
        (COLUMN_EMAIL, format!("eq.{email}"))
    }
}

#[async_trait]
impl ProfileStore for PostgrestProfileStore {
    #[instrument(skip(self))]
    async fn email_exists(&self, email: &str) -> StoreResult<bool> {
        let builder = self.request(Method::GET).query(&[
            ("select", COLUMN_EMAIL.to_string()),
            Self::email_filter(email),
            ("limit", "1".to_string()),
        ]);

        let response = self.dispatch(builder, Delivery::Retryable).await?;
        let rows: Vec<serde_json::Value> = decode(response).await?;

        debug!(matches = rows.len(), "existence probe answered");
        Ok(!rows.is_empty())
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    async fn insert(&self, request: &ProfileCreationRequest) -> StoreResult<()> {
        let builder = self
            .request(Method::POST)
            .header(PREFER, "return=minimal")
            .json(request);

        // A replayed insert could collide with its own first attempt.
        self.dispatch(builder, Delivery::AtMostOnce).await?;

        debug!("insert accepted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn fetch_by_email(&self, email: &str) -> StoreResult<Option<ProfileRecord>> {
        let builder = self
            .request(Method::GET)
            .header(ACCEPT, HeaderValue::from_static(SINGLE_OBJECT))
            .query(&[("select", "*".to_string()), Self::email_filter(email)]);

        let response = self.dispatch(builder, Delivery::Retryable).await?;
        let record: ProfileRecord = decode(response).await?;

        Ok(Some(record))
    }

    #[instrument(skip(self))]
    async fn count(&self) -> StoreResult<u64> {
        let builder = self
            .request(Method::HEAD)
            .header(PREFER, "count=exact")
            .query(&[("select", COLUMN_ID)]);

        let response = self.dispatch(builder, Delivery::Retryable).await?;

        let range = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| StoreError::Malformed("count response without Content-Range".into()))?;

        parse_total(range)
    }
}

/// Pass successful responses through, turn everything else into a store error.
async fn ensure_success(response: Response) -> StoreResult<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    Err(rejection(response).await)
}

/// Build the store error for a non-success response.
///
/// A structured body is reported as is. Without one, server errors count as
/// transport failures and client errors are reported with the HTTP status
/// standing in for the code.
async fn rejection(response: Response) -> StoreError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    match serde_json::from_str::<StoreErrorBody>(&text) {
        Ok(body) if !body.message.is_empty() || body.code.is_some() => StoreError::Rejected(body),
        _ if status.is_server_error() => {
            StoreError::Transport(format!("HTTP {} {}", status.as_u16(), reason(status)))
        }
        _ => StoreError::Rejected(
            StoreErrorBody::new(format!("HTTP {} {}", status.as_u16(), reason(status)))
                .with_code(status.as_u16().to_string()),
        ),
    }
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> StoreResult<T> {
    let text = response
        .text()
        .await
        .map_err(|err| StoreError::Transport(format!("failed to read store response: {err}")))?;
    serde_json::from_str(&text).map_err(|err| StoreError::Malformed(err.to_string()))
}

fn reason(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("unknown status")
}

/// Total from a `Content-Range` header such as `0-24/3573` or `*/0`.
fn parse_total(range: &str) -> StoreResult<u64> {
    range
        .rsplit_once('/')
        .and_then(|(_, total)| total.trim().parse().ok())
        .ok_or_else(|| StoreError::Malformed(format!("unreadable Content-Range '{range}'")))
}
