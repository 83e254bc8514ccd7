//! GoTrue session client

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::{Method, RequestBuilder, Response};
use rollcall_core::SessionBridge;
use rollcall_domain::{Identity, Result, RollcallError};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, instrument, warn};

use crate::http::{Delivery, HttpClient};

/// Tokens and identity for a signed-in user
#[derive(Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,
    pub identity: Identity,
}

// Tokens never reach logs.
impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("expires_in", &self.expires_in)
            .field("identity", &self.identity)
            .finish()
    }
}

/// Result of a sign-up request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
    /// The provider confirmed the account immediately and opened a session.
    SignedIn(Identity),
    /// The account exists but the email must be confirmed before sign-in.
    ConfirmationRequired { email: String },
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
    user: ProviderUser,
}

#[derive(Debug, Deserialize)]
struct ProviderUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

/// Error shapes used by the auth endpoint across versions
#[derive(Debug, Default, Deserialize)]
struct ProviderError {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ProviderError {
    fn into_message(self) -> Option<String> {
        self.error_description.or(self.msg).or(self.message).or(self.error)
    }
}

impl ProviderUser {
    fn into_identity(self, fallback_email: &str) -> Identity {
        let email = self.email.unwrap_or_else(|| fallback_email.to_string());
        Identity::new(self.id, email)
    }
}

/// Session against a GoTrue-compatible identity provider
///
/// Holds at most one session. `is_loading` reports `true` while a sign-in
/// is in flight.
pub struct GoTrueSession {
    http: Arc<HttpClient>,
    auth_url: String,
    api_key: String,
    session: RwLock<Option<AuthSession>>,
    loading: AtomicBool,
}

/// Clears the loading flag when a sign-in finishes or is abandoned.
struct LoadingGuard<'a>(&'a AtomicBool);

impl<'a> LoadingGuard<'a> {
    fn start(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl GoTrueSession {
    /// Create a signed-out session client
    ///
    /// # Arguments
    ///
    /// * `http` - Shared HTTP client
    /// * `auth_url` - Auth endpoint base, e.g. `https://project.supabase.co/auth/v1`
    /// * `api_key` - Anonymous project key
    pub fn new(http: Arc<HttpClient>, auth_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            auth_url: auth_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            session: RwLock::new(None),
            loading: AtomicBool::new(false),
        }
    }

    /// Current session, if any
    pub fn session(&self) -> Option<AuthSession> {
        self.session.read().clone()
    }

    /// Sign in with email and password
    ///
    /// # Errors
    ///
    /// - `Auth` if the provider rejects the credentials
    /// - `StoreUnavailable` if the provider cannot be reached
    #[instrument(skip(self, password))]
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Identity> {
        let _loading = LoadingGuard::start(&self.loading);

        let builder = self
            .request(Method::POST, "token")
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }));

        let response = self.http.send(builder, Delivery::AtMostOnce).await?;
        let tokens: TokenResponse = decode(ensure_success(response).await?).await?;
        let session = self.open_session(tokens, email);

        info!(subject = %session.identity.subject, "signed in");
        let identity = session.identity.clone();
        *self.session.write() = Some(session);
        Ok(identity)
    }

    /// Register an account with the provider
    ///
    /// Depending on the project settings the provider either opens a session
    /// right away or asks for email confirmation first.
    ///
    /// # Errors
    ///
    /// Returns `Auth` if the provider refuses the registration.
    #[instrument(skip(self, password))]
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome> {
        let builder = self
            .request(Method::POST, "signup")
            .json(&json!({ "email": email, "password": password }));

        let response = self.http.send(builder, Delivery::AtMostOnce).await?;
        let body: serde_json::Value = decode(ensure_success(response).await?).await?;

        if body.get("access_token").is_some() {
            let tokens: TokenResponse = serde_json::from_value(body).map_err(|err| {
                RollcallError::Unexpected(format!("unreadable sign-up session: {err}"))
            })?;
            let session = self.open_session(tokens, email);
            let identity = session.identity.clone();
            *self.session.write() = Some(session);
            info!(subject = %identity.subject, "signed up and signed in");
            return Ok(SignUpOutcome::SignedIn(identity));
        }

        debug!("sign-up awaiting email confirmation");
        Ok(SignUpOutcome::ConfirmationRequired { email: email.to_string() })
    }

    /// Ask the provider to send a password reset email
    #[instrument(skip(self))]
    pub async fn recover(&self, email: &str) -> Result<()> {
        let builder = self.request(Method::POST, "recover").json(&json!({ "email": email }));

        let response = self.http.send(builder, Delivery::AtMostOnce).await?;
        ensure_success(response).await?;

        info!("password reset requested");
        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}/{}", self.auth_url, path))
            .header("apikey", &self.api_key)
    }

    fn open_session(&self, tokens: TokenResponse, email: &str) -> AuthSession {
        AuthSession {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
            identity: tokens.user.into_identity(email),
        }
    }
}

#[async_trait]
impl SessionBridge for GoTrueSession {
    fn current_identity(&self) -> Option<Identity> {
        self.session.read().as_ref().map(|session| session.identity.clone())
    }

    fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Drop the local session and revoke it with the provider.
    ///
    /// The local session is cleared even when revocation fails.
    #[instrument(skip(self))]
    async fn logout(&self) -> Result<()> {
        let taken = self.session.write().take();
        let Some(session) = taken else {
            debug!("logout without session");
            return Ok(());
        };

        let builder = self.request(Method::POST, "logout").bearer_auth(&session.access_token);
        let response = self.http.send(builder, Delivery::AtMostOnce).await;

        match response {
            Ok(response) => {
                ensure_success(response).await?;
                info!(subject = %session.identity.subject, "signed out");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "session cleared locally, provider revocation failed");
                Err(err)
            }
        }
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ProviderError>(&text)
        .ok()
        .and_then(ProviderError::into_message)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

    if status.is_server_error() {
        return Err(RollcallError::StoreUnavailable(format!("identity provider: {message}")));
    }
    Err(RollcallError::Auth(message))
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
    response
        .json()
        .await
        .map_err(|err| RollcallError::Unexpected(format!("unreadable identity provider response: {err}")))
}
