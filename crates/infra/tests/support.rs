//! Shared fixtures for adapter integration tests

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use rollcall_domain::{Config, ProfileCreationRequest, StoreConfig};
use rollcall_infra::{GoTrueSession, HttpClient, PostgrestProfileStore, RetryPolicy};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const API_KEY: &str = "anon-key";
pub const TABLE_PATH: &str = "/rest/v1/Student";

/// Fast-failing client so retry tests stay quick.
pub fn http_client() -> Arc<HttpClient> {
    Arc::new(
        HttpClient::new(Duration::from_secs(2), RetryPolicy::new(2, Duration::from_millis(5)))
            .expect("http client"),
    )
}

pub fn store_config(base_url: &str) -> StoreConfig {
    Config::for_store(base_url, API_KEY).store
}

pub fn rest_store(server: &MockServer) -> PostgrestProfileStore {
    PostgrestProfileStore::new(http_client(), &store_config(&server.uri()))
        .expect("store adapter")
}

pub fn gotrue_session(server: &MockServer) -> GoTrueSession {
    GoTrueSession::new(http_client(), format!("{}/auth/v1", server.uri()), API_KEY)
}

pub fn ana_request() -> ProfileCreationRequest {
    ProfileCreationRequest {
        email: "a@x.com".into(),
        last_name: "Pop".into(),
        first_name: "Ana".into(),
        group: "311".into(),
        year: 2,
        specialization: "CS".into(),
    }
}

/// Row as the store returns it for [`ana_request`].
pub fn ana_row(id: i64) -> Value {
    json!({
        "id": id,
        "Email": "a@x.com",
        "Nume": "Pop",
        "Prenume": "Ana",
        "Grupa": "311",
        "An": 2,
        "Specializare": "CS"
    })
}

pub fn token_response(subject: &str, email: &str) -> Value {
    json!({
        "access_token": "access-token",
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": "refresh-token",
        "user": { "id": subject, "email": email }
    })
}
