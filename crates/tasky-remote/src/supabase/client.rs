//! HTTP plumbing shared by the Supabase gateway and auth client.

use std::sync::Arc;

use parking_lot::RwLock;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tasky_core::config::SupabaseSettings;
use tasky_core::{TaskyError, TaskyResult};

/// `Accept` value asking PostgREST for a single object instead of an array.
pub const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Extract a human-readable message from an error body.
///
/// PostgREST reports `message`; GoTrue uses `error_description` or `msg`.
pub fn error_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error_description", "msg", "error"] {
            if let Some(text) = json.get(key).and_then(|v| v.as_str()) {
                return text.to_string();
            }
        }
    }
    body.trim().to_string()
}

pub(crate) fn transport(error: reqwest::Error) -> TaskyError {
    TaskyError::Remote(error.to_string())
}

/// Cheap to clone; clones share the session token.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    http: Client,
    url: String,
    anon_key: String,
    access_token: Arc<RwLock<Option<String>>>,
}

impl SupabaseClient {
    pub fn new(settings: SupabaseSettings) -> Self {
        Self {
            http: Client::new(),
            url: settings.url.trim_end_matches('/').to_string(),
            anon_key: settings.anon_key,
            access_token: Arc::new(RwLock::new(settings.access_token)),
        }
    }

    pub fn access_token(&self) -> Option<String> {
        self.access_token.read().clone()
    }

    pub fn set_access_token(&self, token: Option<String>) {
        *self.access_token.write() = token;
    }

    pub fn has_session(&self) -> bool {
        self.access_token.read().is_some()
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let bearer = self.access_token().unwrap_or_else(|| self.anon_key.clone());
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
    }

    /// Request against a PostgREST table.
    pub(crate) fn rest(&self, method: Method, table: &str) -> RequestBuilder {
        let url = format!("{}/rest/v1/{}", self.url, table);
        tracing::debug!("{} {}", method, url);
        self.authorize(self.http.request(method, url))
    }

    /// Request against a GoTrue endpoint.
    pub(crate) fn auth(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/auth/v1/{}", self.url, path);
        tracing::debug!("{} {}", method, url);
        self.authorize(self.http.request(method, url))
    }
}

async fn check(response: Response) -> TaskyResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body);
    tracing::debug!("Request failed with {}: {}", status, message);
    match status {
        StatusCode::UNAUTHORIZED => Err(TaskyError::Unauthenticated(message)),
        _ => Err(TaskyError::Remote(message)),
    }
}

pub(crate) async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> TaskyResult<T> {
    let response = check(request.send().await.map_err(transport)?).await?;
    let bytes = response.bytes().await.map_err(transport)?;
    serde_json::from_slice(&bytes).map_err(|e| TaskyError::Serialization(e.to_string()))
}

pub(crate) async fn send_empty(request: RequestBuilder) -> TaskyResult<()> {
    check(request.send().await.map_err(transport)?).await?;
    Ok(())
}
