use std::sync::Arc;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tasky_core::{TaskyError, TaskyResult};
use tasky_domain::{LoginPayload, RegisterPayload, SessionBus, SessionEvent, UserId};

use super::client::{send_empty, send_json, SupabaseClient};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

impl AuthUser {
    pub fn full_name(&self) -> Option<&str> {
        self.user_metadata.get("full_name").and_then(|v| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: AuthUser,
}

/// Sign-up answers with a session when e-mail confirmation is disabled,
/// otherwise with the bare user.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(AuthSession),
    User(AuthUser),
}

/// The user behind the current token, `None` without a session.
pub(crate) async fn fetch_user(client: &SupabaseClient) -> TaskyResult<Option<AuthUser>> {
    if !client.has_session() {
        return Ok(None);
    }
    match send_json(client.auth(Method::GET, "user")).await {
        Ok(user) => Ok(Some(user)),
        Err(TaskyError::Unauthenticated(message)) => {
            tracing::debug!("Session rejected: {}", message);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// GoTrue client. Publishes every session change on the bus.
pub struct SupabaseAuth {
    client: SupabaseClient,
    bus: Arc<SessionBus>,
}

impl SupabaseAuth {
    pub fn new(client: SupabaseClient, bus: Arc<SessionBus>) -> Self {
        Self { client, bus }
    }

    pub fn client(&self) -> &SupabaseClient {
        &self.client
    }

    pub async fn sign_in(&self, payload: &LoginPayload) -> TaskyResult<AuthSession> {
        payload.validate()?;
        let session: AuthSession = send_json(
            self.client
                .auth(Method::POST, "token")
                .query(&[("grant_type", "password")])
                .json(&json!({ "email": payload.email, "password": payload.password })),
        )
        .await?;

        self.client.set_access_token(Some(session.access_token.clone()));
        tracing::info!("Signed in as {}", session.user.id);
        self.bus.emit(SessionEvent::SignedIn);
        Ok(session)
    }

    /// Register a new account; the full name is stored as user metadata.
    pub async fn sign_up(&self, payload: &RegisterPayload) -> TaskyResult<AuthUser> {
        payload.validate()?;
        let response: SignUpResponse = send_json(self.client.auth(Method::POST, "signup").json(
            &json!({
                "email": payload.email,
                "password": payload.password,
                "data": { "full_name": payload.full_name.trim(), "avatar": "" },
            }),
        ))
        .await?;

        match response {
            SignUpResponse::Session(session) => {
                self.client.set_access_token(Some(session.access_token));
                tracing::info!("Registered and signed in as {}", session.user.id);
                self.bus.emit(SessionEvent::SignedIn);
                Ok(session.user)
            }
            SignUpResponse::User(user) => {
                tracing::info!("Registered {}", user.id);
                Ok(user)
            }
        }
    }

    pub async fn refresh(&self, refresh_token: &str) -> TaskyResult<AuthSession> {
        let session: AuthSession = send_json(
            self.client
                .auth(Method::POST, "token")
                .query(&[("grant_type", "refresh_token")])
                .json(&json!({ "refresh_token": refresh_token })),
        )
        .await?;

        self.client.set_access_token(Some(session.access_token.clone()));
        self.bus.emit(SessionEvent::TokenRefreshed);
        Ok(session)
    }

    /// End the session. The local token is dropped even if the remote call fails.
    pub async fn sign_out(&self) -> TaskyResult<()> {
        let result = if self.client.has_session() {
            send_empty(self.client.auth(Method::POST, "logout")).await
        } else {
            Ok(())
        };
        self.client.set_access_token(None);
        self.bus.emit(SessionEvent::SignedOut);
        result
    }

    pub async fn current_user(&self) -> TaskyResult<Option<AuthUser>> {
        fetch_user(&self.client).await
    }
}
