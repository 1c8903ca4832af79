use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tasky_remote::ai::{DescribeRequest, DescribeResponse};
use tasky_remote::DescriptionGenerator;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub generator: Arc<dyn DescriptionGenerator>,
}

pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub fn api_router() -> Router<SharedState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/ai/board-desc", post(board_description))
}

async fn health() -> &'static str {
    "ok"
}

/// An unreadable body counts as a missing title.
async fn board_description(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<DescribeResponse>, ApiError> {
    let title = serde_json::from_slice::<DescribeRequest>(&body)
        .ok()
        .and_then(|r| r.title)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Title required".into()))?;

    match state.generator.describe(&title).await {
        Ok(description) => Ok(Json(DescribeResponse { description })),
        Err(e) => {
            tracing::error!("Description generation failed: {}", e);
            Err(ApiError::Internal(e.user_message("Failed to generate description")))
        }
    }
}
