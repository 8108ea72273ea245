//! JSON endpoints and the shared error type.
//!
//! All handlers report failures through [`AppError`], which renders as a JSON
//! `{"error": ...}` body and HTTP 500.

use std::sync::Arc;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use time::OffsetDateTime;
use tracing::error;

use crate::state::AppState;

/// Create the API router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/health", get(health))
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: OffsetDateTime::now_utc(),
    })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Reading or writing the search history failed.
    Store(skycast_store::Error),
    /// A page template failed to render.
    Render(askama::Error),
}

impl From<skycast_store::Error> for AppError {
    fn from(e: skycast_store::Error) -> Self {
        AppError::Store(e)
    }
}

impl From<askama::Error> for AppError {
    fn from(e: askama::Error) -> Self {
        AppError::Render(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match self {
            AppError::Store(e) => e.to_string(),
            AppError::Render(e) => format!("Failed to render page: {}", e),
        };
        error!("Request failed: {}", message);

        let body = serde_json::json!({
            "error": message,
        });

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
