//! Health check endpoint.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use serde::Serialize;
use tracing::warn;

use crate::AppState;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `healthy`, or `degraded` when the voucher store does not answer.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
    /// `up` or `down`.
    pub store: &'static str,
}

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let (code, status, store) = match state.ledgers.ping().await {
        Ok(()) => (StatusCode::OK, "healthy", "up"),
        Err(err) => {
            warn!(error = %err, "Voucher store did not answer health check");
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", "down")
        }
    };

    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            store,
        }),
    )
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
