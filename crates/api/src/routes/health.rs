use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Process status; always `ok` while the server answers.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Manifest lifecycle phase (`LOADING`, `READY` or `ERROR`).
    pub phase: &'static str,
}

/// GET /health -- returns service liveness and the manifest phase.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let phase = state.manifest.lock().await.phase().as_str();

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        phase,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
