//! Handlers for the bootstrap lifecycle.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use busmanifest_core::manifest::Phase;
use serde::Serialize;

use crate::bootstrap::spawn_bootstrap;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub phase: &'static str,
    /// Failure message while in `ERROR`.
    pub message: Option<String>,
    pub draft_dirty: bool,
}

/// GET /api/v1/status
pub async fn get_status(State(state): State<AppState>) -> Json<DataResponse<StatusResponse>> {
    let manifest = state.manifest.lock().await;
    let phase = manifest.phase();
    let message = match phase {
        Phase::Error(message) => Some(message.clone()),
        _ => None,
    };

    Json(DataResponse {
        data: StatusResponse {
            phase: phase.as_str(),
            message,
            draft_dirty: manifest.is_draft_dirty(),
        },
    })
}

/// POST /api/v1/bootstrap/retry
///
/// Move a failed manifest back to `LOADING` and re-run the bootstrap in the
/// background.
pub async fn retry_bootstrap(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    state.manifest.lock().await.begin_retry()?;
    spawn_bootstrap(state);

    Ok((
        StatusCode::ACCEPTED,
        Json(DataResponse {
            data: Phase::Loading.as_str(),
        }),
    ))
}
