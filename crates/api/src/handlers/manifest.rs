//! Handlers for reading, resetting, importing and exporting the manifest.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use busmanifest_core::diff::{DiffReport, SlotFlag};
use busmanifest_core::manifest::ImportSummary;
use busmanifest_core::types::BusId;

use crate::error::AppResult;
use crate::response::{json_attachment, DataResponse};
use crate::state::AppState;

/// GET /api/v1/manifest
///
/// Roster, draft buses, change log, unassigned ids, head counts and the
/// draft-dirty flag.
pub async fn get_manifest(State(state): State<AppState>) -> AppResult<Response> {
    let manifest = state.manifest.lock().await;
    let view = manifest.draft_view()?;
    Ok(Json(DataResponse { data: view }).into_response())
}

/// GET /api/v1/manifest/approved
pub async fn get_approved(State(state): State<AppState>) -> AppResult<Response> {
    let manifest = state.manifest.lock().await;
    let approved = manifest.approved()?;
    Ok(Json(DataResponse { data: approved }).into_response())
}

/// GET /api/v1/buses/{bus_id}/roster
///
/// People seated on one draft bus, sorted by seat.
pub async fn get_bus_roster(
    State(state): State<AppState>,
    Path(bus_id): Path<BusId>,
) -> AppResult<Response> {
    let manifest = state.manifest.lock().await;
    let rows = manifest.bus_roster(bus_id)?;
    Ok(Json(DataResponse { data: rows }).into_response())
}

/// GET /api/v1/buses/{bus_id}/dirty
///
/// Dirty flag for every slot of one draft bus.
pub async fn get_bus_dirty(
    State(state): State<AppState>,
    Path(bus_id): Path<BusId>,
) -> AppResult<Json<DataResponse<Vec<SlotFlag>>>> {
    let flags = state.manifest.lock().await.bus_dirty_flags(bus_id)?;
    Ok(Json(DataResponse { data: flags }))
}

/// GET /api/v1/diff
pub async fn get_diff(State(state): State<AppState>) -> AppResult<Json<DataResponse<DiffReport>>> {
    let report = state.manifest.lock().await.diff()?;
    Ok(Json(DataResponse { data: report }))
}

/// POST /api/v1/reset
///
/// Discard the draft and return to the approved baseline.
pub async fn reset(State(state): State<AppState>) -> AppResult<StatusCode> {
    state.manifest.lock().await.reset().await?;
    tracing::info!("Draft reset via API");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/import
///
/// Replace roster, draft and log with an uploaded manifest document. The body
/// is the raw document text.
pub async fn import(
    State(state): State<AppState>,
    body: String,
) -> AppResult<Json<DataResponse<ImportSummary>>> {
    let summary = state.manifest.lock().await.import(&body).await?;
    tracing::info!(
        participants = summary.participants,
        warnings = summary.warnings.len(),
        "Manifest imported via API",
    );
    Ok(Json(DataResponse { data: summary }))
}

/// GET /api/v1/export/draft
pub async fn download_draft(State(state): State<AppState>) -> AppResult<Response> {
    let export = state.manifest.lock().await.download_draft()?;
    json_attachment(&export)
}
