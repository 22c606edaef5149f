//! Handlers that change who sits where, plus photo updates.

use axum::extract::{Path, State};
use axum::Json;
use busmanifest_core::assignment::{FillOutcome, MoveOutcome, MoveRequest};
use busmanifest_core::roster::Person;
use busmanifest_core::types::BusId;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoInput {
    pub photo_url: String,
}

/// POST /api/v1/moves
///
/// Drop a person onto a slot or back into the unassigned pool. An occupied
/// destination swaps occupants.
pub async fn move_person(
    State(state): State<AppState>,
    Json(input): Json<MoveRequest>,
) -> AppResult<Json<DataResponse<MoveOutcome>>> {
    let outcome = state.manifest.lock().await.move_person(&input).await?;
    Ok(Json(DataResponse { data: outcome }))
}

/// POST /api/v1/buses/{bus_id}/random-fill
///
/// Seat unassigned people on the bus's vacant ordinary seats in random order.
pub async fn random_fill(
    State(state): State<AppState>,
    Path(bus_id): Path<BusId>,
) -> AppResult<Json<DataResponse<FillOutcome>>> {
    let outcome = state.manifest.lock().await.random_fill(bus_id).await?;
    Ok(Json(DataResponse { data: outcome }))
}

/// PUT /api/v1/participants/{id}/photo
pub async fn update_photo(
    State(state): State<AppState>,
    Path(person_id): Path<String>,
    Json(input): Json<PhotoInput>,
) -> AppResult<Json<DataResponse<Person>>> {
    if input.photo_url.trim().is_empty() {
        return Err(AppError::BadRequest("photoUrl must not be empty".into()));
    }

    let mut manifest = state.manifest.lock().await;
    manifest.set_photo_url(&person_id, input.photo_url).await?;
    let person = manifest.person(&person_id)?.clone();
    tracing::info!(person_id = %person_id, "Photo updated via API");

    Ok(Json(DataResponse { data: person }))
}
