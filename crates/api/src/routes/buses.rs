use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{manifest, seating};
use crate::state::AppState;

/// Per-bus routes, nested under `/buses`.
///
/// ```text
/// GET    /{bus_id}/roster         get_bus_roster
/// GET    /{bus_id}/dirty          get_bus_dirty
/// POST   /{bus_id}/random-fill    random_fill
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{bus_id}/roster", get(manifest::get_bus_roster))
        .route("/{bus_id}/dirty", get(manifest::get_bus_dirty))
        .route("/{bus_id}/random-fill", post(seating::random_fill))
}
