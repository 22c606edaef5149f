pub mod buses;
pub mod health;
pub mod lifecycle;
pub mod manifest;
pub mod seating;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /status                                 lifecycle phase (GET)
/// /bootstrap/retry                        re-run a failed bootstrap (POST)
///
/// /manifest                               draft roster, buses, log (GET)
/// /manifest/approved                      approved buses (GET)
/// /diff                                   draft vs approved report (GET)
/// /reset                                  discard the draft (POST)
/// /import                                 replace draft from a document (POST)
/// /export/draft                           draft download (GET)
/// /approve                                approval download (POST)
/// /request                                change request download (POST)
///
/// /buses/{bus_id}/roster                  seated people, sorted (GET)
/// /buses/{bus_id}/dirty                   per-slot dirty flags (GET)
/// /buses/{bus_id}/random-fill             fill vacant seats (POST)
///
/// /moves                                  move a person (POST)
/// /participants/{id}/photo                replace a photo URL (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(lifecycle::router())
        .merge(manifest::router())
        .merge(seating::router())
        .nest("/buses", buses::router())
}
