use axum::routing::{post, put};
use axum::Router;

use crate::handlers::seating;
use crate::state::AppState;

/// Seat moves and participant updates.
///
/// ```text
/// POST   /moves                       move_person
/// PUT    /participants/{id}/photo     update_photo
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/moves", post(seating::move_person))
        .route("/participants/{id}/photo", put(seating::update_photo))
}
