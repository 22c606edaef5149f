use axum::routing::{get, post};
use axum::Router;

use crate::handlers::lifecycle;
use crate::state::AppState;

/// Bootstrap lifecycle routes.
///
/// ```text
/// GET    /status              get_status
/// POST   /bootstrap/retry     retry_bootstrap
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/status", get(lifecycle::get_status))
        .route("/bootstrap/retry", post(lifecycle::retry_bootstrap))
}
