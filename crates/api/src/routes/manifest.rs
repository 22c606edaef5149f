use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{changes, manifest};
use crate::state::AppState;

/// Whole-manifest routes.
///
/// ```text
/// GET    /manifest            get_manifest
/// GET    /manifest/approved   get_approved
/// GET    /diff                get_diff
/// POST   /reset               reset
/// POST   /import              import
/// GET    /export/draft        download_draft
/// POST   /approve             approve
/// POST   /request             request
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/manifest", get(manifest::get_manifest))
        .route("/manifest/approved", get(manifest::get_approved))
        .route("/diff", get(manifest::get_diff))
        .route("/reset", post(manifest::reset))
        .route("/import", post(manifest::import))
        .route("/export/draft", get(manifest::download_draft))
        .route("/approve", post(changes::approve))
        .route("/request", post(changes::request))
}
