//! Handlers for approving the draft and requesting changes.
//!
//! Both record a change log entry and answer with the manifest document as a
//! JSON download. A missing author (or, for requests, a draft without
//! changes) aborts with `204 No Content`. A POST without a JSON body counts
//! as a missing author.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::json_attachment;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AuthorInput {
    #[serde(default)]
    pub author: Option<String>,
}

impl AuthorInput {
    fn from_body(body: Option<Json<AuthorInput>>) -> Self {
        body.map(|Json(input)| input).unwrap_or_default()
    }
}

/// POST /api/v1/approve
pub async fn approve(
    State(state): State<AppState>,
    body: Option<Json<AuthorInput>>,
) -> AppResult<Response> {
    let input = AuthorInput::from_body(body);
    let export = state
        .manifest
        .lock()
        .await
        .approve(input.author.as_deref(), chrono::Utc::now())
        .await?;

    match export {
        Some(export) => {
            tracing::info!(filename = %export.filename, "Draft approved");
            json_attachment(&export)
        }
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

/// POST /api/v1/request
pub async fn request(
    State(state): State<AppState>,
    body: Option<Json<AuthorInput>>,
) -> AppResult<Response> {
    let input = AuthorInput::from_body(body);
    let export = state
        .manifest
        .lock()
        .await
        .request(input.author.as_deref(), chrono::Utc::now())
        .await?;

    match export {
        Some(export) => {
            tracing::info!(filename = %export.filename, "Change request recorded");
            json_attachment(&export)
        }
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}
