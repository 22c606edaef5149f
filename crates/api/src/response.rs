//! Shared response types for API handlers.
//!
//! JSON responses use a `{ "data": ... }` envelope. Exported manifest
//! documents are sent as file attachments instead.

use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use busmanifest_core::document::{to_pretty_json, Export};
use serde::Serialize;

use crate::error::AppResult;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Send an exported document as a pretty-printed JSON download.
pub fn json_attachment(export: &Export) -> AppResult<Response> {
    let body = to_pretty_json(&export.document)?;

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, "application/json".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.filename),
            ),
        ],
        body,
    )
        .into_response())
}
