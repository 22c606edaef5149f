//! The manifest document exchanged on import, export and baseline load.
//!
//! ```text
//! { "participants": [Person], "buses": [Bus], "requestLog": [ChangeLogEntry] }
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::change_log::ChangeLog;
use crate::error::CoreError;
use crate::roster::Roster;
use crate::seating::SeatingState;

/// Export filename of an approval.
pub const APPROVED_FILENAME: &str = "bus_manifest_approved.json";

/// Export filename of a draft download.
pub const DRAFT_FILENAME: &str = "bus-manifest-draft.json";

/// Keys that must be present (and non-null) for a document to be accepted.
const REQUIRED_KEYS: &[&str] = &["participants", "buses"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestDocument {
    pub participants: Roster,
    pub buses: SeatingState,
    #[serde(default)]
    pub request_log: ChangeLog,
}

/// A document ready to be handed out as a file download.
#[derive(Debug, Clone, PartialEq)]
pub struct Export {
    pub filename: String,
    pub document: ManifestDocument,
}

/// Export filename of a change request made on `date`.
pub fn request_filename(date: NaiveDate) -> String {
    format!("bus-manifest-request-{}.json", date.format("%Y-%m-%d"))
}

/// Parse and validate a manifest document.
///
/// Fails with a validation error when the text is not JSON, a required key
/// is missing or null, or the content does not match the document shape.
pub fn parse_document(text: &str) -> Result<ManifestDocument, CoreError> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| CoreError::Validation(format!("Invalid JSON: {e}")))?;

    let has_required = value.is_object()
        && REQUIRED_KEYS
            .iter()
            .all(|key| value.get(key).is_some_and(|v| !v.is_null()));
    if !has_required {
        return Err(CoreError::Validation("Invalid file format.".to_string()));
    }

    serde_json::from_value(value)
        .map_err(|e| CoreError::Validation(format!("Invalid file format: {e}")))
}

/// Two-space indented JSON.
pub fn to_pretty_json(document: &ManifestDocument) -> Result<String, CoreError> {
    serde_json::to_string_pretty(document)
        .map_err(|e| CoreError::Internal(format!("Failed to serialize manifest: {e}")))
}
