//! Establishing the approved baseline at startup.
//!
//! The baseline document is fetched from a [`BaselineSource`]. When none has
//! been published yet, a fresh roster is requested from the
//! [`RosterGenerator`] and seated on an empty default fleet.

use crate::document::{parse_document, ManifestDocument};
use crate::error::SourceError;
use crate::layout::standard_layout;
use crate::seating::{SeatingState, DEFAULT_BUS_COUNT};
use crate::sources::{BaselineFetch, BaselineSource, RosterGenerator};

/// Fatal bootstrap failure. The message is shown to the operator as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Could not establish baseline data: {reason}")]
pub struct BootstrapError {
    pub reason: String,
}

impl BootstrapError {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Fetch the approved baseline, or generate one when none exists.
pub async fn establish_baseline(
    source: &dyn BaselineSource,
    generator: &dyn RosterGenerator,
) -> Result<ManifestDocument, BootstrapError> {
    let fetched = source.fetch().await.map_err(|err| match err {
        SourceError::Status(status) => {
            BootstrapError::new(format!("Failed to fetch approved manifest: HTTP {status}"))
        }
        other => BootstrapError::new(format!("Failed to fetch approved manifest: {other}")),
    })?;

    match fetched {
        BaselineFetch::Found(text) => {
            let document = parse_document(&text).map_err(|err| {
                tracing::error!(error = %err, "Approved manifest rejected");
                BootstrapError::new("Approved manifest file is invalid.")
            })?;
            tracing::info!(
                participants = document.participants.len(),
                buses = document.buses.buses().len(),
                log_entries = document.request_log.len(),
                "Loaded approved manifest",
            );
            Ok(document)
        }
        BaselineFetch::NotFound => {
            tracing::info!("No approved manifest found, generating roster");
            let people = generator
                .generate()
                .await
                .map_err(|err| BootstrapError::new(format!("Failed to generate roster: {err}")))?;
            tracing::info!(participants = people.len(), "Generated roster");
            Ok(ManifestDocument {
                participants: people.into(),
                buses: SeatingState::fleet(DEFAULT_BUS_COUNT, &standard_layout()),
                request_log: Default::default(),
            })
        }
    }
}
