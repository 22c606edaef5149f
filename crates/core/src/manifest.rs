//! Lifecycle manager: owns the roster, the approved baseline, the working
//! draft and the change log, and is the only place they are mutated.
//!
//! ```text
//! LOADING --complete_bootstrap--> READY
//! LOADING --fail_bootstrap------> ERROR
//! ERROR   --begin_retry---------> LOADING
//! ```
//!
//! Every completed mutation writes the draft to the [`DraftStore`]. Store
//! failures are logged and never fail the mutation.

use std::sync::Arc;

use rand::rngs::StdRng;
use serde::Serialize;

use crate::assignment::{self, FillOutcome, MoveOutcome, MoveRequest};
use crate::change_log::{normalize_author, ChangeKind, ChangeLog, ChangeLogEntry};
use crate::diff::{self, DiffReport, SlotFlag};
use crate::document::{
    parse_document, request_filename, Export, ManifestDocument, APPROVED_FILENAME, DRAFT_FILENAME,
};
use crate::error::CoreError;
use crate::roster::{Person, Roster, RosterCounts};
use crate::roster_view::{bus_roster, RosterRow};
use crate::seating::{SeatingState, SlotRef};
use crate::sources::{load_draft, save_draft, DraftStore};
use crate::types::{BusId, Timestamp};

/// Prefix of the summary recorded for an approval.
const APPROVAL_SUMMARY_PREFIX: &str = "Approved changes. ";

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    Error(String),
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "LOADING",
            Self::Ready => "READY",
            Self::Error(_) => "ERROR",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// Read-only view of the working draft.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftView<'a> {
    pub participants: &'a Roster,
    pub buses: &'a SeatingState,
    pub request_log: &'a ChangeLog,
    /// Ids of people without a slot, in roster order.
    pub unassigned: Vec<&'a str>,
    pub counts: RosterCounts,
    pub draft_dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub participants: usize,
    pub buses: usize,
    pub log_entries: usize,
    /// Integrity problems found in the accepted document.
    pub warnings: Vec<String>,
}

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

pub struct Manifest {
    phase: Phase,
    roster: Roster,
    approved: SeatingState,
    /// Change log as it stood in the approved baseline.
    approved_log: ChangeLog,
    draft: SeatingState,
    log: ChangeLog,
    store: Arc<dyn DraftStore>,
    rng: StdRng,
}

impl Manifest {
    /// A manager in `LOADING` with empty state.
    pub fn new(store: Arc<dyn DraftStore>, rng: StdRng) -> Self {
        Self {
            phase: Phase::Loading,
            roster: Roster::default(),
            approved: SeatingState::default(),
            approved_log: ChangeLog::default(),
            draft: SeatingState::default(),
            log: ChangeLog::default(),
            store,
            rng,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_ready(&self) -> bool {
        self.phase == Phase::Ready
    }

    fn ensure_ready(&self) -> Result<(), CoreError> {
        match &self.phase {
            Phase::Ready => Ok(()),
            Phase::Loading => Err(CoreError::NotReady("Manifest is still loading".to_string())),
            Phase::Error(message) => Err(CoreError::NotReady(message.clone())),
        }
    }

    // -- lifecycle ---------------------------------------------------------

    /// `ERROR -> LOADING`. Any other phase is a conflict.
    pub fn begin_retry(&mut self) -> Result<(), CoreError> {
        if !matches!(self.phase, Phase::Error(_)) {
            return Err(CoreError::Conflict(format!(
                "Bootstrap can only be retried after a failure (phase is {})",
                self.phase
            )));
        }
        tracing::info!("Retrying bootstrap");
        self.phase = Phase::Loading;
        Ok(())
    }

    /// Install the baseline and hydrate the draft. The persisted draft wins
    /// when all of its parts are present; otherwise the draft starts as a
    /// copy of the baseline. Nothing is written to the store.
    pub async fn complete_bootstrap(&mut self, baseline: ManifestDocument) {
        let ManifestDocument {
            participants,
            buses,
            request_log,
        } = baseline;

        match load_draft(self.store.as_ref()).await {
            Some(snapshot) => {
                tracing::info!(
                    participants = snapshot.participants.len(),
                    log_entries = snapshot.log.len(),
                    "Restored persisted draft",
                );
                self.roster = snapshot.participants;
                self.draft = snapshot.buses;
                self.log = snapshot.log;
            }
            None => {
                tracing::info!("No persisted draft, starting from baseline");
                self.roster = participants;
                self.draft = buses.clone();
                self.log = request_log.clone();
            }
        }

        self.approved = buses;
        self.approved_log = request_log;
        self.phase = Phase::Ready;
    }

    pub fn fail_bootstrap(&mut self, message: String) {
        tracing::error!(error = %message, "Bootstrap failed");
        self.phase = Phase::Error(message);
    }

    async fn persist(&self) {
        if let Err(err) =
            save_draft(self.store.as_ref(), &self.roster, &self.draft, &self.log).await
        {
            tracing::error!(error = %err, "Failed to persist draft");
        }
    }

    // -- reads -------------------------------------------------------------

    pub fn draft_view(&self) -> Result<DraftView<'_>, CoreError> {
        self.ensure_ready()?;
        Ok(DraftView {
            participants: &self.roster,
            buses: &self.draft,
            request_log: &self.log,
            unassigned: self
                .draft
                .unassigned(&self.roster)
                .into_iter()
                .map(|p| p.id.as_str())
                .collect(),
            counts: self.roster.counts(),
            draft_dirty: self.is_draft_dirty(),
        })
    }

    pub fn person(&self, person_id: &str) -> Result<&Person, CoreError> {
        self.ensure_ready()?;
        self.roster.get(person_id).ok_or_else(|| CoreError::NotFound {
            entity: "Person",
            id: person_id.to_string(),
        })
    }

    pub fn approved(&self) -> Result<&SeatingState, CoreError> {
        self.ensure_ready()?;
        Ok(&self.approved)
    }

    pub fn bus_roster(&self, bus_id: BusId) -> Result<Vec<RosterRow<'_>>, CoreError> {
        self.ensure_ready()?;
        let bus = self.draft.bus(bus_id).ok_or_else(|| bus_not_found(bus_id))?;
        Ok(bus_roster(bus, &self.roster))
    }

    pub fn diff(&self) -> Result<DiffReport, CoreError> {
        self.ensure_ready()?;
        Ok(diff::diff(&self.approved, &self.draft))
    }

    /// Whether `current` differs from the approved occupant of `slot`.
    /// Always `false` until the manifest is ready.
    pub fn is_slot_dirty(&self, slot: &SlotRef, current: Option<&str>) -> bool {
        self.is_ready() && diff::is_slot_dirty(&self.approved, slot, current)
    }

    /// Whether the draft differs from the baseline. Always `false` until the
    /// manifest is ready.
    pub fn is_draft_dirty(&self) -> bool {
        self.is_ready() && diff::is_draft_dirty(&self.approved, &self.draft)
    }

    pub fn bus_dirty_flags(&self, bus_id: BusId) -> Result<Vec<SlotFlag>, CoreError> {
        self.ensure_ready()?;
        diff::bus_dirty_flags(&self.approved, &self.draft, bus_id)
            .ok_or_else(|| bus_not_found(bus_id))
    }

    pub fn can_random_fill(&self, bus_id: BusId) -> bool {
        self.is_ready() && assignment::can_random_fill(&self.draft, &self.roster, bus_id)
    }

    // -- mutations ---------------------------------------------------------

    pub async fn move_person(&mut self, request: &MoveRequest) -> Result<MoveOutcome, CoreError> {
        self.ensure_ready()?;
        if !self.roster.contains(&request.person_id) {
            return Err(CoreError::NotFound {
                entity: "Person",
                id: request.person_id.clone(),
            });
        }

        let outcome = assignment::apply_move(&mut self.draft, request);
        if outcome.is_change() {
            tracing::info!(person_id = %request.person_id, outcome = ?outcome, "Moved person");
            self.persist().await;
        }
        Ok(outcome)
    }

    pub async fn random_fill(&mut self, bus_id: BusId) -> Result<FillOutcome, CoreError> {
        self.ensure_ready()?;
        let outcome = assignment::random_fill(&mut self.draft, &self.roster, bus_id, &mut self.rng)?;
        tracing::info!(
            bus_id,
            assigned = outcome.assignments.len(),
            vacant_before = outcome.vacant_before,
            "Random fill",
        );
        if !outcome.assignments.is_empty() {
            self.persist().await;
        }
        Ok(outcome)
    }

    pub async fn set_photo_url(&mut self, person_id: &str, photo_url: String) -> Result<(), CoreError> {
        self.ensure_ready()?;
        self.roster.set_photo_url(person_id, photo_url)?;
        tracing::info!(person_id, "Updated photo");
        self.persist().await;
        Ok(())
    }

    /// Discard the draft: seating returns to the baseline and the log to the
    /// baseline's log.
    pub async fn reset(&mut self) -> Result<(), CoreError> {
        self.ensure_ready()?;
        self.draft = self.approved.clone();
        self.log = self.approved_log.clone();
        tracing::info!("Draft reset to approved baseline");
        self.persist().await;
        Ok(())
    }

    /// Record an approval and export the draft. `Ok(None)` when no author is
    /// given. The in-memory baseline is left as it is; the export becomes the
    /// new baseline once it is published.
    pub async fn approve(
        &mut self,
        author: Option<&str>,
        now: Timestamp,
    ) -> Result<Option<Export>, CoreError> {
        self.ensure_ready()?;
        let Some(author) = normalize_author(author) else {
            tracing::info!("Approval aborted: no author");
            return Ok(None);
        };

        let summary = format!("{APPROVAL_SUMMARY_PREFIX}{}", self.diff()?.summary);
        self.record(ChangeKind::Approval, author, summary, now).await;
        Ok(Some(self.export(APPROVED_FILENAME.to_string())))
    }

    /// Record a change request and export the draft. `Ok(None)` when no
    /// author is given or the draft has no changes.
    pub async fn request(
        &mut self,
        author: Option<&str>,
        now: Timestamp,
    ) -> Result<Option<Export>, CoreError> {
        self.ensure_ready()?;
        if !self.is_draft_dirty() {
            tracing::debug!("Request skipped: draft has no changes");
            return Ok(None);
        }
        let Some(author) = normalize_author(author) else {
            tracing::info!("Request aborted: no author");
            return Ok(None);
        };

        let summary = self.diff()?.summary;
        self.record(ChangeKind::Request, author, summary, now).await;
        Ok(Some(self.export(request_filename(now.date_naive()))))
    }

    async fn record(&mut self, kind: ChangeKind, author: String, summary: String, now: Timestamp) {
        let entry = ChangeLogEntry::new(kind, author, summary, now);
        tracing::info!(
            entry_id = %entry.id,
            kind = %entry.kind,
            author = %entry.author,
            summary = %entry.summary,
            "Recorded change log entry",
        );
        self.log.append(entry);
        self.persist().await;
    }

    pub fn download_draft(&self) -> Result<Export, CoreError> {
        self.ensure_ready()?;
        Ok(self.export(DRAFT_FILENAME.to_string()))
    }

    fn export(&self, filename: String) -> Export {
        Export {
            filename,
            document: ManifestDocument {
                participants: self.roster.clone(),
                buses: self.draft.clone(),
                request_log: self.log.clone(),
            },
        }
    }

    /// Replace roster, draft and log with an imported document. A rejected
    /// document leaves every part of the state untouched.
    pub async fn import(&mut self, text: &str) -> Result<ImportSummary, CoreError> {
        self.ensure_ready()?;
        let document = parse_document(text)?;

        let warnings = document.buses.integrity_issues(&document.participants);
        for issue in &warnings {
            tracing::warn!(issue = %issue, "Imported manifest integrity problem");
        }

        let summary = ImportSummary {
            participants: document.participants.len(),
            buses: document.buses.buses().len(),
            log_entries: document.request_log.len(),
            warnings,
        };

        self.roster = document.participants;
        self.draft = document.buses;
        self.log = document.request_log;
        tracing::info!(
            participants = summary.participants,
            buses = summary.buses,
            "Imported manifest",
        );
        self.persist().await;
        Ok(summary)
    }
}

fn bus_not_found(bus_id: BusId) -> CoreError {
    CoreError::NotFound {
        entity: "Bus",
        id: bus_id.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
