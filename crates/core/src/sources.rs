//! Seams to the outside world: where the approved baseline comes from, how a
//! fresh roster is generated, and where the draft is kept between restarts.
//!
//! Implementations live in the storage crate; [`MemoryDraftStore`] is kept
//! here so the lifecycle manager can be exercised without touching disk.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::change_log::ChangeLog;
use crate::error::SourceError;
use crate::roster::{Person, Roster};
use crate::seating::SeatingState;

/// Draft storage key of the roster blob.
pub const DRAFT_PARTICIPANTS_KEY: &str = "busApp.draft.participants";

/// Draft storage key of the seating blob.
pub const DRAFT_BUSES_KEY: &str = "busApp.draft.buses";

/// Draft storage key of the change log blob.
pub const DRAFT_LOG_KEY: &str = "busApp.draft.log";

// ---------------------------------------------------------------------------
// Baseline / generator
// ---------------------------------------------------------------------------

/// Result of asking for the approved baseline document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaselineFetch {
    /// Raw document text.
    Found(String),
    /// No baseline has been published yet.
    NotFound,
}

#[async_trait]
pub trait BaselineSource: Send + Sync {
    async fn fetch(&self) -> Result<BaselineFetch, SourceError>;
}

/// Produces the initial roster when no baseline exists.
#[async_trait]
pub trait RosterGenerator: Send + Sync {
    async fn generate(&self) -> Result<Vec<Person>, SourceError>;
}

// ---------------------------------------------------------------------------
// Draft store
// ---------------------------------------------------------------------------

/// Key/value blob storage for the working draft.
///
/// Implementations must not block the async runtime; file-backed stores hand
/// their disk I/O to the blocking pool.
#[async_trait]
pub trait DraftStore: Send + Sync {
    /// `Ok(None)` when the key has never been written.
    async fn read(&self, key: &str) -> Result<Option<String>, SourceError>;

    async fn write(&self, key: &str, value: &str) -> Result<(), SourceError>;
}

/// Roster, draft seating and change log as restored from a [`DraftStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct DraftSnapshot {
    pub participants: Roster,
    pub buses: SeatingState,
    pub log: ChangeLog,
}

/// Restore the draft. Returns `None` unless all three blobs are present and
/// parse; a partial or corrupt draft is logged and ignored.
pub async fn load_draft(store: &dyn DraftStore) -> Option<DraftSnapshot> {
    match try_load_draft(store).await {
        Ok(snapshot) => snapshot,
        Err(err) => {
            tracing::warn!(error = %err, "Ignoring unreadable draft");
            None
        }
    }
}

async fn try_load_draft(store: &dyn DraftStore) -> Result<Option<DraftSnapshot>, SourceError> {
    let participants = store.read(DRAFT_PARTICIPANTS_KEY).await?;
    let buses = store.read(DRAFT_BUSES_KEY).await?;
    let log = store.read(DRAFT_LOG_KEY).await?;

    let (Some(participants), Some(buses), Some(log)) = (participants, buses, log) else {
        return Ok(None);
    };

    Ok(Some(DraftSnapshot {
        participants: serde_json::from_str(&participants)?,
        buses: serde_json::from_str(&buses)?,
        log: serde_json::from_str(&log)?,
    }))
}

/// Write all three draft blobs.
pub async fn save_draft(
    store: &dyn DraftStore,
    participants: &Roster,
    buses: &SeatingState,
    log: &ChangeLog,
) -> Result<(), SourceError> {
    let participants = serde_json::to_string(participants)?;
    let buses = serde_json::to_string(buses)?;
    let log = serde_json::to_string(log)?;

    store.write(DRAFT_PARTICIPANTS_KEY, &participants).await?;
    store.write(DRAFT_BUSES_KEY, &buses).await?;
    store.write(DRAFT_LOG_KEY, &log).await?;
    Ok(())
}

/// Process-local draft store.
#[derive(Debug, Default)]
pub struct MemoryDraftStore {
    blobs: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
}

impl MemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `write` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    /// Drop a single key.
    pub fn remove(&self, key: &str) {
        if let Ok(mut blobs) = self.blobs.lock() {
            blobs.remove(key);
        }
    }
}

#[async_trait]
impl DraftStore for MemoryDraftStore {
    async fn read(&self, key: &str) -> Result<Option<String>, SourceError> {
        let blobs = self
            .blobs
            .lock()
            .map_err(|_| SourceError::Io("draft store lock poisoned".to_string()))?;
        Ok(blobs.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), SourceError> {
        let mut blobs = self
            .blobs
            .lock()
            .map_err(|_| SourceError::Io("draft store lock poisoned".to_string()))?;
        blobs.insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
