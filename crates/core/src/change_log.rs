//! Append-only log of change requests and approvals.

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeKind {
    Request,
    Approval,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Request => "REQUEST",
            Self::Approval => "APPROVAL",
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeLogEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    pub timestamp: Timestamp,
    pub author: String,
    pub summary: String,
}

impl ChangeLogEntry {
    /// New entry with a fresh v4 UUID.
    pub fn new(kind: ChangeKind, author: String, summary: String, timestamp: Timestamp) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            timestamp,
            author,
            summary,
        }
    }
}

/// Entries in insertion order. Serializes as a plain array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeLog {
    entries: Vec<ChangeLogEntry>,
}

impl ChangeLog {
    pub fn new(entries: Vec<ChangeLogEntry>) -> Self {
        Self { entries }
    }

    pub fn append(&mut self, entry: ChangeLogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ChangeLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&ChangeLogEntry> {
        self.entries.last()
    }
}

/// Trim an author name; `None` when nothing is left.
pub fn normalize_author(author: Option<&str>) -> Option<String> {
    author
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
}
