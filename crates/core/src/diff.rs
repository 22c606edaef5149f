//! Reconciliation of a draft seating state against the approved baseline.
//!
//! Slots are matched by [`SlotRef`] (bus id plus seat id or special role).
//! Only draft slots are visited; an approved slot with no draft counterpart
//! is not reported, and a draft slot with no approved counterpart counts as
//! "was empty".

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::seating::{SeatingState, SlotRef};
use crate::types::{BusId, PersonId};

/// Summary text when the draft matches the baseline.
pub const NO_CHANGES_SUMMARY: &str = "No changes made.";

// ---------------------------------------------------------------------------
// Diff status
// ---------------------------------------------------------------------------

/// The status of a slot in a diff comparison.
///
/// - `Added`     -- vacant in the baseline, occupied in the draft.
/// - `Removed`   -- occupied in the baseline, vacant in the draft.
/// - `Changed`   -- occupied on both sides by different people.
/// - `Unchanged` -- same occupant (or vacant) on both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffStatus {
    Added,
    Removed,
    Changed,
    Unchanged,
}

impl DiffStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Changed => "changed",
            Self::Unchanged => "unchanged",
        }
    }

    /// Classify one slot from its approved and draft occupants.
    pub fn between(approved: Option<&str>, draft: Option<&str>) -> Self {
        match (approved, draft) {
            (a, d) if a == d => Self::Unchanged,
            (None, Some(_)) => Self::Added,
            (Some(_), None) => Self::Removed,
            _ => Self::Changed,
        }
    }
}

impl std::fmt::Display for DiffStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Diff report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotChange {
    pub slot: SlotRef,
    pub approved: Option<PersonId>,
    pub draft: Option<PersonId>,
    pub status: DiffStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffReport {
    pub changed_count: usize,
    pub summary: String,
    pub changes: Vec<SlotChange>,
}

/// Human-readable summary for `count` changed slots.
pub fn summary_for(count: usize) -> String {
    if count == 0 {
        NO_CHANGES_SUMMARY.to_string()
    } else {
        format!("Modified {count} seat assignment(s).")
    }
}

/// Approved occupant per slot.
pub struct ApprovedIndex<'a> {
    occupants: HashMap<SlotRef, Option<&'a str>>,
}

impl<'a> ApprovedIndex<'a> {
    pub fn new(approved: &'a SeatingState) -> Self {
        let occupants = approved
            .slots()
            .map(|(slot, occupant)| (slot, occupant.map(String::as_str)))
            .collect();
        Self { occupants }
    }

    /// Approved occupant of `slot`; a slot unknown to the baseline reads as
    /// vacant.
    pub fn occupant(&self, slot: &SlotRef) -> Option<&'a str> {
        self.occupants.get(slot).copied().flatten()
    }
}

/// Count and list every draft slot whose occupant differs from the baseline.
pub fn diff(approved: &SeatingState, draft: &SeatingState) -> DiffReport {
    let index = ApprovedIndex::new(approved);

    let changes: Vec<SlotChange> = draft
        .slots()
        .filter_map(|(slot, occupant)| {
            let before = index.occupant(&slot);
            let after = occupant.map(String::as_str);
            match DiffStatus::between(before, after) {
                DiffStatus::Unchanged => None,
                status => Some(SlotChange {
                    approved: before.map(str::to_string),
                    draft: after.map(str::to_string),
                    slot,
                    status,
                }),
            }
        })
        .collect();

    DiffReport {
        changed_count: changes.len(),
        summary: summary_for(changes.len()),
        changes,
    }
}

// ---------------------------------------------------------------------------
// Dirty flags
// ---------------------------------------------------------------------------

/// Whether `current` differs from the approved occupant of `slot`.
pub fn is_slot_dirty(approved: &SeatingState, slot: &SlotRef, current: Option<&str>) -> bool {
    approved.occupant(slot).map(String::as_str) != current
}

/// Whether the draft differs from the baseline anywhere, including bus or
/// seat structure.
pub fn is_draft_dirty(approved: &SeatingState, draft: &SeatingState) -> bool {
    approved != draft
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotFlag {
    pub slot: SlotRef,
    pub occupant: Option<PersonId>,
    pub dirty: bool,
}

/// Dirty flag for every slot of one draft bus, seats first. `None` when the
/// draft has no such bus.
pub fn bus_dirty_flags(
    approved: &SeatingState,
    draft: &SeatingState,
    bus_id: BusId,
) -> Option<Vec<SlotFlag>> {
    let bus = draft.bus(bus_id)?;
    let index = ApprovedIndex::new(approved);
    let flags = bus
        .slots()
        .map(|(slot, occupant)| SlotFlag {
            dirty: index.occupant(&slot) != occupant.map(String::as_str),
            occupant: occupant.cloned(),
            slot,
        })
        .collect();
    Some(flags)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
