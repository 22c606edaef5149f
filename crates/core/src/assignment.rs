//! Assignment engine: swap-safe moves and random fill.
//!
//! Every operation here preserves the seating invariant that no person
//! occupies more than one slot. A move into an occupied slot is a swap: the
//! previous occupant takes over the slot the mover left, or goes back to the
//! unassigned pool when the mover came from the pool.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roster::Roster;
use crate::seating::{SeatingState, SlotRef};
use crate::types::{BusId, PersonId};

// ---------------------------------------------------------------------------
// Move request / outcome
// ---------------------------------------------------------------------------

/// Where a person is moved from or to. Serializes as `null` for the pool and
/// as a [`SlotRef`] object otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<SlotRef>", into = "Option<SlotRef>")]
pub enum Placement {
    #[default]
    Unassigned,
    Slot(SlotRef),
}

impl From<Option<SlotRef>> for Placement {
    fn from(slot: Option<SlotRef>) -> Self {
        slot.map_or(Self::Unassigned, Self::Slot)
    }
}

impl From<Placement> for Option<SlotRef> {
    fn from(placement: Placement) -> Self {
        match placement {
            Placement::Unassigned => None,
            Placement::Slot(slot) => Some(slot),
        }
    }
}

/// A drop of `person_id` from `source` onto `destination`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub person_id: PersonId,
    #[serde(default)]
    pub source: Placement,
    pub destination: Placement,
}

/// Why a move left the state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoOpReason {
    SameSlot,
    AlreadyUnassigned,
    UnknownDestination,
}

/// What a move did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum MoveOutcome {
    /// Moved into a vacant slot.
    Placed { slot: SlotRef },
    /// Destination was occupied; its occupant took the mover's old slot.
    Swapped {
        slot: SlotRef,
        displaced: PersonId,
        displaced_to: SlotRef,
    },
    /// Destination was occupied and the mover came from the pool, so the
    /// occupant was returned to the pool.
    Evicted { slot: SlotRef, displaced: PersonId },
    /// Mover returned to the pool.
    Unassigned { from: SlotRef },
    Unchanged { reason: NoOpReason },
}

impl MoveOutcome {
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::Unchanged { .. })
    }
}

// ---------------------------------------------------------------------------
// Move
// ---------------------------------------------------------------------------

/// Value form of [`apply_move`]: returns the resulting state and leaves
/// `state` untouched.
pub fn move_person(state: &SeatingState, request: &MoveRequest) -> (SeatingState, MoveOutcome) {
    let mut next = state.clone();
    let outcome = apply_move(&mut next, request);
    (next, outcome)
}

/// Apply a move in place.
///
/// The stated source is re-validated against the state. When it no longer
/// matches (stale client view), the slot the person actually holds is used
/// instead, so the move can never duplicate a person.
pub fn apply_move(state: &mut SeatingState, request: &MoveRequest) -> MoveOutcome {
    let person_id = &request.person_id;
    let source = resolve_source(state, person_id, &request.source);

    let dest = match &request.destination {
        Placement::Unassigned => {
            let Some(from) = source else {
                return MoveOutcome::Unchanged {
                    reason: NoOpReason::AlreadyUnassigned,
                };
            };
            if let Some(cell) = state.slot_mut(&from) {
                *cell = None;
            }
            return MoveOutcome::Unassigned { from };
        }
        Placement::Slot(dest) => dest,
    };

    if source.as_ref() == Some(dest) {
        return MoveOutcome::Unchanged {
            reason: NoOpReason::SameSlot,
        };
    }

    let Some(cell) = state.slot_mut(dest) else {
        tracing::warn!(person_id = %person_id, slot = %dest, "Move destination does not exist");
        return MoveOutcome::Unchanged {
            reason: NoOpReason::UnknownDestination,
        };
    };
    let displaced = cell.replace(person_id.clone());

    match (source, displaced) {
        (Some(from), displaced) => {
            if let Some(cell) = state.slot_mut(&from) {
                *cell = displaced.clone();
            }
            match displaced {
                Some(displaced) => MoveOutcome::Swapped {
                    slot: dest.clone(),
                    displaced,
                    displaced_to: from,
                },
                None => MoveOutcome::Placed { slot: dest.clone() },
            }
        }
        (None, Some(displaced)) => MoveOutcome::Evicted {
            slot: dest.clone(),
            displaced,
        },
        (None, None) => MoveOutcome::Placed { slot: dest.clone() },
    }
}

/// Find the slot the mover is leaving.
fn resolve_source(state: &SeatingState, person_id: &str, stated: &Placement) -> Option<SlotRef> {
    match stated {
        Placement::Slot(slot) if state.occupant(slot).is_some_and(|id| id == person_id) => {
            Some(slot.clone())
        }
        Placement::Slot(slot) => {
            let actual = state.locate(person_id);
            tracing::warn!(
                person_id,
                stated = %slot,
                actual = ?actual,
                "Stale move source, using the person's current slot",
            );
            actual
        }
        Placement::Unassigned => {
            let actual = state.locate(person_id);
            if let Some(actual) = &actual {
                tracing::warn!(
                    person_id,
                    actual = %actual,
                    "Move claims an unassigned source but the person is seated",
                );
            }
            actual
        }
    }
}

// ---------------------------------------------------------------------------
// Random fill
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatAssignment {
    pub seat_id: String,
    pub person_id: PersonId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FillOutcome {
    pub bus_id: BusId,
    pub vacant_before: usize,
    pub unassigned_before: usize,
    pub assignments: Vec<SeatAssignment>,
}

/// Whether `bus_id` has a vacant ordinary seat and anyone is unassigned.
pub fn can_random_fill(state: &SeatingState, roster: &Roster, bus_id: BusId) -> bool {
    state.bus(bus_id).is_some_and(|bus| {
        bus.seats.iter().any(|s| s.participant_id.is_none()) && !state.unassigned(roster).is_empty()
    })
}

/// Seat unassigned people on the vacant ordinary seats of one bus.
///
/// Vacant seats are taken in layout order; the unassigned people are
/// shuffled with `rng` first. Special roles are never filled. Assigns
/// `min(vacant, unassigned)` people and leaves occupied seats alone.
pub fn random_fill<R: Rng + ?Sized>(
    state: &mut SeatingState,
    roster: &Roster,
    bus_id: BusId,
    rng: &mut R,
) -> Result<FillOutcome, CoreError> {
    let bus = state.bus(bus_id).ok_or_else(|| CoreError::NotFound {
        entity: "Bus",
        id: bus_id.to_string(),
    })?;
    let vacant = bus.vacant_seat_ids();

    let mut pool: Vec<PersonId> = state
        .unassigned(roster)
        .into_iter()
        .map(|p| p.id.clone())
        .collect();
    pool.shuffle(rng);

    let mut outcome = FillOutcome {
        bus_id,
        vacant_before: vacant.len(),
        unassigned_before: pool.len(),
        assignments: Vec::with_capacity(vacant.len().min(pool.len())),
    };

    for (seat_id, person_id) in vacant.into_iter().zip(pool) {
        if let Some(cell) = state.slot_mut(&SlotRef::seat(bus_id, seat_id.clone())) {
            *cell = Some(person_id.clone());
            outcome.assignments.push(SeatAssignment { seat_id, person_id });
        }
    }

    Ok(outcome)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
