//! Seat map: buses, their slots, and who occupies each slot.
//!
//! A slot is either an ordinary seat (id `B{bus}-{seatNumber}`) or one of the
//! two special roles every bus carries (tour leader, driver). Occupancy is
//! sparse: each slot holds `Option<PersonId>`.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::layout::{seat_numbers, LayoutItem};
use crate::roster::{Person, Roster};
use crate::types::{BusId, PersonId};

/// Number of buses in a freshly generated baseline.
pub const DEFAULT_BUS_COUNT: u32 = 2;

// ---------------------------------------------------------------------------
// Slots
// ---------------------------------------------------------------------------

/// An ordinary seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub id: String,
    pub seat_number: String,
    #[serde(default)]
    pub participant_id: Option<PersonId>,
}

/// The two non-seat roles on every bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpecialRole {
    TourLeader,
    Driver,
}

impl SpecialRole {
    pub const ALL: [SpecialRole; 2] = [SpecialRole::TourLeader, SpecialRole::Driver];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TourLeader => "TOUR_LEADER",
            Self::Driver => "DRIVER",
        }
    }

    /// Two-letter label used in rosters and printouts.
    pub fn label(&self) -> &'static str {
        match self {
            Self::TourLeader => "TL",
            Self::Driver => "DR",
        }
    }
}

impl std::fmt::Display for SpecialRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialSpot {
    pub id: SpecialRole,
    #[serde(default)]
    pub participant_id: Option<PersonId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialSpots {
    pub tour_leader: SpecialSpot,
    pub driver: SpecialSpot,
}

impl Default for SpecialSpots {
    fn default() -> Self {
        Self {
            tour_leader: SpecialSpot {
                id: SpecialRole::TourLeader,
                participant_id: None,
            },
            driver: SpecialSpot {
                id: SpecialRole::Driver,
                participant_id: None,
            },
        }
    }
}

impl SpecialSpots {
    pub fn get(&self, role: SpecialRole) -> &SpecialSpot {
        match role {
            SpecialRole::TourLeader => &self.tour_leader,
            SpecialRole::Driver => &self.driver,
        }
    }

    pub fn get_mut(&mut self, role: SpecialRole) -> &mut SpecialSpot {
        match role {
            SpecialRole::TourLeader => &mut self.tour_leader,
            SpecialRole::Driver => &mut self.driver,
        }
    }
}

/// Address of a single slot across the whole fleet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum SlotRef {
    Seat { bus_id: BusId, seat_id: String },
    Special { bus_id: BusId, role: SpecialRole },
}

impl SlotRef {
    pub fn seat(bus_id: BusId, seat_id: impl Into<String>) -> Self {
        Self::Seat {
            bus_id,
            seat_id: seat_id.into(),
        }
    }

    pub fn special(bus_id: BusId, role: SpecialRole) -> Self {
        Self::Special { bus_id, role }
    }

    pub fn bus_id(&self) -> BusId {
        match self {
            Self::Seat { bus_id, .. } | Self::Special { bus_id, .. } => *bus_id,
        }
    }
}

impl std::fmt::Display for SlotRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Seat { bus_id, seat_id } => write!(f, "bus {bus_id} seat {seat_id}"),
            Self::Special { bus_id, role } => write!(f, "bus {bus_id} {role}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Bus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bus {
    pub id: BusId,
    pub name: String,
    pub seats: Vec<Seat>,
    pub special_spots: SpecialSpots,
}

impl Bus {
    /// Create an empty bus whose seats are derived from `layout`.
    pub fn from_layout(id: BusId, layout: &[LayoutItem]) -> Self {
        let seats = seat_numbers(layout)
            .into_iter()
            .map(|number| Seat {
                id: format!("B{id}-{number}"),
                seat_number: number.to_string(),
                participant_id: None,
            })
            .collect();

        Self {
            id,
            name: format!("Bus {id}"),
            seats,
            special_spots: SpecialSpots::default(),
        }
    }

    pub fn seat(&self, seat_id: &str) -> Option<&Seat> {
        self.seats.iter().find(|s| s.id == seat_id)
    }

    /// Every slot of this bus: seats in layout order, then the special roles.
    pub fn slots(&self) -> impl Iterator<Item = (SlotRef, Option<&PersonId>)> + '_ {
        let seats = self
            .seats
            .iter()
            .map(move |s| (SlotRef::seat(self.id, s.id.clone()), s.participant_id.as_ref()));
        let specials = SpecialRole::ALL.into_iter().map(move |role| {
            (
                SlotRef::special(self.id, role),
                self.special_spots.get(role).participant_id.as_ref(),
            )
        });
        seats.chain(specials)
    }

    /// Ids of ordinary seats with no occupant, in layout order.
    pub fn vacant_seat_ids(&self) -> Vec<String> {
        self.seats
            .iter()
            .filter(|s| s.participant_id.is_none())
            .map(|s| s.id.clone())
            .collect()
    }

    pub fn occupied_count(&self) -> usize {
        self.slots().filter(|(_, occupant)| occupant.is_some()).count()
    }
}

// ---------------------------------------------------------------------------
// Seating state
// ---------------------------------------------------------------------------

/// The full fleet at one point in time (approved baseline or draft).
///
/// Serializes as the plain `buses` array of the manifest document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatingState {
    buses: Vec<Bus>,
}

impl SeatingState {
    pub fn new(buses: Vec<Bus>) -> Self {
        Self { buses }
    }

    /// `count` empty buses numbered from 1, all built from `layout`.
    pub fn fleet(count: u32, layout: &[LayoutItem]) -> Self {
        Self::new((1..=count).map(|id| Bus::from_layout(id, layout)).collect())
    }

    pub fn buses(&self) -> &[Bus] {
        &self.buses
    }

    pub fn bus(&self, id: BusId) -> Option<&Bus> {
        self.buses.iter().find(|b| b.id == id)
    }

    pub(crate) fn bus_mut(&mut self, id: BusId) -> Option<&mut Bus> {
        self.buses.iter_mut().find(|b| b.id == id)
    }

    /// The occupant cell of a slot, or `None` when the slot does not exist.
    pub fn slot(&self, slot: &SlotRef) -> Option<&Option<PersonId>> {
        let bus = self.bus(slot.bus_id())?;
        match slot {
            SlotRef::Seat { seat_id, .. } => bus.seat(seat_id).map(|s| &s.participant_id),
            SlotRef::Special { role, .. } => Some(&bus.special_spots.get(*role).participant_id),
        }
    }

    pub(crate) fn slot_mut(&mut self, slot: &SlotRef) -> Option<&mut Option<PersonId>> {
        let bus = self.bus_mut(slot.bus_id())?;
        match slot {
            SlotRef::Seat { seat_id, .. } => bus
                .seats
                .iter_mut()
                .find(|s| &s.id == seat_id)
                .map(|s| &mut s.participant_id),
            SlotRef::Special { role, .. } => {
                Some(&mut bus.special_spots.get_mut(*role).participant_id)
            }
        }
    }

    /// Occupant of a slot; `None` for a vacant or unknown slot.
    pub fn occupant(&self, slot: &SlotRef) -> Option<&PersonId> {
        self.slot(slot).and_then(Option::as_ref)
    }

    /// Every slot across all buses.
    pub fn slots(&self) -> impl Iterator<Item = (SlotRef, Option<&PersonId>)> + '_ {
        self.buses.iter().flat_map(Bus::slots)
    }

    /// First slot occupied by `person_id`.
    pub fn locate(&self, person_id: &str) -> Option<SlotRef> {
        self.slots()
            .find(|(_, occupant)| occupant.is_some_and(|id| id == person_id))
            .map(|(slot, _)| slot)
    }

    pub fn assigned_ids(&self) -> HashSet<&str> {
        self.slots()
            .filter_map(|(_, occupant)| occupant.map(String::as_str))
            .collect()
    }

    /// People in `roster` (in roster order) who hold no slot in this state.
    /// An id listed twice in the roster is returned once.
    pub fn unassigned<'r>(&self, roster: &'r Roster) -> Vec<&'r Person> {
        let mut taken = self.assigned_ids();
        let mut unassigned = Vec::new();
        for person in roster.iter() {
            if taken.insert(person.id.as_str()) {
                unassigned.push(person);
            }
        }
        unassigned
    }

    pub fn occupied_count(&self) -> usize {
        self.buses.iter().map(Bus::occupied_count).sum()
    }

    /// Structural problems that break the seating invariants: a person in
    /// more than one slot, an occupant missing from the roster, or duplicate
    /// bus/seat ids. Empty when the state is sound.
    pub fn integrity_issues(&self, roster: &Roster) -> Vec<String> {
        let mut issues: Vec<String> = roster
            .duplicate_ids()
            .into_iter()
            .map(|id| format!("duplicate person id {id} in roster"))
            .collect();

        let mut bus_ids = HashSet::new();
        for bus in &self.buses {
            if !bus_ids.insert(bus.id) {
                issues.push(format!("duplicate bus id {}", bus.id));
            }
            let mut seat_ids = HashSet::new();
            for seat in &bus.seats {
                if !seat_ids.insert(seat.id.as_str()) {
                    issues.push(format!("duplicate seat id {} on bus {}", seat.id, bus.id));
                }
            }
        }

        let mut seen: HashMap<&str, SlotRef> = HashMap::new();
        for (slot, occupant) in self.slots() {
            let Some(id) = occupant else { continue };
            if !roster.contains(id) {
                issues.push(format!("{slot} is occupied by unknown person {id}"));
            }
            match seen.entry(id.as_str()) {
                Entry::Occupied(first) => {
                    issues.push(format!("person {id} occupies both {} and {slot}", first.get()));
                }
                Entry::Vacant(vacant) => {
                    vacant.insert(slot);
                }
            }
        }

        issues
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
