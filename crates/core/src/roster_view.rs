//! Per-bus list of seated people, as shown in the bus roster panel and the
//! printed manifest.

use std::cmp::Ordering;

use serde::Serialize;

use crate::layout::parse_seat_number;
use crate::roster::{Person, Roster};
use crate::seating::{Bus, SlotRef, SpecialRole};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterRow<'a> {
    /// Seat number, or `TL` / `DR` for the special roles.
    pub seat_label: &'a str,
    pub person: &'a Person,
    pub source: SlotRef,
}

impl RosterRow<'_> {
    fn is_special(&self) -> bool {
        matches!(self.source, SlotRef::Special { .. })
    }
}

/// Everyone seated on `bus`: ordinary seats by row then letter, special
/// roles last. Occupants missing from the roster are skipped.
pub fn bus_roster<'a>(bus: &'a Bus, roster: &'a Roster) -> Vec<RosterRow<'a>> {
    let seats = bus.seats.iter().filter_map(move |seat| {
        let person = roster.get(seat.participant_id.as_deref()?)?;
        Some(RosterRow {
            seat_label: &seat.seat_number,
            person,
            source: SlotRef::seat(bus.id, seat.id.clone()),
        })
    });

    let specials = SpecialRole::ALL.into_iter().filter_map(move |role| {
        let id = bus.special_spots.get(role).participant_id.as_deref()?;
        Some(RosterRow {
            seat_label: role.label(),
            person: roster.get(id)?,
            source: SlotRef::special(bus.id, role),
        })
    });

    let mut rows: Vec<RosterRow<'a>> = seats.chain(specials).collect();
    rows.sort_by(compare_rows);
    rows
}

fn compare_rows(a: &RosterRow<'_>, b: &RosterRow<'_>) -> Ordering {
    match (a.is_special(), b.is_special()) {
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (true, true) => a.seat_label.cmp(b.seat_label),
        (false, false) => compare_seat_labels(a.seat_label, b.seat_label),
    }
}

/// Row number first, then letter; unparseable labels fall back to plain
/// string order.
fn compare_seat_labels(a: &str, b: &str) -> Ordering {
    match (parse_seat_number(a), parse_seat_number(b)) {
        (Some((row_a, letter_a)), Some((row_b, letter_b))) => {
            row_a.cmp(&row_b).then_with(|| letter_a.cmp(letter_b))
        }
        _ => a.cmp(b),
    }
}
