//! Physical bus layout template.
//!
//! The template is a flat, row-major list of cells: seats, aisles, empty
//! floor and doors. Seats are derived from it exactly once when a bus is
//! created, so seat ids stay stable for the bus's lifetime.

use serde::Serialize;

/// Seat letters left of the aisle in rows 1-10.
const LEFT_LETTERS: &[&str] = &["A", "B"];

/// Seat letters right of the aisle in rows 1-11.
const RIGHT_LETTERS: &[&str] = &["C", "D", "E"];

/// Back bench: six seats, no aisle.
const BACK_ROW_LETTERS: &[&str] = &["A", "B", "BC", "C", "D", "E"];

/// Number of regular rows in front of the back door.
const FRONT_ROWS: u32 = 10;

/// One cell of the layout grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayoutItem {
    Seat { seat_number: String },
    Aisle,
    Empty,
    Door { label: String },
}

/// The standard coach layout: front door, ten rows of 2+3 seats, back door,
/// a 3-seat row behind the door, and a 6-seat back bench.
pub fn standard_layout() -> Vec<LayoutItem> {
    let mut layout = Vec::new();

    layout.push(LayoutItem::Door {
        label: "Pintu Depan".to_string(),
    });

    for row in 1..=FRONT_ROWS {
        push_seats(&mut layout, row, LEFT_LETTERS);
        layout.push(LayoutItem::Aisle);
        push_seats(&mut layout, row, RIGHT_LETTERS);
    }

    layout.push(LayoutItem::Door {
        label: "Pintu Belakang".to_string(),
    });

    let row = FRONT_ROWS + 1;
    layout.push(LayoutItem::Empty);
    layout.push(LayoutItem::Empty);
    layout.push(LayoutItem::Aisle);
    push_seats(&mut layout, row, RIGHT_LETTERS);

    push_seats(&mut layout, row + 1, BACK_ROW_LETTERS);

    layout
}

fn push_seats(layout: &mut Vec<LayoutItem>, row: u32, letters: &[&str]) {
    layout.extend(letters.iter().map(|letter| LayoutItem::Seat {
        seat_number: format!("{row}{letter}"),
    }));
}

/// Seat numbers of a layout in layout order.
pub fn seat_numbers(layout: &[LayoutItem]) -> Vec<&str> {
    layout
        .iter()
        .filter_map(|item| match item {
            LayoutItem::Seat { seat_number } => Some(seat_number.as_str()),
            _ => None,
        })
        .collect()
}

/// Split a seat number such as `12BC` into its row and letter parts.
///
/// Returns `None` when the label does not start with a row number or has no
/// letter suffix.
pub fn parse_seat_number(seat_number: &str) -> Option<(u32, &str)> {
    let split = seat_number
        .find(|c: char| !c.is_ascii_digit())
        .filter(|&pos| pos > 0)?;
    let (row, letter) = seat_number.split_at(split);
    Some((row.parse().ok()?, letter))
}
