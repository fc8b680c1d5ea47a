use std::collections::HashMap;

use crate::models::Seat;

/// A seat label split into its row number and column code.
///
/// Row 0 is the "unparseable" sentinel: the label did not match
/// `<digits><letters>` and `column` holds the original string untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatLabel {
    pub row: u32,
    pub column: String,
}

impl SeatLabel {
    /// Parse a label such as "12C" into row 12, column "C".
    ///
    /// Letters are normalized to uppercase. Anything that is not a positive
    /// decimal row followed by one or more ASCII letters degrades to row 0
    /// with the input echoed back; this never panics and never errors.
    pub fn parse(label: &str) -> Self {
        let unparseable = || Self {
            row: 0,
            column: label.to_string(),
        };

        let digits_end = label
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(label.len());
        let (digits, letters) = label.split_at(digits_end);

        if digits.is_empty()
            || letters.is_empty()
            || !letters.chars().all(|c| c.is_ascii_alphabetic())
        {
            return unparseable();
        }

        match digits.parse::<u32>() {
            Ok(row) if row > 0 => Self {
                row,
                column: letters.to_ascii_uppercase(),
            },
            _ => unparseable(),
        }
    }

    pub fn is_parseable(&self) -> bool {
        self.row > 0
    }
}

/// Occupancy classification of one seat relative to the currently selected
/// passenger. Drives the click affordance: `Mine` unassigns, `Free` assigns,
/// `Occupied` is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatState {
    Mine,
    Occupied,
    Free,
}

pub fn classify(seat: &Seat, selected_passenger: Option<i64>) -> SeatState {
    if !seat.occupied {
        return SeatState::Free;
    }
    match (seat.passenger_id, selected_passenger) {
        (Some(holder), Some(selected)) if holder == selected => SeatState::Mine,
        _ => SeatState::Occupied,
    }
}

/// A rows × columns presentation grid derived from one flight's seats.
///
/// Seats with empty or unparseable labels are dropped from the grid. When
/// nothing survives, both axes are empty and callers must fall back to a
/// flat list of all seats; that degraded mode is part of the contract, not
/// an error.
#[derive(Debug, Clone, Default)]
pub struct SeatGrid {
    rows: Vec<u32>,
    columns: Vec<String>,
    cells: HashMap<(u32, String), Seat>,
}

impl SeatGrid {
    pub fn build(seats: &[Seat]) -> Self {
        let mut cells: HashMap<(u32, String), Seat> = HashMap::new();
        let mut dropped = 0usize;

        for seat in seats {
            if seat.seat_number.is_empty() {
                dropped += 1;
                continue;
            }
            let label = SeatLabel::parse(&seat.seat_number);
            if !label.is_parseable() {
                dropped += 1;
                continue;
            }
            // First seat wins on duplicate labels.
            cells
                .entry((label.row, label.column))
                .or_insert_with(|| seat.clone());
        }

        if dropped > 0 {
            tracing::debug!(dropped, "seats excluded from grid (no parseable label)");
        }

        let mut rows: Vec<u32> = cells.keys().map(|(r, _)| *r).collect();
        rows.sort_unstable();
        rows.dedup();

        let mut columns: Vec<String> = cells.keys().map(|(_, c)| c.clone()).collect();
        columns.sort();
        columns.dedup();

        Self { rows, columns, cells }
    }

    /// True when the grid has no usable structure and the caller should
    /// render the flat seat list instead.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    pub fn rows(&self) -> &[u32] {
        &self.rows
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The seat at (row, column), or None for a gap in a non-rectangular cabin.
    pub fn seat_at(&self, row: u32, column: &str) -> Option<&Seat> {
        self.cells.get(&(row, column.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seat(id: i64, number: &str, occupied: bool, passenger: Option<i64>) -> Seat {
        Seat {
            id,
            seat_number: number.to_string(),
            flight_id: 1,
            occupied,
            passenger_id: passenger,
        }
    }

    #[test]
    fn parses_row_and_uppercased_column() {
        assert_eq!(
            SeatLabel::parse("12C"),
            SeatLabel { row: 12, column: "C".into() }
        );
        assert_eq!(
            SeatLabel::parse("1a"),
            SeatLabel { row: 1, column: "A".into() }
        );
        assert_eq!(
            SeatLabel::parse("3AB"),
            SeatLabel { row: 3, column: "AB".into() }
        );
    }

    #[test]
    fn malformed_labels_degrade_to_row_zero() {
        for raw in ["C12", "", "12", "AB", "12C3", "1-A", "0A"] {
            let label = SeatLabel::parse(raw);
            assert_eq!(label.row, 0, "label {raw:?} should be unparseable");
            assert_eq!(label.column, raw);
        }
    }

    #[test]
    fn grid_axes_are_sorted_and_distinct() {
        let seats = vec![
            seat(1, "2A", false, None),
            seat(2, "1B", false, None),
            seat(3, "1A", false, None),
        ];
        let grid = SeatGrid::build(&seats);
        assert_eq!(grid.rows(), &[1, 2]);
        assert_eq!(grid.columns(), &["A".to_string(), "B".to_string()]);
        assert_eq!(grid.seat_at(1, "A").map(|s| s.id), Some(3));
        assert!(grid.seat_at(2, "B").is_none(), "non-rectangular gap");
    }

    #[test]
    fn unparseable_flight_yields_empty_grid() {
        let seats = vec![seat(1, "front-left", false, None), seat(2, "", false, None)];
        let grid = SeatGrid::build(&seats);
        assert!(grid.is_empty());
        assert!(grid.rows().is_empty());
        assert!(grid.columns().is_empty());
    }

    #[test]
    fn rows_sort_numerically_not_lexically() {
        let seats = vec![
            seat(1, "10A", false, None),
            seat(2, "2A", false, None),
            seat(3, "9A", false, None),
        ];
        let grid = SeatGrid::build(&seats);
        assert_eq!(grid.rows(), &[2, 9, 10]);
    }

    #[test]
    fn classify_relative_to_selection() {
        let taken = seat(1, "1A", true, Some(7));
        assert_eq!(classify(&taken, Some(7)), SeatState::Mine);
        assert_eq!(classify(&taken, Some(9)), SeatState::Occupied);
        assert_eq!(classify(&taken, None), SeatState::Occupied);

        let open = seat(2, "1B", false, None);
        assert_eq!(classify(&open, Some(7)), SeatState::Free);
        assert_eq!(classify(&open, None), SeatState::Free);

        // Stale passenger id on an unoccupied seat still reads as free.
        let stale = seat(3, "1C", false, Some(7));
        assert_eq!(classify(&stale, Some(7)), SeatState::Free);
    }
}
