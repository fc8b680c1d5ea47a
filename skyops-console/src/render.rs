use skyops_checkin::CheckInSession;
use skyops_core::models::Seat;
use skyops_core::seatmap::{classify, SeatGrid, SeatState};

/// Marker appended to each seat label: selected passenger's seat, a seat
/// held by someone else, or a free seat.
fn marker(state: SeatState) -> char {
    match state {
        SeatState::Mine => '*',
        SeatState::Occupied => '#',
        SeatState::Free => '.',
    }
}

fn status_word(state: SeatState) -> &'static str {
    match state {
        SeatState::Mine => "selected passenger",
        SeatState::Occupied => "occupied",
        SeatState::Free => "free",
    }
}

/// Render the cabin as a rows × columns map, or as a flat list when the
/// seat labels give the grid nothing to work with.
pub fn seat_map(seats: &[Seat], selected: Option<i64>) -> String {
    let grid = SeatGrid::build(seats);
    if grid.is_empty() {
        return flat_list(seats, selected);
    }

    let cell = seats
        .iter()
        .map(|s| s.seat_number.len())
        .max()
        .unwrap_or(2)
        .max(2)
        + 1;

    let mut out = String::from("Seat map:\n");
    out.push_str("    ");
    for col in grid.columns() {
        out.push_str(&format!("{col:>cell$} "));
    }
    out.push('\n');

    for row in grid.rows() {
        out.push_str(&format!("{row:>3} "));
        for col in grid.columns() {
            match grid.seat_at(*row, col) {
                Some(seat) => {
                    let m = marker(classify(seat, selected));
                    out.push_str(&format!("{:>w$}{m} ", seat.seat_number, w = cell - 1));
                }
                None => out.push_str(&" ".repeat(cell + 1)),
            }
        }
        out.push('\n');
    }
    out.push_str("    legend: * selected passenger  # occupied  . free\n");
    out
}

fn flat_list(seats: &[Seat], selected: Option<i64>) -> String {
    let mut out = String::from("Seat list (no grid structure):\n");
    for seat in seats {
        out.push_str(&format!(
            "  {:<8} {}\n",
            seat.seat_number,
            status_word(classify(seat, selected))
        ));
    }
    out
}

/// Render the filtered passenger roster with derived check-in status.
pub fn roster(session: &CheckInSession) -> String {
    let mut out = format!(
        "{:>6}  {:<24} {:<12} {:<12} {:<10} {}\n",
        "id", "name", "dob", "passport", "seat", "flags"
    );
    for passenger in session.filtered_passengers() {
        let seat = session
            .seat_of(passenger.id)
            .map(|s| s.seat_number.clone())
            .unwrap_or_else(|| "—".into());
        let mut flags = Vec::new();
        if passenger.wheelchair == Some(true) {
            flags.push("wheelchair");
        }
        if passenger.infant == Some(true) {
            flags.push("infant");
        }
        let selected = if Some(passenger.id) == session.selected_passenger() {
            ">"
        } else {
            " "
        };
        out.push_str(&format!(
            "{selected}{:>5}  {:<24} {:<12} {:<12} {:<10} {}\n",
            passenger.id,
            passenger.name,
            passenger.dob.as_deref().unwrap_or("—"),
            passenger.passport.as_deref().unwrap_or("—"),
            seat,
            flags.join(", "),
        ));
    }
    out
}
