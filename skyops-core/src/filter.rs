use crate::models::{Passenger, Seat};

/// Filter over a tri-state passenger flag (wheelchair, infant).
///
/// Unknown flags normalize to `false` before comparison, so `No` matches a
/// passenger whose flag was never set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlagFilter {
    #[default]
    All,
    Yes,
    No,
}

impl FlagFilter {
    fn matches(&self, value: Option<bool>) -> bool {
        match self {
            Self::All => true,
            Self::Yes => value.unwrap_or(false),
            Self::No => !value.unwrap_or(false),
        }
    }
}

/// Filter over derived check-in status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckedFilter {
    #[default]
    All,
    In,
    Out,
}

impl CheckedFilter {
    fn matches(&self, checked_in: bool) -> bool {
        match self {
            Self::All => true,
            Self::In => checked_in,
            Self::Out => !checked_in,
        }
    }
}

/// Conjunction of the three roster predicates. A passenger passes only if
/// every predicate not set to All accepts them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PassengerFilter {
    pub wheelchair: FlagFilter,
    pub infant: FlagFilter,
    pub checked: CheckedFilter,
}

impl PassengerFilter {
    pub fn matches(&self, passenger: &Passenger, checked_in: bool) -> bool {
        self.wheelchair.matches(passenger.wheelchair)
            && self.infant.matches(passenger.infant)
            && self.checked.matches(checked_in)
    }
}

/// Check-in status is derived, never stored: a passenger is checked in iff
/// some seat record references them with occupied = true.
pub fn is_checked_in(passenger_id: i64, seats: &[Seat]) -> bool {
    seats
        .iter()
        .any(|s| s.occupied && s.passenger_id == Some(passenger_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passenger(id: i64, wheelchair: Option<bool>, infant: Option<bool>) -> Passenger {
        Passenger {
            id,
            name: format!("pax-{id}"),
            dob: None,
            passport: None,
            address: None,
            meal_preference: None,
            wheelchair,
            infant,
            email: None,
            phone: None,
            flight_id: Some(1),
        }
    }

    fn occupied_seat(passenger_id: i64) -> Seat {
        Seat {
            id: 100 + passenger_id,
            seat_number: "1A".into(),
            flight_id: 1,
            occupied: true,
            passenger_id: Some(passenger_id),
        }
    }

    #[test]
    fn default_filter_passes_everyone() {
        let filter = PassengerFilter::default();
        assert!(filter.matches(&passenger(1, None, None), false));
        assert!(filter.matches(&passenger(2, Some(true), Some(true)), true));
    }

    #[test]
    fn predicates_are_anded() {
        let p = passenger(1, Some(true), Some(false));
        let pass = PassengerFilter {
            wheelchair: FlagFilter::Yes,
            infant: FlagFilter::No,
            checked: CheckedFilter::In,
        };
        assert!(pass.matches(&p, true));

        let fail = PassengerFilter {
            wheelchair: FlagFilter::No,
            infant: FlagFilter::No,
            checked: CheckedFilter::In,
        };
        assert!(!fail.matches(&p, true));
    }

    #[test]
    fn unknown_flag_counts_as_no() {
        let p = passenger(1, None, None);
        let wants_no = PassengerFilter {
            wheelchair: FlagFilter::No,
            ..Default::default()
        };
        assert!(wants_no.matches(&p, false));

        let wants_yes = PassengerFilter {
            wheelchair: FlagFilter::Yes,
            ..Default::default()
        };
        assert!(!wants_yes.matches(&p, false));
    }

    #[test]
    fn checked_out_filter_excludes_checked_in() {
        let filter = PassengerFilter {
            checked: CheckedFilter::Out,
            ..Default::default()
        };
        assert!(!filter.matches(&passenger(1, None, None), true));
        assert!(filter.matches(&passenger(1, None, None), false));
    }

    #[test]
    fn check_in_status_derives_from_seats() {
        let seats = vec![occupied_seat(7)];
        assert!(is_checked_in(7, &seats));
        assert!(!is_checked_in(9, &seats));

        // An unoccupied seat pointing at the passenger does not count.
        let stale = vec![Seat {
            occupied: false,
            ..occupied_seat(7)
        }];
        assert!(!is_checked_in(7, &stale));
    }
}
