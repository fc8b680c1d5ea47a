use std::sync::Arc;

use skyops_client::api::{PassengerApi, SeatApi, SeatUpdate};
use skyops_client::ApiError;
use skyops_core::filter::{is_checked_in, PassengerFilter};
use skyops_core::models::{Passenger, Seat};
use skyops_core::seatmap::SeatGrid;

/// Backend surface the check-in session needs.
pub trait CheckInApi: PassengerApi + SeatApi {}

impl<T: PassengerApi + SeatApi> CheckInApi for T {}

#[derive(Debug, thiserror::Error)]
pub enum CheckInError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("no flight selected")]
    NoFlight,
    #[error("no passenger selected")]
    NoSelection,
    #[error("passenger {0} is not on this flight")]
    UnknownPassenger(i64),
}

/// Per-flight check-in state behind named operations.
///
/// The session is the single writer of its passenger and seat slices; seat
/// state is never updated optimistically. Each mutation is a two-step
/// protocol exposed as one operation: issue the update, then refetch the
/// authoritative seat list. A failed update propagates without a refetch.
pub struct CheckInSession {
    api: Arc<dyn CheckInApi>,
    flight_id: Option<i64>,
    passengers: Vec<Passenger>,
    seats: Vec<Seat>,
    selected_passenger: Option<i64>,
    pub filter: PassengerFilter,
}

impl CheckInSession {
    pub fn new(api: Arc<dyn CheckInApi>) -> Self {
        Self {
            api,
            flight_id: None,
            passengers: Vec::new(),
            seats: Vec::new(),
            selected_passenger: None,
            filter: PassengerFilter::default(),
        }
    }

    pub fn flight_id(&self) -> Option<i64> {
        self.flight_id
    }

    pub fn passengers(&self) -> &[Passenger] {
        &self.passengers
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn selected_passenger(&self) -> Option<i64> {
        self.selected_passenger
    }

    /// Switch to a flight: prior state is discarded and passengers and seats
    /// are reloaded from scratch. Loads are tagged with the flight id at
    /// dispatch; a response arriving after the selection moved on is
    /// discarded instead of overwriting newer state.
    pub async fn select_flight(&mut self, flight_id: i64) -> Result<(), CheckInError> {
        self.flight_id = Some(flight_id);
        self.passengers.clear();
        self.seats.clear();

        let passengers = self.api.list_passengers().await?;
        let seats = self.api.seats_for_flight(flight_id).await?;

        if self.flight_id != Some(flight_id) {
            tracing::debug!(flight_id, "discarding stale flight load");
            return Ok(());
        }

        self.passengers = passengers
            .into_iter()
            .filter(|p| p.flight_id == Some(flight_id))
            .collect();
        self.seats = seats;

        // Keep the selection only if that passenger is on this flight;
        // otherwise fall to the first of the new roster.
        if !self
            .passengers
            .iter()
            .any(|p| Some(p.id) == self.selected_passenger)
        {
            self.selected_passenger = self.passengers.first().map(|p| p.id);
        }

        tracing::info!(
            flight_id,
            passengers = self.passengers.len(),
            seats = self.seats.len(),
            "flight loaded"
        );
        Ok(())
    }

    pub fn select_passenger(&mut self, passenger_id: i64) -> Result<(), CheckInError> {
        if !self.passengers.iter().any(|p| p.id == passenger_id) {
            return Err(CheckInError::UnknownPassenger(passenger_id));
        }
        self.selected_passenger = Some(passenger_id);
        Ok(())
    }

    /// Assign the selected passenger to a seat: one update marking the seat
    /// occupied, then exactly one seat-list refetch. No refetch on failure.
    pub async fn assign_seat(&mut self, seat_id: i64) -> Result<(), CheckInError> {
        if self.flight_id.is_none() {
            return Err(CheckInError::NoFlight);
        }
        let passenger_id = self.selected_passenger.ok_or(CheckInError::NoSelection)?;

        self.api
            .update_seat(seat_id, &SeatUpdate::assign(passenger_id))
            .await?;
        tracing::info!(passenger_id, seat_id, "seat assigned");
        self.refetch_seats().await?;
        Ok(())
    }

    /// Release whatever seat the selected passenger holds. When they hold
    /// none this is a no-op with zero network calls, which also makes the
    /// operation idempotent. Returns whether a seat was released.
    pub async fn release_seat(&mut self) -> Result<bool, CheckInError> {
        let passenger_id = self.selected_passenger.ok_or(CheckInError::NoSelection)?;

        let seat_id = match self
            .seats
            .iter()
            .find(|s| s.occupied && s.passenger_id == Some(passenger_id))
        {
            Some(seat) => seat.id,
            None => return Ok(false),
        };

        self.api.update_seat(seat_id, &SeatUpdate::release()).await?;
        tracing::info!(passenger_id, seat_id, "seat released");
        self.refetch_seats().await?;
        Ok(true)
    }

    async fn refetch_seats(&mut self) -> Result<(), ApiError> {
        let Some(flight_id) = self.flight_id else {
            return Ok(());
        };
        let seats = self.api.seats_for_flight(flight_id).await?;
        if self.flight_id == Some(flight_id) {
            self.seats = seats;
        }
        Ok(())
    }

    pub fn grid(&self) -> SeatGrid {
        SeatGrid::build(&self.seats)
    }

    pub fn is_checked_in(&self, passenger_id: i64) -> bool {
        is_checked_in(passenger_id, &self.seats)
    }

    /// The seat currently held by a passenger, if any.
    pub fn seat_of(&self, passenger_id: i64) -> Option<&Seat> {
        self.seats
            .iter()
            .find(|s| s.occupied && s.passenger_id == Some(passenger_id))
    }

    /// Roster after applying the session's filter predicates.
    pub fn filtered_passengers(&self) -> Vec<&Passenger> {
        self.passengers
            .iter()
            .filter(|p| self.filter.matches(p, self.is_checked_in(p.id)))
            .collect()
    }
}
