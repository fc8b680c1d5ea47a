//! In-memory stand-in for the operations backend, used by orchestrator
//! tests and offline demos. It records every seat mutation and seat-list
//! fetch so tests can assert the mutate-then-reload protocol call by call.

use std::sync::Mutex;

use async_trait::async_trait;

use skyops_client::api::{
    AuthApi, FlightApi, FlightPayload, PassengerApi, PassengerPayload, SeatApi, SeatUpdate,
    ServiceApi, ServicePayload,
};
use skyops_client::auth::{AuthSession, Credentials, StaffUser};
use skyops_client::wire::YesNo;
use skyops_client::ApiError;
use skyops_core::models::{Flight, Passenger, Seat, Service, ServiceKind};

#[derive(Default)]
pub struct ApiState {
    pub flights: Vec<Flight>,
    pub passengers: Vec<Passenger>,
    pub seats: Vec<Seat>,
    pub services: Vec<Service>,
    pub links: Vec<(i64, i64)>,

    pub seat_updates: Vec<(i64, SeatUpdate)>,
    pub seat_list_fetches: usize,
    pub fail_next_seat_update: bool,
}

impl ApiState {
    pub fn add_flight(&mut self, id: i64, number: &str) {
        self.flights.push(Flight {
            id,
            flight_number: Some(number.to_string()),
            source: Some("DEL".into()),
            destination: Some("BOM".into()),
            departure_time: "2026-09-01T08:00:00".into(),
            arrival_time: "2026-09-01T10:00:00".into(),
            available_seats: Some(180),
            route: Some("DEL-BOM".into()),
        });
    }

    pub fn add_passenger(&mut self, id: i64, name: &str, flight_id: i64) {
        self.passengers.push(Passenger {
            id,
            name: name.to_string(),
            dob: None,
            passport: None,
            address: None,
            meal_preference: None,
            wheelchair: None,
            infant: None,
            email: None,
            phone: None,
            flight_id: Some(flight_id),
        });
    }

    pub fn add_seat(&mut self, id: i64, number: &str, flight_id: i64) {
        self.seats.push(Seat {
            id,
            seat_number: number.to_string(),
            flight_id,
            occupied: false,
            passenger_id: None,
        });
    }

    pub fn add_service(&mut self, id: i64, name: &str, kind: ServiceKind, flight_id: i64) {
        self.services.push(Service {
            id,
            name: name.to_string(),
            kind,
            category: None,
            price: 10.0,
            flight_id,
        });
    }
}

#[derive(Default)]
pub struct InMemoryApi {
    pub state: Mutex<ApiState>,
}

fn next_id(taken: impl Iterator<Item = i64>) -> i64 {
    taken.max().unwrap_or(0) + 1
}

#[async_trait]
impl AuthApi for InMemoryApi {
    async fn login(&self, credentials: &Credentials) -> Result<AuthSession, ApiError> {
        Ok(AuthSession {
            token: "harness-token".into(),
            user: StaffUser {
                username: credentials.username.clone(),
                role: "staff".into(),
            },
        })
    }
}

#[async_trait]
impl FlightApi for InMemoryApi {
    async fn list_flights(&self) -> Result<Vec<Flight>, ApiError> {
        Ok(self.state.lock().unwrap().flights.clone())
    }

    async fn create_flight(&self, flight: &FlightPayload) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        let id = next_id(state.flights.iter().map(|f| f.id));
        state.flights.push(Flight {
            id,
            flight_number: Some(flight.flight_number.clone()),
            source: Some(flight.source.clone()),
            destination: Some(flight.destination.clone()),
            departure_time: flight.departure_time.clone(),
            arrival_time: flight.arrival_time.clone(),
            available_seats: Some(flight.available_seats),
            route: Some(flight.route.clone()),
        });
        Ok(())
    }

    async fn update_flight(&self, id: i64, flight: &FlightPayload) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        let existing = state
            .flights
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("flight {id} not found")))?;
        existing.flight_number = Some(flight.flight_number.clone());
        existing.source = Some(flight.source.clone());
        existing.destination = Some(flight.destination.clone());
        existing.departure_time = flight.departure_time.clone();
        existing.arrival_time = flight.arrival_time.clone();
        existing.available_seats = Some(flight.available_seats);
        existing.route = Some(flight.route.clone());
        Ok(())
    }

    async fn delete_flight(&self, id: i64) -> Result<(), ApiError> {
        self.state.lock().unwrap().flights.retain(|f| f.id != id);
        Ok(())
    }
}

#[async_trait]
impl PassengerApi for InMemoryApi {
    async fn list_passengers(&self) -> Result<Vec<Passenger>, ApiError> {
        Ok(self.state.lock().unwrap().passengers.clone())
    }

    async fn create_passenger(&self, passenger: &PassengerPayload) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        let id = next_id(state.passengers.iter().map(|p| p.id));
        state.passengers.push(Passenger {
            id,
            name: passenger.name.clone(),
            dob: Some(passenger.dob.clone()),
            passport: Some(passenger.passport.clone()),
            address: Some(passenger.address.clone()),
            meal_preference: Some(passenger.meal_preference.clone()),
            wheelchair: Some(passenger.wheelchair == YesNo::Yes),
            infant: Some(passenger.infant == YesNo::Yes),
            email: Some(passenger.email.clone()),
            phone: Some(passenger.phone.clone()),
            flight_id: Some(passenger.flight.flight_id),
        });
        Ok(())
    }

    async fn update_passenger(
        &self,
        id: i64,
        passenger: &PassengerPayload,
    ) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        let existing = state
            .passengers
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("passenger {id} not found")))?;
        existing.name = passenger.name.clone();
        existing.wheelchair = Some(passenger.wheelchair == YesNo::Yes);
        existing.infant = Some(passenger.infant == YesNo::Yes);
        existing.flight_id = Some(passenger.flight.flight_id);
        Ok(())
    }

    async fn delete_passenger(&self, id: i64) -> Result<(), ApiError> {
        self.state.lock().unwrap().passengers.retain(|p| p.id != id);
        Ok(())
    }
}

#[async_trait]
impl SeatApi for InMemoryApi {
    async fn list_seats(&self) -> Result<Vec<Seat>, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.seat_list_fetches += 1;
        Ok(state.seats.clone())
    }

    async fn update_seat(&self, id: i64, update: &SeatUpdate) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        state.seat_updates.push((id, update.clone()));

        if state.fail_next_seat_update {
            state.fail_next_seat_update = false;
            return Err(ApiError::Transport("injected seat update failure".into()));
        }

        let seat = state
            .seats
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("seat {id} not found")))?;
        if let Some(number) = &update.seat_number {
            seat.seat_number = number.clone();
        }
        seat.occupied = update.checked_in == YesNo::Yes;
        seat.passenger_id = update.passenger_id;
        Ok(())
    }
}

#[async_trait]
impl ServiceApi for InMemoryApi {
    async fn list_services(&self) -> Result<Vec<Service>, ApiError> {
        Ok(self.state.lock().unwrap().services.clone())
    }

    async fn create_service(&self, service: &ServicePayload) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        let id = next_id(state.services.iter().map(|s| s.id));
        let kind = ServiceKind::parse(&service.category)
            .ok_or_else(|| ApiError::Validation(format!("bad category {}", service.category)))?;
        state.services.push(Service {
            id,
            name: service.name.clone(),
            kind,
            category: service.subtype.clone(),
            price: service.price,
            flight_id: service.flight.id,
        });
        Ok(())
    }

    async fn update_service(&self, id: i64, service: &ServicePayload) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        let existing = state
            .services
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("service {id} not found")))?;
        existing.name = service.name.clone();
        existing.category = service.subtype.clone();
        existing.price = service.price;
        existing.flight_id = service.flight.id;
        Ok(())
    }

    async fn delete_service(&self, id: i64) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        state.services.retain(|s| s.id != id);
        state.links.retain(|(_, sid)| *sid != id);
        Ok(())
    }

    async fn passenger_services(&self, passenger_id: i64) -> Result<Vec<Service>, ApiError> {
        let state = self.state.lock().unwrap();
        let linked: Vec<i64> = state
            .links
            .iter()
            .filter(|(pid, _)| *pid == passenger_id)
            .map(|(_, sid)| *sid)
            .collect();
        Ok(state
            .services
            .iter()
            .filter(|s| linked.contains(&s.id))
            .cloned()
            .collect())
    }

    async fn link_service(&self, passenger_id: i64, service_id: i64) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        if !state.services.iter().any(|s| s.id == service_id) {
            return Err(ApiError::NotFound(format!("service {service_id} not found")));
        }
        if !state.links.contains(&(passenger_id, service_id)) {
            state.links.push((passenger_id, service_id));
        }
        Ok(())
    }

    async fn unlink_service(&self, passenger_id: i64, service_id: i64) -> Result<(), ApiError> {
        self.state
            .lock()
            .unwrap()
            .links
            .retain(|link| *link != (passenger_id, service_id));
        Ok(())
    }
}
