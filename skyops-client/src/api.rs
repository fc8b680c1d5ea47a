use async_trait::async_trait;
use serde::Serialize;

use skyops_core::models::{Flight, Passenger, Seat, Service};

use crate::auth::{AuthSession, Credentials};
use crate::error::ApiError;
use crate::wire::YesNo;

/// Body of `PUT /api/seats/{id}`.
///
/// `passenger_id` serializes as an explicit `null` when releasing a seat;
/// the backend treats a missing key and a null differently, so it is never
/// skipped.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeatUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seat_number: Option<String>,
    pub passenger_id: Option<i64>,
    pub checked_in: YesNo,
}

impl SeatUpdate {
    /// Mark the seat occupied by the given passenger.
    pub fn assign(passenger_id: i64) -> Self {
        Self {
            seat_number: None,
            passenger_id: Some(passenger_id),
            checked_in: YesNo::Yes,
        }
    }

    /// Mark the seat unoccupied with no passenger.
    pub fn release() -> Self {
        Self {
            seat_number: None,
            passenger_id: None,
            checked_in: YesNo::No,
        }
    }
}

/// Flight fields for create and edit; the id is backend-assigned.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlightPayload {
    pub flight_number: String,
    pub source: String,
    pub destination: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub available_seats: i32,
    pub route: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlightRef {
    pub flight_id: i64,
}

/// Passenger fields for create and edit. Flags go over the wire as Y/N
/// markers; the flight is referenced by id only to avoid cascading writes.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PassengerPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub passport: String,
    pub dob: String,
    pub address: String,
    pub meal_preference: String,
    pub infant: YesNo,
    pub wheelchair: YesNo,
    pub flight: FlightRef,
}

/// Service fields for create and edit.
///
/// Backend column semantics: `category` holds the broad class (lowercase),
/// `type` holds the meal subtype for meals and null otherwise. The full
/// flight object is embedded because the services controller expects it.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServicePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<i64>,
    pub name: String,
    #[serde(rename = "type")]
    pub subtype: Option<String>,
    pub category: String,
    pub price: f64,
    pub flight: Flight,
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for a session token. Implementations store the
    /// token so subsequent calls carry it.
    async fn login(&self, credentials: &Credentials) -> Result<AuthSession, ApiError>;
}

#[async_trait]
pub trait FlightApi: Send + Sync {
    async fn list_flights(&self) -> Result<Vec<Flight>, ApiError>;
    async fn create_flight(&self, flight: &FlightPayload) -> Result<(), ApiError>;
    async fn update_flight(&self, id: i64, flight: &FlightPayload) -> Result<(), ApiError>;
    async fn delete_flight(&self, id: i64) -> Result<(), ApiError>;
}

#[async_trait]
pub trait PassengerApi: Send + Sync {
    async fn list_passengers(&self) -> Result<Vec<Passenger>, ApiError>;
    async fn create_passenger(&self, passenger: &PassengerPayload) -> Result<(), ApiError>;
    async fn update_passenger(&self, id: i64, passenger: &PassengerPayload)
        -> Result<(), ApiError>;
    async fn delete_passenger(&self, id: i64) -> Result<(), ApiError>;
}

#[async_trait]
pub trait SeatApi: Send + Sync {
    /// All seats across flights; the backend has no per-flight endpoint.
    async fn list_seats(&self) -> Result<Vec<Seat>, ApiError>;

    async fn update_seat(&self, id: i64, update: &SeatUpdate) -> Result<(), ApiError>;

    /// Client-side filter of `list_seats` down to one flight.
    async fn seats_for_flight(&self, flight_id: i64) -> Result<Vec<Seat>, ApiError> {
        let all = self.list_seats().await?;
        Ok(all.into_iter().filter(|s| s.flight_id == flight_id).collect())
    }
}

#[async_trait]
pub trait ServiceApi: Send + Sync {
    async fn list_services(&self) -> Result<Vec<Service>, ApiError>;
    async fn create_service(&self, service: &ServicePayload) -> Result<(), ApiError>;
    async fn update_service(&self, id: i64, service: &ServicePayload) -> Result<(), ApiError>;
    async fn delete_service(&self, id: i64) -> Result<(), ApiError>;

    /// Services already linked to a passenger.
    async fn passenger_services(&self, passenger_id: i64) -> Result<Vec<Service>, ApiError>;
    async fn link_service(&self, passenger_id: i64, service_id: i64) -> Result<(), ApiError>;
    async fn unlink_service(&self, passenger_id: i64, service_id: i64) -> Result<(), ApiError>;

    /// Client-side filter of `list_services` down to one flight.
    async fn services_for_flight(&self, flight_id: i64) -> Result<Vec<Service>, ApiError> {
        let all = self.list_services().await?;
        Ok(all.into_iter().filter(|s| s.flight_id == flight_id).collect())
    }
}

/// The full backend surface the console talks to.
pub trait OpsApi: AuthApi + FlightApi + PassengerApi + SeatApi + ServiceApi {}

impl<T: AuthApi + FlightApi + PassengerApi + SeatApi + ServiceApi> OpsApi for T {}
