pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod wire;

pub use api::{AuthApi, FlightApi, OpsApi, PassengerApi, SeatApi, ServiceApi};
pub use auth::{AuthSession, Credentials, StaffUser, TokenStore};
pub use error::ApiError;
pub use http::HttpApi;
