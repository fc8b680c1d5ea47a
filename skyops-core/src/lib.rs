pub mod filter;
pub mod models;
pub mod seatmap;

pub use models::{Flight, MealKind, Passenger, Seat, Service, ServiceKind};
pub use seatmap::{classify, SeatGrid, SeatLabel, SeatState};
