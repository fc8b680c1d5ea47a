pub mod harness;
pub mod services;
pub mod session;

pub use services::{NewService, ServiceDesk};
pub use session::{CheckInError, CheckInSession};
