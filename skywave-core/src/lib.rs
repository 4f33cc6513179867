pub mod flight;
pub mod booking;
pub mod user;
pub mod passenger;
pub mod search;
pub mod repository;
pub mod identity;
pub mod payment;

pub use booking::{Booking, BookingStatus, BookingUpdate, NewBooking, PaymentStatus};
pub use flight::{Airport, Flight, FlightDuration, FlightStatus, FlightUpdate, NewFlight, SeatError, Stopover};
pub use passenger::PassengerSummary;
pub use search::{FlightFilter, FlightSearchCriteria, FlightStatusQuery};
pub use user::{NewUser, Role, User, UserProfile, UserUpdate};

use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Flight not found: {0}")]
    FlightNotFound(Uuid),
    #[error("Booking not found: {0}")]
    BookingNotFound(Uuid),
    #[error("Flight {flight_number} has no seats left")]
    SoldOut { flight_number: String },
    #[error("An account already exists for {0}")]
    EmailTaken(String),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Payment declined: {0}")]
    PaymentDeclined(String),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

impl From<SeatError> for CoreError {
    fn from(err: SeatError) -> Self {
        match err {
            SeatError::SoldOut { flight_number } => CoreError::SoldOut { flight_number },
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
