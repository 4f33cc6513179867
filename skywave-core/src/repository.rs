use async_trait::async_trait;
use uuid::Uuid;
use crate::{
    Booking, BookingUpdate, CoreResult, Flight, FlightSearchCriteria, FlightUpdate, NewBooking,
    NewFlight, NewUser, User, UserUpdate,
};

/// Repository trait for flight data access.
///
/// Lookup misses are `None` and delete misses are `false`; neither is an error.
#[async_trait]
pub trait FlightRepository: Send + Sync {
    async fn list_flights(&self) -> Vec<Flight>;

    async fn get_flight_by_id(&self, id: Uuid) -> Option<Flight>;

    /// Flights matching every provided criterion, in storage order
    async fn search_flights(&self, criteria: &FlightSearchCriteria) -> Vec<Flight>;

    async fn create_flight(&self, flight: NewFlight) -> Flight;

    /// Rejects an update whose merged result fails [`Flight::validate`]
    async fn update_flight(&self, id: Uuid, update: FlightUpdate) -> CoreResult<Option<Flight>>;

    async fn delete_flight(&self, id: Uuid) -> bool;
}

/// Repository trait for booking data access
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn list_bookings(&self) -> Vec<Booking>;

    async fn get_booking_by_id(&self, id: Uuid) -> Option<Booking>;

    async fn get_bookings_by_user(&self, email: &str) -> Vec<Booking>;

    /// Reserves one seat on the referenced flight
    async fn create_booking(&self, booking: NewBooking) -> CoreResult<Booking>;

    /// Like `create_booking`, but the booking stays pending and unpaid
    /// until an update confirms it. The seat is held from the start.
    async fn reserve_booking(&self, booking: NewBooking) -> CoreResult<Booking>;

    /// Releases a seat when the update cancels an active booking and
    /// reserves one when it reactivates a cancelled booking.
    async fn update_booking(&self, id: Uuid, update: BookingUpdate) -> CoreResult<Option<Booking>>;

    async fn delete_booking(&self, id: Uuid) -> bool;
}

/// Repository trait for account data access
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list_users(&self) -> Vec<User>;

    async fn get_user_by_id(&self, id: Uuid) -> Option<User>;

    async fn get_user_by_email(&self, email: &str) -> Option<User>;

    /// Always creates a regular (non-admin) account. The email check and the
    /// insert are one step, so a taken email fails with `EmailTaken`.
    async fn create_user(&self, user: NewUser) -> CoreResult<User>;

    async fn update_user(&self, id: Uuid, update: UserUpdate) -> Option<User>;

    async fn delete_user(&self, id: Uuid) -> bool;
}
