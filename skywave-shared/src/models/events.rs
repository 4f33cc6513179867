use uuid::Uuid;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmedEvent {
    pub booking_id: Uuid,
    pub flight_id: Uuid,
    pub passenger_email: String,
    pub seat_number: String,
    pub seats_remaining: u32,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingCancelledEvent {
    pub booking_id: Uuid,
    pub flight_id: Uuid,
    /// `None` when the flight no longer exists and no seat was returned.
    pub seats_remaining: Option<u32>,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlightDeletedEvent {
    pub flight_id: Uuid,
    pub flight_number: String,
    pub cancelled_bookings: Vec<Uuid>,
    pub timestamp: i64,
}

/// Everything the store announces after a successful mutation.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainEvent {
    BookingConfirmed(BookingConfirmedEvent),
    BookingCancelled(BookingCancelledEvent),
    FlightDeleted(FlightDeletedEvent),
}

impl DomainEvent {
    pub fn topic(&self) -> &'static str {
        match self {
            DomainEvent::BookingConfirmed(_) => "booking.confirmed",
            DomainEvent::BookingCancelled(_) => "booking.cancelled",
            DomainEvent::FlightDeleted(_) => "flight.deleted",
        }
    }

    pub fn key(&self) -> Uuid {
        match self {
            DomainEvent::BookingConfirmed(e) => e.booking_id,
            DomainEvent::BookingCancelled(e) => e.booking_id,
            DomainEvent::FlightDeleted(e) => e.flight_id,
        }
    }
}
