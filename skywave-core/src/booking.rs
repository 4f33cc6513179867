use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use crate::flight::Flight;

/// A seat held by one passenger on one flight.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub flight_id: Uuid,
    /// Snapshot of the flight taken when the booking was made
    pub flight: Flight,
    pub passenger_name: String,
    pub passenger_email: String,
    pub seat_number: String,
    pub booking_date: DateTime<Utc>,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Pending,
}

impl BookingStatus {
    /// Whether a booking in this status holds a seat.
    pub fn is_active(&self) -> bool {
        !matches!(self, BookingStatus::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Pending,
}

impl Booking {
    /// A freshly confirmed and paid booking on `flight`.
    pub fn confirmed(flight: Flight, request: NewBooking) -> Self {
        Self {
            id: Uuid::new_v4(),
            flight_id: flight.id,
            flight,
            passenger_name: request.passenger_name,
            passenger_email: request.passenger_email,
            seat_number: request.seat_number,
            booking_date: Utc::now(),
            status: BookingStatus::Confirmed,
            payment_status: PaymentStatus::Paid,
        }
    }

    /// A booking that holds its seat while payment is outstanding.
    pub fn pending(flight: Flight, request: NewBooking) -> Self {
        Self {
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            ..Self::confirmed(flight, request)
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub flight_id: Uuid,
    pub passenger_name: String,
    pub passenger_email: String,
    pub seat_number: String,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingUpdate {
    pub passenger_name: Option<String>,
    pub passenger_email: Option<String>,
    pub seat_number: Option<String>,
    pub status: Option<BookingStatus>,
    pub payment_status: Option<PaymentStatus>,
}

impl BookingUpdate {
    pub fn cancel() -> Self {
        Self {
            status: Some(BookingStatus::Cancelled),
            ..Default::default()
        }
    }

    /// Settles a pending booking once its payment went through
    pub fn confirm_paid() -> Self {
        Self {
            status: Some(BookingStatus::Confirmed),
            payment_status: Some(PaymentStatus::Paid),
            ..Default::default()
        }
    }

    pub fn apply(self, booking: &mut Booking) {
        if let Some(v) = self.passenger_name {
            booking.passenger_name = v;
        }
        if let Some(v) = self.passenger_email {
            booking.passenger_email = v;
        }
        if let Some(v) = self.seat_number {
            booking.seat_number = v;
        }
        if let Some(v) = self.status {
            booking.status = v;
        }
        if let Some(v) = self.payment_status {
            booking.payment_status = v;
        }
    }
}
