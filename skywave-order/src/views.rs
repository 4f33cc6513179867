use chrono::NaiveDate;
use serde::Serialize;
use skywave_core::{Booking, BookingStatus};

const RECENT_BOOKINGS: usize = 3;

/// A customer's bookings split the way the "My bookings" tabs show them.
/// Flights departing today still count as upcoming.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingPartition {
    pub upcoming: Vec<Booking>,
    pub completed: Vec<Booking>,
    pub cancelled: Vec<Booking>,
}

impl BookingPartition {
    pub fn new(bookings: Vec<Booking>, today: NaiveDate) -> Self {
        let mut partition = Self::default();
        for booking in bookings {
            if booking.status == BookingStatus::Cancelled {
                partition.cancelled.push(booking);
            } else if booking.flight.date >= today {
                partition.upcoming.push(booking);
            } else {
                partition.completed.push(booking);
            }
        }
        partition
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingDashboard {
    /// Confirmed bookings not yet flown, soonest first
    pub upcoming: Vec<Booking>,
    /// Latest bookings by booking date, any status
    pub recent: Vec<Booking>,
}

impl BookingDashboard {
    pub fn new(bookings: &[Booking], today: NaiveDate) -> Self {
        let mut upcoming: Vec<Booking> = bookings
            .iter()
            .filter(|b| b.status == BookingStatus::Confirmed && b.flight.date >= today)
            .cloned()
            .collect();
        upcoming.sort_by_key(|b| (b.flight.date, b.flight.departure_time));

        let mut recent = bookings.to_vec();
        recent.sort_by(|a, b| b.booking_date.cmp(&a.booking_date));
        recent.truncate(RECENT_BOOKINGS);

        Self { upcoming, recent }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveTime, TimeZone, Utc};
    use skywave_core::{Airport, Flight, FlightDuration, FlightStatus, NewBooking, NewFlight};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn booking_on(offset: i64, hour: u32, status: BookingStatus) -> Booking {
        let flight = Flight::new(NewFlight {
            flight_number: format!("SK{}", 5000 + offset),
            departure_airport: Airport::new("ATL", "Atlanta"),
            arrival_airport: Airport::new("ORD", "Chicago"),
            departure_time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            arrival_time: NaiveTime::from_hms_opt(hour + 2, 0, 0).unwrap(),
            date: today() + Duration::days(offset),
            duration: FlightDuration::new(2, 0),
            price: 180,
            seats_available: 20,
            aircraft: "Embraer E190".to_string(),
            status: FlightStatus::Scheduled,
            stopover: None,
            amenities: Default::default(),
        });
        let mut booking = Booking::confirmed(flight.clone(), NewBooking {
            flight_id: flight.id,
            passenger_name: "John Doe".to_string(),
            passenger_email: "user@example.com".to_string(),
            seat_number: "4D".to_string(),
        });
        booking.status = status;
        booking
    }

    #[test]
    fn test_partition_by_date_and_status() {
        let bookings = vec![
            booking_on(-3, 9, BookingStatus::Confirmed),
            booking_on(0, 9, BookingStatus::Confirmed),
            booking_on(5, 9, BookingStatus::Pending),
            booking_on(5, 9, BookingStatus::Cancelled),
            booking_on(-1, 9, BookingStatus::Cancelled),
        ];

        let partition = BookingPartition::new(bookings, today());
        assert_eq!(partition.upcoming.len(), 2);
        assert_eq!(partition.completed.len(), 1);
        assert_eq!(partition.cancelled.len(), 2);
        assert!(partition.upcoming.iter().all(|b| b.flight.date >= today()));
    }

    #[test]
    fn test_dashboard_ordering() {
        let mut bookings = vec![
            booking_on(7, 8, BookingStatus::Confirmed),
            booking_on(2, 15, BookingStatus::Confirmed),
            booking_on(2, 6, BookingStatus::Confirmed),
            booking_on(1, 10, BookingStatus::Pending),
            booking_on(-2, 10, BookingStatus::Confirmed),
        ];
        for (i, booking) in bookings.iter_mut().enumerate() {
            booking.booking_date = Utc.with_ymd_and_hms(2026, 10, 1 + i as u32, 12, 0, 0).unwrap();
        }

        let dashboard = BookingDashboard::new(&bookings, today());

        let upcoming: Vec<_> = dashboard.upcoming.iter().map(|b| b.flight.flight_number.as_str()).collect();
        assert_eq!(upcoming, ["SK5002", "SK5002", "SK5007"]);
        assert_eq!(dashboard.upcoming[0].flight.departure_time.format("%H:%M").to_string(), "06:00");

        let recent: Vec<_> = dashboard.recent.iter().map(|b| b.id).collect();
        assert_eq!(recent, [bookings[4].id, bookings[3].id, bookings[2].id]);
    }
}
