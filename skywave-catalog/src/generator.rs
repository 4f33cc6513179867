use crate::airports::{AIRCRAFT, AIRPORTS, AMENITIES};
use crate::seating::SEAT_LETTERS;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use skywave_core::{
    Airport, Booking, BookingStatus, Flight, FlightDuration, FlightStatus, NewFlight, PaymentStatus,
    Stopover,
};
use uuid::Uuid;

/// Statuses a same-day flight can be in. Completed is only reachable through an admin update.
const SAME_DAY_STATUSES: [FlightStatus; 4] = [
    FlightStatus::Scheduled,
    FlightStatus::OnTime,
    FlightStatus::Delayed,
    FlightStatus::Cancelled,
];

pub const DEMO_PASSENGER_NAME: &str = "John Doe";
pub const DEMO_PASSENGER_EMAIL: &str = "user@example.com";

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub seed: u64,
    /// First day of the schedule ("today")
    pub anchor: NaiveDate,
    pub days: u32,
}

fn default_days() -> u32 {
    30
}

impl GeneratorConfig {
    pub fn new(seed: u64, anchor: NaiveDate) -> Self {
        Self {
            seed,
            anchor,
            days: default_days(),
        }
    }
}

/// Deterministic source of demo data. The same config always yields the same
/// flights, bookings and passengers, ids included.
pub struct FixtureGenerator {
    pub(crate) rng: StdRng,
    pub(crate) config: GeneratorConfig,
}

impl FixtureGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Timestamp used for every generated record: midnight UTC on the anchor day
    pub fn generated_at(&self) -> DateTime<Utc> {
        self.config.anchor.and_time(NaiveTime::default()).and_utc()
    }

    pub(crate) fn next_id(&mut self) -> Uuid {
        uuid::Builder::from_random_bytes(self.rng.gen()).into_uuid()
    }

    /// 10-14 flights for each day of the window
    pub fn generate_flights(&mut self) -> Vec<Flight> {
        let mut flights = Vec::new();

        for day in 0..self.config.days {
            let date = self.config.anchor + Duration::days(i64::from(day));
            let flights_per_day = self.rng.gen_range(10..15);

            for _ in 0..flights_per_day {
                flights.push(self.generate_flight(date, day));
            }
        }

        flights
    }

    fn generate_flight(&mut self, date: NaiveDate, day: u32) -> Flight {
        let departure_index = self.rng.gen_range(0..AIRPORTS.len());
        let arrival_index = loop {
            let candidate = self.rng.gen_range(0..AIRPORTS.len());
            if candidate != departure_index {
                break candidate;
            }
        };

        let departure_time = NaiveTime::from_hms_opt(
            self.rng.gen_range(5..23),
            self.quarter_hour(),
            0,
        )
        .unwrap_or_default();

        // 70% short haul (1-4h), otherwise long haul (6-15h)
        let duration_hours = if self.rng.gen_bool(0.7) {
            self.rng.gen_range(1..5)
        } else {
            self.rng.gen_range(6..16)
        };
        let duration = FlightDuration::new(duration_hours, self.quarter_hour());

        // NaiveTime addition wraps past midnight
        let arrival_time = departure_time + duration.as_chrono();

        let price = match duration_hours {
            0..=3 => self.rng.gen_range(100..400),
            4..=6 => self.rng.gen_range(300..800),
            _ => self.rng.gen_range(800..2000),
        };

        let seats_available = self.rng.gen_range(1..=50);

        let status = if day == 0 {
            *SAME_DAY_STATUSES.choose(&mut self.rng).unwrap_or(&FlightStatus::Scheduled)
        } else {
            FlightStatus::Scheduled
        };

        let stopover = if self.rng.gen_bool(0.3) && duration_hours > 3 {
            let stop_index = loop {
                let candidate = self.rng.gen_range(0..AIRPORTS.len());
                if candidate != departure_index && candidate != arrival_index {
                    break candidate;
                }
            };
            Some(Stopover {
                airport: AIRPORTS[stop_index].0.to_string(),
                duration: FlightDuration::new(self.rng.gen_range(1..4), self.quarter_hour()),
            })
        } else {
            None
        };

        let amenity_count = self.rng.gen_range(2..=5);
        let amenities = AMENITIES
            .choose_multiple(&mut self.rng, amenity_count)
            .map(|a| a.to_string())
            .collect();

        let id = self.next_id();
        let flight_number = format!("SK{}", self.rng.gen_range(1000..10000));
        let aircraft = AIRCRAFT[self.rng.gen_range(0..AIRCRAFT.len())].to_string();
        let (dep_code, dep_city) = AIRPORTS[departure_index];
        let (arr_code, arr_city) = AIRPORTS[arrival_index];

        Flight::with_id(
            id,
            self.generated_at(),
            NewFlight {
                flight_number,
                departure_airport: Airport::new(dep_code, dep_city),
                arrival_airport: Airport::new(arr_code, arr_city),
                departure_time,
                arrival_time,
                date,
                duration,
                price,
                seats_available,
                aircraft,
                status,
                stopover,
                amenities,
            },
        )
    }

    /// Sample bookings for the demo account, spread over `flights`.
    ///
    /// Seats are not taken here; the store reserves them when the bookings are loaded.
    pub fn generate_bookings(&mut self, flights: &[Flight], count: usize) -> Vec<Booking> {
        if flights.is_empty() {
            return Vec::new();
        }

        (0..count)
            .map(|_| {
                let flight = flights[self.rng.gen_range(0..flights.len())].clone();
                let seat_number = format!(
                    "{}{}",
                    self.rng.gen_range(1..=30),
                    SEAT_LETTERS[self.rng.gen_range(0..SEAT_LETTERS.len())]
                );
                let status = if self.rng.gen_bool(0.8) {
                    BookingStatus::Confirmed
                } else {
                    BookingStatus::Cancelled
                };
                let payment_status = if self.rng.gen_bool(0.9) {
                    PaymentStatus::Paid
                } else {
                    PaymentStatus::Pending
                };

                Booking {
                    id: self.next_id(),
                    flight_id: flight.id,
                    flight,
                    passenger_name: DEMO_PASSENGER_NAME.to_string(),
                    passenger_email: DEMO_PASSENGER_EMAIL.to_string(),
                    seat_number,
                    booking_date: self.generated_at(),
                    status,
                    payment_status,
                }
            })
            .collect()
    }

    pub(crate) fn quarter_hour(&mut self) -> u32 {
        self.rng.gen_range(0..4) * 15
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn generate(seed: u64) -> Vec<Flight> {
        FixtureGenerator::new(GeneratorConfig::new(seed, anchor())).generate_flights()
    }

    #[test]
    fn test_same_seed_same_schedule() {
        assert_eq!(generate(7), generate(7));
        assert_ne!(generate(7), generate(8));
    }

    #[test]
    fn test_daily_volume_and_window() {
        let flights = generate(42);
        let last_day = anchor() + Duration::days(29);

        for day in 0..30 {
            let date = anchor() + Duration::days(day);
            let count = flights.iter().filter(|f| f.date == date).count();
            assert!((10..=14).contains(&count), "day {} had {} flights", day, count);
        }
        assert!(flights.iter().all(|f| f.date >= anchor() && f.date <= last_day));
    }

    #[test]
    fn test_flight_fields_within_bounds() {
        for flight in generate(1234) {
            assert_ne!(flight.departure_airport, flight.arrival_airport);

            let dep = flight.departure_time;
            assert!((5..=22).contains(&chrono::Timelike::hour(&dep)));
            assert_eq!(chrono::Timelike::minute(&dep) % 15, 0);
            assert_eq!(flight.arrival_time, dep + flight.duration.as_chrono());

            let hours = flight.duration.hours();
            assert!((1..=4).contains(&hours) || (6..=15).contains(&hours));
            let price_band = match hours {
                0..=3 => 100..400,
                4..=6 => 300..800,
                _ => 800..2000,
            };
            assert!(price_band.contains(&flight.price));

            assert!((1..=50).contains(&flight.seats_available));
            assert!((2..=5).contains(&flight.amenities.len()));
            assert!(flight.flight_number.starts_with("SK"));

            if let Some(stop) = &flight.stopover {
                assert!(hours > 3);
                assert_ne!(stop.airport, flight.departure_airport.code);
                assert_ne!(stop.airport, flight.arrival_airport.code);
            }
        }
    }

    #[test]
    fn test_only_first_day_varies_status() {
        let flights = generate(99);
        assert!(flights
            .iter()
            .filter(|f| f.date != anchor())
            .all(|f| f.status == FlightStatus::Scheduled));
        assert!(flights.iter().all(|f| f.status != FlightStatus::Completed));

        let mut first_day = HashSet::new();
        for seed in 1..=5 {
            first_day.extend(generate(seed).iter().filter(|f| f.date == anchor()).map(|f| f.status));
        }
        assert!(first_day.iter().all(|s| SAME_DAY_STATUSES.contains(s)));
        assert!(first_day.len() >= 2, "first-day statuses never vary: {:?}", first_day);
    }

    #[test]
    fn test_ids_are_unique() {
        let flights = generate(5);
        let ids: HashSet<_> = flights.iter().map(|f| f.id).collect();
        assert_eq!(ids.len(), flights.len());
    }

    #[test]
    fn test_bookings_reference_generated_flights() {
        let mut generator = FixtureGenerator::new(GeneratorConfig::new(3, anchor()));
        let flights = generator.generate_flights();
        let bookings = generator.generate_bookings(&flights, 10);

        assert_eq!(bookings.len(), 10);
        for booking in &bookings {
            assert!(flights.iter().any(|f| f.id == booking.flight_id));
            assert_eq!(booking.passenger_email, DEMO_PASSENGER_EMAIL);
        }
        assert!(generator.generate_bookings(&[], 5).is_empty());
    }
}
