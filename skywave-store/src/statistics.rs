use chrono::{Days, NaiveDate};
use serde::Serialize;
use skywave_core::{Booking, BookingStatus, Flight, FlightStatus, PaymentStatus};
use std::collections::{BTreeMap, HashMap};

use crate::memory::InMemoryStore;

const TOP_ROUTES: usize = 5;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteCount {
    pub route: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlightStatistics {
    pub total_flights: usize,
    pub total_bookings: usize,
    pub active_bookings: usize,
    /// Sum of current flight prices over non-cancelled bookings
    pub total_earnings: i64,
    pub passenger_count: usize,
    pub popular_routes: Vec<RouteCount>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_flights: usize,
    pub cancelled_flights: usize,
    pub total_passengers: usize,
    /// Confirmed and paid bookings, priced from the booking's flight snapshot
    pub revenue: i64,
    pub flights_by_status: BTreeMap<FlightStatus, usize>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyStatusRow {
    pub date: NaiveDate,
    pub scheduled: usize,
    pub completed: usize,
    pub cancelled: usize,
}

pub fn flight_statistics(flights: &[Flight], bookings: &[Booking]) -> FlightStatistics {
    let prices: HashMap<_, _> = flights.iter().map(|f| (f.id, f.price)).collect();
    let active: Vec<&Booking> = bookings.iter().filter(|b| b.is_active()).collect();

    // Bookings whose flight was deleted earn nothing
    let total_earnings: i64 = active
        .iter()
        .filter_map(|b| prices.get(&b.flight_id))
        .map(|&price| i64::from(price))
        .sum();

    let mut routes: HashMap<String, usize> = HashMap::new();
    for flight in flights {
        *routes.entry(flight.route()).or_default() += 1;
    }
    let mut popular_routes: Vec<RouteCount> = routes
        .into_iter()
        .map(|(route, count)| RouteCount { route, count })
        .collect();
    popular_routes.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.route.cmp(&b.route)));
    popular_routes.truncate(TOP_ROUTES);

    FlightStatistics {
        total_flights: flights.len(),
        total_bookings: bookings.len(),
        active_bookings: active.len(),
        total_earnings,
        passenger_count: active.len(),
        popular_routes,
    }
}

pub fn dashboard_summary(flights: &[Flight], bookings: &[Booking]) -> DashboardSummary {
    let mut flights_by_status = BTreeMap::new();
    for flight in flights {
        *flights_by_status.entry(flight.status).or_insert(0) += 1;
    }

    let revenue: i64 = bookings
        .iter()
        .filter(|b| b.status == BookingStatus::Confirmed && b.payment_status == PaymentStatus::Paid)
        .map(|b| i64::from(b.flight.price))
        .sum();

    DashboardSummary {
        total_flights: flights.len(),
        cancelled_flights: flights_by_status.get(&FlightStatus::Cancelled).copied().unwrap_or(0),
        total_passengers: bookings.len(),
        revenue,
        flights_by_status,
    }
}

/// One row per day starting at `anchor`, including days without flights.
/// `None` if the range runs past the last representable date.
pub fn daily_status_report(flights: &[Flight], anchor: NaiveDate, days: u32) -> Option<Vec<DailyStatusRow>> {
    (0..days)
        .map(|offset| {
            let date = anchor.checked_add_days(Days::new(u64::from(offset)))?;
            let count = |status: FlightStatus| {
                flights.iter().filter(|f| f.date == date && f.status == status).count()
            };
            Some(DailyStatusRow {
                date,
                scheduled: count(FlightStatus::Scheduled),
                completed: count(FlightStatus::Completed),
                cancelled: count(FlightStatus::Cancelled),
            })
        })
        .collect()
}

impl InMemoryStore {
    pub async fn flight_statistics(&self) -> FlightStatistics {
        self.simulate_latency().await;
        let state = self.state.read().await;
        flight_statistics(&state.flights, &state.bookings)
    }

    pub async fn dashboard_summary(&self) -> DashboardSummary {
        self.simulate_latency().await;
        let state = self.state.read().await;
        dashboard_summary(&state.flights, &state.bookings)
    }

    pub async fn daily_status_report(&self, anchor: NaiveDate, days: u32) -> Option<Vec<DailyStatusRow>> {
        self.simulate_latency().await;
        let state = self.state.read().await;
        daily_status_report(&state.flights, anchor, days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use skywave_core::{Airport, FlightDuration, NewBooking, NewFlight};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn flight(from: &str, to: &str, date: NaiveDate, price: i32, status: FlightStatus) -> Flight {
        Flight::new(NewFlight {
            flight_number: "SK1000".to_string(),
            departure_airport: Airport::new(from, from),
            arrival_airport: Airport::new(to, to),
            departure_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            arrival_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            date,
            duration: FlightDuration::new(2, 0),
            price,
            seats_available: 10,
            aircraft: "Boeing 737".to_string(),
            status,
            stopover: None,
            amenities: Default::default(),
        })
    }

    fn booking(flight: &Flight) -> Booking {
        Booking::confirmed(flight.clone(), NewBooking {
            flight_id: flight.id,
            passenger_name: "John Doe".to_string(),
            passenger_email: "user@example.com".to_string(),
            seat_number: "2B".to_string(),
        })
    }

    #[test]
    fn test_earnings_skip_cancelled_and_orphaned_bookings() {
        let a = flight("JFK", "LAX", day(19), 300, FlightStatus::Scheduled);
        let b = flight("JFK", "LAX", day(20), 500, FlightStatus::Scheduled);
        let gone = flight("SFO", "HND", day(20), 900, FlightStatus::Scheduled);

        let mut cancelled = booking(&b);
        cancelled.status = BookingStatus::Cancelled;
        let bookings = vec![booking(&a), booking(&b), cancelled, booking(&gone)];

        let stats = flight_statistics(&[a, b], &bookings);
        assert_eq!(stats.total_flights, 2);
        assert_eq!(stats.total_bookings, 4);
        assert_eq!(stats.active_bookings, 3);
        assert_eq!(stats.passenger_count, 3);
        assert_eq!(stats.total_earnings, 800);
    }

    #[test]
    fn test_popular_routes_order() {
        let flights = vec![
            flight("SFO", "HND", day(19), 100, FlightStatus::Scheduled),
            flight("JFK", "LAX", day(19), 100, FlightStatus::Scheduled),
            flight("ATL", "ORD", day(19), 100, FlightStatus::Scheduled),
            flight("JFK", "LAX", day(20), 100, FlightStatus::Scheduled),
            flight("LHR", "CDG", day(20), 100, FlightStatus::Scheduled),
            flight("DXB", "SIN", day(20), 100, FlightStatus::Scheduled),
            flight("CDG", "LHR", day(21), 100, FlightStatus::Scheduled),
        ];

        let routes: Vec<_> = flight_statistics(&flights, &[])
            .popular_routes
            .into_iter()
            .map(|r| (r.route, r.count))
            .collect();

        assert_eq!(
            routes,
            vec![
                ("JFK-LAX".to_string(), 2),
                ("ATL-ORD".to_string(), 1),
                ("CDG-LHR".to_string(), 1),
                ("DXB-SIN".to_string(), 1),
                ("LHR-CDG".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_dashboard_revenue_uses_snapshot_price() {
        let mut f = flight("JFK", "LAX", day(19), 250, FlightStatus::Cancelled);
        let paid = booking(&f);
        let mut unpaid = booking(&f);
        unpaid.payment_status = PaymentStatus::Pending;

        // A later price change does not touch revenue
        f.price = 999;
        let other = flight("ORD", "ATL", day(19), 120, FlightStatus::Delayed);

        let summary = dashboard_summary(&[f, other], &[paid, unpaid]);
        assert_eq!(summary.total_flights, 2);
        assert_eq!(summary.cancelled_flights, 1);
        assert_eq!(summary.total_passengers, 2);
        assert_eq!(summary.revenue, 250);
        assert_eq!(summary.flights_by_status.get(&FlightStatus::Delayed), Some(&1));
        assert_eq!(summary.flights_by_status.get(&FlightStatus::Scheduled), None);
    }

    #[test]
    fn test_daily_report_covers_empty_days() {
        let flights = vec![
            flight("JFK", "LAX", day(19), 100, FlightStatus::Scheduled),
            flight("JFK", "LAX", day(19), 100, FlightStatus::Cancelled),
            flight("JFK", "LAX", day(21), 100, FlightStatus::Completed),
            flight("JFK", "LAX", day(21), 100, FlightStatus::Delayed),
        ];

        let report = daily_status_report(&flights, day(19), 3).unwrap();
        assert_eq!(report.len(), 3);
        assert_eq!((report[0].scheduled, report[0].completed, report[0].cancelled), (1, 0, 1));
        assert_eq!((report[1].scheduled, report[1].completed, report[1].cancelled), (0, 0, 0));
        assert_eq!((report[2].scheduled, report[2].completed, report[2].cancelled), (0, 1, 0));
        assert_eq!(report[2].date, day(21));
    }

    #[test]
    fn test_daily_report_stops_at_calendar_end() {
        assert!(daily_status_report(&[], NaiveDate::MAX, 7).is_none());

        let last_week = NaiveDate::MAX.checked_sub_days(Days::new(6)).unwrap();
        let report = daily_status_report(&[], last_week, 7).unwrap();
        assert_eq!(report.last().map(|r| r.date), Some(NaiveDate::MAX));
    }

    #[tokio::test]
    async fn test_store_statistics_track_bookings() {
        use skywave_core::repository::{BookingRepository, FlightRepository};

        let store = InMemoryStore::new();
        let created = store
            .create_flight(NewFlight {
                price: 410,
                ..flight_fields()
            })
            .await;
        store
            .create_booking(NewBooking {
                flight_id: created.id,
                passenger_name: "John Doe".to_string(),
                passenger_email: "user@example.com".to_string(),
                seat_number: "1A".to_string(),
            })
            .await
            .unwrap();

        let stats = store.flight_statistics().await;
        assert_eq!(stats.total_earnings, 410);
        assert_eq!(stats.popular_routes[0].route, "JFK-LAX");

        let summary = store.dashboard_summary().await;
        assert_eq!(summary.revenue, 410);
    }

    fn flight_fields() -> NewFlight {
        NewFlight {
            flight_number: "SK2200".to_string(),
            departure_airport: Airport::new("JFK", "New York"),
            arrival_airport: Airport::new("LAX", "Los Angeles"),
            departure_time: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
            arrival_time: NaiveTime::from_hms_opt(12, 30, 0).unwrap(),
            date: day(19),
            duration: FlightDuration::new(5, 30),
            price: 0,
            seats_available: 3,
            aircraft: "Airbus A320".to_string(),
            status: FlightStatus::Scheduled,
            stopover: None,
            amenities: Default::default(),
        }
    }
}
