use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use skywave_catalog::{airports, FixtureGenerator, GeneratorConfig};
use skywave_core::repository::{BookingRepository, FlightRepository, UserRepository};
use skywave_core::{
    Airport, Booking, BookingStatus, BookingUpdate, CoreError, CoreResult, Flight, FlightFilter,
    FlightSearchCriteria, FlightStatusQuery, FlightUpdate, NewBooking, NewFlight, NewUser,
    PassengerSummary, Role, User, UserUpdate,
};
use skywave_shared::models::events::{BookingCancelledEvent, BookingConfirmedEvent, FlightDeletedEvent};
use skywave_shared::{DomainEvent, Masked};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::app_config::{Config, FixtureConfig};
use crate::events::EventBus;

/// Everything the demo backend knows. Vectors keep insertion order, which is the order results are returned in.
#[derive(Debug, Default)]
pub(crate) struct StoreState {
    pub(crate) users: Vec<User>,
    pub(crate) flights: Vec<Flight>,
    pub(crate) bookings: Vec<Booking>,
    pub(crate) airports: Vec<Airport>,
    pub(crate) passengers: Vec<PassengerSummary>,
}

/// In-memory repository for users, flights, bookings and admin passenger records.
///
/// Each operation takes the lock once, so a booking change and its seat
/// adjustment are applied together or not at all.
pub struct InMemoryStore {
    pub(crate) state: RwLock<StoreState>,
    events: EventBus,
    latency: Duration,
}

impl InMemoryStore {
    /// An empty store with the standard airport list
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState {
                airports: airports(),
                ..Default::default()
            }),
            events: EventBus::default(),
            latency: Duration::ZERO,
        }
    }

    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// A store preloaded with generated flights, demo accounts, sample bookings and passenger records
    pub fn seeded(fixtures: &FixtureConfig) -> Self {
        let mut generator = FixtureGenerator::new(fixtures.generator());
        let flights = generator.generate_flights();
        let bookings = generator.generate_bookings(&flights, fixtures.booking_count);
        let passengers = generator.generate_passengers(fixtures.passenger_count);
        let created_at = generator.generated_at();

        let mut state = StoreState {
            users: demo_users(created_at),
            flights,
            bookings: Vec::new(),
            airports: airports(),
            passengers,
        };

        for booking in bookings {
            state.load_booking(booking);
        }

        info!(
            "Seeded store: {} flights, {} bookings, {} passengers (seed {}, from {})",
            state.flights.len(),
            state.bookings.len(),
            state.passengers.len(),
            fixtures.seed,
            fixtures.anchor()
        );

        Self {
            state: RwLock::new(state),
            events: EventBus::default(),
            latency: Duration::ZERO,
        }
    }

    /// Seeded store wired with the configured latency and event capacity
    pub fn from_config(config: &Config) -> Self {
        Self::seeded(&config.fixtures)
            .with_events(EventBus::new(config.store.event_capacity))
            .with_latency(config.store.latency())
    }

    /// Seeded store using only a generator config; handy for tests
    pub fn from_generator(generator: GeneratorConfig) -> Self {
        Self::seeded(&FixtureConfig {
            seed: generator.seed,
            days: generator.days,
            anchor_date: Some(generator.anchor),
            ..Default::default()
        })
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub(crate) async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    pub async fn airports(&self) -> Vec<Airport> {
        self.state.read().await.airports.clone()
    }

    /// Admin flight list with status and free-text filtering
    pub async fn filter_flights(&self, filter: &FlightFilter) -> Vec<Flight> {
        self.simulate_latency().await;
        let state = self.state.read().await;
        state.flights.iter().filter(|f| filter.matches(f)).cloned().collect()
    }

    pub async fn flight_status(&self, query: &FlightStatusQuery) -> Vec<Flight> {
        self.simulate_latency().await;
        let state = self.state.read().await;
        state.flights.iter().filter(|f| query.matches(f)).cloned().collect()
    }

    /// The first `limit` flights departing on `today`
    pub async fn todays_flights(&self, today: NaiveDate, limit: usize) -> Vec<Flight> {
        self.simulate_latency().await;
        let state = self.state.read().await;
        state
            .flights
            .iter()
            .filter(|f| f.date == today)
            .take(limit)
            .cloned()
            .collect()
    }

    pub async fn search_passengers(&self, term: &str) -> Vec<PassengerSummary> {
        self.simulate_latency().await;
        let state = self.state.read().await;
        state.passengers.iter().filter(|p| p.matches(term)).cloned().collect()
    }

    pub async fn delete_passenger(&self, id: Uuid) -> bool {
        self.simulate_latency().await;
        let mut state = self.state.write().await;
        let before = state.passengers.len();
        state.passengers.retain(|p| p.id != id);
        before != state.passengers.len()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn demo_users(created_at: chrono::DateTime<Utc>) -> Vec<User> {
    vec![
        User {
            id: Uuid::from_u128(1),
            name: "Admin User".to_string(),
            email: "admin@skywave.com".to_string(),
            password: Masked::from("admin123"),
            role: Role::Admin,
            created_at,
        },
        User {
            id: Uuid::from_u128(2),
            name: "John Doe".to_string(),
            email: "user@example.com".to_string(),
            password: Masked::from("password"),
            role: Role::User,
            created_at,
        },
    ]
}

impl StoreState {
    fn flight_mut(&mut self, id: Uuid) -> Option<&mut Flight> {
        self.flights.iter_mut().find(|f| f.id == id)
    }

    /// Insert a generated booking, taking a seat if it is active. Active bookings on a full flight are dropped.
    fn load_booking(&mut self, mut booking: Booking) {
        if booking.is_active() {
            let Some(flight) = self.flight_mut(booking.flight_id) else {
                warn!("Skipping fixture booking {}: flight {} missing", booking.id, booking.flight_id);
                return;
            };
            if let Err(e) = flight.reserve_seat() {
                warn!("Skipping fixture booking {}: {}", booking.id, e);
                return;
            }
            booking.flight = flight.clone();
        }
        self.bookings.push(booking);
    }
}

#[async_trait]
impl FlightRepository for InMemoryStore {
    async fn list_flights(&self) -> Vec<Flight> {
        self.simulate_latency().await;
        self.state.read().await.flights.clone()
    }

    async fn get_flight_by_id(&self, id: Uuid) -> Option<Flight> {
        self.simulate_latency().await;
        self.state.read().await.flights.iter().find(|f| f.id == id).cloned()
    }

    async fn search_flights(&self, criteria: &FlightSearchCriteria) -> Vec<Flight> {
        self.simulate_latency().await;
        let state = self.state.read().await;
        let results: Vec<Flight> = state.flights.iter().filter(|f| criteria.matches(f)).cloned().collect();
        debug!(
            "Search from={:?} to={:?} date={:?}: {} result(s)",
            criteria.from_code(),
            criteria.to_code(),
            criteria.date,
            results.len()
        );
        results
    }

    async fn create_flight(&self, new_flight: NewFlight) -> Flight {
        self.simulate_latency().await;
        let flight = Flight::new(new_flight);
        self.state.write().await.flights.push(flight.clone());
        info!("Flight created: {} ({}) on {}", flight.flight_number, flight.route(), flight.date);
        flight
    }

    async fn update_flight(&self, id: Uuid, update: FlightUpdate) -> CoreResult<Option<Flight>> {
        self.simulate_latency().await;
        let mut state = self.state.write().await;
        let Some(flight) = state.flight_mut(id) else {
            return Ok(None);
        };

        let mut updated = flight.clone();
        update.apply(&mut updated);
        if let Err(e) = updated.validate() {
            warn!("Flight update rejected for {}: {}", id, e);
            return Err(e);
        }

        *flight = updated.clone();
        info!("Flight updated: {} ({})", updated.flight_number, updated.id);
        Ok(Some(updated))
    }

    /// Removes the flight and cancels every active booking on it
    async fn delete_flight(&self, id: Uuid) -> bool {
        self.simulate_latency().await;
        let mut state = self.state.write().await;

        let Some(index) = state.flights.iter().position(|f| f.id == id) else {
            return false;
        };
        let flight = state.flights.remove(index);

        let mut cancelled = Vec::new();
        for booking in state.bookings.iter_mut().filter(|b| b.flight_id == id && b.is_active()) {
            BookingUpdate::cancel().apply(booking);
            cancelled.push(booking.id);
        }
        drop(state);

        info!(
            "Flight deleted: {} ({}), {} booking(s) cancelled",
            flight.flight_number,
            flight.id,
            cancelled.len()
        );
        self.events.publish(DomainEvent::FlightDeleted(FlightDeletedEvent {
            flight_id: flight.id,
            flight_number: flight.flight_number,
            cancelled_bookings: cancelled,
            timestamp: Utc::now().timestamp(),
        }));
        true
    }
}

impl InMemoryStore {
    /// Take a seat on the requested flight and store the booking `build` makes, under one lock
    async fn hold_seat(
        &self,
        request: NewBooking,
        build: fn(Flight, NewBooking) -> Booking,
    ) -> CoreResult<(Booking, u32)> {
        self.simulate_latency().await;
        let mut state = self.state.write().await;

        let flight = state
            .flight_mut(request.flight_id)
            .ok_or(CoreError::FlightNotFound(request.flight_id))?;
        let seats_remaining = flight.reserve_seat().map_err(|e| {
            warn!("Booking rejected: {}", e);
            CoreError::from(e)
        })?;

        let booking = build(flight.clone(), request);
        state.bookings.push(booking.clone());
        Ok((booking, seats_remaining))
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn list_bookings(&self) -> Vec<Booking> {
        self.simulate_latency().await;
        self.state.read().await.bookings.clone()
    }

    async fn get_booking_by_id(&self, id: Uuid) -> Option<Booking> {
        self.simulate_latency().await;
        self.state.read().await.bookings.iter().find(|b| b.id == id).cloned()
    }

    async fn get_bookings_by_user(&self, email: &str) -> Vec<Booking> {
        self.simulate_latency().await;
        let state = self.state.read().await;
        state.bookings.iter().filter(|b| b.passenger_email == email).cloned().collect()
    }

    async fn create_booking(&self, request: NewBooking) -> CoreResult<Booking> {
        let (booking, seats_remaining) = self.hold_seat(request, Booking::confirmed).await?;
        info!(
            "Booking confirmed: {} seat {} on {} ({} seats left)",
            booking.id, booking.seat_number, booking.flight.flight_number, seats_remaining
        );
        self.events.publish(DomainEvent::BookingConfirmed(BookingConfirmedEvent {
            booking_id: booking.id,
            flight_id: booking.flight_id,
            passenger_email: booking.passenger_email.clone(),
            seat_number: booking.seat_number.clone(),
            seats_remaining,
            timestamp: Utc::now().timestamp(),
        }));

        Ok(booking)
    }

    async fn reserve_booking(&self, request: NewBooking) -> CoreResult<Booking> {
        let (booking, seats_remaining) = self.hold_seat(request, Booking::pending).await?;
        info!(
            "Booking reserved: {} seat {} on {} ({} seats left)",
            booking.id, booking.seat_number, booking.flight.flight_number, seats_remaining
        );
        Ok(booking)
    }

    async fn update_booking(&self, id: Uuid, update: BookingUpdate) -> CoreResult<Option<Booking>> {
        self.simulate_latency().await;
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let Some(booking) = state.bookings.iter_mut().find(|b| b.id == id) else {
            return Ok(None);
        };

        let was_active = booking.is_active();
        let was_confirmed = booking.status == BookingStatus::Confirmed;
        let becomes_active = update.status.map_or(was_active, |s| s.is_active());
        let flight = state.flights.iter_mut().find(|f| f.id == booking.flight_id);

        // Seat accounting happens before the update is applied so a sold-out
        // reactivation leaves the booking untouched.
        let seats_after = match (was_active, becomes_active, flight) {
            (true, false, Some(flight)) => Some(flight.release_seat()),
            (false, true, Some(flight)) => Some(flight.reserve_seat()?),
            (false, true, None) => return Err(CoreError::FlightNotFound(booking.flight_id)),
            _ => None,
        };

        update.apply(booking);
        let updated = booking.clone();
        let seats_now = state.flights.iter().find(|f| f.id == updated.flight_id).map(|f| f.seats_available);
        drop(guard);

        if was_active && !becomes_active {
            info!("Booking cancelled: {} ({:?} seats left)", updated.id, seats_after);
            self.events.publish(DomainEvent::BookingCancelled(BookingCancelledEvent {
                booking_id: updated.id,
                flight_id: updated.flight_id,
                seats_remaining: seats_after,
                timestamp: Utc::now().timestamp(),
            }));
        } else if let (false, BookingStatus::Confirmed, Some(seats_remaining)) =
            (was_confirmed, updated.status, seats_now)
        {
            info!("Booking confirmed: {} ({} seats left)", updated.id, seats_remaining);
            self.events.publish(DomainEvent::BookingConfirmed(BookingConfirmedEvent {
                booking_id: updated.id,
                flight_id: updated.flight_id,
                passenger_email: updated.passenger_email.clone(),
                seat_number: updated.seat_number.clone(),
                seats_remaining,
                timestamp: Utc::now().timestamp(),
            }));
        } else {
            info!("Booking updated: {}", updated.id);
        }

        Ok(Some(updated))
    }

    async fn delete_booking(&self, id: Uuid) -> bool {
        self.simulate_latency().await;
        let mut state = self.state.write().await;

        let Some(index) = state.bookings.iter().position(|b| b.id == id) else {
            return false;
        };
        let booking = state.bookings.remove(index);

        if booking.is_active() {
            if let Some(flight) = state.flight_mut(booking.flight_id) {
                flight.release_seat();
            }
        }

        info!("Booking deleted: {} (was {:?})", booking.id, booking.status);
        true
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn list_users(&self) -> Vec<User> {
        self.simulate_latency().await;
        self.state.read().await.users.clone()
    }

    async fn get_user_by_id(&self, id: Uuid) -> Option<User> {
        self.simulate_latency().await;
        self.state.read().await.users.iter().find(|u| u.id == id).cloned()
    }

    async fn get_user_by_email(&self, email: &str) -> Option<User> {
        self.simulate_latency().await;
        self.state.read().await.users.iter().find(|u| u.email == email).cloned()
    }

    async fn create_user(&self, new_user: NewUser) -> CoreResult<User> {
        self.simulate_latency().await;
        let mut state = self.state.write().await;
        if state.users.iter().any(|u| u.email == new_user.email) {
            return Err(CoreError::EmailTaken(new_user.email));
        }

        let user = User::new(new_user, Role::User);
        state.users.push(user.clone());
        info!("User created: {}", user.id);
        Ok(user)
    }

    async fn update_user(&self, id: Uuid, update: UserUpdate) -> Option<User> {
        self.simulate_latency().await;
        let mut state = self.state.write().await;
        let user = state.users.iter_mut().find(|u| u.id == id)?;
        update.apply(user);
        Some(user.clone())
    }

    /// Bookings are keyed by email and stay in place
    async fn delete_user(&self, id: Uuid) -> bool {
        self.simulate_latency().await;
        let mut state = self.state.write().await;
        let before = state.users.len();
        state.users.retain(|u| u.id != id);
        before != state.users.len()
    }
}
