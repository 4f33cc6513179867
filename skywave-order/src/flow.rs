use serde::{Deserialize, Serialize};
use skywave_catalog::seat_map;
use skywave_core::payment::{IntentStatus, PaymentGateway, PaymentIntent};
use skywave_core::repository::{BookingRepository, FlightRepository};
use skywave_core::{Booking, BookingUpdate, CoreError, Flight, FlightSearchCriteria, NewBooking};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

const CURRENCY: &str = "USD";
const MIN_PHONE_CHARS: usize = 10;

/// A single rejected form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: &str) -> Self {
        Self { field, message: message.to_string() }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn describe(errors: &[FieldError]) -> String {
    errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join(", ")
}

#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("Invalid search: {}", describe(.0))]
    InvalidSearch(Vec<FieldError>),

    #[error("Invalid passenger details: {}", describe(.0))]
    InvalidPassenger(Vec<FieldError>),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: &'static str, to: &'static str },

    #[error("Flight not found: {0}")]
    FlightNotFound(Uuid),

    #[error("Payment declined: {0}")]
    PaymentDeclined(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Passenger form as entered before payment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerDetails {
    pub name: String,
    pub phone: String,
    pub passport: String,
}

impl PassengerDetails {
    fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "Full name is required"));
        }
        if self.phone.trim().is_empty() {
            errors.push(FieldError::new("phone", "Phone number is required"));
        } else if !is_valid_phone(&self.phone) {
            errors.push(FieldError::new("phone", "Invalid phone number"));
        }
        if self.passport.trim().is_empty() {
            errors.push(FieldError::new("passport", "Passport number is required"));
        }
        errors
    }
}

/// Optional leading `+`, then at least ten digits, spaces or dashes
fn is_valid_phone(phone: &str) -> bool {
    let rest = phone.strip_prefix('+').unwrap_or(phone);
    rest.chars().count() >= MIN_PHONE_CHARS
        && rest.chars().all(|c| c.is_ascii_digit() || c.is_whitespace() || c == '-')
}

#[derive(Debug, Clone, PartialEq)]
pub enum FlowState {
    Searching,
    Selecting {
        results: Vec<Flight>,
    },
    EnteringPassenger {
        flight: Flight,
        seats: Vec<String>,
    },
    Paying {
        flight: Flight,
        passenger: PassengerDetails,
        seat: String,
        amount: i32,
    },
    Confirmed {
        booking: Booking,
        payment: PaymentIntent,
    },
}

impl FlowState {
    pub fn name(&self) -> &'static str {
        match self {
            FlowState::Searching => "SEARCHING",
            FlowState::Selecting { .. } => "SELECTING",
            FlowState::EnteringPassenger { .. } => "ENTERING_PASSENGER",
            FlowState::Paying { .. } => "PAYING",
            FlowState::Confirmed { .. } => "CONFIRMED",
        }
    }
}

/// One customer's walk from search to confirmed booking.
///
/// Transitions:
/// `Searching -> Selecting -> EnteringPassenger -> Paying -> Confirmed`,
/// with `back()` stepping one state backwards and `book_another()` restarting
/// from a confirmation. Failed guards leave the state untouched.
pub struct BookingFlow {
    flights: Arc<dyn FlightRepository>,
    bookings: Arc<dyn BookingRepository>,
    account_email: String,
    state: FlowState,
    last_search: Option<FlightSearchCriteria>,
    last_results: Option<Vec<Flight>>,
}

impl BookingFlow {
    pub fn new(
        flights: Arc<dyn FlightRepository>,
        bookings: Arc<dyn BookingRepository>,
        account_email: impl Into<String>,
    ) -> Self {
        Self {
            flights,
            bookings,
            account_email: account_email.into(),
            state: FlowState::Searching,
            last_search: None,
            last_results: None,
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    /// Criteria of the last accepted search, used to prefill the form
    pub fn last_search(&self) -> Option<&FlightSearchCriteria> {
        self.last_search.as_ref()
    }

    fn invalid(&self, to: &'static str) -> FlowError {
        FlowError::InvalidTransition { from: self.state.name(), to }
    }

    /// Searching -> Selecting. An empty result list is still a valid selection step.
    pub async fn search(&mut self, criteria: FlightSearchCriteria) -> Result<Vec<Flight>, FlowError> {
        if self.state != FlowState::Searching {
            return Err(self.invalid("SELECTING"));
        }

        let errors = validate_search(&criteria);
        if !errors.is_empty() {
            return Err(FlowError::InvalidSearch(errors));
        }

        let results = self.flights.search_flights(&criteria).await;
        info!(
            "Flow search {:?} -> {:?} on {:?}: {} flight(s)",
            criteria.from_code(),
            criteria.to_code(),
            criteria.date,
            results.len()
        );

        self.last_search = Some(criteria);
        self.last_results = Some(results.clone());
        self.state = FlowState::Selecting { results: results.clone() };
        Ok(results)
    }

    /// Selecting (or Searching, for a known flight id) -> EnteringPassenger
    pub async fn select_flight(&mut self, flight_id: Uuid) -> Result<Vec<String>, FlowError> {
        match self.state {
            FlowState::Searching => self.last_results = None,
            FlowState::Selecting { .. } => {}
            _ => return Err(self.invalid("ENTERING_PASSENGER")),
        }

        let flight = self
            .flights
            .get_flight_by_id(flight_id)
            .await
            .ok_or(FlowError::FlightNotFound(flight_id))?;

        let seats = seat_map(flight.seats_available);
        self.state = FlowState::EnteringPassenger { flight, seats: seats.clone() };
        Ok(seats)
    }

    /// EnteringPassenger -> Paying. Returns the amount due.
    pub fn submit_passenger(&mut self, passenger: PassengerDetails, seat: &str) -> Result<i32, FlowError> {
        let FlowState::EnteringPassenger { flight, seats } = &self.state else {
            return Err(self.invalid("PAYING"));
        };

        let mut errors = passenger.validate();
        if !seats.iter().any(|s| s == seat) {
            errors.push(FieldError::new("seat", "Please select a seat"));
        }
        if !errors.is_empty() {
            return Err(FlowError::InvalidPassenger(errors));
        }

        let flight = flight.clone();
        let amount = flight.price;
        self.state = FlowState::Paying {
            flight,
            passenger,
            seat: seat.to_string(),
            amount,
        };
        Ok(amount)
    }

    /// Paying -> Confirmed.
    ///
    /// The seat is held by a pending booking before the card is charged, so a
    /// sold-out flight fails without taking money. A declined or failed charge
    /// releases the hold and keeps the flow in Paying.
    pub async fn pay(&mut self, gateway: &dyn PaymentGateway) -> Result<Booking, FlowError> {
        let FlowState::Paying { flight, passenger, seat, amount } = &self.state else {
            return Err(self.invalid("CONFIRMED"));
        };

        let held = self
            .bookings
            .reserve_booking(NewBooking {
                flight_id: flight.id,
                passenger_name: passenger.name.trim().to_string(),
                passenger_email: self.account_email.clone(),
                seat_number: seat.clone(),
            })
            .await?;

        let payment = match gateway.charge(*amount, CURRENCY, &self.account_email).await {
            Ok(payment) if payment.status == IntentStatus::Succeeded => payment,
            Ok(payment) => {
                warn!("Payment {} declined for flight {}", payment.id, flight.flight_number);
                self.bookings.delete_booking(held.id).await;
                return Err(FlowError::PaymentDeclined(payment.id));
            }
            Err(e) => {
                warn!("Payment failed for flight {}: {}", flight.flight_number, e);
                self.bookings.delete_booking(held.id).await;
                return Err(e.into());
            }
        };

        let booking = self
            .bookings
            .update_booking(held.id, BookingUpdate::confirm_paid())
            .await?
            .ok_or(CoreError::BookingNotFound(held.id))?;

        info!("Flow confirmed booking {} with payment {}", booking.id, payment.id);
        self.state = FlowState::Confirmed { booking: booking.clone(), payment };
        Ok(booking)
    }

    /// Confirmed -> Searching, keeping the previous search for prefill
    pub fn book_another(&mut self) -> Result<(), FlowError> {
        if !matches!(self.state, FlowState::Confirmed { .. }) {
            return Err(self.invalid("SEARCHING"));
        }
        self.last_results = None;
        self.state = FlowState::Searching;
        Ok(())
    }

    /// Step back one state
    pub fn back(&mut self) -> Result<(), FlowError> {
        let previous = match &self.state {
            FlowState::Selecting { .. } => FlowState::Searching,
            FlowState::EnteringPassenger { .. } => match &self.last_results {
                Some(results) => FlowState::Selecting { results: results.clone() },
                None => FlowState::Searching,
            },
            FlowState::Paying { flight, .. } => FlowState::EnteringPassenger {
                flight: flight.clone(),
                seats: seat_map(flight.seats_available),
            },
            FlowState::Searching | FlowState::Confirmed { .. } => return Err(self.invalid("BACK")),
        };
        self.state = previous;
        Ok(())
    }
}

fn validate_search(criteria: &FlightSearchCriteria) -> Vec<FieldError> {
    let mut errors = Vec::new();
    let from = criteria.from_code();
    let to = criteria.to_code();

    if from.is_none() {
        errors.push(FieldError::new("from", "Please select departure city"));
    }
    if to.is_none() {
        errors.push(FieldError::new("to", "Please select arrival city"));
    }
    if let (Some(from), Some(to)) = (from, to) {
        if from.eq_ignore_ascii_case(to) {
            errors.push(FieldError::new("to", "Departure and arrival cities cannot be the same"));
        }
    }
    if criteria.date.is_none() {
        errors.push(FieldError::new("date", "Please select a date"));
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use async_trait::async_trait;
    use skywave_core::payment::MockPaymentGateway;
    use skywave_core::{Airport, BookingStatus, CoreResult, FlightDuration, FlightStatus, NewFlight, PaymentStatus};
    use skywave_store::InMemoryStore;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Approves every charge and counts the attempts, or fails them all when offline
    #[derive(Default)]
    struct TallyGateway {
        charges: AtomicU32,
        offline: bool,
    }

    #[async_trait]
    impl PaymentGateway for TallyGateway {
        async fn charge(&self, amount: i32, currency: &str, payer_email: &str) -> CoreResult<PaymentIntent> {
            self.charges.fetch_add(1, Ordering::SeqCst);
            if self.offline {
                return Err(CoreError::InternalError("gateway unreachable".to_string()));
            }
            MockPaymentGateway::approving().charge(amount, currency, payer_email).await
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    async fn store_with_flight(seats: u32) -> (Arc<InMemoryStore>, Flight) {
        let store = Arc::new(InMemoryStore::new());
        let flight = store
            .create_flight(NewFlight {
                flight_number: "SK3131".to_string(),
                departure_airport: Airport::new("JFK", "New York"),
                arrival_airport: Airport::new("LHR", "London"),
                departure_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
                arrival_time: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
                date: day(),
                duration: FlightDuration::new(12, 0),
                price: 1200,
                seats_available: seats,
                aircraft: "Boeing 787".to_string(),
                status: FlightStatus::Scheduled,
                stopover: None,
                amenities: Default::default(),
            })
            .await;
        (store, flight)
    }

    fn flow(store: &Arc<InMemoryStore>) -> BookingFlow {
        BookingFlow::new(store.clone(), store.clone(), "user@example.com")
    }

    fn passenger() -> PassengerDetails {
        PassengerDetails {
            name: "John Doe".to_string(),
            phone: "+1 555-123-4567".to_string(),
            passport: "X1234567".to_string(),
        }
    }

    #[tokio::test]
    async fn test_happy_path() {
        let (store, flight) = store_with_flight(4).await;
        let mut flow = flow(&store);

        let results = flow.search(FlightSearchCriteria::new("JFK", "LHR", day())).await.unwrap();
        assert_eq!(results.len(), 1);

        let seats = flow.select_flight(flight.id).await.unwrap();
        assert_eq!(seats, ["1A", "1B", "1C", "1D"]);

        let amount = flow.submit_passenger(passenger(), "1C").unwrap();
        assert_eq!(amount, 1200);

        let booking = flow.pay(&MockPaymentGateway::approving()).await.unwrap();
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.payment_status, PaymentStatus::Paid);
        assert_eq!(booking.seat_number, "1C");
        assert_eq!(booking.passenger_email, "user@example.com");
        assert_eq!(store.get_flight_by_id(flight.id).await.unwrap().seats_available, 3);

        flow.book_another().unwrap();
        assert_eq!(flow.state(), &FlowState::Searching);
        assert_eq!(flow.last_search().and_then(|c| c.from_code()), Some("JFK"));
    }

    #[tokio::test]
    async fn test_search_guards() {
        let (store, _) = store_with_flight(4).await;
        let mut flow = flow(&store);

        let err = flow.search(FlightSearchCriteria::default()).await.unwrap_err();
        match err {
            FlowError::InvalidSearch(errors) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
                assert_eq!(fields, ["from", "to", "date"]);
            }
            other => panic!("unexpected error {:?}", other),
        }

        let same = flow.search(FlightSearchCriteria::new("JFK", "JFK", day())).await;
        assert!(matches!(same, Err(FlowError::InvalidSearch(_))));
        assert_eq!(flow.state(), &FlowState::Searching);

        // No matches is still a valid step
        let empty = flow.search(FlightSearchCriteria::new("SIN", "HND", day())).await.unwrap();
        assert!(empty.is_empty());
        assert!(matches!(flow.state(), FlowState::Selecting { .. }));
    }

    #[tokio::test]
    async fn test_direct_selection_and_back() {
        let (store, flight) = store_with_flight(2).await;
        let mut flow = flow(&store);

        flow.select_flight(flight.id).await.unwrap();
        flow.back().unwrap();
        assert_eq!(flow.state(), &FlowState::Searching);

        flow.search(FlightSearchCriteria::new("JFK", "LHR", day())).await.unwrap();
        flow.select_flight(flight.id).await.unwrap();
        flow.submit_passenger(passenger(), "1B").unwrap();

        flow.back().unwrap();
        assert!(matches!(flow.state(), FlowState::EnteringPassenger { .. }));
        flow.back().unwrap();
        assert!(matches!(flow.state(), FlowState::Selecting { results } if results.len() == 1));
        flow.back().unwrap();
        assert!(matches!(flow.back(), Err(FlowError::InvalidTransition { from: "SEARCHING", .. })));
    }

    #[tokio::test]
    async fn test_unknown_flight() {
        let (store, _) = store_with_flight(2).await;
        let mut flow = flow(&store);
        let missing = Uuid::new_v4();
        assert!(matches!(flow.select_flight(missing).await, Err(FlowError::FlightNotFound(id)) if id == missing));
        assert_eq!(flow.state(), &FlowState::Searching);
    }

    #[tokio::test]
    async fn test_passenger_guards() {
        let (store, flight) = store_with_flight(2).await;
        let mut flow = flow(&store);
        flow.select_flight(flight.id).await.unwrap();

        let blank = flow.submit_passenger(PassengerDetails::default(), "9F").unwrap_err();
        match blank {
            FlowError::InvalidPassenger(errors) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
                assert_eq!(fields, ["name", "phone", "passport", "seat"]);
            }
            other => panic!("unexpected error {:?}", other),
        }

        let bad_phone = PassengerDetails { phone: "12345".to_string(), ..passenger() };
        assert!(matches!(flow.submit_passenger(bad_phone, "1A"), Err(FlowError::InvalidPassenger(_))));
        assert!(matches!(flow.state(), FlowState::EnteringPassenger { .. }));
    }

    #[tokio::test]
    async fn test_declined_payment_stays_in_paying() {
        let (store, flight) = store_with_flight(2).await;
        let mut flow = flow(&store);
        flow.select_flight(flight.id).await.unwrap();
        flow.submit_passenger(passenger(), "1A").unwrap();

        let declined = flow.pay(&MockPaymentGateway::declining()).await;
        assert!(matches!(declined, Err(FlowError::PaymentDeclined(_))));
        assert!(matches!(flow.state(), FlowState::Paying { .. }));
        assert!(store.list_bookings().await.is_empty());
        assert_eq!(store.get_flight_by_id(flight.id).await.unwrap().seats_available, 2);

        // Retrying with a working card completes the booking
        flow.pay(&MockPaymentGateway::approving()).await.unwrap();
        assert!(matches!(flow.state(), FlowState::Confirmed { .. }));
    }

    #[tokio::test]
    async fn test_sold_out_between_selection_and_payment() {
        let (store, flight) = store_with_flight(1).await;
        let mut flow = flow(&store);
        flow.select_flight(flight.id).await.unwrap();
        flow.submit_passenger(passenger(), "1A").unwrap();

        store
            .create_booking(NewBooking {
                flight_id: flight.id,
                passenger_name: "Jane Smith".to_string(),
                passenger_email: "jane@example.com".to_string(),
                seat_number: "1A".to_string(),
            })
            .await
            .unwrap();

        let gateway = TallyGateway::default();
        for _ in 0..2 {
            let result = flow.pay(&gateway).await;
            assert!(matches!(result, Err(FlowError::Core(CoreError::SoldOut { .. }))));
            assert!(matches!(flow.state(), FlowState::Paying { .. }));
        }
        assert_eq!(gateway.charges.load(Ordering::SeqCst), 0);
        assert!(store.get_bookings_by_user("user@example.com").await.is_empty());
    }

    #[tokio::test]
    async fn test_gateway_error_releases_held_seat() {
        let (store, flight) = store_with_flight(1).await;
        let mut flow = flow(&store);
        flow.select_flight(flight.id).await.unwrap();
        flow.submit_passenger(passenger(), "1A").unwrap();

        let gateway = TallyGateway { offline: true, ..Default::default() };
        let result = flow.pay(&gateway).await;
        assert!(matches!(result, Err(FlowError::Core(CoreError::InternalError(_)))));
        assert_eq!(gateway.charges.load(Ordering::SeqCst), 1);
        assert!(store.list_bookings().await.is_empty());
        assert_eq!(store.get_flight_by_id(flight.id).await.unwrap().seats_available, 1);
    }

    #[tokio::test]
    async fn test_out_of_order_calls() {
        let (store, _) = store_with_flight(2).await;
        let mut flow = flow(&store);

        assert!(matches!(flow.submit_passenger(passenger(), "1A"), Err(FlowError::InvalidTransition { .. })));
        assert!(matches!(flow.pay(&MockPaymentGateway::approving()).await, Err(FlowError::InvalidTransition { .. })));
        assert!(matches!(flow.book_another(), Err(FlowError::InvalidTransition { from: "SEARCHING", to: "SEARCHING" })));
    }

    #[test]
    fn test_phone_format() {
        assert!(is_valid_phone("+1 555 123 4567"));
        assert!(is_valid_phone("555-123-4567"));
        assert!(!is_valid_phone("555-1234"));
        assert!(!is_valid_phone("+1 (555) 123-4567"));
        assert!(!is_valid_phone("++15551234567"));
    }
}
