use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use crate::{CoreError, CoreResult};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Airport {
    pub code: String,
    pub city: String,
}

impl Airport {
    pub fn new(code: &str, city: &str) -> Self {
        Self {
            code: code.to_string(),
            city: city.to_string(),
        }
    }
}

/// Operational status of a flight
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum FlightStatus {
    Scheduled,
    OnTime,
    Delayed,
    Cancelled,
    Completed,
}

impl FlightStatus {
    pub const ALL: [FlightStatus; 5] = [
        FlightStatus::Scheduled,
        FlightStatus::OnTime,
        FlightStatus::Delayed,
        FlightStatus::Cancelled,
        FlightStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FlightStatus::Scheduled => "scheduled",
            FlightStatus::OnTime => "on-time",
            FlightStatus::Delayed => "delayed",
            FlightStatus::Cancelled => "cancelled",
            FlightStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Block time or layover length, rendered as `"5h 30m"` (or `"5h"` on the hour).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FlightDuration {
    total_minutes: u32,
}

impl FlightDuration {
    pub fn new(hours: u32, minutes: u32) -> Self {
        Self {
            total_minutes: hours * 60 + minutes,
        }
    }

    /// `None` when the total does not fit in minutes as a `u32`
    pub fn checked_new(hours: u32, minutes: u32) -> Option<Self> {
        let total_minutes = hours.checked_mul(60)?.checked_add(minutes)?;
        Some(Self { total_minutes })
    }

    pub fn hours(&self) -> u32 {
        self.total_minutes / 60
    }

    pub fn minutes(&self) -> u32 {
        self.total_minutes % 60
    }

    pub fn total_minutes(&self) -> u32 {
        self.total_minutes
    }

    pub fn as_chrono(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.total_minutes))
    }
}

impl fmt::Display for FlightDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.minutes() > 0 {
            write!(f, "{}h {}m", self.hours(), self.minutes())
        } else {
            write!(f, "{}h", self.hours())
        }
    }
}

impl FromStr for FlightDuration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut hours = 0;
        let mut minutes = 0;
        let mut seen = false;

        for part in s.split_whitespace() {
            let (value, is_hours) = if let Some(v) = part.strip_suffix('h') {
                (v, true)
            } else if let Some(v) = part.strip_suffix('m') {
                (v, false)
            } else {
                return Err(format!("invalid duration unit in '{}'", part));
            };
            let value: u32 = value
                .parse()
                .map_err(|_| format!("invalid duration component '{}'", part))?;
            if is_hours {
                hours = value;
            } else {
                minutes = value;
            }
            seen = true;
        }

        if !seen {
            return Err(format!("empty duration '{}'", s));
        }
        FlightDuration::checked_new(hours, minutes).ok_or_else(|| format!("duration '{}' is too long", s))
    }
}

impl Serialize for FlightDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FlightDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// `HH:MM` wire format for departure and arrival times.
pub mod time_of_day {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

mod optional_time_of_day {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| NaiveTime::parse_from_str(&s, "%H:%M").map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stopover {
    /// Airport code of the intermediate stop
    pub airport: String,
    pub duration: FlightDuration,
}

/// A scheduled departure and its seat inventory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub id: Uuid,
    pub flight_number: String,
    pub departure_airport: Airport,
    pub arrival_airport: Airport,
    #[serde(with = "time_of_day")]
    pub departure_time: NaiveTime,
    #[serde(with = "time_of_day")]
    pub arrival_time: NaiveTime,
    pub date: NaiveDate,
    pub duration: FlightDuration,
    pub price: i32,
    pub seats_available: u32,
    pub aircraft: String,
    pub status: FlightStatus,
    pub stopover: Option<Stopover>,
    pub amenities: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
}

impl Flight {
    pub fn new(new_flight: NewFlight) -> Self {
        Self::with_id(Uuid::new_v4(), Utc::now(), new_flight)
    }

    pub fn with_id(id: Uuid, created_at: DateTime<Utc>, new_flight: NewFlight) -> Self {
        Self {
            id,
            flight_number: new_flight.flight_number,
            departure_airport: new_flight.departure_airport,
            arrival_airport: new_flight.arrival_airport,
            departure_time: new_flight.departure_time,
            arrival_time: new_flight.arrival_time,
            date: new_flight.date,
            duration: new_flight.duration,
            price: new_flight.price,
            seats_available: new_flight.seats_available,
            aircraft: new_flight.aircraft,
            status: new_flight.status,
            stopover: new_flight.stopover,
            amenities: new_flight.amenities,
            created_at,
        }
    }

    /// Route key such as `JFK-LAX`
    pub fn route(&self) -> String {
        format!("{}-{}", self.departure_airport.code, self.arrival_airport.code)
    }

    pub fn validate(&self) -> CoreResult<()> {
        check_route_and_fare(&self.departure_airport, &self.arrival_airport, self.price)
    }

    /// Take one seat out of inventory. Returns the seats left afterwards.
    pub fn reserve_seat(&mut self) -> Result<u32, SeatError> {
        if self.seats_available == 0 {
            return Err(SeatError::SoldOut {
                flight_number: self.flight_number.clone(),
            });
        }
        self.seats_available -= 1;
        Ok(self.seats_available)
    }

    /// Return one seat to inventory. Returns the seats left afterwards.
    pub fn release_seat(&mut self) -> u32 {
        self.seats_available = self.seats_available.saturating_add(1);
        self.seats_available
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SeatError {
    #[error("Flight {flight_number} has no seats left")]
    SoldOut { flight_number: String },
}

/// Fields supplied when an admin schedules a flight
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewFlight {
    pub flight_number: String,
    pub departure_airport: Airport,
    pub arrival_airport: Airport,
    #[serde(with = "time_of_day")]
    pub departure_time: NaiveTime,
    #[serde(with = "time_of_day")]
    pub arrival_time: NaiveTime,
    pub date: NaiveDate,
    pub duration: FlightDuration,
    pub price: i32,
    pub seats_available: u32,
    pub aircraft: String,
    #[serde(default = "default_status")]
    pub status: FlightStatus,
    #[serde(default)]
    pub stopover: Option<Stopover>,
    #[serde(default)]
    pub amenities: BTreeSet<String>,
}

impl NewFlight {
    pub fn validate(&self) -> CoreResult<()> {
        check_route_and_fare(&self.departure_airport, &self.arrival_airport, self.price)
    }
}

/// Rules every stored flight satisfies, whether created or updated
fn check_route_and_fare(departure: &Airport, arrival: &Airport, price: i32) -> CoreResult<()> {
    if departure.code.eq_ignore_ascii_case(&arrival.code) {
        return Err(CoreError::ValidationError(
            "Departure and arrival airports must differ".to_string(),
        ));
    }
    if price < 0 {
        return Err(CoreError::ValidationError("Price must not be negative".to_string()));
    }
    Ok(())
}

fn default_status() -> FlightStatus {
    FlightStatus::Scheduled
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightUpdate {
    pub flight_number: Option<String>,
    pub departure_airport: Option<Airport>,
    pub arrival_airport: Option<Airport>,
    #[serde(default, deserialize_with = "optional_time_of_day::deserialize")]
    pub departure_time: Option<NaiveTime>,
    #[serde(default, deserialize_with = "optional_time_of_day::deserialize")]
    pub arrival_time: Option<NaiveTime>,
    pub date: Option<NaiveDate>,
    pub duration: Option<FlightDuration>,
    pub price: Option<i32>,
    pub seats_available: Option<u32>,
    pub aircraft: Option<String>,
    pub status: Option<FlightStatus>,
    pub stopover: Option<Stopover>,
    #[serde(default)]
    pub clear_stopover: bool,
    pub amenities: Option<BTreeSet<String>>,
}

impl FlightUpdate {
    pub fn apply(self, flight: &mut Flight) {
        if let Some(v) = self.flight_number {
            flight.flight_number = v;
        }
        if let Some(v) = self.departure_airport {
            flight.departure_airport = v;
        }
        if let Some(v) = self.arrival_airport {
            flight.arrival_airport = v;
        }
        if let Some(v) = self.departure_time {
            flight.departure_time = v;
        }
        if let Some(v) = self.arrival_time {
            flight.arrival_time = v;
        }
        if let Some(v) = self.date {
            flight.date = v;
        }
        if let Some(v) = self.duration {
            flight.duration = v;
        }
        if let Some(v) = self.price {
            flight.price = v;
        }
        if let Some(v) = self.seats_available {
            flight.seats_available = v;
        }
        if let Some(v) = self.aircraft {
            flight.aircraft = v;
        }
        if let Some(v) = self.status {
            flight.status = v;
        }
        if self.clear_stopover {
            flight.stopover = None;
        } else if let Some(v) = self.stopover {
            flight.stopover = Some(v);
        }
        if let Some(v) = self.amenities {
            flight.amenities = v;
        }
    }
}
