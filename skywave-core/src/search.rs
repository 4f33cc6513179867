use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};
use crate::flight::{Flight, FlightStatus};

/// Criteria for the passenger-facing flight search. Every field is optional;
/// a flight matches when it satisfies all of the provided ones.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct FlightSearchCriteria {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default, deserialize_with = "deserialize_calendar_day")]
    pub date: Option<NaiveDate>, // Calendar day only, time of day is ignored
}

impl FlightSearchCriteria {
    pub fn new(from: &str, to: &str, date: NaiveDate) -> Self {
        Self {
            from: Some(from.to_string()),
            to: Some(to.to_string()),
            date: Some(date),
        }
    }

    pub fn from_code(&self) -> Option<&str> {
        provided(&self.from)
    }

    pub fn to_code(&self) -> Option<&str> {
        provided(&self.to)
    }

    pub fn matches(&self, flight: &Flight) -> bool {
        self.from_code().map_or(true, |code| flight.departure_airport.code == code)
            && self.to_code().map_or(true, |code| flight.arrival_airport.code == code)
            && self.date.map_or(true, |date| flight.date == date)
    }
}

/// Admin flight list filter: exact status plus free text over flight number, codes and cities.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlightFilter {
    pub status: Option<FlightStatus>,
    pub query: Option<String>,
}

impl FlightFilter {
    pub fn matches(&self, flight: &Flight) -> bool {
        if self.status.is_some_and(|status| flight.status != status) {
            return false;
        }

        match provided(&self.query) {
            None => true,
            Some(query) => {
                let query = query.to_lowercase();
                [
                    &flight.flight_number,
                    &flight.departure_airport.code,
                    &flight.departure_airport.city,
                    &flight.arrival_airport.code,
                    &flight.arrival_airport.city,
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&query))
            }
        }
    }
}

/// Flight status lookup, either by flight number or by route, optionally on one day.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightStatusQuery {
    pub flight_number: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    #[serde(default, deserialize_with = "deserialize_calendar_day")]
    pub date: Option<NaiveDate>,
}

impl FlightStatusQuery {
    pub fn matches(&self, flight: &Flight) -> bool {
        let by_identity = if let Some(number) = provided(&self.flight_number) {
            flight
                .flight_number
                .to_lowercase()
                .contains(&number.to_lowercase())
        } else if let (Some(from), Some(to)) = (provided(&self.from), provided(&self.to)) {
            flight.departure_airport.code == from && flight.arrival_airport.code == to
        } else {
            true
        };

        by_identity && self.date.map_or(true, |date| flight.date == date)
    }
}

fn provided(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp; blank means "any day".
pub fn deserialize_calendar_day<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_calendar_day(value)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", value))),
    }
}

pub fn parse_calendar_day(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}
