use skywave_core::Airport;

/// Every airport the demo network serves, as (IATA code, city)
pub const AIRPORTS: [(&str, &str); 10] = [
    ("JFK", "New York"),
    ("LAX", "Los Angeles"),
    ("ORD", "Chicago"),
    ("ATL", "Atlanta"),
    ("SFO", "San Francisco"),
    ("LHR", "London"),
    ("CDG", "Paris"),
    ("DXB", "Dubai"),
    ("SIN", "Singapore"),
    ("HND", "Tokyo"),
];

pub const AIRCRAFT: [&str; 5] = [
    "Boeing 737-800",
    "Airbus A320",
    "Boeing 787-9 Dreamliner",
    "Airbus A350-900",
    "Boeing 777-300ER",
];

pub const AMENITIES: [&str; 5] = ["WiFi", "Meals", "Entertainment", "USB Power", "Music"];

pub fn airports() -> Vec<Airport> {
    AIRPORTS.iter().map(|(code, city)| Airport::new(code, city)).collect()
}

pub fn find_airport(code: &str) -> Option<Airport> {
    AIRPORTS
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|(code, city)| Airport::new(code, city))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(find_airport("lhr").map(|a| a.city), Some("London".to_string()));
        assert!(find_airport("XXX").is_none());
        assert_eq!(airports().len(), 10);
    }
}
