use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Admin-facing passenger record. Kept separately from bookings and accounts,
/// so its aggregates are not guaranteed to agree with them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PassengerSummary {
    pub id: Uuid,
    pub title: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub booking_count: u32,
    pub total_spent: i32,
    pub frequent_flyer_number: Option<String>,
}

impl PassengerSummary {
    pub fn full_name(&self) -> String {
        format!("{} {} {}", self.title, self.first_name, self.last_name)
    }

    /// Case-insensitive match on name, email or frequent flyer number. A blank term matches everything.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }

        self.first_name.to_lowercase().contains(&term)
            || self.last_name.to_lowercase().contains(&term)
            || self.email.to_lowercase().contains(&term)
            || self
                .frequent_flyer_number
                .as_ref()
                .is_some_and(|ff| ff.to_lowercase().contains(&term))
    }
}
