use crate::generator::FixtureGenerator;
use rand::seq::SliceRandom;
use rand::Rng;
use skywave_core::PassengerSummary;

const TITLES: [&str; 4] = ["Mr", "Mrs", "Ms", "Dr"];
const FIRST_NAMES: [&str; 8] = ["John", "Jane", "Michael", "Sarah", "David", "Emma", "Robert", "Lisa"];
const LAST_NAMES: [&str; 8] = ["Smith", "Johnson", "Williams", "Brown", "Jones", "Miller", "Davis", "Wilson"];

impl FixtureGenerator {
    /// Admin passenger records. Their counts and totals are invented, not derived from bookings.
    pub fn generate_passengers(&mut self, count: usize) -> Vec<PassengerSummary> {
        (0..count).map(|_| self.generate_passenger()).collect()
    }

    fn generate_passenger(&mut self) -> PassengerSummary {
        let first_name = FIRST_NAMES.choose(&mut self.rng).copied().unwrap_or("John");
        let last_name = LAST_NAMES.choose(&mut self.rng).copied().unwrap_or("Smith");
        let title = TITLES.choose(&mut self.rng).copied().unwrap_or("Mr");

        let phone = format!("+1{}", self.rng.gen_range(1_000_000_000u64..2_000_000_000));
        let frequent_flyer_number = if self.rng.gen_bool(0.5) {
            Some(format!("FF{}", self.rng.gen_range(0..100_000)))
        } else {
            None
        };

        PassengerSummary {
            id: self.next_id(),
            title: title.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: format!("{}.{}@example.com", first_name.to_lowercase(), last_name.to_lowercase()),
            phone,
            address: "123 Sample Street, City, Country".to_string(),
            booking_count: self.rng.gen_range(0..10),
            total_spent: self.rng.gen_range(0..10_000),
            frequent_flyer_number,
        }
    }
}
