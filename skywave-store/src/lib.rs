pub mod app_config;
pub mod memory;
pub mod events;
pub mod statistics;

pub use memory::InMemoryStore;
pub use events::EventBus;
pub use skywave_core::repository::{BookingRepository, FlightRepository, UserRepository};
