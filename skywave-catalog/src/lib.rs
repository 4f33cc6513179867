pub mod airports;
pub mod generator;
pub mod passengers;
pub mod seating;

pub use airports::{airports, find_airport};
pub use generator::{FixtureGenerator, GeneratorConfig};
pub use seating::seat_map;
