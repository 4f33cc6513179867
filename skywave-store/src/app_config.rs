use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use skywave_catalog::GeneratorConfig;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub fixtures: FixtureConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FixtureConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_days")]
    pub days: u32,
    /// First day of the generated schedule; today (UTC) when unset
    pub anchor_date: Option<NaiveDate>,
    #[serde(default = "default_booking_count")]
    pub booking_count: usize,
    #[serde(default = "default_passenger_count")]
    pub passenger_count: usize,
}

fn default_seed() -> u64 { 20240101 }
fn default_days() -> u32 { 30 }
fn default_booking_count() -> usize { 10 }
fn default_passenger_count() -> usize { 20 }

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            days: default_days(),
            anchor_date: None,
            booking_count: default_booking_count(),
            passenger_count: default_passenger_count(),
        }
    }
}

impl FixtureConfig {
    pub fn anchor(&self) -> NaiveDate {
        self.anchor_date.unwrap_or_else(|| Utc::now().date_naive())
    }

    pub fn generator(&self) -> GeneratorConfig {
        GeneratorConfig {
            seed: self.seed,
            anchor: self.anchor(),
            days: self.days,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// Artificial delay applied to every store call
    #[serde(default)]
    pub simulated_latency_ms: u64,
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

fn default_event_capacity() -> usize { 100 }

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            simulated_latency_ms: 0,
            event_capacity: default_event_capacity(),
        }
    }
}

impl StoreConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides are optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local, uncommitted overrides
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `SKYWAVE__SERVER__PORT=9000` overrides `server.port`
            .add_source(config::Environment::with_prefix("SKYWAVE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
