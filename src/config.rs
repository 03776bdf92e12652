//! Application configuration read from the environment.
//!
//! The configuration is loaded once in `main` and handed to whoever needs it,
//! nothing in the crate reads the environment on its own.

use envconfig::Envconfig;
use log::LevelFilter;
use std::str::FromStr;

/// Environment variables used to configure the tracker.
#[derive(Envconfig, Clone, Debug)]
pub struct AppConfig {
    /// Environment name. Values: "local", "dev", "prod"
    #[envconfig(default = "local")]
    pub env: String,

    /// sqlx connection string of the local database
    /// Example: "sqlite:animal_health.db", "sqlite::memory:"
    #[envconfig(default = "sqlite:animal_health.db")]
    pub db_host: String,

    /// File where the logged user is cached between runs
    #[envconfig(default = ".animal_health_session.json")]
    pub session_file: String,

    /// Insert the demo records when the store is empty.
    /// Unset means on everywhere except prod
    pub seed_demo_data: Option<bool>,

    /// Values: "off", "error", "warn", "info", "debug", "trace"
    #[envconfig(default = "info")]
    pub log_level: String,
}

impl AppConfig {
    pub fn is_prod(&self) -> bool {
        self.env.to_lowercase() == "prod"
    }

    pub fn should_seed_demo_data(&self) -> bool {
        self.seed_demo_data.unwrap_or(!self.is_prod())
    }

    /// Falls back to `Info` on unknown values
    pub fn log_level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(&self.log_level).unwrap_or(LevelFilter::Info)
    }
}
