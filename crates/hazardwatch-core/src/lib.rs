//! Shared domain records and configuration for hazardwatch.
//!
//! Everything here is plain data: the normalized shapes the feed pipeline
//! produces, the endpoint table it talks to, and the environment loader.

pub mod app_config;
pub mod aurora;
pub mod config;
pub mod hazards;
pub mod weather;

use thiserror::Error;

pub use app_config::{AppConfig, Endpoints};
pub use aurora::AuroraSample;
pub use config::{load_app_config, load_app_config_from_env};
pub use hazards::{Earthquake, FlareReading, FluxClass, QuakeWindow, WeatherAlert};
pub use weather::{CurrentConditions, DailyForecast, Location, WeatherRecord};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
