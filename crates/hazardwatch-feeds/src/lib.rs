//! Fetching and normalization for the hazard dashboard feeds.
//!
//! Everything network-facing lives here: the JSON fetcher, the ordered
//! fallback combinator, the aurora and weather normalizers, and the
//! pass-through hazard feeds. Records come out in the shapes defined by
//! `hazardwatch-core`.

pub mod aurora;
pub mod chain;
pub mod dashboard;
pub mod error;
pub mod fetch;
pub mod hazards;
mod json;
pub mod samples;
pub mod weather;

pub use aurora::{fetch_aurora, normalize_aurora, AuroraReport, AuroraSource};
pub use chain::{first_success, resolve_chain, Candidate, RawSource, Resolved};
pub use dashboard::{refresh_dashboard, DashboardSnapshot};
pub use error::{Attempt, FeedError, ParseHint};
pub use fetch::{JsonFetcher, ResponseParser};
pub use weather::{
    aggregate_daily_forecast, parse_coordinate_query, ForecastEntry, WeatherReport,
    WeatherService, WeatherSession, WeatherSource,
};
