//! The weather lookup cascade: OpenWeather, then Open-Meteo, then the
//! built-in Fairbanks sample.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use serde::Serialize;

use hazardwatch_core::{AppConfig, Location, WeatherRecord};

use crate::chain::{first_success, Candidate};
use crate::error::{Attempt, FeedError};
use crate::fetch::JsonFetcher;
use crate::samples::{sample_location, sample_weather_record};

use super::geocode::{geocode_open_meteo, geocode_openweather, parse_coordinate_query};
use super::open_meteo::fetch_open_meteo;
use super::openweather::fetch_openweather;

const PRIMARY_LABEL: &str = "openweather";
const SECONDARY_LABEL: &str = "open-meteo";

const SAMPLE_AFTER_REJECTED_KEY: &str =
    "OpenWeather rejected the key and Open-Meteo is unavailable. Showing sample Fairbanks data.";
const SAMPLE_AFTER_OUTAGE: &str =
    "Unable to reach weather services right now. Showing sample Fairbanks data.";

/// Per-session lookup state shared across calls.
///
/// Once OpenWeather answers 401, later lookups in the same session go
/// straight to Open-Meteo. Concurrent lookups may race on the flag; the
/// last write wins.
#[derive(Debug, Default)]
pub struct WeatherSession {
    primary_disabled: AtomicBool,
}

impl WeatherSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn primary_disabled(&self) -> bool {
        self.primary_disabled.load(Ordering::Relaxed)
    }

    pub fn disable_primary(&self) {
        self.primary_disabled.store(true, Ordering::Relaxed);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherSource {
    Primary,
    Secondary,
    Sample,
}

/// Outcome of one lookup. Always carries a usable record.
#[derive(Debug)]
pub struct WeatherReport {
    pub location: Location,
    pub record: WeatherRecord,
    pub source: WeatherSource,
    /// User-facing status line; names the provider or the substitution.
    pub status: String,
    /// Providers that failed before `source` answered.
    pub failures: Vec<Attempt>,
}

impl WeatherReport {
    /// `true` when the record did not come from the primary provider.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.source != WeatherSource::Primary
    }
}

#[derive(Debug, Clone)]
pub struct WeatherService {
    fetcher: JsonFetcher,
    openweather_base: String,
    open_meteo_base: String,
    open_meteo_geocoding_base: String,
    api_key: Option<String>,
}

impl WeatherService {
    #[must_use]
    pub fn new(fetcher: JsonFetcher, config: &AppConfig) -> Self {
        Self {
            fetcher,
            openweather_base: config.endpoints.openweather.clone(),
            open_meteo_base: config.endpoints.open_meteo.clone(),
            open_meteo_geocoding_base: config.endpoints.open_meteo_geocoding.clone(),
            api_key: config.openweather_api_key.clone(),
        }
    }

    /// Resolves `query` and returns weather from the first provider that
    /// answers, or the built-in sample when none does.
    ///
    /// `query` is either a place name or a literal `"lat, lon"` pair; the
    /// latter skips geocoding.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::EmptyQuery`] for a blank query. Provider failures
    /// are never returned; they degrade the report instead.
    pub async fn lookup(
        &self,
        session: &WeatherSession,
        query: &str,
    ) -> Result<WeatherReport, FeedError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(FeedError::EmptyQuery);
        }
        let literal = parse_coordinate_query(query);

        let mut candidates = Vec::with_capacity(2);
        match self.api_key.as_deref() {
            Some(key) if !session.primary_disabled() => {
                candidates.push(Candidate::new(
                    PRIMARY_LABEL,
                    self.primary(session, key, query, literal.clone()),
                ));
            }
            Some(_) => tracing::debug!("OpenWeather disabled for this session; skipping"),
            None => tracing::debug!("no OpenWeather key configured; skipping"),
        }
        candidates.push(Candidate::new(
            SECONDARY_LABEL,
            self.secondary(query, literal),
        ));

        let report = match first_success(candidates).await {
            Ok(resolved) => {
                let (location, record) = resolved.value;
                let (source, status) = if resolved.label == PRIMARY_LABEL {
                    (
                        WeatherSource::Primary,
                        format!("Forecast updated for {}", location.name),
                    )
                } else {
                    (
                        WeatherSource::Secondary,
                        format!("Forecast updated via Open-Meteo for {}", location.name),
                    )
                };
                tracing::info!(
                    provider = %resolved.label,
                    location = %location.name,
                    "weather loaded"
                );
                WeatherReport {
                    location,
                    record,
                    source,
                    status,
                    failures: resolved.failures,
                }
            }
            Err(FeedError::Chain { attempts }) => sample_report(session, attempts),
            Err(error) => sample_report(
                session,
                vec![Attempt {
                    label: "weather".to_string(),
                    error,
                }],
            ),
        };
        Ok(report)
    }

    async fn primary(
        &self,
        session: &WeatherSession,
        api_key: &str,
        query: &str,
        literal: Option<Location>,
    ) -> Result<(Location, WeatherRecord), FeedError> {
        let result = self.primary_forecast(api_key, query, literal).await;
        if let Err(e) = &result {
            if e.is_unauthorized() {
                tracing::warn!(
                    "OpenWeather rejected the API key; using Open-Meteo for this session"
                );
                session.disable_primary();
            }
        }
        result
    }

    async fn primary_forecast(
        &self,
        api_key: &str,
        query: &str,
        literal: Option<Location>,
    ) -> Result<(Location, WeatherRecord), FeedError> {
        let location = match literal {
            Some(location) => location,
            None => {
                geocode_openweather(&self.fetcher, &self.openweather_base, api_key, query).await?
            }
        };
        let record =
            fetch_openweather(&self.fetcher, &self.openweather_base, api_key, &location).await?;
        usable(location, record)
    }

    async fn secondary(
        &self,
        query: &str,
        literal: Option<Location>,
    ) -> Result<(Location, WeatherRecord), FeedError> {
        let location = match literal {
            Some(location) => location,
            None => {
                geocode_open_meteo(&self.fetcher, &self.open_meteo_geocoding_base, query).await?
            }
        };
        let record = fetch_open_meteo(&self.fetcher, &self.open_meteo_base, &location).await?;
        usable(location, record)
    }
}

fn usable(
    location: Location,
    record: WeatherRecord,
) -> Result<(Location, WeatherRecord), FeedError> {
    if record.is_usable() {
        Ok((location, record))
    } else {
        Err(FeedError::shape("weather response has no current temperature"))
    }
}

fn sample_report(session: &WeatherSession, failures: Vec<Attempt>) -> WeatherReport {
    let rejected = session.primary_disabled() || failures.iter().any(|a| a.error.is_unauthorized());
    let status = if rejected {
        SAMPLE_AFTER_REJECTED_KEY
    } else {
        SAMPLE_AFTER_OUTAGE
    };
    for attempt in &failures {
        tracing::warn!(
            provider = %attempt.label,
            error = %attempt.error,
            "weather provider failed"
        );
    }
    tracing::warn!("all weather providers failed; showing sample data");
    WeatherReport {
        location: sample_location(),
        record: sample_weather_record(Utc::now()),
        source: WeatherSource::Sample,
        status: status.to_string(),
        failures,
    }
}
