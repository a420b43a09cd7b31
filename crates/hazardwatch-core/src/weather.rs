//! Provider-independent weather shapes.
//!
//! Every numeric field is optional: `None` means the provider did not report
//! it, never zero.

use serde::{Deserialize, Serialize};

/// A resolved place to fetch weather for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
    /// Display label, e.g. `"Fairbanks, US"` or `"Lat 64.84, Lon -147.72"`.
    pub name: String,
}

/// Conditions at the time of the observation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Observation time, unix seconds (UTC).
    pub timestamp: Option<i64>,
    pub temp_c: Option<f64>,
    pub feels_like_c: Option<f64>,
    pub wind_speed_mps: Option<f64>,
    pub wind_gust_mps: Option<f64>,
    pub uv_index: Option<f64>,
    pub cloud_percent: Option<f64>,
}

/// One calendar day of forecast.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    /// Representative instant for the day, unix seconds (UTC).
    pub timestamp: i64,
    pub temp_day_c: Option<f64>,
    pub temp_max_c: Option<f64>,
    pub temp_min_c: Option<f64>,
    pub temp_night_c: Option<f64>,
    pub wind_speed_mps: Option<f64>,
    pub wind_gust_mps: Option<f64>,
    pub cloud_percent: Option<f64>,
    pub uv_index: Option<f64>,
}

/// Normalized output of either weather provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    /// Offset of the location's local time from UTC.
    pub timezone_offset_secs: i64,
    pub current: CurrentConditions,
    /// Ascending by `timestamp`. The first entry is usually "today".
    pub daily: Vec<DailyForecast>,
}

impl WeatherRecord {
    /// A record is only usable when the current temperature is known.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.current.temp_c.is_some()
    }

    /// The next three days after today, as shown on forecast cards.
    ///
    /// The first daily entry overlaps the current conditions, so it is
    /// skipped here rather than during normalization.
    #[must_use]
    pub fn upcoming_days(&self) -> &[DailyForecast] {
        let end = self.daily.len().min(4);
        self.daily.get(1..end).unwrap_or(&[])
    }
}
