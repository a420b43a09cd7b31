//! Built-in datasets substituted when every live source fails.
//!
//! These ship inside the binary; they are never fetched.

use chrono::{DateTime, Utc};

use hazardwatch_core::{
    AuroraSample, CurrentConditions, DailyForecast, Location, WeatherRecord,
};

const SECONDS_PER_DAY: i64 = 86_400;

/// `(lat, lon, probability %)`
const AURORA_SAMPLE_POINTS: [(f64, f64, f64); 7] = [
    (67.2, -33.8, 85.0),
    (65.1, -95.4, 78.0),
    (63.0, 15.5, 62.0),
    (61.5, -150.0, 54.0),
    (58.9, 135.2, 48.0),
    (55.3, 20.1, 32.0),
    (52.8, -3.0, 24.0),
];

/// `(day, max, min, night, wind m/s, clouds %, uv)`
const FAIRBANKS_DAYS: [(f64, f64, f64, f64, f64, f64, f64); 4] = [
    (-7.0, -5.0, -13.0, -12.0, 6.2, 48.0, 0.6),
    (-6.0, -4.0, -11.0, -9.0, 5.5, 62.0, 0.8),
    (-4.0, -2.0, -9.0, -7.0, 7.1, 38.0, 1.4),
    (-3.0, -1.0, -8.0, -6.0, 8.6, 72.0, 1.0),
];

#[must_use]
pub fn aurora_sample_points() -> Vec<AuroraSample> {
    AURORA_SAMPLE_POINTS
        .iter()
        .filter_map(|&(lat, lon, value)| AuroraSample::new(lat, lon, value))
        .collect()
}

#[must_use]
pub fn sample_location() -> Location {
    Location {
        lat: 64.84,
        lon: -147.72,
        name: "Fairbanks, Alaska (sample data)".to_string(),
    }
}

/// Winter conditions for Fairbanks, anchored at `now` so the cards read as
/// today and the following three days.
#[must_use]
pub fn sample_weather_record(now: DateTime<Utc>) -> WeatherRecord {
    let now = now.timestamp();
    let daily = FAIRBANKS_DAYS
        .iter()
        .zip(0_i64..)
        .map(|(&(day, max, min, night, wind, clouds, uv), offset)| DailyForecast {
            timestamp: now + offset * SECONDS_PER_DAY,
            temp_day_c: Some(day),
            temp_max_c: Some(max),
            temp_min_c: Some(min),
            temp_night_c: Some(night),
            wind_speed_mps: Some(wind),
            wind_gust_mps: None,
            cloud_percent: Some(clouds),
            uv_index: Some(uv),
        })
        .collect();

    WeatherRecord {
        timezone_offset_secs: -32_400,
        current: CurrentConditions {
            timestamp: Some(now),
            temp_c: Some(-7.0),
            feels_like_c: Some(-12.0),
            wind_speed_mps: Some(6.2),
            wind_gust_mps: Some(11.3),
            uv_index: Some(0.6),
            cloud_percent: Some(48.0),
        },
        daily,
    }
}
