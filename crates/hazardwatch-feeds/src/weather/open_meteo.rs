//! Open-Meteo adapter: one combined current, hourly, and daily request.
//!
//! Open-Meteo reports wall-clock times in the location's zone (because of
//! `timezone=auto`) without an offset suffix; `utc_offset_seconds` converts
//! them back to unix seconds.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

use hazardwatch_core::{CurrentConditions, DailyForecast, Location, WeatherRecord};

use crate::error::FeedError;
use crate::fetch::{endpoint_url, JsonFetcher};
use crate::json::decode;

const HOURLY_FIELDS: &str = "temperature_2m,cloudcover,uv_index,wind_speed_10m,wind_gusts_10m";
const DAILY_FIELDS: &str = concat!(
    "temperature_2m_max,temperature_2m_min,uv_index_max,",
    "cloudcover_mean,wind_speed_10m_max,wind_gusts_10m_max"
);

#[derive(Debug, Default, Deserialize)]
struct CurrentWeather {
    time: Option<String>,
    temperature: Option<f64>,
    windspeed: Option<f64>,
    wind_speed: Option<f64>,
    wind_gusts: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Hourly {
    time: Vec<String>,
    temperature_2m: Vec<Option<f64>>,
    cloudcover: Vec<Option<f64>>,
    uv_index: Vec<Option<f64>>,
    wind_speed_10m: Vec<Option<f64>>,
    wind_gusts_10m: Vec<Option<f64>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Daily {
    time: Vec<String>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
    uv_index_max: Vec<Option<f64>>,
    cloudcover_mean: Vec<Option<f64>>,
    wind_speed_10m_max: Vec<Option<f64>>,
    wind_gusts_10m_max: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct OmForecast {
    #[serde(default)]
    utc_offset_seconds: i64,
    #[serde(default)]
    current_weather: Option<CurrentWeather>,
    #[serde(default)]
    hourly: Hourly,
    #[serde(default)]
    daily: Daily,
}

fn at(series: &[Option<f64>], idx: Option<usize>) -> Option<f64> {
    series.get(idx?).copied().flatten()
}

/// Local wall-clock text (`YYYY-MM-DDTHH:MM[:SS]` or `YYYY-MM-DD`) to unix seconds.
fn local_to_unix(text: &str, offset_secs: i64) -> Option<i64> {
    let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;
    naive.and_utc().timestamp().checked_sub(offset_secs)
}

/// Fetches and normalizes weather for `location`.
///
/// # Errors
///
/// Any fetch or decode error.
pub(crate) async fn fetch_open_meteo(
    fetcher: &JsonFetcher,
    base: &str,
    location: &Location,
) -> Result<WeatherRecord, FeedError> {
    let lat = location.lat.to_string();
    let lon = location.lon.to_string();
    let url = endpoint_url(
        base,
        "/v1/forecast",
        &[
            ("latitude", lat.as_str()),
            ("longitude", lon.as_str()),
            ("hourly", HOURLY_FIELDS),
            ("daily", DAILY_FIELDS),
            ("current_weather", "true"),
            ("timezone", "auto"),
            ("forecast_days", "4"),
            ("wind_speed_unit", "ms"),
        ],
    )?;
    let raw: OmForecast = decode(fetcher.get_json(url.as_str()).await?, "Open-Meteo forecast")?;
    Ok(adapt_open_meteo(raw))
}

fn adapt_open_meteo(raw: OmForecast) -> WeatherRecord {
    let offset = raw.utc_offset_seconds;
    let cw = raw.current_weather.unwrap_or_default();
    let hourly = &raw.hourly;

    let now_text = cw.time.as_deref().or(hourly.time.first().map(String::as_str));
    let hour_idx = now_text.and_then(|t| hourly.time.iter().position(|h| h == t));
    let temp = cw.temperature.or(at(&hourly.temperature_2m, hour_idx));

    let current = CurrentConditions {
        timestamp: now_text.and_then(|t| local_to_unix(t, offset)),
        temp_c: temp,
        feels_like_c: temp,
        wind_speed_mps: cw
            .windspeed
            .or(cw.wind_speed)
            .or(at(&hourly.wind_speed_10m, hour_idx)),
        wind_gust_mps: cw.wind_gusts.or(at(&hourly.wind_gusts_10m, hour_idx)),
        uv_index: at(&hourly.uv_index, hour_idx),
        cloud_percent: at(&hourly.cloudcover, hour_idx),
    };

    let d = &raw.daily;
    let mut daily: Vec<DailyForecast> = d
        .time
        .iter()
        .enumerate()
        .filter_map(|(i, day)| {
            let timestamp = local_to_unix(day, offset)?;
            let max = at(&d.temperature_2m_max, Some(i));
            let min = at(&d.temperature_2m_min, Some(i));
            let day_temp = match (max, min) {
                (Some(max), Some(min)) => Some((max + min) / 2.0),
                (max, _) => max,
            };
            Some(DailyForecast {
                timestamp,
                temp_day_c: day_temp,
                temp_max_c: max,
                temp_min_c: min,
                temp_night_c: min,
                wind_speed_mps: at(&d.wind_speed_10m_max, Some(i)),
                wind_gust_mps: at(&d.wind_gusts_10m_max, Some(i)),
                cloud_percent: at(&d.cloudcover_mean, Some(i)),
                uv_index: at(&d.uv_index_max, Some(i)),
            })
        })
        .collect();
    daily.sort_by_key(|day| day.timestamp);

    WeatherRecord {
        timezone_offset_secs: offset,
        current,
        daily,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn adapt(value: serde_json::Value) -> WeatherRecord {
        adapt_open_meteo(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn local_times_shift_by_offset() {
        // 2024-01-15T00:00 at UTC-9 is 09:00Z.
        assert_eq!(local_to_unix("2024-01-15T00:00", -32_400), Some(1_705_309_200));
        assert_eq!(local_to_unix("2024-01-15", 0), Some(1_705_276_800));
        assert_eq!(local_to_unix("2024-01-15T00:00:00", 0), Some(1_705_276_800));
        assert_eq!(local_to_unix("yesterday", 0), None);
    }

    #[test]
    fn extreme_offset_leaves_times_unknown() {
        assert_eq!(local_to_unix("2024-01-15T10:00", i64::MIN), None);
        let record = adapt(json!({
            "utc_offset_seconds": i64::MIN,
            "current_weather": {"time": "2024-01-15T10:00", "temperature": 1.0},
            "daily": {"time": ["2024-01-15"], "temperature_2m_max": [2.0]}
        }));
        assert_eq!(record.current.temp_c, Some(1.0));
        assert_eq!(record.current.timestamp, None);
        assert!(record.daily.is_empty());
    }

    #[test]
    fn current_block_wins_and_hourly_fills_gaps() {
        let record = adapt(json!({
            "utc_offset_seconds": -32_400,
            "current_weather": {"time": "2024-01-15T10:00", "temperature": -12.5, "windspeed": 2.4},
            "hourly": {
                "time": ["2024-01-15T09:00", "2024-01-15T10:00"],
                "temperature_2m": [-13.0, -12.9],
                "cloudcover": [40, 55],
                "uv_index": [0.0, 0.3],
                "wind_speed_10m": [1.0, 9.9],
                "wind_gusts_10m": [4.0, 6.1]
            }
        }));
        let c = &record.current;
        assert_eq!(c.temp_c, Some(-12.5));
        assert_eq!(c.feels_like_c, Some(-12.5));
        assert_eq!(c.wind_speed_mps, Some(2.4));
        assert_eq!(c.wind_gust_mps, Some(6.1));
        assert_eq!(c.uv_index, Some(0.3));
        assert_eq!(c.cloud_percent, Some(55.0));
        assert_eq!(c.timestamp, Some(1_705_309_200 + 36_000));
        assert_eq!(record.timezone_offset_secs, -32_400);
    }

    #[test]
    fn missing_current_block_reads_first_hour() {
        let record = adapt(json!({
            "hourly": {
                "time": ["2024-01-15T00:00"],
                "temperature_2m": [3.5],
                "wind_speed_10m": [null]
            }
        }));
        assert_eq!(record.current.temp_c, Some(3.5));
        assert_eq!(record.current.timestamp, Some(1_705_276_800));
        assert_eq!(record.current.wind_speed_mps, None);
        assert_eq!(record.current.uv_index, None);
    }

    #[test]
    fn unmatched_current_time_leaves_hourly_fields_unknown() {
        let record = adapt(json!({
            "current_weather": {"time": "2024-01-15T10:15", "temperature": 1.0},
            "hourly": {"time": ["2024-01-15T10:00"], "uv_index": [2.0]}
        }));
        assert_eq!(record.current.temp_c, Some(1.0));
        assert_eq!(record.current.uv_index, None);
    }

    #[test]
    fn daily_arrays_map_by_index_and_ascend() {
        let record = adapt(json!({
            "current_weather": {"temperature": 0.0},
            "daily": {
                "time": ["2024-01-16", "2024-01-15", "not-a-date"],
                "temperature_2m_max": [4.0, 2.0, 9.0],
                "temperature_2m_min": [null, -2.0, 9.0],
                "uv_index_max": [1.1, 0.9],
                "cloudcover_mean": [80, 20],
                "wind_speed_10m_max": [7.0, 3.0],
                "wind_gusts_10m_max": [12.0]
            }
        }));
        assert_eq!(record.daily.len(), 2);
        let (first, second) = (&record.daily[0], &record.daily[1]);
        assert_eq!(first.timestamp, 1_705_276_800);
        assert_eq!(first.temp_day_c, Some(0.0));
        assert_eq!(first.wind_gust_mps, None);
        assert_eq!(second.temp_day_c, Some(4.0));
        assert_eq!(second.temp_night_c, None);
        assert_eq!(second.uv_index, Some(1.1));
        assert_eq!(second.wind_gust_mps, Some(12.0));
    }

    #[test]
    fn empty_payload_is_not_usable() {
        let record = adapt(json!({}));
        assert!(!record.is_usable());
        assert!(record.daily.is_empty());
    }
}
