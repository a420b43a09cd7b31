//! OpenWeather 2.5 adapter: current conditions plus the 3-hourly forecast.

use serde::Deserialize;

use hazardwatch_core::{CurrentConditions, Location, WeatherRecord};

use crate::error::FeedError;
use crate::fetch::{endpoint_url, JsonFetcher};
use crate::json::decode;

use super::daily::aggregate_daily_forecast;

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub(crate) struct OwMain {
    pub(crate) temp: Option<f64>,
    pub(crate) feels_like: Option<f64>,
    pub(crate) temp_min: Option<f64>,
    pub(crate) temp_max: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub(crate) struct OwWind {
    pub(crate) speed: Option<f64>,
    pub(crate) gust: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub(crate) struct OwClouds {
    pub(crate) all: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwCoord {
    lat: Option<f64>,
    lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OwSys {
    pub(crate) country: Option<String>,
}

/// `/data/2.5/weather` response.
#[derive(Debug, Deserialize)]
pub(crate) struct OwCurrent {
    coord: Option<OwCoord>,
    pub(crate) name: Option<String>,
    pub(crate) sys: Option<OwSys>,
    dt: Option<i64>,
    timezone: Option<i64>,
    main: Option<OwMain>,
    wind: Option<OwWind>,
    clouds: Option<OwClouds>,
}

impl OwCurrent {
    pub(crate) fn coordinates(&self) -> Option<(f64, f64)> {
        let coord = self.coord.as_ref()?;
        Some((coord.lat?, coord.lon?))
    }
}

/// One 3-hour slot of `/data/2.5/forecast`, built by deserializing the
/// provider's JSON.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastEntry {
    pub(crate) dt: Option<i64>,
    pub(crate) main: Option<OwMain>,
    pub(crate) wind: Option<OwWind>,
    pub(crate) clouds: Option<OwClouds>,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    timezone: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OwForecast {
    #[serde(default)]
    list: Vec<ForecastEntry>,
    city: Option<OwCity>,
}

/// Fetches and normalizes weather for `location`.
///
/// A failing forecast request is logged and skipped: current conditions
/// alone still make a record.
///
/// # Errors
///
/// Any fetch or decode error from the current-conditions request.
pub(crate) async fn fetch_openweather(
    fetcher: &JsonFetcher,
    base: &str,
    api_key: &str,
    location: &Location,
) -> Result<WeatherRecord, FeedError> {
    let lat = location.lat.to_string();
    let lon = location.lon.to_string();
    let params = [
        ("lat", lat.as_str()),
        ("lon", lon.as_str()),
        ("units", "metric"),
        ("appid", api_key),
    ];

    let current_url = endpoint_url(base, "/data/2.5/weather", &params)?;
    let current: OwCurrent = decode(
        fetcher.get_json(current_url.as_str()).await?,
        "OpenWeather current weather",
    )?;

    let forecast_url = endpoint_url(base, "/data/2.5/forecast", &params)?;
    let forecast = fetcher
        .get_json(forecast_url.as_str())
        .await
        .and_then(|body| decode::<OwForecast>(body, "OpenWeather forecast"));
    let forecast = match forecast {
        Ok(forecast) => Some(forecast),
        Err(e) => {
            tracing::warn!(
                error = %e,
                "forecast endpoint failed; continuing with current conditions only"
            );
            None
        }
    };

    Ok(adapt_openweather(current, forecast))
}

fn adapt_openweather(current: OwCurrent, forecast: Option<OwForecast>) -> WeatherRecord {
    let forecast_tz = forecast
        .as_ref()
        .and_then(|f| f.city.as_ref())
        .and_then(|c| c.timezone);
    // A zero offset is indistinguishable from "not reported" here.
    let offset = current
        .timezone
        .filter(|&tz| tz != 0)
        .or(forecast_tz)
        .unwrap_or(0);

    let main = current.main.unwrap_or_default();
    let wind = current.wind.unwrap_or_default();
    let daily = forecast
        .map(|f| aggregate_daily_forecast(&f.list, offset))
        .unwrap_or_default();

    WeatherRecord {
        timezone_offset_secs: offset,
        current: CurrentConditions {
            timestamp: current.dt,
            temp_c: main.temp,
            feels_like_c: main.feels_like,
            wind_speed_mps: wind.speed,
            wind_gust_mps: wind.gust,
            uv_index: None,
            cloud_percent: current.clouds.and_then(|c| c.all),
        },
        daily,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn current(value: serde_json::Value) -> OwCurrent {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn current_conditions_map_directly() {
        let raw = current(json!({
            "coord": {"lat": 64.84, "lon": -147.72},
            "name": "Fairbanks",
            "dt": 1_700_000_000,
            "timezone": -32_400,
            "main": {"temp": -8.5, "feels_like": -14.2},
            "wind": {"speed": 3.1},
            "clouds": {"all": 75}
        }));
        assert_eq!(raw.coordinates(), Some((64.84, -147.72)));

        let record = adapt_openweather(raw, None);
        assert_eq!(record.timezone_offset_secs, -32_400);
        assert_eq!(record.current.timestamp, Some(1_700_000_000));
        assert_eq!(record.current.temp_c, Some(-8.5));
        assert_eq!(record.current.feels_like_c, Some(-14.2));
        assert_eq!(record.current.wind_speed_mps, Some(3.1));
        assert_eq!(record.current.wind_gust_mps, None);
        assert_eq!(record.current.uv_index, None);
        assert_eq!(record.current.cloud_percent, Some(75.0));
        assert!(record.daily.is_empty());
        assert!(record.is_usable());
    }

    #[test]
    fn offset_falls_back_to_forecast_city() {
        let forecast: OwForecast = serde_json::from_value(json!({
            "city": {"timezone": 3_600},
            "list": [{"dt": 1_700_000_000, "main": {"temp": 1.0}}]
        }))
        .unwrap();
        let record = adapt_openweather(current(json!({"main": {"temp": 2.0}})), Some(forecast));
        assert_eq!(record.timezone_offset_secs, 3_600);
        assert_eq!(record.daily.len(), 1);
    }

    #[test]
    fn missing_blocks_leave_fields_unknown() {
        let record = adapt_openweather(current(json!({})), None);
        assert_eq!(record.timezone_offset_secs, 0);
        assert_eq!(record.current, CurrentConditions::default());
        assert!(!record.is_usable());
    }
}
