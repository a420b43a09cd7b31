//! Earthquake, weather-alert, and X-ray flux feeds.
//!
//! These are single-source pass-through feeds: one request each, mapped
//! field-for-field into the core records with no fallback chain.

mod summary;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;

use hazardwatch_core::{Earthquake, Endpoints, FlareReading, QuakeWindow, WeatherAlert};

use crate::error::FeedError;
use crate::fetch::{endpoint_url, JsonFetcher};
use crate::json::decode;

pub use summary::{
    build_feed_events, filter_quakes, quake_stats, summarize, usable_flares, DashboardSummary,
    FeedEvent, FeedKind, QuakeSort, QuakeStats,
};

const QUAKE_LIMIT: &str = "150";

#[derive(Debug, Default, Deserialize)]
struct QuakeProperties {
    mag: Option<f64>,
    place: Option<String>,
    time: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct PointGeometry {
    #[serde(default)]
    coordinates: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct QuakeFeature {
    id: Option<String>,
    #[serde(default)]
    properties: QuakeProperties,
    #[serde(default)]
    geometry: Option<PointGeometry>,
}

#[derive(Debug, Deserialize)]
struct QuakeCollection {
    #[serde(default)]
    features: Vec<QuakeFeature>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AlertProperties {
    event: Option<String>,
    area_desc: Option<String>,
    effective: Option<String>,
    sent: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AlertFeature {
    #[serde(default)]
    properties: AlertProperties,
}

#[derive(Debug, Deserialize)]
struct AlertCollection {
    #[serde(default)]
    features: Vec<AlertFeature>,
}

#[derive(Debug, Deserialize)]
struct XrayReading {
    time_tag: Option<String>,
    flux: Option<f64>,
}

/// USGS catalog query for events since `now - window`, newest first.
///
/// # Errors
///
/// Returns [`FeedError::InvalidUrl`] if `base` is not a URL.
pub fn quake_query_url(
    base: &str,
    window: QuakeWindow,
    now: DateTime<Utc>,
) -> Result<Url, FeedError> {
    let start =
        (now - Duration::hours(window.hours())).to_rfc3339_opts(SecondsFormat::Millis, true);
    endpoint_url(
        base,
        "",
        &[
            ("format", "geojson"),
            ("orderby", "time"),
            ("limit", QUAKE_LIMIT),
            ("starttime", start.as_str()),
        ],
    )
}

/// # Errors
///
/// Any fetch or decode error from the USGS endpoint.
pub async fn fetch_earthquakes(
    fetcher: &JsonFetcher,
    endpoints: &Endpoints,
    window: QuakeWindow,
) -> Result<Vec<Earthquake>, FeedError> {
    let url = quake_query_url(&endpoints.usgs_query, window, Utc::now())?;
    let quakes = parse_earthquakes(fetcher.get_json(url.as_str()).await?)?;
    tracing::info!(count = quakes.len(), %window, "earthquakes loaded");
    Ok(quakes)
}

/// # Errors
///
/// Any fetch or decode error from the NWS endpoint.
pub async fn fetch_weather_alerts(
    fetcher: &JsonFetcher,
    endpoints: &Endpoints,
) -> Result<Vec<WeatherAlert>, FeedError> {
    let alerts = parse_weather_alerts(fetcher.get_json(&endpoints.nws_alerts).await?)?;
    tracing::info!(count = alerts.len(), "weather alerts loaded");
    Ok(alerts)
}

/// # Errors
///
/// Any fetch or decode error from the SWPC endpoint.
pub async fn fetch_solar_flares(
    fetcher: &JsonFetcher,
    endpoints: &Endpoints,
) -> Result<Vec<FlareReading>, FeedError> {
    let flares = parse_solar_flares(fetcher.get_json(&endpoints.swpc_xrays).await?)?;
    tracing::info!(count = flares.len(), "X-ray flux loaded");
    Ok(flares)
}

fn parse_earthquakes(body: Value) -> Result<Vec<Earthquake>, FeedError> {
    let collection: QuakeCollection = decode(body, "USGS earthquake feed")?;
    Ok(collection
        .features
        .into_iter()
        .enumerate()
        .map(|(idx, feature)| {
            let coords = feature.geometry.unwrap_or_default().coordinates;
            let coord = |i: usize| coords.get(i).copied().flatten();
            Earthquake {
                id: feature.id.unwrap_or_else(|| format!("quake-{idx}")),
                mag: feature.properties.mag,
                place: feature.properties.place,
                time: feature.properties.time,
                lon: coord(0),
                lat: coord(1),
                depth: coord(2),
            }
        })
        .collect())
}

fn parse_weather_alerts(body: Value) -> Result<Vec<WeatherAlert>, FeedError> {
    let collection: AlertCollection = decode(body, "NWS alert feed")?;
    Ok(collection
        .features
        .into_iter()
        .map(|feature| {
            let p = feature.properties;
            WeatherAlert {
                event: p.event,
                area: p.area_desc,
                time: p.effective.filter(|t| !t.is_empty()).or(p.sent),
            }
        })
        .collect())
}

fn parse_solar_flares(body: Value) -> Result<Vec<FlareReading>, FeedError> {
    if !body.is_array() {
        tracing::debug!("X-ray flux payload is not a list; treating as empty");
        return Ok(Vec::new());
    }
    let readings: Vec<XrayReading> = decode(body, "SWPC X-ray feed")?;
    Ok(readings
        .into_iter()
        .enumerate()
        .map(|(idx, r)| FlareReading {
            id: r
                .time_tag
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| format!("flare-{idx}")),
            flux: r.flux,
            time: r.time_tag,
        })
        .collect())
}
