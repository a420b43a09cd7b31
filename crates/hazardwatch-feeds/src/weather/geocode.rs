//! Turning a free-text query into a [`Location`].

use serde::Deserialize;
use serde_json::Value;

use hazardwatch_core::Location;

use crate::error::FeedError;
use crate::fetch::{endpoint_url, JsonFetcher};
use crate::json::{decode, join_name};

use super::openweather::OwCurrent;

/// Parses a literal `"lat, lon"` query.
///
/// Returns `None` unless there are exactly two finite numeric components
/// with `|lat| <= 90` and `|lon| <= 180`; callers then geocode instead.
#[must_use]
pub fn parse_coordinate_query(query: &str) -> Option<Location> {
    let mut parts = query.split(',');
    let lat = parts.next()?.trim().parse::<f64>().ok()?;
    let lon = parts.next()?.trim().parse::<f64>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    let in_range = lat.is_finite() && lon.is_finite() && lat.abs() <= 90.0 && lon.abs() <= 180.0;
    in_range.then(|| Location {
        lat,
        lon,
        name: format!("Lat {lat:.2}, Lon {lon:.2}"),
    })
}

#[derive(Debug, Deserialize)]
struct OwGeoMatch {
    lat: f64,
    lon: f64,
    name: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmGeoMatch {
    latitude: f64,
    longitude: f64,
    name: Option<String>,
    admin1: Option<String>,
    country: Option<String>,
}

/// Resolves `query` through OpenWeather.
///
/// The current-weather-by-name endpoint is tried first because it returns
/// coordinates at no extra cost; any failure there falls back to the
/// dedicated geocoding endpoint, whose errors are returned as-is.
///
/// # Errors
///
/// - [`FeedError::NotFound`] when the geocoder has no match.
/// - Any fetch error from the geocoding endpoint (including HTTP 401).
pub(crate) async fn geocode_openweather(
    fetcher: &JsonFetcher,
    base: &str,
    api_key: &str,
    query: &str,
) -> Result<Location, FeedError> {
    let by_name = endpoint_url(base, "/data/2.5/weather", &[("q", query), ("appid", api_key)])?;
    let located = fetcher
        .get_json(by_name.as_str())
        .await
        .and_then(|body| decode::<OwCurrent>(body, "OpenWeather current weather"));
    match located {
        Ok(current) => {
            if let Some((lat, lon)) = current.coordinates() {
                let country = current.sys.as_ref().and_then(|s| s.country.as_deref());
                return Ok(Location {
                    lat,
                    lon,
                    name: join_name(&[current.name.as_deref(), country], query),
                });
            }
            tracing::debug!(query, "OpenWeather current weather had no coordinates");
        }
        Err(e) => {
            tracing::warn!(query, error = %e, "OpenWeather name lookup failed; trying geocoder");
        }
    }

    let direct = endpoint_url(
        base,
        "/geo/1.0/direct",
        &[("q", query), ("limit", "1"), ("appid", api_key)],
    )?;
    let body = fetcher.get_json(direct.as_str()).await?;
    let first = first_result(&body).ok_or_else(|| FeedError::NotFound {
        query: query.to_owned(),
    })?;
    let hit: OwGeoMatch = decode(first, "OpenWeather geocoder result")?;
    Ok(Location {
        lat: hit.lat,
        lon: hit.lon,
        name: join_name(
            &[hit.name.as_deref(), hit.state.as_deref(), hit.country.as_deref()],
            query,
        ),
    })
}

/// Resolves `query` through the Open-Meteo geocoding API.
///
/// # Errors
///
/// - [`FeedError::NotFound`] when `results` is missing or empty.
/// - Any fetch or decode error.
pub(crate) async fn geocode_open_meteo(
    fetcher: &JsonFetcher,
    base: &str,
    query: &str,
) -> Result<Location, FeedError> {
    let url = endpoint_url(
        base,
        "/v1/search",
        &[
            ("name", query),
            ("count", "1"),
            ("language", "en"),
            ("format", "json"),
        ],
    )?;
    let body = fetcher.get_json(url.as_str()).await?;
    let first = body
        .get("results")
        .and_then(first_result)
        .ok_or_else(|| FeedError::NotFound {
            query: query.to_owned(),
        })?;
    let hit: OmGeoMatch = decode(first, "Open-Meteo geocoder result")?;
    Ok(Location {
        lat: hit.latitude,
        lon: hit.longitude,
        name: join_name(
            &[hit.name.as_deref(), hit.admin1.as_deref(), hit.country.as_deref()],
            query,
        ),
    })
}

fn first_result(list: &Value) -> Option<Value> {
    list.as_array().and_then(|items| items.first()).cloned()
}
