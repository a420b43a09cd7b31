//! Aurora probability feed: source chain, shape normalization, fallback.
//!
//! The aurora feed has been published in several incompatible encodings over
//! time, and the CORS relays in the chain may wrap it. Normalization works on
//! structure alone:
//!
//! | Encoding | Recognized by |
//! |---|---|
//! | rows | top-level array of `[a, b, value]` tuples or keyed objects |
//! | parallel arrays | `coordinates` plus an equal-length `intensity`/`data`/`values`/`probability` |
//! | OVATION | `coordinates` of `[lon 0..360, lat, value]` triples with no parallel array |
//! | grid | `latitudes`, `longitudes`, and a `data[lat][lon]` matrix |
//! | features | GeoJSON-like `features[]` with a per-feature scalar |
//!
//! Individual samples outside the valid ranges are dropped silently. A
//! payload that yields no samples at all is a [`FeedError::Shape`].

use std::fmt;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Serialize;
use serde_json::Value;

use hazardwatch_core::{AuroraSample, Endpoints};

use crate::chain::{resolve_chain, RawSource};
use crate::error::{Attempt, FeedError};
use crate::fetch::JsonFetcher;
use crate::json::{first_present, number, number_at};
use crate::samples::aurora_sample_points;

const LAT_KEYS: &[&str] = &["lat", "latitude"];
const LON_KEYS: &[&str] = &["lon", "longitude"];
const ROW_VALUE_KEYS: &[&str] = &["probability", "prob", "value", "intensity"];
const PARALLEL_VALUE_KEYS: &[&str] = &["intensity", "data", "values", "probability"];
const FEATURE_VALUE_KEYS: &[&str] = &["probability", "intensity", "value", "amp"];

pub const FALLBACK_STATUS: &str = "Showing fallback aurora sample.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Rows,
    ParallelArrays,
    Ovation,
    Grid,
    Features,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Rows => "rows",
            Self::ParallelArrays => "parallel-array",
            Self::Ovation => "OVATION",
            Self::Grid => "grid",
            Self::Features => "features",
        };
        f.write_str(name)
    }
}

/// Collects candidate points, keeping only those that pass validation.
#[derive(Default)]
struct Sink(Vec<AuroraSample>);

impl Sink {
    fn push(&mut self, lat: Option<f64>, lon: Option<f64>, value: Option<f64>) {
        if let (Some(lat), Some(lon), Some(value)) = (lat, lon, value) {
            if let Some(sample) = AuroraSample::new(lat, lon, value) {
                self.0.push(sample);
            }
        }
    }
}

/// Normalizes any recognized aurora encoding into validated samples.
///
/// For `[a, b, value]` tuples the coordinate order is unknown: `a` is taken
/// as latitude when `|a| <= 90`, otherwise `b` is. When both fit in ±90 the
/// tuple is ambiguous and `a` is still read as latitude.
///
/// # Errors
///
/// Returns [`FeedError::Shape`] when no encoding matches or when every
/// candidate sample is invalid.
pub fn normalize_aurora(raw: &Value) -> Result<Vec<AuroraSample>, FeedError> {
    let mut sink = Sink::default();

    let encoding = if let Some(rows) = raw.as_array() {
        for row in rows {
            match row {
                Value::Array(tuple) => push_tuple(&mut sink, tuple),
                Value::Object(_) => sink.push(
                    number_at(row, LAT_KEYS),
                    number_at(row, LON_KEYS),
                    number_at(row, ROW_VALUE_KEYS),
                ),
                _ => {}
            }
        }
        Encoding::Rows
    } else if let Some((coords, values)) = parallel_arrays(raw) {
        for (coord, value) in coords.iter().zip(values) {
            let value = number(value);
            match coord {
                Value::Array(pair) => sink.push(
                    pair.get(1).and_then(number),
                    pair.first().and_then(number),
                    value,
                ),
                Value::Object(_) => {
                    sink.push(number_at(coord, LAT_KEYS), number_at(coord, LON_KEYS), value);
                }
                _ => {}
            }
        }
        Encoding::ParallelArrays
    } else if let Some(triples) = ovation_triples(raw) {
        for triple in triples {
            if let Some(t) = triple.as_array() {
                sink.push(
                    t.get(1).and_then(number),
                    t.first().and_then(number).map(wrap_longitude),
                    t.get(2).and_then(number),
                );
            }
        }
        Encoding::Ovation
    } else if let Some((lats, lons, rows)) = grid(raw) {
        for (lat, row) in lats.iter().zip(rows) {
            let Some(row) = row.as_array() else { continue };
            for (value, lon) in row.iter().zip(lons) {
                sink.push(number(lat), number(lon), number(value));
            }
        }
        Encoding::Grid
    } else if let Some(features) = raw.get("features").and_then(Value::as_array) {
        for feature in features {
            push_feature(&mut sink, feature);
        }
        Encoding::Features
    } else {
        return Err(FeedError::shape("no known aurora encoding matched"));
    };

    if sink.0.is_empty() {
        return Err(FeedError::shape(format!(
            "{encoding} aurora payload produced no valid samples"
        )));
    }
    tracing::debug!(%encoding, samples = sink.0.len(), "normalized aurora payload");
    Ok(sink.0)
}

/// OVATION publishes longitudes as 0..360; fold the eastern half onto -180..0.
fn wrap_longitude(lon: f64) -> f64 {
    if lon > 180.0 && lon <= 360.0 {
        lon - 360.0
    } else {
        lon
    }
}

fn push_tuple(sink: &mut Sink, tuple: &[Value]) {
    let a = tuple.first().and_then(number);
    let b = tuple.get(1).and_then(number);
    let value = tuple.get(2).and_then(number);
    if a.is_some_and(|a| a.abs() <= 90.0) {
        sink.push(a, b, value);
    } else {
        sink.push(b, a, value);
    }
}

fn push_feature(sink: &mut Sink, feature: &Value) {
    let value = match feature
        .get("properties")
        .and_then(|p| first_present(p, FEATURE_VALUE_KEYS))
    {
        Some(v) => number(v),
        None => Some(0.0),
    };
    let Some(coords) = feature.pointer("/geometry/coordinates") else {
        return;
    };
    if !coords.is_array() {
        return;
    }
    let mut flat = Vec::new();
    flatten(coords, &mut flat);
    for pair in flat.chunks(2) {
        let lon = number(pair[0]);
        let lat = pair.get(1).and_then(|v| number(v));
        sink.push(lat, lon, value);
    }
}

fn flatten<'a>(value: &'a Value, out: &mut Vec<&'a Value>) {
    match value {
        Value::Array(items) => items.iter().for_each(|item| flatten(item, out)),
        leaf => out.push(leaf),
    }
}

fn parallel_arrays(raw: &Value) -> Option<(&Vec<Value>, &Vec<Value>)> {
    let coords = raw.get("coordinates")?.as_array()?;
    let values = first_present(raw, PARALLEL_VALUE_KEYS)?.as_array()?;
    (coords.len() == values.len()).then_some((coords, values))
}

fn ovation_triples(raw: &Value) -> Option<&Vec<Value>> {
    let coords = raw.get("coordinates")?.as_array()?;
    let all_triples = coords
        .iter()
        .all(|c| c.as_array().is_some_and(|t| t.len() >= 3));
    (all_triples && !coords.is_empty()).then_some(coords)
}

fn grid(raw: &Value) -> Option<(&Vec<Value>, &Vec<Value>, &Vec<Value>)> {
    Some((
        raw.get("latitudes")?.as_array()?,
        raw.get("longitudes")?.as_array()?,
        raw.get("data")?.as_array()?,
    ))
}

fn unwrap_relay_contents(body: &str) -> Result<Value, String> {
    let wrapper: Value = serde_json::from_str(body).map_err(|e| e.to_string())?;
    match wrapper.get("contents").and_then(Value::as_str) {
        Some(contents) if !contents.is_empty() => {
            serde_json::from_str(contents).map_err(|e| format!("wrapped contents: {e}"))
        }
        _ => Err("wrapped response missing contents".to_string()),
    }
}

/// The aurora chain: direct, relay-wrapped (`/get`), relay passthrough (`/raw`).
#[must_use]
pub fn aurora_sources(endpoints: &Endpoints) -> Vec<RawSource> {
    let target = utf8_percent_encode(&endpoints.aurora, NON_ALPHANUMERIC).to_string();
    let relay = endpoints.cors_proxy.trim_end_matches('/');
    vec![
        RawSource::new("direct", endpoints.aurora.clone()),
        RawSource::new("allorigins-wrapped", format!("{relay}/get?url={target}"))
            .with_parser(unwrap_relay_contents),
        RawSource::new("allorigins-raw", format!("{relay}/raw?url={target}")),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuroraSource {
    Live { label: String },
    Sample,
}

/// Result of one aurora refresh. Always carries samples.
#[derive(Debug)]
pub struct AuroraReport {
    pub samples: Vec<AuroraSample>,
    pub source: AuroraSource,
    /// User-facing status; `None` when live data loaded cleanly.
    pub status: Option<String>,
    /// Sources that failed on the way, in order.
    pub failures: Vec<Attempt>,
}

impl AuroraReport {
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.source == AuroraSource::Sample
    }

    /// Up to `limit` samples, strongest first.
    #[must_use]
    pub fn strongest(&self, limit: usize) -> Vec<AuroraSample> {
        let mut sorted = self.samples.clone();
        sorted.sort_by(|a, b| b.value().total_cmp(&a.value()));
        sorted.truncate(limit);
        sorted
    }

    fn fallback(failures: Vec<Attempt>) -> Self {
        let tried = failures
            .iter()
            .map(|a| a.label.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        tracing::warn!(%tried, "no aurora data parsed; using built-in sample");
        Self {
            samples: aurora_sample_points(),
            source: AuroraSource::Sample,
            status: Some(FALLBACK_STATUS.to_string()),
            failures,
        }
    }
}

/// Runs the aurora chain and normalizes the winner, substituting the
/// built-in sample points when nothing usable comes back.
pub async fn fetch_aurora(fetcher: &JsonFetcher, endpoints: &Endpoints) -> AuroraReport {
    let sources = aurora_sources(endpoints);
    match resolve_chain(fetcher, &sources).await {
        Ok(resolved) => match normalize_aurora(&resolved.value) {
            Ok(samples) => {
                tracing::info!(
                    source = %resolved.label,
                    samples = samples.len(),
                    "aurora feed loaded"
                );
                AuroraReport {
                    samples,
                    source: AuroraSource::Live {
                        label: resolved.label,
                    },
                    status: None,
                    failures: resolved.failures,
                }
            }
            Err(error) => {
                let mut failures = resolved.failures;
                failures.push(Attempt {
                    label: resolved.label,
                    error,
                });
                AuroraReport::fallback(failures)
            }
        },
        Err(FeedError::Chain { attempts }) => AuroraReport::fallback(attempts),
        Err(error) => AuroraReport::fallback(vec![Attempt {
            label: "aurora-chain".to_string(),
            error,
        }]),
    }
}

#[cfg(test)]
#[path = "aurora_test.rs"]
mod tests;
