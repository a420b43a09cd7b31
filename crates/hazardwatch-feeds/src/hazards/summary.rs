//! Derived views over the hazard feeds: filtering, stats, the summary
//! table, and the combined event ticker.

use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use serde::Serialize;

use hazardwatch_core::{Earthquake, FlareReading, WeatherAlert};

const FEED_QUAKES: usize = 20;
const FEED_ALERTS: usize = 15;
const FEED_FLARES: usize = 15;

const STRONG_QUAKE_MAG: f64 = 6.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuakeSort {
    #[default]
    Time,
    Magnitude,
}

impl fmt::Display for QuakeSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Time => write!(f, "time"),
            Self::Magnitude => write!(f, "magnitude"),
        }
    }
}

impl FromStr for QuakeSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "time" => Ok(Self::Time),
            "magnitude" | "mag" => Ok(Self::Magnitude),
            other => Err(format!("unknown sort '{other}' (expected time or magnitude)")),
        }
    }
}

/// Parses an RFC 3339 timestamp to unix milliseconds.
fn rfc3339_millis(text: Option<&str>) -> Option<i64> {
    DateTime::parse_from_rfc3339(text?)
        .ok()
        .map(|t| t.timestamp_millis())
}

/// Quakes at or above `min_mag`, in the requested order.
///
/// A missing magnitude counts as zero. Undated quakes sort last when
/// ordering by time.
#[must_use]
pub fn filter_quakes(quakes: &[Earthquake], min_mag: f64, sort: QuakeSort) -> Vec<Earthquake> {
    let mut kept: Vec<Earthquake> = quakes
        .iter()
        .filter(|q| q.mag.unwrap_or(0.0) >= min_mag)
        .cloned()
        .collect();
    match sort {
        QuakeSort::Magnitude => {
            kept.sort_by(|a, b| b.mag.unwrap_or(0.0).total_cmp(&a.mag.unwrap_or(0.0)));
        }
        QuakeSort::Time => kept.sort_by(|a, b| b.time.cmp(&a.time)),
    }
    kept
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuakeStats {
    pub total: usize,
    pub strongest: Option<Earthquake>,
    /// Mean over quakes that report a depth.
    pub mean_depth_km: Option<f64>,
}

#[must_use]
pub fn quake_stats(quakes: &[Earthquake]) -> QuakeStats {
    let strongest = quakes
        .iter()
        .filter(|q| q.mag.is_some_and(|m| m > 0.0))
        .max_by(|a, b| a.mag.unwrap_or(0.0).total_cmp(&b.mag.unwrap_or(0.0)))
        .cloned();
    let depths: Vec<f64> = quakes.iter().filter_map(|q| q.depth).collect();
    #[allow(clippy::cast_precision_loss)]
    let mean_depth_km =
        (!depths.is_empty()).then(|| depths.iter().sum::<f64>() / depths.len() as f64);
    QuakeStats {
        total: quakes.len(),
        strongest,
        mean_depth_km,
    }
}

/// Readings with a finite positive flux, newest first, at most `limit`.
#[must_use]
pub fn usable_flares(flares: &[FlareReading], limit: usize) -> Vec<FlareReading> {
    let mut usable: Vec<FlareReading> = flares
        .iter()
        .filter(|f| f.flux.is_some_and(|x| x.is_finite() && x > 0.0))
        .cloned()
        .collect();
    usable.sort_by(|a, b| {
        rfc3339_millis(b.time.as_deref()).cmp(&rfc3339_millis(a.time.as_deref()))
    });
    usable.truncate(limit);
    usable
}

/// The three-row hazard summary table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub largest_magnitude: Option<f64>,
    pub alert_count: usize,
    /// Peak X-ray flux, W/m².
    pub peak_flux: Option<f64>,
}

impl DashboardSummary {
    #[must_use]
    pub fn quake_status(&self) -> &'static str {
        if self.largest_magnitude.is_some_and(|m| m >= STRONG_QUAKE_MAG) {
            "Strong quake observed"
        } else {
            "Stable"
        }
    }

    #[must_use]
    pub fn alert_status(&self) -> &'static str {
        if self.alert_count > 0 {
            "Alerts in effect"
        } else {
            "Clear"
        }
    }

    #[must_use]
    pub fn flare_status(&self) -> &'static str {
        if self.peak_flux.is_some() {
            "Solar flares detected"
        } else {
            "Calm"
        }
    }
}

#[must_use]
pub fn summarize(
    quakes: &[Earthquake],
    alerts: &[WeatherAlert],
    flares: &[FlareReading],
) -> DashboardSummary {
    DashboardSummary {
        largest_magnitude: positive_max(quakes.iter().filter_map(|q| q.mag)),
        alert_count: alerts.len(),
        peak_flux: positive_max(flares.iter().filter_map(|f| f.flux)),
    }
}

fn positive_max(values: impl Iterator<Item = f64>) -> Option<f64> {
    values
        .filter(|v| v.is_finite() && *v > 0.0)
        .max_by(f64::total_cmp)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedKind {
    Earth,
    Weather,
    Space,
}

/// One line of the rotating event ticker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedEvent {
    pub kind: FeedKind,
    /// Unix milliseconds.
    pub time_ms: i64,
    pub text: String,
}

/// Merges the head of each feed into one newest-first ticker.
///
/// Takes the first 20 quakes, 15 alerts, and 15 flares in feed order;
/// anything without a parseable timestamp is left out.
#[must_use]
pub fn build_feed_events(
    quakes: &[Earthquake],
    alerts: &[WeatherAlert],
    flares: &[FlareReading],
) -> Vec<FeedEvent> {
    let quake_events = quakes.iter().take(FEED_QUAKES).filter_map(|q| {
        let mag = q.mag.map_or_else(|| "?".to_string(), |m| format!("{m:.1}"));
        Some(FeedEvent {
            kind: FeedKind::Earth,
            time_ms: q.time?,
            text: format!("M{mag} quake - {}", q.place.as_deref().unwrap_or("Unknown")),
        })
    });
    let alert_events = alerts.iter().take(FEED_ALERTS).filter_map(|a| {
        Some(FeedEvent {
            kind: FeedKind::Weather,
            time_ms: rfc3339_millis(a.time.as_deref())?,
            text: format!(
                "{} - {}",
                a.event.as_deref().unwrap_or("Alert"),
                a.area.as_deref().unwrap_or("Unknown area")
            ),
        })
    });
    let flare_events = flares.iter().take(FEED_FLARES).filter_map(|f| {
        let flux = f
            .flux
            .map_or_else(|| "n/a".to_string(), |x| format!("{x:.2e}"));
        Some(FeedEvent {
            kind: FeedKind::Space,
            time_ms: rfc3339_millis(f.time.as_deref())?,
            text: format!("Solar flare flux {flux} W/m²"),
        })
    });

    let mut events: Vec<FeedEvent> = quake_events.chain(alert_events).chain(flare_events).collect();
    events.sort_by(|a, b| b.time_ms.cmp(&a.time_ms).then_with(|| a.text.cmp(&b.text)));
    events
}

#[cfg(test)]
#[path = "summary_test.rs"]
mod tests;
