//! One-shot refresh of every hazard feed at once.

use hazardwatch_core::{Earthquake, Endpoints, FlareReading, QuakeWindow, WeatherAlert};

use crate::aurora::{fetch_aurora, AuroraReport};
use crate::error::FeedError;
use crate::fetch::JsonFetcher;
use crate::hazards::{
    build_feed_events, fetch_earthquakes, fetch_solar_flares, fetch_weather_alerts, summarize,
    DashboardSummary, FeedEvent,
};

/// Results of one fan-out refresh. Each feed succeeds or fails on its own.
#[derive(Debug)]
pub struct DashboardSnapshot {
    pub quakes: Result<Vec<Earthquake>, FeedError>,
    pub alerts: Result<Vec<WeatherAlert>, FeedError>,
    pub flares: Result<Vec<FlareReading>, FeedError>,
    pub aurora: AuroraReport,
}

impl DashboardSnapshot {
    fn loaded(&self) -> (&[Earthquake], &[WeatherAlert], &[FlareReading]) {
        (
            self.quakes.as_deref().unwrap_or(&[]),
            self.alerts.as_deref().unwrap_or(&[]),
            self.flares.as_deref().unwrap_or(&[]),
        )
    }

    /// Summary over whichever feeds loaded; failed feeds count as empty.
    #[must_use]
    pub fn summary(&self) -> DashboardSummary {
        let (quakes, alerts, flares) = self.loaded();
        summarize(quakes, alerts, flares)
    }

    #[must_use]
    pub fn events(&self) -> Vec<FeedEvent> {
        let (quakes, alerts, flares) = self.loaded();
        build_feed_events(quakes, alerts, flares)
    }

    /// `(feed, error)` for every feed that failed.
    #[must_use]
    pub fn failures(&self) -> Vec<(&'static str, &FeedError)> {
        [
            ("earthquakes", self.quakes.as_ref().err()),
            ("alerts", self.alerts.as_ref().err()),
            ("solar flares", self.flares.as_ref().err()),
        ]
        .into_iter()
        .filter_map(|(feed, err)| err.map(|e| (feed, e)))
        .collect()
    }
}

/// Fetches quakes, alerts, flares, and aurora concurrently.
///
/// No feed waits on another and none can fail the others; aurora always
/// resolves because it degrades to the built-in sample.
pub async fn refresh_dashboard(
    fetcher: &JsonFetcher,
    endpoints: &Endpoints,
    window: QuakeWindow,
) -> DashboardSnapshot {
    let (quakes, alerts, flares, aurora) = tokio::join!(
        fetch_earthquakes(fetcher, endpoints, window),
        fetch_weather_alerts(fetcher, endpoints),
        fetch_solar_flares(fetcher, endpoints),
        fetch_aurora(fetcher, endpoints),
    );

    let snapshot = DashboardSnapshot {
        quakes,
        alerts,
        flares,
        aurora,
    };
    for (feed, error) in snapshot.failures() {
        tracing::warn!(feed, error = %error, "feed refresh failed");
    }
    snapshot
}
