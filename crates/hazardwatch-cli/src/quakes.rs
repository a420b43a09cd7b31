use std::time::Duration;

use hazardwatch_core::{AppConfig, Endpoints, QuakeWindow};
use hazardwatch_feeds::hazards::{fetch_earthquakes, filter_quakes, quake_stats, QuakeSort};
use hazardwatch_feeds::JsonFetcher;

use crate::display::{clip, millis_utc, opt};

#[derive(Debug, Clone, Copy)]
pub(crate) struct QuakeQuery {
    pub(crate) window: QuakeWindow,
    pub(crate) min_mag: f64,
    pub(crate) sort: QuakeSort,
}

/// Fetches, filters, and prints one page of earthquakes.
///
/// # Errors
///
/// Returns an error if the USGS request fails or JSON output cannot be encoded.
pub(crate) async fn run_quakes(
    fetcher: &JsonFetcher,
    endpoints: &Endpoints,
    query: QuakeQuery,
    json: bool,
) -> anyhow::Result<()> {
    let quakes = fetch_earthquakes(fetcher, endpoints, query.window).await?;
    let filtered = filter_quakes(&quakes, query.min_mag, query.sort);

    if json {
        println!("{}", serde_json::to_string_pretty(&filtered)?);
        return Ok(());
    }

    if filtered.is_empty() {
        println!(
            "no earthquakes at or above M{:.1} in the last {}",
            query.min_mag, query.window
        );
        return Ok(());
    }

    let stats = quake_stats(&filtered);
    let strongest = stats.strongest.as_ref().map_or_else(
        || "--".to_string(),
        |q| format!("M{} {}", opt(q.mag, 1), q.place.as_deref().unwrap_or("Unknown location")),
    );
    println!(
        "{} quakes in the last {}; strongest {}; mean depth {} km",
        stats.total,
        query.window,
        strongest,
        opt(stats.mean_depth_km, 1)
    );
    println!("{:<6}{:<22}{:>9}  PLACE", "MAG", "TIME", "DEPTH");
    for quake in &filtered {
        println!(
            "{:<6}{:<22}{:>9}  {}",
            opt(quake.mag, 1),
            millis_utc(quake.time),
            opt(quake.depth, 1),
            clip(quake.place.as_deref().unwrap_or("Unknown location"), 60)
        );
    }
    Ok(())
}

/// Repeats [`run_quakes`] every `quake_refresh_secs` until Ctrl-C.
///
/// Ticks run back to back; a slow fetch delays the next tick instead of
/// overlapping it. Per-tick failures are logged and the loop continues.
///
/// # Errors
///
/// Returns an error if the Ctrl-C handler cannot be installed.
pub(crate) async fn watch_quakes(
    fetcher: &JsonFetcher,
    config: &AppConfig,
    query: QuakeQuery,
    json: bool,
) -> anyhow::Result<()> {
    let period = Duration::from_secs(config.quake_refresh_secs);
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    tracing::info!(every_secs = config.quake_refresh_secs, "watching earthquakes");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = run_quakes(fetcher, &config.endpoints, query, json).await {
                    tracing::error!(error = %e, "earthquake refresh failed");
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal?;
                tracing::info!("stopping earthquake watch");
                return Ok(());
            }
        }
    }
}
