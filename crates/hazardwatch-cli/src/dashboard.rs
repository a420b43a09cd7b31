use hazardwatch_core::{Endpoints, FluxClass, QuakeWindow};
use hazardwatch_feeds::hazards::usable_flares;
use hazardwatch_feeds::{refresh_dashboard, DashboardSnapshot, JsonFetcher};

use crate::display::{clip, millis_utc, opt, rfc3339_utc};

const TICKER_LINES: usize = 12;
const FLARE_LINES: usize = 10;

/// Refreshes every hazard feed concurrently and prints the overview.
///
/// # Errors
///
/// Returns an error only if JSON output cannot be encoded; feed failures
/// are reported inline.
pub(crate) async fn run_dashboard(
    fetcher: &JsonFetcher,
    endpoints: &Endpoints,
    window: QuakeWindow,
    json: bool,
) -> anyhow::Result<()> {
    let snapshot = refresh_dashboard(fetcher, endpoints, window).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot_json(&snapshot))?);
    } else {
        print_snapshot(&snapshot);
    }
    Ok(())
}

fn snapshot_json(snapshot: &DashboardSnapshot) -> serde_json::Value {
    let failures: serde_json::Map<String, serde_json::Value> = snapshot
        .failures()
        .into_iter()
        .map(|(feed, e)| (feed.to_string(), e.to_string().into()))
        .collect();
    serde_json::json!({
        "summary": snapshot.summary(),
        "events": snapshot.events(),
        "aurora": {
            "source": snapshot.aurora.source,
            "status": snapshot.aurora.status,
            "samples": snapshot.aurora.samples.len(),
        },
        "failures": failures,
    })
}

fn print_snapshot(snapshot: &DashboardSnapshot) {
    let summary = snapshot.summary();
    println!("{:<24}{:<14}STATUS", "METRIC", "VALUE");
    println!(
        "{:<24}{:<14}{}",
        "Largest magnitude",
        summary
            .largest_magnitude
            .map_or_else(|| "n/a".to_string(), |m| format!("M{m:.1}")),
        summary.quake_status()
    );
    println!(
        "{:<24}{:<14}{}",
        "Active weather alerts",
        summary.alert_count,
        summary.alert_status()
    );
    println!(
        "{:<24}{:<14}{}",
        "Peak X-ray flux",
        summary
            .peak_flux
            .map_or_else(|| "n/a".to_string(), |f| format!("{f:.2e}")),
        summary.flare_status()
    );

    if let Ok(flares) = &snapshot.flares {
        let recent = usable_flares(flares, FLARE_LINES);
        if !recent.is_empty() {
            println!();
            println!("{:<10}{:<12}TIME", "CLASS", "FLUX W/m²");
            for flare in &recent {
                let class = flare
                    .flux
                    .and_then(FluxClass::from_flux)
                    .map_or_else(|| "Unknown".to_string(), |c| c.to_string());
                println!(
                    "{:<10}{:<12}{}",
                    class,
                    flare.flux.map_or_else(|| "n/a".to_string(), |f| format!("{f:.2e}")),
                    rfc3339_utc(flare.time.as_deref())
                );
            }
        }
    }

    println!();
    match &snapshot.aurora.status {
        Some(status) => println!("Aurora: {status}"),
        None => println!("Aurora: {} points loaded", snapshot.aurora.samples.len()),
    }
    if let Some(peak) = snapshot.aurora.strongest(1).first() {
        println!(
            "Strongest aurora {}% at {}, {}",
            opt(Some(peak.value()), 0),
            opt(Some(peak.lat()), 1),
            opt(Some(peak.lon()), 1)
        );
    }

    let events = snapshot.events();
    if !events.is_empty() {
        println!();
        for event in events.iter().take(TICKER_LINES) {
            println!("{}  {}", millis_utc(Some(event.time_ms)), clip(&event.text, 70));
        }
    }

    for (feed, error) in snapshot.failures() {
        println!("Unable to load {feed} right now: {error}");
    }
}
