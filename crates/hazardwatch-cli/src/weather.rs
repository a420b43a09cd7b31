use hazardwatch_core::AppConfig;
use hazardwatch_feeds::{JsonFetcher, WeatherReport, WeatherService, WeatherSession};

use crate::display::{local, opt};

/// Looks up weather for `query` and prints it.
///
/// Provider outages never fail the command; the report falls back to the
/// built-in sample and says so in its status line.
///
/// # Errors
///
/// Returns an error for a blank query or if JSON output cannot be encoded.
pub(crate) async fn run_weather(
    fetcher: &JsonFetcher,
    config: &AppConfig,
    query: &str,
    json: bool,
) -> anyhow::Result<()> {
    let service = WeatherService::new(fetcher.clone(), config);
    let session = WeatherSession::new();
    let report = service.lookup(&session, query).await?;
    for failure in &report.failures {
        tracing::info!(%failure, "provider skipped");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report_json(&report))?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn report_json(report: &WeatherReport) -> serde_json::Value {
    serde_json::json!({
        "location": report.location,
        "source": report.source,
        "degraded": report.is_degraded(),
        "status": report.status,
        "record": report.record,
        "failures": report.failures.iter().map(ToString::to_string).collect::<Vec<_>>(),
    })
}

fn print_report(report: &WeatherReport) {
    let record = &report.record;
    let offset = record.timezone_offset_secs;
    let now = &record.current;

    println!("{}", report.location.name);
    println!("{}", report.status);
    if let Some(ts) = now.timestamp {
        println!("Observed {}", local(ts, offset, "%a %d %b %H:%M"));
    }
    println!(
        "Now {}°C, feels like {}°C",
        opt(now.temp_c, 1),
        opt(now.feels_like_c, 1)
    );
    println!(
        "Wind {} m/s, gusts {} m/s, clouds {}%, UV {}",
        opt(now.wind_speed_mps, 1),
        opt(now.wind_gust_mps, 1),
        opt(now.cloud_percent, 0),
        opt(now.uv_index, 1)
    );

    let days = record.upcoming_days();
    if days.is_empty() {
        println!("no forecast days available");
        return;
    }
    println!();
    println!(
        "{:<12}{:>8}{:>8}{:>8}{:>8}{:>6}",
        "DAY", "HIGH", "LOW", "WIND", "CLOUDS", "UV"
    );
    for day in days {
        println!(
            "{:<12}{:>8}{:>8}{:>8}{:>8}{:>6}",
            local(day.timestamp, offset, "%a %d %b"),
            opt(day.temp_max_c, 1),
            opt(day.temp_min_c, 1),
            opt(day.wind_speed_mps, 1),
            opt(day.cloud_percent, 0),
            opt(day.uv_index, 1)
        );
    }
}
