use hazardwatch_core::Endpoints;
use hazardwatch_feeds::{fetch_aurora, JsonFetcher};

/// Fetches the aurora feed and prints its strongest points.
///
/// # Errors
///
/// Returns an error only if JSON output cannot be encoded.
pub(crate) async fn run_aurora(
    fetcher: &JsonFetcher,
    endpoints: &Endpoints,
    top: usize,
    json: bool,
) -> anyhow::Result<()> {
    let report = fetch_aurora(fetcher, endpoints).await;

    if json {
        let body = serde_json::json!({
            "source": report.source,
            "status": report.status,
            "samples": report.samples,
            "failures": report.failures.iter().map(ToString::to_string).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    if let Some(status) = &report.status {
        println!("{status}");
    }
    println!("{} aurora points loaded", report.samples.len());
    println!("{:>8}{:>10}{:>8}", "LAT", "LON", "PROB%");
    for sample in report.strongest(top) {
        println!(
            "{:>8.1}{:>10.1}{:>8.0}",
            sample.lat(),
            sample.lon(),
            sample.value()
        );
    }
    Ok(())
}
