mod aurora;
mod dashboard;
mod display;
mod quakes;
mod weather;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hazardwatch_core::QuakeWindow;
use hazardwatch_feeds::hazards::QuakeSort;
use hazardwatch_feeds::JsonFetcher;

#[derive(Debug, Parser)]
#[command(name = "hazardwatch")]
#[command(about = "Earthquakes, alerts, solar flares, aurora, and weather from public feeds")]
struct Cli {
    /// Print records as JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Current conditions and a three-day forecast
    Weather {
        /// City name or "lat, lon" (defaults to HAZARDWATCH_DEFAULT_WEATHER_QUERY)
        query: Vec<String>,
    },
    /// Aurora probability from the OVATION feed
    Aurora {
        /// Number of strongest points to list
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// Recent earthquakes from the USGS catalog
    Quakes {
        /// Look-back window: hour, day, or week
        #[arg(long, default_value_t = QuakeWindow::Day)]
        window: QuakeWindow,

        /// Hide quakes below this magnitude
        #[arg(long, default_value_t = 0.0)]
        min_mag: f64,

        /// Order by time or magnitude
        #[arg(long, default_value_t = QuakeSort::Time)]
        sort: QuakeSort,

        /// Re-fetch every HAZARDWATCH_QUAKE_REFRESH_SECS until interrupted
        #[arg(long)]
        watch: bool,
    },
    /// Every hazard feed at once, with a summary and event ticker
    Dashboard {
        /// Earthquake look-back window: hour, day, or week
        #[arg(long, default_value_t = QuakeWindow::Day)]
        window: QuakeWindow,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = hazardwatch_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(?config, "configuration loaded");
    let fetcher = JsonFetcher::from_config(&config)?;

    match cli.command {
        Commands::Weather { query } => {
            let query = if query.is_empty() {
                config.default_weather_query.clone()
            } else {
                query.join(" ")
            };
            weather::run_weather(&fetcher, &config, &query, cli.json).await
        }
        Commands::Aurora { top } => {
            aurora::run_aurora(&fetcher, &config.endpoints, top, cli.json).await
        }
        Commands::Quakes {
            window,
            min_mag,
            sort,
            watch,
        } => {
            let query = quakes::QuakeQuery {
                window,
                min_mag,
                sort,
            };
            if watch {
                quakes::watch_quakes(&fetcher, &config, query, cli.json).await
            } else {
                quakes::run_quakes(&fetcher, &config.endpoints, query, cli.json).await
            }
        }
        Commands::Dashboard { window } => {
            dashboard::run_dashboard(&fetcher, &config.endpoints, window, cli.json).await
        }
    }
}

#[cfg(test)]
mod tests;
