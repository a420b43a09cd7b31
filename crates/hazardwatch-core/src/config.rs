use crate::app_config::{AppConfig, Endpoints};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a numeric env var does not parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a numeric env var does not parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional; tests drive this with a `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let log_level = or_default("HAZARDWATCH_LOG_LEVEL", "info");
    let openweather_api_key = lookup("OPENWEATHER_API_KEY")
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty());

    let request_timeout_secs = parse_u64("HAZARDWATCH_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("HAZARDWATCH_USER_AGENT", "hazardwatch/0.1 (hazard-dashboard)");
    let default_weather_query =
        or_default("HAZARDWATCH_DEFAULT_WEATHER_QUERY", "Fairbanks, Alaska");

    let quake_refresh_secs = parse_u64("HAZARDWATCH_QUAKE_REFRESH_SECS", "60")?;
    if quake_refresh_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "HAZARDWATCH_QUAKE_REFRESH_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let defaults = Endpoints::default();
    let endpoints = Endpoints {
        usgs_query: or_default("HAZARDWATCH_USGS_URL", &defaults.usgs_query),
        nws_alerts: or_default("HAZARDWATCH_NWS_ALERTS_URL", &defaults.nws_alerts),
        swpc_xrays: or_default("HAZARDWATCH_SWPC_XRAY_URL", &defaults.swpc_xrays),
        aurora: or_default("HAZARDWATCH_AURORA_URL", &defaults.aurora),
        cors_proxy: or_default("HAZARDWATCH_CORS_PROXY_URL", &defaults.cors_proxy),
        openweather: or_default("HAZARDWATCH_OPENWEATHER_URL", &defaults.openweather),
        open_meteo: or_default("HAZARDWATCH_OPEN_METEO_URL", &defaults.open_meteo),
        open_meteo_geocoding: or_default(
            "HAZARDWATCH_OPEN_METEO_GEOCODING_URL",
            &defaults.open_meteo_geocoding,
        ),
    };

    Ok(AppConfig {
        log_level,
        openweather_api_key,
        request_timeout_secs,
        user_agent,
        default_weather_query,
        quake_refresh_secs,
        endpoints,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
