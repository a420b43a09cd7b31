/// Base URLs of every public service the pipeline talks to.
///
/// Each field is the scheme + host (plus any fixed path) of one provider.
/// Overridable so tests and mirrors can point the pipeline elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// USGS FDSN event query endpoint.
    pub usgs_query: String,
    /// NWS active alerts endpoint.
    pub nws_alerts: String,
    /// SWPC GOES primary X-ray flux (1-day) JSON.
    pub swpc_xrays: String,
    /// SWPC OVATION aurora probability JSON.
    pub aurora: String,
    /// allorigins-style CORS relay exposing `/get?url=` and `/raw?url=`.
    pub cors_proxy: String,
    /// OpenWeather API host (`/data/2.5/...`, `/geo/1.0/...`).
    pub openweather: String,
    /// Open-Meteo forecast host (`/v1/forecast`).
    pub open_meteo: String,
    /// Open-Meteo geocoding host (`/v1/search`).
    pub open_meteo_geocoding: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            usgs_query: "https://earthquake.usgs.gov/fdsnws/event/1/query".to_string(),
            nws_alerts: "https://api.weather.gov/alerts/active".to_string(),
            swpc_xrays: "https://services.swpc.noaa.gov/json/goes/primary/xrays-1-day.json"
                .to_string(),
            aurora: "https://services.swpc.noaa.gov/json/ovation_aurora_latest.json".to_string(),
            cors_proxy: "https://api.allorigins.win".to_string(),
            openweather: "https://api.openweathermap.org".to_string(),
            open_meteo: "https://api.open-meteo.com".to_string(),
            open_meteo_geocoding: "https://geocoding-api.open-meteo.com".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub openweather_api_key: Option<String>,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub default_weather_query: String,
    pub quake_refresh_secs: u64,
    pub endpoints: Endpoints,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field(
                "openweather_api_key",
                &self.openweather_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("default_weather_query", &self.default_weather_query)
            .field("quake_refresh_secs", &self.quake_refresh_secs)
            .field("endpoints", &self.endpoints)
            .finish()
    }
}
