mod daily;
mod geocode;
mod lookup;
mod open_meteo;
mod openweather;

pub use daily::aggregate_daily_forecast;
pub use geocode::parse_coordinate_query;
pub use lookup::{WeatherReport, WeatherService, WeatherSession, WeatherSource};
pub use openweather::ForecastEntry;
