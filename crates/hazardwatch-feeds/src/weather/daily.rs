//! Day bucketing for the 3-hourly OpenWeather forecast list.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};

use hazardwatch_core::DailyForecast;

use super::openweather::ForecastEntry;

#[derive(Debug, Default)]
struct Bucket {
    /// `dt` of the last entry seen for the day.
    dt: i64,
    max: Option<f64>,
    min: Option<f64>,
    cloud_sum: f64,
    cloud_count: u32,
    wind: Option<f64>,
    gust: Option<f64>,
}

fn max_of(acc: Option<f64>, next: Option<f64>) -> Option<f64> {
    match (acc, next) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

fn min_of(acc: Option<f64>, next: Option<f64>) -> Option<f64> {
    match (acc, next) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

impl Bucket {
    fn absorb(&mut self, dt: i64, entry: &ForecastEntry) {
        let main = entry.main.unwrap_or_default();
        self.max = max_of(self.max, main.temp_max.or(main.temp));
        self.min = min_of(self.min, main.temp_min.or(main.temp));
        if let Some(cover) = entry.clouds.and_then(|c| c.all) {
            self.cloud_sum += cover;
            self.cloud_count += 1;
        }
        let wind = entry.wind.unwrap_or_default();
        self.wind = max_of(self.wind, wind.speed);
        self.gust = max_of(self.gust, wind.gust);
        self.dt = dt;
    }

    fn finish(self) -> DailyForecast {
        let day = match (self.max, self.min) {
            (Some(max), Some(min)) => Some((max + min) / 2.0),
            (max, min) => max.or(min),
        };
        let cloud_percent = (self.cloud_count > 0)
            .then(|| (self.cloud_sum / f64::from(self.cloud_count) * 10.0).round() / 10.0);
        DailyForecast {
            timestamp: self.dt,
            temp_day_c: day,
            temp_max_c: self.max,
            temp_min_c: self.min,
            temp_night_c: self.min,
            wind_speed_mps: self.wind,
            wind_gust_mps: self.gust,
            cloud_percent,
            uv_index: None,
        }
    }
}

/// Folds 3-hourly entries into one [`DailyForecast`] per local calendar day.
///
/// The day of an entry is the UTC date of `dt + tz_offset_secs`. Entries
/// without `dt` are ignored. Output is ascending by timestamp.
#[must_use]
pub fn aggregate_daily_forecast(
    entries: &[ForecastEntry],
    tz_offset_secs: i64,
) -> Vec<DailyForecast> {
    let mut buckets: BTreeMap<NaiveDate, Bucket> = BTreeMap::new();
    for entry in entries {
        let Some(dt) = entry.dt else { continue };
        let Some(local) = dt
            .checked_add(tz_offset_secs)
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
        else {
            continue;
        };
        buckets
            .entry(local.date_naive())
            .or_default()
            .absorb(dt, entry);
    }

    let mut days: Vec<DailyForecast> = buckets.into_values().map(Bucket::finish).collect();
    days.sort_by_key(|d| d.timestamp);
    days
}
