//! Small formatting helpers shared by the table printers.

use chrono::{DateTime, FixedOffset, Offset, Utc};

/// `"n/a"` for unknown values, otherwise `value` to `precision` decimals.
pub(crate) fn opt(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.precision$}"))
}

pub(crate) fn millis_utc(ms: Option<i64>) -> String {
    ms.and_then(DateTime::<Utc>::from_timestamp_millis)
        .map_or_else(|| "Unknown time".to_string(), |t| t.format("%Y-%m-%d %H:%M UTC").to_string())
}

pub(crate) fn rfc3339_utc(text: Option<&str>) -> String {
    text.and_then(|t| DateTime::parse_from_rfc3339(t).ok())
        .map_or_else(
            || "Unknown time".to_string(),
            |t| t.with_timezone(&Utc).format("%Y-%m-%d %H:%M UTC").to_string(),
        )
}

/// Unix seconds rendered in the location's own zone.
pub(crate) fn local(secs: i64, offset_secs: i64, pattern: &str) -> String {
    let zone = i32::try_from(offset_secs)
        .ok()
        .and_then(FixedOffset::east_opt)
        .unwrap_or(Utc.fix());
    DateTime::from_timestamp(secs, 0)
        .map_or_else(|| "--".to_string(), |t| t.with_timezone(&zone).format(pattern).to_string())
}

/// Truncates to `max` characters with a trailing ellipsis.
pub(crate) fn clip(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_string()
    }
}
