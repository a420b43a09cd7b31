//! Loose accessors for provider JSON whose field types are not guaranteed.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::FeedError;

/// Numeric view of a JSON value: numbers, and strings that parse as numbers.
///
/// `null`, booleans, empty strings, and containers are not numbers.
pub(crate) fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        _ => None,
    }
}

/// The first of `keys` present on `object` with a non-null value.
pub(crate) fn first_present<'a>(object: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !value.is_null())
}

/// [`first_present`] followed by [`number`]: an alias holding garbage does
/// not fall through to the next alias.
pub(crate) fn number_at(object: &Value, keys: &[&str]) -> Option<f64> {
    first_present(object, keys).and_then(number)
}

/// Deserializes a provider payload, reporting a mismatch as a shape error.
pub(crate) fn decode<T: DeserializeOwned>(value: Value, context: &str) -> Result<T, FeedError> {
    serde_json::from_value(value).map_err(|e| FeedError::shape(format!("{context}: {e}")))
}

/// Joins the non-empty parts with `", "`, falling back to `fallback`.
pub(crate) fn join_name(parts: &[Option<&str>], fallback: &str) -> String {
    let joined = parts
        .iter()
        .flatten()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() {
        fallback.to_string()
    } else {
        joined
    }
}
