//! Display-only timestamps of meta payloads.
//!
//! Backends disagree on the format (ISO 8601, SQL `YYYY-MM-DD HH:MM:SS`,
//! unix seconds or milliseconds). A value that fits none of them becomes
//! `None` instead of failing the whole listing. Output is always ISO 8601.

use log::debug;
use serde::{Deserialize, Deserializer, Serializer};
use time::format_description::well_known::Iso8601;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

/// Millisecond timestamps are at least this large (March 1973 in ms).
const MILLIS_THRESHOLD: i64 = 100_000_000_000;

pub fn serialize<S: Serializer>(
    value: &Option<OffsetDateTime>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    time::serde::iso8601::option::serialize(value, serializer)
}

pub fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<OffsetDateTime>, D::Error> {
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let parsed = match &raw {
        Some(serde_json::Value::String(text)) => parse(text),
        Some(serde_json::Value::Number(number)) => number.as_i64().and_then(from_unix),
        _ => None,
    };
    if parsed.is_none() && raw.as_ref().is_some_and(|v| !v.is_null()) {
        debug!("Ignoring unparseable timestamp {raw:?}");
    }
    Ok(parsed)
}

fn parse(text: &str) -> Option<OffsetDateTime> {
    let text = text.trim();
    if let Ok(parsed) = OffsetDateTime::parse(text, &Iso8601::DEFAULT) {
        return Some(parsed);
    }
    // Naive values are taken as UTC; fractional seconds are dropped
    let naive = text.replacen('T', " ", 1);
    let naive = naive.split('.').next().unwrap_or_default();
    PrimitiveDateTime::parse(
        naive,
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    )
    .ok()
    .map(PrimitiveDateTime::assume_utc)
}

fn from_unix(value: i64) -> Option<OffsetDateTime> {
    if value.abs() >= MILLIS_THRESHOLD {
        OffsetDateTime::from_unix_timestamp_nanos(i128::from(value) * 1_000_000).ok()
    } else {
        OffsetDateTime::from_unix_timestamp(value).ok()
    }
}
