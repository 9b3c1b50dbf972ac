// Typed readers over the string values of an InstanceSnapshot.
// Missing key, bad number and bad timestamp all come back as Err; callers collapse them to "no data".

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::StatError;
use crate::models::{InstanceSnapshot, STARTED_AT_KEY};

/// Civil-time part of `startedAt`; the zone token after it is ignored.
const STARTED_AT_FORMAT: &str = "%Y:%m:%d:%H:%M:%S";

fn field<'a>(snapshot: &'a InstanceSnapshot, key: &'static str) -> Result<&'a str, StatError> {
    snapshot
        .get(key)
        .map(str::trim)
        .ok_or(StatError::MissingField { key })
}

/// Non-negative integer counter (transactions, sessions).
/// Surrounding whitespace is accepted here; the legacy monitor rejected `" 7 "`.
pub fn count(snapshot: &InstanceSnapshot, key: &'static str) -> Result<u64, StatError> {
    let raw = field(snapshot, key)?;
    raw.parse::<u64>().map_err(|_| StatError::MalformedNumber {
        key,
        value: raw.to_string(),
    })
}

/// Finite floating-point time value (units passed through untouched).
pub fn time(snapshot: &InstanceSnapshot, key: &'static str) -> Result<f64, StatError> {
    let raw = field(snapshot, key)?;
    let value = raw
        .parse::<f64>()
        .map_err(|_| StatError::MalformedNumber {
            key,
            value: raw.to_string(),
        })?;
    if !value.is_finite() {
        return Err(StatError::NonFiniteNumber {
            key,
            value: raw.to_string(),
        });
    }
    Ok(value)
}

/// `startedAt` as UTC, whatever the zone token says.
pub fn started_at(snapshot: &InstanceSnapshot) -> Result<DateTime<Utc>, StatError> {
    let raw = field(snapshot, STARTED_AT_KEY)?;
    parse_started_at(raw)
}

/// Parses `YYYY:MM:DD:HH:MM:SS <zone>` as UTC civil time.
pub fn parse_started_at(raw: &str) -> Result<DateTime<Utc>, StatError> {
    let raw = raw.trim();
    let civil = raw
        .split_once(char::is_whitespace)
        .map_or(raw, |(civil, _zone)| civil);
    NaiveDateTime::parse_from_str(civil, STARTED_AT_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|source| StatError::MalformedTimestamp {
            value: raw.to_string(),
            source,
        })
}
