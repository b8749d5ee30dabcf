//! Query modules: free functions over a borrowed connection, one per table.

pub mod events;
pub mod heatmap;
pub mod places;
pub mod states;
pub mod stats;
pub mod sync_runs;

pub use stats::StoreCounts;

use chrono::{DateTime, SecondsFormat, Utc};
use urbanflux_core::errors::StorageError;

/// Timestamps are stored as RFC 3339 text in UTC.
pub(crate) fn encode_time(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub(crate) fn decode_time(table: &str, raw: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StorageError::CorruptRow {
            table: table.to_string(),
            message: format!("bad timestamp {raw:?}: {e}"),
        })
}

pub(crate) fn decode_enum<T>(table: &str, raw: &str) -> Result<T, StorageError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|e| StorageError::CorruptRow {
        table: table.to_string(),
        message: e.to_string(),
    })
}
