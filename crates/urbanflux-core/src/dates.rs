//! Shared date parsing and source-specific date literals.
//!
//! Parsing never fails loudly: anything unparsable or out of range is `None`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

const NAIVE_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
];

/// Older DOB extracts publish `MM/DD/YYYY`.
const NAIVE_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// Parse an ISO-8601 timestamp/date, a bare `YYYYMMDD`, or a bare
/// `YYYYMMDDHHMMSS` into UTC. Zone-less values are taken as UTC.
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if value.bytes().all(|b| b.is_ascii_digit()) {
        return match value.len() {
            8 => NaiveDate::parse_from_str(value, "%Y%m%d")
                .ok()
                .map(midnight_utc),
            14 => NaiveDateTime::parse_from_str(value, "%Y%m%d%H%M%S")
                .ok()
                .map(|dt| dt.and_utc()),
            _ => None,
        };
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.and_utc());
        }
    }
    NAIVE_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .map(midnight_utc)
}

/// Parse a JSON field that may hold a date string.
pub fn parse_date_value(value: Option<&serde_json::Value>) -> Option<DateTime<Utc>> {
    match value? {
        serde_json::Value::String(s) => parse_date(s),
        serde_json::Value::Number(n) => parse_date(&n.to_string()),
        _ => None,
    }
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Native date-literal format a source uses in its `$where` filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateLiteral {
    /// `2024-01-15`
    IsoDate,
    /// `20240115`
    Compact,
    /// `20240115093000`
    CompactTimestamp,
}

impl DateLiteral {
    pub fn format(self, date: DateTime<Utc>) -> String {
        match self {
            Self::IsoDate => date.format("%Y-%m-%d").to_string(),
            Self::Compact => date.format("%Y%m%d").to_string(),
            Self::CompactTimestamp => date.format("%Y%m%d%H%M%S").to_string(),
        }
    }
}
