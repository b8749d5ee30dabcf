//! Raw source records and defensive field access.
//!
//! Portal rows arrive as flat JSON objects whose values are almost always
//! strings, including numbers and dates. Every accessor treats blank,
//! malformed, or wrongly-typed values as absent.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use urbanflux_core::dates;

/// One row as returned by the portal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: Map<String, Value>,
}

impl RawRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Build from a JSON value; non-objects become an empty record.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Trimmed, non-empty text. Numbers are rendered as text.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::String(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Borrowed form of [`RawRecord::text`] for string values only.
    pub fn str(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)?
            .as_str()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Parse a date field; unparsable values are `None`.
    pub fn date(&self, key: &str) -> Option<DateTime<Utc>> {
        dates::parse_date_value(self.fields.get(key))
    }

    /// First parsable date among `keys`, in order.
    pub fn first_date(&self, keys: &[&str]) -> Option<DateTime<Utc>> {
        keys.iter().find_map(|key| self.date(key))
    }

    /// Parse a coordinate. Non-numeric, non-finite, or out-of-range values
    /// are `None`, never zero.
    pub fn coordinate(&self, key: &str, bound: f64) -> Option<f64> {
        let value = match self.fields.get(key)? {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        (value.is_finite() && value.abs() <= bound).then_some(value)
    }

    pub fn latitude(&self, key: &str) -> Option<f64> {
        self.coordinate(key, 90.0)
    }

    pub fn longitude(&self, key: &str) -> Option<f64> {
        self.coordinate(key, 180.0)
    }

    /// The record as a JSON value for the event's raw payload.
    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

impl From<Value> for RawRecord {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> RawRecord {
        RawRecord::from_value(value)
    }

    #[test]
    fn text_trims_and_drops_blanks() {
        let r = record(json!({"a": "  x ", "b": "   ", "c": 12, "d": null}));
        assert_eq!(r.text("a").as_deref(), Some("x"));
        assert_eq!(r.text("b"), None);
        assert_eq!(r.text("c").as_deref(), Some("12"));
        assert_eq!(r.text("d"), None);
        assert_eq!(r.text("missing"), None);
    }

    #[test]
    fn coordinates_are_defensive() {
        let r = record(json!({
            "lat": "40.6782",
            "num": -73.94,
            "junk": "n/a",
            "nan": "NaN",
            "inf": "inf",
            "far": "123.0",
            "blank": ""
        }));
        assert_eq!(r.latitude("lat"), Some(40.6782));
        assert_eq!(r.longitude("num"), Some(-73.94));
        assert_eq!(r.latitude("junk"), None);
        assert_eq!(r.latitude("nan"), None);
        assert_eq!(r.latitude("inf"), None);
        assert_eq!(r.latitude("far"), None);
        assert_eq!(r.longitude("far"), Some(123.0));
        assert_eq!(r.latitude("blank"), None);
    }

    #[test]
    fn first_date_skips_unparsable() {
        let r = record(json!({"a": "soon", "b": "", "c": "2024-03-05"}));
        let date = r.first_date(&["a", "b", "c"]).unwrap();
        assert_eq!(date.format("%Y-%m-%d").to_string(), "2024-03-05");
        assert!(r.first_date(&["a", "b"]).is_none());
    }

    #[test]
    fn non_object_becomes_empty() {
        let r = record(json!([1, 2, 3]));
        assert_eq!(r.to_value(), json!({}));
    }
}
