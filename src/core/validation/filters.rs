//! Reusable field filters
//!
//! Filters transform values and run before validation: coercing filters turn
//! query-string text into numbers and dates, normalizing filters trim and
//! lowercase.
//! Values a filter does not understand pass through untouched so the
//! validators can report them.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};
use serde_json::{Number, Value};

/// Filter: trim whitespace from string
pub fn trim() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| {
        if let Some(s) = value.as_str() {
            Ok(Value::String(s.trim().to_string()))
        } else {
            Ok(value)
        }
    }
}

/// Filter: convert string to lowercase
pub fn lowercase() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| {
        if let Some(s) = value.as_str() {
            Ok(Value::String(s.to_lowercase()))
        } else {
            Ok(value)
        }
    }
}

/// Filter: parse numeric strings into JSON numbers
///
/// Integral text becomes an integer number so that `integer()` can accept it.
pub fn to_number() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| {
        let Some(s) = value.as_str() else {
            return Ok(value);
        };
        let s = s.trim();
        if let Ok(i) = s.parse::<i64>() {
            return Ok(Value::Number(i.into()));
        }
        match s.parse::<f64>().ok().and_then(Number::from_f64) {
            Some(n) => Ok(Value::Number(n)),
            None => Ok(value),
        }
    }
}

/// Filter: normalize accepted date spellings to RFC 3339 UTC
///
/// Accepts RFC 3339 timestamps, `YYYY-MM-DD` (midnight UTC) and epoch
/// milliseconds given as a number or numeric string.
pub fn to_rfc3339_date() -> impl Fn(&str, Value) -> Result<Value> + Send + Sync + Clone {
    |_: &str, value: Value| {
        let parsed = match &value {
            Value::String(s) => parse_date_text(s.trim()),
            Value::Number(n) => n.as_i64().and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
            _ => None,
        };
        match parsed {
            Some(dt) => Ok(Value::String(
                dt.to_rfc3339_opts(SecondsFormat::Millis, true),
            )),
            None => Ok(value),
        }
    }
}

fn parse_date_text(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|naive| Utc.from_utc_datetime(&naive));
    }
    s.parse::<i64>()
        .ok()
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
}
