//! Reusable field validators
//!
//! Each validator receives the dotted field path and the (already coerced)
//! value, and returns a client-facing message on failure. Validators that do
//! not apply to the value's type let it through; type checks are their own
//! validators.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use validator::ValidateEmail;

static RECORD_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]{24}$").expect("record id pattern"));

/// Validator: field is required (present and not null)
pub fn required() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| {
        if value.is_null() {
            Err(format!("\"{}\" is required", field))
        } else {
            Ok(())
        }
    }
}

/// Validator: value is a string, optionally non-empty
pub fn string(allow_empty: bool) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| match value.as_str() {
        None => Err(format!("\"{}\" must be a string", field)),
        Some("") if !allow_empty => Err(format!("\"{}\" is not allowed to be empty", field)),
        Some(_) => Ok(()),
    }
}

/// Validator: non-empty strings must be email addresses
///
/// Empty strings pass; absent values never reach validators.
pub fn email() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value.as_str() {
        Some("") => Ok(()),
        Some(s) if s.validate_email() => Ok(()),
        Some(_) => Err(format!("\"{}\" must be a valid email", field)),
        None => Ok(()),
    }
}

/// Validator: value is a JSON number
pub fn number() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| {
        if value.is_number() {
            Ok(())
        } else {
            Err(format!("\"{}\" must be a number", field))
        }
    }
}

/// Validator: number without fractional part
pub fn integer() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| {
        if value.is_i64() || value.is_u64() {
            return Ok(());
        }
        match value.as_f64() {
            Some(_) => Err(format!("\"{}\" must be an integer", field)),
            None => Ok(()),
        }
    }
}

/// Validator: number must be at least `min`
pub fn min_value(min: f64) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |field: &str, value: &Value| match value.as_f64() {
        Some(num) if num < min => Err(format!(
            "\"{}\" must be greater than or equal to {}",
            field, min
        )),
        _ => Ok(()),
    }
}

/// Validator: string is a well-formed record id
pub fn record_id() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value.as_str() {
        Some(s) if RECORD_ID_RE.is_match(s) => Ok(()),
        _ => Err(format!("\"{}\" must be a valid id", field)),
    }
}

/// Validator: date was normalized to an RFC 3339 string
pub fn rfc3339_date() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| match value.as_str() {
        Some(s) if chrono::DateTime::parse_from_rfc3339(s).is_ok() => Ok(()),
        _ => Err(format!("\"{}\" must be a valid date", field)),
    }
}

/// Validator: value is a JSON object
pub fn object() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| {
        if value.is_object() {
            Ok(())
        } else {
            Err(format!("\"{}\" must be of type object", field))
        }
    }
}

/// Validator: value is a JSON array
pub fn array() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |field: &str, value: &Value| {
        if value.is_array() {
            Ok(())
        } else {
            Err(format!("\"{}\" must be an array", field))
        }
    }
}
