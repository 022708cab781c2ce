//! Ordinal values for number-family fields.
//!
//! Date fields are filtered and sorted numerically. A value is read as a
//! calendar date first (`YYYY`, `YYYY-MM`, `YYYY-MM-DD` or RFC 3339) and
//! becomes epoch milliseconds; otherwise it must parse as a plain number.

use chrono::{DateTime, NaiveDate};
use serde_json::Value;

#[allow(clippy::cast_precision_loss)]
fn epoch_millis(date: NaiveDate) -> Option<f64> {
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis() as f64)
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[allow(clippy::cast_precision_loss)]
fn parse_date(value: &str) -> Option<f64> {
    let parts: Vec<&str> = value.split('-').collect();
    let date = match parts.as_slice() {
        [year] if year.len() == 4 && is_digits(year) => {
            NaiveDate::from_ymd_opt(year.parse().ok()?, 1, 1)
        }
        [year, month] if year.len() == 4 && is_digits(year) && is_digits(month) => {
            NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
        }
        _ => NaiveDate::parse_from_str(value, "%Y-%m-%d").ok(),
    };
    if let Some(date) = date {
        return epoch_millis(date);
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.timestamp_millis() as f64)
}

/// Numeric ordinal of a request value, or `None` if it is neither a date nor
/// a number.
pub(crate) fn ordinal(value: &str) -> Option<f64> {
    let value = value.trim();
    parse_date(value).or_else(|| value.parse::<f64>().ok().filter(|n| n.is_finite()))
}

/// Numeric ordinal of a stored JSON value.
pub(crate) fn ordinal_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => ordinal(s),
        _ => None,
    }
}
