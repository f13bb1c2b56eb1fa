//! Built-in converters shipped with the default registry
//!
//! Copyright (c) 2025 Dictcast Team
//! Licensed under the Apache-2.0 license

use crate::{Error, Result, Value};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%d %B %Y %H:%M:%S",
    "%B %d %Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%B %d %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%d%b%Y",
    "%d%B%Y",
];

/// Coerce to a boolean.
///
/// `true`, `1` and the strings "true", "yes", "ok" are true; `false`, `0` and
/// "false", "no" are false (strings compared case-insensitively after
/// trimming). Anything else is a conversion error.
pub fn bool_converter(value: Value) -> Result<Value> {
    match &value {
        Value::Bool(_) => Ok(value),
        Value::Int(1) => Ok(Value::Bool(true)),
        Value::Int(0) => Ok(Value::Bool(false)),
        Value::Float(n) if *n == 1.0 => Ok(Value::Bool(true)),
        Value::Float(n) if *n == 0.0 => Ok(Value::Bool(false)),
        Value::Str(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "ok" => Ok(Value::Bool(true)),
            "false" | "no" => Ok(Value::Bool(false)),
            _ => Err(Error::conversion("bool", &value, "unrecognised boolean literal")),
        },
        _ => Err(Error::conversion("bool", &value, "unrecognised boolean value")),
    }
}

/// Coerce to a timestamp.
///
/// Timestamps pass through. Numbers, and strings that parse as numbers, are
/// seconds since the Unix epoch (UTC). Other strings go through free-form
/// date/time parsing.
pub fn datetime_converter(value: Value) -> Result<Value> {
    let epoch = match &value {
        Value::DateTime(_) => return Ok(value),
        Value::Int(n) => Some(*n as f64),
        Value::Float(n) => Some(*n),
        Value::Str(s) => s.trim().parse::<f64>().ok(),
        _ => return Err(Error::conversion("datetime", &value, "expected a number or a string")),
    };

    if let Some(seconds) = epoch {
        return from_epoch(seconds)
            .map(Value::DateTime)
            .ok_or_else(|| Error::conversion("datetime", &value, "epoch offset out of range"));
    }

    value
        .as_str()
        .and_then(parse_datetime)
        .map(Value::DateTime)
        .ok_or_else(|| Error::conversion("datetime", &value, "unrecognised date/time format"))
}

/// Seconds since the Unix epoch to a naive UTC timestamp
pub fn from_epoch(seconds: f64) -> Option<NaiveDateTime> {
    if !seconds.is_finite() {
        return None;
    }
    let whole = seconds.floor();
    let nanos = (((seconds - whole) * 1e9).round() as u32).min(999_999_999);
    DateTime::from_timestamp(whole as i64, nanos).map(|dt| dt.naive_utc())
}

/// Free-form date/time parsing over a fixed list of common layouts
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.naive_utc());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> Value {
        Value::DateTime(
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(h, min, 0)
                .unwrap(),
        )
    }

    #[test]
    fn test_bool_literals() {
        assert_eq!(bool_converter(Value::from("yes")).unwrap(), Value::Bool(true));
        assert_eq!(bool_converter(Value::from(" OK ")).unwrap(), Value::Bool(true));
        assert_eq!(bool_converter(Value::from("True")).unwrap(), Value::Bool(true));
        assert_eq!(bool_converter(Value::from("false")).unwrap(), Value::Bool(false));
        assert_eq!(bool_converter(Value::from("No")).unwrap(), Value::Bool(false));
        assert_eq!(bool_converter(Value::Int(0)).unwrap(), Value::Bool(false));
        assert_eq!(bool_converter(Value::Int(1)).unwrap(), Value::Bool(true));
        assert_eq!(bool_converter(Value::Bool(false)).unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_bool_rejects_other_values() {
        assert!(matches!(bool_converter(Value::from("lol")), Err(Error::Conversion { .. })));
        assert!(matches!(bool_converter(Value::Int(2)), Err(Error::Conversion { .. })));
        assert!(matches!(bool_converter(Value::from("1")), Err(Error::Conversion { .. })));
        assert!(bool_converter(Value::Null).is_err());
    }

    #[test]
    fn test_datetime_from_epoch() {
        assert_eq!(
            datetime_converter(Value::Int(1640988000)).unwrap(),
            at(2021, 12, 31, 22, 0)
        );
        assert_eq!(
            datetime_converter(Value::from("1640988000")).unwrap(),
            at(2021, 12, 31, 22, 0)
        );
    }

    #[test]
    fn test_datetime_free_form() {
        assert_eq!(datetime_converter(Value::from("2020-01-01")).unwrap(), at(2020, 1, 1, 0, 0));
        assert_eq!(datetime_converter(Value::from("2022/06/12")).unwrap(), at(2022, 6, 12, 0, 0));
        assert_eq!(datetime_converter(Value::from("July 03 2021")).unwrap(), at(2021, 7, 3, 0, 0));
        assert_eq!(datetime_converter(Value::from("1Dec2022")).unwrap(), at(2022, 12, 1, 0, 0));
        assert_eq!(
            datetime_converter(Value::from("2021-05-03T10:15:00Z")).unwrap(),
            at(2021, 5, 3, 10, 15)
        );
        assert_eq!(
            datetime_converter(Value::from("2021-05-03 10:15")).unwrap(),
            at(2021, 5, 3, 10, 15)
        );
    }

    #[test]
    fn test_datetime_passthrough_and_failure() {
        let now = at(2020, 5, 3, 1, 2);
        assert_eq!(datetime_converter(now.clone()).unwrap(), now);
        assert!(matches!(
            datetime_converter(Value::from("not a date")),
            Err(Error::Conversion { .. })
        ));
        assert!(datetime_converter(Value::List(vec![])).is_err());
    }
}
