//! Type casting from JSON values onto typed attributes
//!
//! Scalars that cannot be parsed become `None`. Trees and arrays are a
//! type mismatch.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

use crate::params::json_type_name;

use super::errors::{ModelError, ModelResult};

fn mismatch(attribute: &str, expected: &'static str, value: &Value) -> ModelError {
    ModelError::TypeMismatch {
        attribute: attribute.to_string(),
        expected,
        actual: json_type_name(value),
    }
}

/// Cast to a string attribute
pub fn string(attribute: &str, value: &Value) -> ModelResult<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Array(_) | Value::Object(_) => Err(mismatch(attribute, "string", value)),
    }
}

/// Cast to an integer attribute
pub fn integer(attribute: &str, value: &Value) -> ModelResult<Option<i64>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64))),
        Value::String(s) => {
            let s = s.trim();
            Ok(s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)))
        }
        Value::Bool(b) => Ok(Some(i64::from(*b))),
        Value::Array(_) | Value::Object(_) => Err(mismatch(attribute, "integer", value)),
    }
}

/// Cast to a UTC datetime attribute (RFC 3339 or `YYYY-MM-DD HH:MM:SS`)
pub fn datetime(attribute: &str, value: &Value) -> ModelResult<Option<DateTime<Utc>>> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            let parsed = DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                        .ok()
                        .map(|naive| naive.and_utc())
                });
            Ok(parsed)
        }
        Value::Null | Value::Number(_) | Value::Bool(_) => Ok(None),
        Value::Array(_) | Value::Object(_) => Err(mismatch(attribute, "datetime", value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    #[test]
    fn test_string_cast() {
        assert_eq!(string("title", &json!("Test")).unwrap(), Some("Test".into()));
        assert_eq!(string("title", &json!(5)).unwrap(), Some("5".into()));
        assert_eq!(string("title", &json!(null)).unwrap(), None);
        assert!(string("title", &json!({"a": 1})).is_err());
    }

    #[test]
    fn test_integer_cast() {
        assert_eq!(integer("rank", &json!(3)).unwrap(), Some(3));
        assert_eq!(integer("rank", &json!("42")).unwrap(), Some(42));
        assert_eq!(integer("rank", &json!(" 7 ")).unwrap(), Some(7));
        assert_eq!(integer("rank", &json!("2.9")).unwrap(), Some(2));
        assert_eq!(integer("rank", &json!(4.5)).unwrap(), Some(4));
        assert_eq!(integer("rank", &json!("abc")).unwrap(), None);
        assert_eq!(integer("rank", &json!(true)).unwrap(), Some(1));
        assert!(matches!(
            integer("rank", &json!([1])),
            Err(ModelError::TypeMismatch { expected: "integer", actual: "array", .. })
        ));
    }

    #[test]
    fn test_datetime_cast() {
        let dt = datetime("created_at", &json!("2015-01-04T10:30:00Z"))
            .unwrap()
            .unwrap();
        assert_eq!(dt.year(), 2015);
        assert_eq!(dt.hour(), 10);

        let dt = datetime("created_at", &json!("2015-01-04 08:00:00"))
            .unwrap()
            .unwrap();
        assert_eq!(dt.hour(), 8);

        assert_eq!(datetime("created_at", &json!("yesterday")).unwrap(), None);
        assert!(datetime("created_at", &json!({})).is_err());
    }
}
