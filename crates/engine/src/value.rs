use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// A raw value as stored in the snapshot or produced by an edit.
///
/// Serialized untagged so edit summaries read as plain JSON: temporal
/// values become ISO strings, lists become string arrays.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    List(Vec<String>),
    // Order matters for untagged deserialization: most specific string
    // formats first, free text last.
    DateTime(NaiveDateTime),
    Date(NaiveDate),
    Time(NaiveTime),
    Text(String),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    /// Null, or a number that is NaN (the snapshot encoding of a missing float)
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Number(n) => n.is_nan(),
            _ => false,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Short name of the variant, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::List(_) => "list",
            Value::DateTime(_) => "datetime",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::Text(_) => "text",
        }
    }

    /// General number display: integers without a fraction, everything else
    /// in shortest round-trip form
    pub fn format_general(n: f64) -> String {
        if n.is_nan() {
            return String::new();
        }
        if n.fract() == 0.0 && n.abs() < 1e15 {
            format!("{}", n as i64)
        } else {
            format!("{}", n)
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", Value::format_general(*n)),
            Value::List(items) => write!(f, "{}", items.join(", ")),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Time(t) => write!(f, "{}", t.format("%H:%M:%S")),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing() {
        assert!(Value::Null.is_missing());
        assert!(Value::Number(f64::NAN).is_missing());
        assert!(!Value::Number(0.0).is_missing());
        assert!(!Value::text("").is_missing());
    }

    #[test]
    fn test_general_display() {
        assert_eq!(Value::from(42).to_string(), "42");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
        assert_eq!(Value::List(vec!["a".into(), "b".into()]).to_string(), "a, b");
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn test_untagged_json() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let json = serde_json::to_string(&Value::Date(date)).unwrap();
        assert_eq!(json, "\"2024-03-01\"");
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Value::Date(date));

        let text: Value = serde_json::from_str("\"hello\"").unwrap();
        assert_eq!(text, Value::text("hello"));
        let null: Value = serde_json::from_str("null").unwrap();
        assert_eq!(null, Value::Null);
        let list: Value = serde_json::from_str("[\"x\"]").unwrap();
        assert_eq!(list, Value::List(vec!["x".into()]));
    }
}
