//! Date, time and datetime columns.
//!
//! All three share one code path through the private [`Temporal`] trait;
//! the public structs only pick the chrono type.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use gridedit_config::Theme;

use crate::cell::{Cell, CellKind};
use crate::column::ColumnDefinition;
use crate::error::ConversionError;
use crate::format::strftime;
use crate::validation::{check_bounds, ValidationResult};
use crate::value::Value;

trait Temporal: Sized + Copy + PartialOrd {
    const NAME: &'static str;

    fn coerce(value: &Value) -> Option<Self>;
    fn into_value(self) -> Value;
    fn render(&self, pattern: &str) -> Option<String>;
    fn theme_format(theme: &Theme) -> &str;
}

impl Temporal for NaiveDate {
    const NAME: &'static str = "date";

    fn coerce(value: &Value) -> Option<Self> {
        match value {
            Value::Date(d) => Some(*d),
            Value::DateTime(dt) => Some(dt.date()),
            Value::Number(ms) => from_epoch_millis(*ms).map(|dt| dt.date()),
            Value::Text(s) => {
                let s = s.trim();
                s.parse::<NaiveDate>()
                    .ok()
                    .or_else(|| parse_datetime(s).map(|dt| dt.date()))
            }
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Date(self)
    }

    fn render(&self, pattern: &str) -> Option<String> {
        strftime(self.format(pattern))
    }

    fn theme_format(theme: &Theme) -> &str {
        &theme.date_format
    }
}

impl Temporal for NaiveTime {
    const NAME: &'static str = "time";

    fn coerce(value: &Value) -> Option<Self> {
        match value {
            Value::Time(t) => Some(*t),
            Value::DateTime(dt) => Some(dt.time()),
            Value::Text(s) => {
                let s = s.trim();
                s.parse::<NaiveTime>()
                    .ok()
                    .or_else(|| NaiveTime::parse_from_str(s, "%H:%M").ok())
            }
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::Time(self)
    }

    fn render(&self, pattern: &str) -> Option<String> {
        strftime(self.format(pattern))
    }

    fn theme_format(theme: &Theme) -> &str {
        &theme.time_format
    }
}

impl Temporal for NaiveDateTime {
    const NAME: &'static str = "datetime";

    fn coerce(value: &Value) -> Option<Self> {
        match value {
            Value::DateTime(dt) => Some(*dt),
            Value::Date(d) => d.and_hms_opt(0, 0, 0),
            Value::Number(ms) => from_epoch_millis(*ms),
            Value::Text(s) => parse_datetime(s.trim()),
            _ => None,
        }
    }

    fn into_value(self) -> Value {
        Value::DateTime(self)
    }

    fn render(&self, pattern: &str) -> Option<String> {
        strftime(self.format(pattern))
    }

    fn theme_format(theme: &Theme) -> &str {
        &theme.datetime_format
    }
}

fn from_epoch_millis(ms: f64) -> Option<NaiveDateTime> {
    if !ms.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(ms as i64).map(|dt| dt.naive_utc())
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = s.parse::<NaiveDateTime>() {
        return Some(dt);
    }
    for pattern in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, pattern) {
            return Some(dt);
        }
    }
    s.parse::<NaiveDate>().ok().and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn display<T: Temporal>(
    value: &Value,
    column: &ColumnDefinition,
    theme: &Theme,
) -> Result<Cell, ConversionError> {
    let parsed = T::coerce(value).ok_or_else(|| {
        ConversionError::new(value.to_string(), format!("not a valid {}", T::NAME))
    })?;
    let pattern = column.format().unwrap_or_else(|| T::theme_format(theme));
    let display = parsed.render(pattern).ok_or_else(|| {
        ConversionError::new(value.to_string(), format!("invalid {} format '{}'", T::NAME, pattern))
    })?;
    Ok(Cell::new(CellKind::Temporal, parsed.into_value(), display))
}

fn extract<T: Temporal>(data: &Value) -> Value {
    match T::coerce(data) {
        Some(parsed) => parsed.into_value(),
        None => data.clone(),
    }
}

fn validate<T: Temporal>(value: &Value, column: &ColumnDefinition) -> ValidationResult {
    let Some(parsed) = T::coerce(value) else {
        return ValidationResult::invalid(format!("'{}' is not a valid {}.", value, T::NAME));
    };
    let min = column.params.min.as_ref().and_then(T::coerce);
    let max = column.params.max.as_ref().and_then(T::coerce);
    check_bounds(&parsed, min.as_ref(), max.as_ref(), |v| v.into_value().to_string())
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateColumn;

impl DateColumn {
    pub fn display(&self, value: &Value, column: &ColumnDefinition, theme: &Theme) -> Result<Cell, ConversionError> {
        display::<NaiveDate>(value, column, theme)
    }

    pub fn extract(&self, data: &Value) -> Value {
        extract::<NaiveDate>(data)
    }

    pub fn validate(&self, value: &Value, column: &ColumnDefinition) -> ValidationResult {
        validate::<NaiveDate>(value, column)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeColumn;

impl TimeColumn {
    pub fn display(&self, value: &Value, column: &ColumnDefinition, theme: &Theme) -> Result<Cell, ConversionError> {
        display::<NaiveTime>(value, column, theme)
    }

    pub fn extract(&self, data: &Value) -> Value {
        extract::<NaiveTime>(data)
    }

    pub fn validate(&self, value: &Value, column: &ColumnDefinition) -> ValidationResult {
        validate::<NaiveTime>(value, column)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateTimeColumn;

impl DateTimeColumn {
    pub fn display(&self, value: &Value, column: &ColumnDefinition, theme: &Theme) -> Result<Cell, ConversionError> {
        display::<NaiveDateTime>(value, column, theme)
    }

    pub fn extract(&self, data: &Value) -> Value {
        extract::<NaiveDateTime>(data)
    }

    pub fn validate(&self, value: &Value, column: &ColumnDefinition) -> ValidationResult {
        validate::<NaiveDateTime>(value, column)
    }
}
