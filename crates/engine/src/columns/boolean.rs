use gridedit_config::Theme;

use crate::cell::{Cell, CellKind};
use crate::error::ConversionError;
use crate::validation::ValidationResult;
use crate::value::Value;

/// Checkbox column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BooleanColumn;

impl BooleanColumn {
    pub fn display(&self, value: &Value, theme: &Theme) -> Result<Cell, ConversionError> {
        let b = to_bool(value).ok_or_else(|| {
            ConversionError::new(value.to_string(), format!("{} is not a boolean", value.type_name()))
        })?;
        let display = if b { &theme.true_text } else { &theme.false_text };
        Ok(Cell::new(CellKind::Boolean, Value::Bool(b), display.clone()))
    }

    pub fn extract(&self, data: &Value) -> Value {
        match to_bool(data) {
            Some(b) => Value::Bool(b),
            None => data.clone(),
        }
    }

    pub fn validate(&self, value: &Value) -> ValidationResult {
        match value {
            Value::Bool(_) => ValidationResult::Valid,
            other => ValidationResult::invalid(format!("'{}' is not a valid boolean.", other)),
        }
    }
}

fn to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) if !n.is_nan() => Some(*n != 0.0),
        Value::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "1" | "checked" | "on" => Some(true),
            "false" | "no" | "n" | "0" | "unchecked" | "off" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
