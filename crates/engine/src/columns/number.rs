use crate::cell::{Cell, CellKind};
use crate::column::ColumnDefinition;
use crate::error::ConversionError;
use crate::format::NumberFormat;
use crate::validation::{check_bounds, parse_numeric_input, ValidationResult};
use crate::value::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberColumn {
    /// Used when the column has neither a format override nor a step
    pub fallback_format: NumberFormat,
}

impl NumberColumn {
    fn number_format(&self, column: &ColumnDefinition) -> NumberFormat {
        if let Some(spec) = column.format() {
            match NumberFormat::parse(spec) {
                Some(format) => return format,
                None => log::warn!("Unknown number format '{}' on column '{}'", spec, column.id),
            }
        }
        match column.params.step {
            Some(step) => NumberFormat::from_step(step),
            None => self.fallback_format.clone(),
        }
    }

    pub fn display(&self, value: &Value, column: &ColumnDefinition) -> Result<Cell, ConversionError> {
        let n = to_number(value).ok_or_else(|| {
            ConversionError::new(value.to_string(), format!("{} is not a number", value.type_name()))
        })?;
        let display = self.number_format(column).format(n);
        Ok(Cell::new(CellKind::Number, Value::Number(n), display))
    }

    /// Numbers pass through; text is parsed. Unparseable text is kept as
    /// text so validation can report it.
    pub fn extract(&self, data: &Value) -> Value {
        match to_number(data) {
            Some(n) => Value::Number(n),
            None => data.clone(),
        }
    }

    pub fn validate(&self, value: &Value, column: &ColumnDefinition) -> ValidationResult {
        let Value::Number(n) = value else {
            return ValidationResult::invalid(format!("'{}' is not a valid number.", value));
        };
        if !n.is_finite() {
            return ValidationResult::invalid("The value must be a finite number.");
        }
        let whole_only = column.params.step.map(|s| s.fract() == 0.0).unwrap_or(false);
        if whole_only && n.fract() != 0.0 {
            return ValidationResult::invalid("Whole number required (no decimals).");
        }
        let min = column.params.min.as_ref().and_then(Value::as_f64);
        let max = column.params.max.as_ref().and_then(Value::as_f64);
        check_bounds(n, min.as_ref(), max.as_ref(), |v| Value::format_general(*v))
    }
}

fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => Some(*n),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Text(s) => parse_numeric_input(s, true).ok(),
        _ => None,
    }
}
