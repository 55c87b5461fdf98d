use crate::cell::{Cell, CellKind};
use crate::column::ColumnDefinition;
use crate::columns::text::check_pattern;
use crate::error::ConversionError;
use crate::validation::ValidationResult;
use crate::value::Value;

/// URL column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkColumn;

impl LinkColumn {
    pub fn display(&self, value: &Value, column: &ColumnDefinition) -> Result<Cell, ConversionError> {
        let url = value.to_string();
        let display = column
            .params
            .display_text
            .clone()
            .unwrap_or_else(|| url.clone());
        let mut cell = Cell::new(CellKind::Uri, Value::Text(url.clone()), display);
        cell.tooltip = Some(url);
        Ok(cell)
    }

    /// Inverse of `display`: the URL is kept exactly as stored
    pub fn extract(&self, data: &Value) -> Value {
        match data {
            Value::Text(s) => Value::Text(s.clone()),
            other => Value::Text(other.to_string()),
        }
    }

    pub fn validate(&self, value: &Value, column: &ColumnDefinition) -> ValidationResult {
        check_pattern(&value.to_string(), column)
    }
}
