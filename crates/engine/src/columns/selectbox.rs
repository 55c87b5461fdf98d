use crate::cell::{Cell, CellKind};
use crate::column::ColumnDefinition;
use crate::error::ConversionError;
use crate::validation::ValidationResult;
use crate::value::Value;

/// One value out of a fixed list of options
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectboxColumn;

impl SelectboxColumn {
    pub fn display(&self, value: &Value) -> Result<Cell, ConversionError> {
        let text = value.to_string();
        Ok(Cell::new(CellKind::Text, Value::Text(text.clone()), text))
    }

    pub fn extract(&self, data: &Value) -> Value {
        match data {
            Value::Text(s) => Value::Text(s.clone()),
            other => Value::Text(other.to_string()),
        }
    }

    /// Matching is case-sensitive. An empty option list accepts anything.
    pub fn validate(&self, value: &Value, column: &ColumnDefinition) -> ValidationResult {
        let options = &column.params.options;
        if options.is_empty() {
            return ValidationResult::Valid;
        }
        let text = value.to_string();
        if options.iter().any(|o| *o == text) {
            ValidationResult::Valid
        } else {
            ValidationResult::invalid(format!(
                "'{}' is not one of the allowed options: {}.",
                text,
                options.join(", ")
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::{ColumnParams, DataType};

    #[test]
    fn test_options() {
        let col = ColumnDefinition::new("status", DataType::Selectbox).with_params(ColumnParams {
            options: vec!["open".into(), "closed".into()],
            ..Default::default()
        });
        assert!(SelectboxColumn.validate(&Value::text("open"), &col).is_valid());
        assert!(SelectboxColumn.validate(&Value::text("Open"), &col).is_invalid());
    }

    #[test]
    fn test_no_options_accepts_anything() {
        let col = ColumnDefinition::new("status", DataType::Selectbox);
        assert!(SelectboxColumn.validate(&Value::text("whatever"), &col).is_valid());
    }
}
