use crate::cell::{Cell, CellKind};
use crate::error::ConversionError;
use crate::validation::ValidationResult;
use crate::value::Value;

/// List of short strings, rendered as bubbles
#[derive(Debug, Clone, PartialEq)]
pub struct ListColumn {
    /// Separator used when text is typed into a list cell
    pub separator: char,
}

impl Default for ListColumn {
    fn default() -> Self {
        Self { separator: ',' }
    }
}

impl ListColumn {
    pub fn display(&self, value: &Value) -> Result<Cell, ConversionError> {
        let items = self.to_items(value);
        let display = items.join(", ");
        Ok(Cell::new(CellKind::Bubble, Value::List(items), display))
    }

    pub fn extract(&self, data: &Value) -> Value {
        Value::List(self.to_items(data))
    }

    pub fn validate(&self, value: &Value) -> ValidationResult {
        match value {
            Value::List(_) => ValidationResult::Valid,
            other => ValidationResult::invalid(format!("Expected a list, got {}.", other.type_name())),
        }
    }

    fn to_items(&self, value: &Value) -> Vec<String> {
        match value {
            Value::List(items) => items.clone(),
            Value::Text(s) => s
                .split(self.separator)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            other => vec![other.to_string()],
        }
    }
}
