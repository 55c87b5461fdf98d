use crate::cell::{Cell, CellKind};
use crate::error::ConversionError;
use crate::value::Value;

/// Read-only fallback for values no other column type handles
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectColumn;

impl ObjectColumn {
    pub fn display(&self, value: &Value) -> Result<Cell, ConversionError> {
        let display = match value {
            Value::Text(s) => s.clone(),
            other => serde_json::to_string(other)
                .map_err(|e| ConversionError::new(other.to_string(), e.to_string()))?,
        };
        Ok(Cell::new(CellKind::Object, value.clone(), display).with_read_only(true))
    }

    pub fn extract(&self, data: &Value) -> Value {
        data.clone()
    }
}
