use serde::{Deserialize, Serialize};

use crate::value::Value;

/// How the renderer should paint a cell
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CellKind {
    #[default]
    Text,
    Number,
    Boolean,
    /// List of tags
    Bubble,
    /// Date, time or datetime
    Temporal,
    Uri,
    /// Read-only rendering of a value no column type understands
    Object,
    Error,
}

/// A fully-formed cell as handed to the renderer.
///
/// Cells are plain values: every read returns an owned copy, so a caller
/// mutating one cannot reach overlay or cache state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Cell {
    pub kind: CellKind,
    pub data: Value,
    pub display_data: String,
    pub is_missing_value: bool,
    pub validation_error: Option<String>,
    pub tooltip: Option<String>,
    /// Overlay write counter at the time the edit was recorded
    pub last_updated: Option<u64>,
    pub read_only: bool,
    /// Placeholder shown while the snapshot value is being fetched
    pub is_loading: bool,
}

impl Cell {
    pub fn new(kind: CellKind, data: Value, display_data: impl Into<String>) -> Self {
        let is_missing_value = data.is_missing();
        Self {
            kind,
            data,
            display_data: display_data.into(),
            is_missing_value,
            ..Self::default()
        }
    }

    /// Build a proposed cell from a bare value, the way a renderer hands an
    /// edit to `DataGrid::set_cell`
    pub fn from_value(value: impl Into<Value>) -> Self {
        let value = value.into();
        let kind = match &value {
            Value::Number(_) => CellKind::Number,
            Value::Bool(_) => CellKind::Boolean,
            Value::List(_) => CellKind::Bubble,
            Value::Date(_) | Value::Time(_) | Value::DateTime(_) => CellKind::Temporal,
            Value::Null | Value::Text(_) => CellKind::Text,
        };
        let display = value.to_string();
        Self::new(kind, value, display)
    }

    /// Error cell with a short message and an optional longer tooltip
    pub fn error(message: impl Into<String>, detail: Option<String>) -> Self {
        let message = message.into();
        Self {
            kind: CellKind::Error,
            data: Value::Text(message.clone()),
            display_data: message,
            tooltip: detail,
            read_only: true,
            ..Self::default()
        }
    }

    /// Read-only stand-in for a column whose data type has no handler
    pub fn placeholder(value: &Value, reason: impl Into<String>) -> Self {
        Self {
            kind: CellKind::Text,
            data: value.clone(),
            display_data: value.to_string(),
            is_missing_value: value.is_missing(),
            tooltip: Some(reason.into()),
            read_only: true,
            ..Self::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == CellKind::Error
    }

    pub fn has_validation_error(&self) -> bool {
        self.validation_error.is_some()
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }
}
