//! Column metadata
//!
//! A `ColumnDefinition` is created once per session from the snapshot's
//! schema and never mutated in place: format changes go through
//! [`ColumnDefinition::with_format`], which returns a derived copy.

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Semantic data type of a column, the key for column type dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Text,
    Number,
    Boolean,
    Selectbox,
    List,
    Date,
    Time,
    DateTime,
    Link,
    Object,
}

impl DataType {
    pub const ALL: [DataType; 10] = [
        DataType::Text,
        DataType::Number,
        DataType::Boolean,
        DataType::Selectbox,
        DataType::List,
        DataType::Date,
        DataType::Time,
        DataType::DateTime,
        DataType::Link,
        DataType::Object,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DataType::Text => "text",
            DataType::Number => "number",
            DataType::Boolean => "boolean",
            DataType::Selectbox => "selectbox",
            DataType::List => "list",
            DataType::Date => "date",
            DataType::Time => "time",
            DataType::DateTime => "datetime",
            DataType::Link => "link",
            DataType::Object => "object",
        }
    }
}

/// How a column compares values when sorted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Lexical for text, numeric for numbers, chronological for dates
    #[default]
    Default,
    /// Byte-wise comparison of the displayed text
    Raw,
    /// Numbers numerically, text in case-insensitive natural order
    Smart,
}

/// Type-specific column parameters. Each column type reads the fields it
/// understands and ignores the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnParams {
    /// Lower bound (number, date, time or datetime)
    pub min: Option<Value>,
    /// Upper bound (number, date, time or datetime)
    pub max: Option<Value>,
    /// Number step. An integral step means whole numbers only.
    pub step: Option<f64>,
    pub max_chars: Option<usize>,
    /// Regex that text and link values must match in full
    pub pattern: Option<String>,
    /// Allowed selectbox values
    pub options: Vec<String>,
    /// Value used to populate added rows
    pub default: Option<Value>,
    /// Label shown instead of the URL in link columns
    pub display_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Stable key, unique within a session
    pub id: String,
    /// Header title; empty means "use the id"
    #[serde(default)]
    pub name: String,
    pub data_type: DataType,
    #[serde(default)]
    pub is_editable: bool,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub is_index: bool,
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default)]
    pub is_hidden: bool,
    /// Format override (number format spec or strftime pattern)
    #[serde(default)]
    pub formatting: Option<String>,
    #[serde(default)]
    pub sort_mode: SortMode,
    #[serde(default)]
    pub params: ColumnParams,
}

impl ColumnDefinition {
    /// Read-only column with default flags
    pub fn new(id: impl Into<String>, data_type: DataType) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            data_type,
            is_editable: false,
            is_required: false,
            is_index: false,
            is_pinned: false,
            is_hidden: false,
            formatting: None,
            sort_mode: SortMode::Default,
            params: ColumnParams::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn editable(mut self, editable: bool) -> Self {
        self.is_editable = editable;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.is_required = required;
        self
    }

    /// Index columns are pinned to the left by renderers
    pub fn index(mut self) -> Self {
        self.is_index = true;
        self.is_pinned = true;
        self
    }

    pub fn pinned(mut self, pinned: bool) -> Self {
        self.is_pinned = pinned;
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.is_hidden = hidden;
        self
    }

    pub fn with_sort_mode(mut self, mode: SortMode) -> Self {
        self.sort_mode = mode;
        self
    }

    pub fn with_params(mut self, params: ColumnParams) -> Self {
        self.params = params;
        self
    }

    /// Derived copy with a different format override. `None` or an empty
    /// string clears the override.
    pub fn with_format(&self, format: Option<&str>) -> Self {
        let mut derived = self.clone();
        derived.formatting = format
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string);
        derived
    }

    pub fn title(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    pub fn format(&self) -> Option<&str> {
        self.formatting.as_deref()
    }
}
