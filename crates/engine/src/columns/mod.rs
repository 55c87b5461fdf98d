//! Column type dispatch
//!
//! Every data type maps to one [`ColumnHandler`] variant. A handler knows how
//! to turn a raw value into a display cell, pull a raw value back out of an
//! edited cell, produce the default for new rows, and validate a candidate
//! value. Handlers are looked up through a [`ColumnRegistry`] that is built
//! once per session and shared by reference.

pub mod boolean;
pub mod link;
pub mod list;
pub mod number;
pub mod object;
pub mod registry;
pub mod selectbox;
pub mod temporal;
pub mod text;

pub use boolean::BooleanColumn;
pub use link::LinkColumn;
pub use list::ListColumn;
pub use number::NumberColumn;
pub use object::ObjectColumn;
pub use registry::ColumnRegistry;
pub use selectbox::SelectboxColumn;
pub use temporal::{DateColumn, DateTimeColumn, TimeColumn};
pub use text::TextColumn;

use gridedit_config::Theme;

use crate::cell::{Cell, CellKind};
use crate::column::{ColumnDefinition, DataType};
use crate::error::ConversionError;
use crate::validation::ValidationResult;
use crate::value::Value;

/// Session-wide presentation inputs for cell construction
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub theme: &'a Theme,
}

impl<'a> RenderContext<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnHandler {
    Text(TextColumn),
    Number(NumberColumn),
    Boolean(BooleanColumn),
    Selectbox(SelectboxColumn),
    List(ListColumn),
    Date(DateColumn),
    Time(TimeColumn),
    DateTime(DateTimeColumn),
    Link(LinkColumn),
    Object(ObjectColumn),
}

impl ColumnHandler {
    /// Built-in handler for a data type
    pub fn builtin(data_type: DataType) -> Self {
        match data_type {
            DataType::Text => ColumnHandler::Text(TextColumn::default()),
            DataType::Number => ColumnHandler::Number(NumberColumn::default()),
            DataType::Boolean => ColumnHandler::Boolean(BooleanColumn),
            DataType::Selectbox => ColumnHandler::Selectbox(SelectboxColumn),
            DataType::List => ColumnHandler::List(ListColumn::default()),
            DataType::Date => ColumnHandler::Date(DateColumn),
            DataType::Time => ColumnHandler::Time(TimeColumn),
            DataType::DateTime => ColumnHandler::DateTime(DateTimeColumn),
            DataType::Link => ColumnHandler::Link(LinkColumn),
            DataType::Object => ColumnHandler::Object(ObjectColumn),
        }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            ColumnHandler::Text(_) => DataType::Text,
            ColumnHandler::Number(_) => DataType::Number,
            ColumnHandler::Boolean(_) => DataType::Boolean,
            ColumnHandler::Selectbox(_) => DataType::Selectbox,
            ColumnHandler::List(_) => DataType::List,
            ColumnHandler::Date(_) => DataType::Date,
            ColumnHandler::Time(_) => DataType::Time,
            ColumnHandler::DateTime(_) => DataType::DateTime,
            ColumnHandler::Link(_) => DataType::Link,
            ColumnHandler::Object(_) => DataType::Object,
        }
    }

    pub fn cell_kind(&self) -> CellKind {
        match self {
            ColumnHandler::Text(_) | ColumnHandler::Selectbox(_) => CellKind::Text,
            ColumnHandler::Number(_) => CellKind::Number,
            ColumnHandler::Boolean(_) => CellKind::Boolean,
            ColumnHandler::List(_) => CellKind::Bubble,
            ColumnHandler::Date(_) | ColumnHandler::Time(_) | ColumnHandler::DateTime(_) => {
                CellKind::Temporal
            }
            ColumnHandler::Link(_) => CellKind::Uri,
            ColumnHandler::Object(_) => CellKind::Object,
        }
    }

    /// Types that can never be edited, whatever the column says
    pub fn is_read_only(&self) -> bool {
        matches!(self, ColumnHandler::Object(_))
    }

    pub fn to_display_cell(
        &self,
        value: &Value,
        column: &ColumnDefinition,
        ctx: &RenderContext<'_>,
    ) -> Result<Cell, ConversionError> {
        let mut cell = if value.is_missing() {
            let mut missing = Cell::new(self.cell_kind(), Value::Null, ctx.theme.missing_value_text.clone());
            missing.is_missing_value = true;
            missing
        } else {
            match self {
                ColumnHandler::Text(h) => h.display(value)?,
                ColumnHandler::Number(h) => h.display(value, column)?,
                ColumnHandler::Boolean(h) => h.display(value, ctx.theme)?,
                ColumnHandler::Selectbox(h) => h.display(value)?,
                ColumnHandler::List(h) => h.display(value)?,
                ColumnHandler::Date(h) => h.display(value, column, ctx.theme)?,
                ColumnHandler::Time(h) => h.display(value, column, ctx.theme)?,
                ColumnHandler::DateTime(h) => h.display(value, column, ctx.theme)?,
                ColumnHandler::Link(h) => h.display(value, column)?,
                ColumnHandler::Object(h) => h.display(value)?,
            }
        };
        cell.read_only = cell.read_only || !column.is_editable || self.is_read_only();
        Ok(cell)
    }

    /// Cell to record for a user-supplied value. A value that cannot be
    /// displayed is kept as typed; validation failures are attached to the
    /// cell, never raised.
    pub fn edit_cell(&self, value: &Value, column: &ColumnDefinition, ctx: &RenderContext<'_>) -> Cell {
        let mut cell = match self.to_display_cell(value, column, ctx) {
            Ok(cell) => cell,
            Err(e) => Cell::new(self.cell_kind(), value.clone(), value.to_string()).with_tooltip(e.to_string()),
        };
        cell.validation_error = self.validate(value, column).reason().map(str::to_string);
        cell
    }

    /// Raw value carried by a (possibly user-edited) cell
    pub fn extract_value(&self, cell: &Cell) -> Value {
        let data = &cell.data;
        if data.is_missing() {
            return Value::Null;
        }
        match self {
            ColumnHandler::Text(h) => h.extract(data),
            ColumnHandler::Number(h) => h.extract(data),
            ColumnHandler::Boolean(h) => h.extract(data),
            ColumnHandler::Selectbox(h) => h.extract(data),
            ColumnHandler::List(h) => h.extract(data),
            ColumnHandler::Date(h) => h.extract(data),
            ColumnHandler::Time(h) => h.extract(data),
            ColumnHandler::DateTime(h) => h.extract(data),
            ColumnHandler::Link(h) => h.extract(data),
            ColumnHandler::Object(h) => h.extract(data),
        }
    }

    /// Value used to populate a newly added row
    pub fn default_value(&self, column: &ColumnDefinition) -> Value {
        if let Some(default) = &column.params.default {
            return default.clone();
        }
        match self {
            ColumnHandler::Boolean(_) => Value::Bool(false),
            _ => Value::Null,
        }
    }

    pub fn validate(&self, value: &Value, column: &ColumnDefinition) -> ValidationResult {
        if value.is_missing() {
            return if column.is_required {
                ValidationResult::invalid("This value is required.")
            } else {
                ValidationResult::Valid
            };
        }
        match self {
            ColumnHandler::Text(h) => h.validate(value, column),
            ColumnHandler::Number(h) => h.validate(value, column),
            ColumnHandler::Boolean(h) => h.validate(value),
            ColumnHandler::Selectbox(h) => h.validate(value, column),
            ColumnHandler::List(h) => h.validate(value),
            ColumnHandler::Date(h) => h.validate(value, column),
            ColumnHandler::Time(h) => h.validate(value, column),
            ColumnHandler::DateTime(h) => h.validate(value, column),
            ColumnHandler::Link(h) => h.validate(value, column),
            ColumnHandler::Object(_) => ValidationResult::Valid,
        }
    }
}
