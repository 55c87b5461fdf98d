use rustc_hash::FxHashMap;

use crate::cell::Cell;
use crate::column::{ColumnDefinition, DataType};
use crate::columns::{ColumnHandler, RenderContext};
use crate::value::Value;

/// Tooltip for cells of a column whose type has no handler
pub fn missing_handler(column: &ColumnDefinition) -> String {
    format!(
        "No handler registered for data type '{}' (column '{}')",
        column.data_type.name(),
        column.id
    )
}

/// Lookup table from data type to handler.
///
/// Built once per session and passed by reference; there is no global
/// instance. Registering a tag twice replaces the earlier handler.
#[derive(Debug, Clone, Default)]
pub struct ColumnRegistry {
    handlers: FxHashMap<DataType, ColumnHandler>,
}

impl ColumnRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with a handler for every built-in data type
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for data_type in DataType::ALL {
            registry.register(ColumnHandler::builtin(data_type));
        }
        registry
    }

    /// Add or replace the handler for its data type. Returns the handler it
    /// replaced, if any.
    pub fn register(&mut self, handler: ColumnHandler) -> Option<ColumnHandler> {
        let data_type = handler.data_type();
        let previous = self.handlers.insert(data_type, handler);
        if previous.is_some() {
            log::warn!("Replacing column handler for data type '{}'", data_type.name());
        }
        previous
    }

    pub fn resolve(&self, data_type: DataType) -> Option<&ColumnHandler> {
        self.handlers.get(&data_type)
    }

    /// Edit cell for `value` in `column`, or a read-only placeholder when the
    /// column's type has no handler
    pub fn edit_cell(&self, column: &ColumnDefinition, value: &Value, ctx: &RenderContext<'_>) -> Cell {
        match self.resolve(column.data_type) {
            Some(handler) => handler.edit_cell(value, column, ctx),
            None => Cell::placeholder(value, missing_handler(column)),
        }
    }

    pub fn default_value(&self, column: &ColumnDefinition) -> Value {
        match self.resolve(column.data_type) {
            Some(handler) => handler.default_value(column),
            None => column.params.default.clone().unwrap_or_default(),
        }
    }

    pub fn unregister(&mut self, data_type: DataType) -> Option<ColumnHandler> {
        self.handlers.remove(&data_type)
    }

    pub fn contains(&self, data_type: DataType) -> bool {
        self.handlers.contains_key(&data_type)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::TextColumn;

    #[test]
    fn test_builtins_cover_every_type() {
        let registry = ColumnRegistry::with_builtins();
        assert_eq!(registry.len(), DataType::ALL.len());
        for data_type in DataType::ALL {
            assert!(registry.resolve(data_type).is_some());
        }
    }

    #[test]
    fn test_empty_registry_resolves_nothing() {
        let registry = ColumnRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.resolve(DataType::Text).is_none());
    }

    #[test]
    fn test_reregistration_replaces() {
        let mut registry = ColumnRegistry::with_builtins();
        let previous = registry.register(ColumnHandler::Text(TextColumn { trim_input: true }));
        assert_eq!(previous, Some(ColumnHandler::Text(TextColumn::default())));
        assert_eq!(
            registry.resolve(DataType::Text),
            Some(&ColumnHandler::Text(TextColumn { trim_input: true }))
        );
        assert_eq!(registry.len(), DataType::ALL.len());
    }

    #[test]
    fn test_edit_cell_without_handler_is_placeholder() {
        let theme = gridedit_config::Theme::light();
        let ctx = RenderContext::new(&theme);
        let mut registry = ColumnRegistry::with_builtins();
        registry.unregister(DataType::Link);

        let column = ColumnDefinition::new("site", DataType::Link).editable(true);
        let cell = registry.edit_cell(&column, &Value::text("https://example.com"), &ctx);
        assert!(cell.read_only);
        assert!(cell.tooltip.unwrap().contains("'link'"));
        assert_eq!(registry.default_value(&column), Value::Null);
    }

    #[test]
    fn test_edit_cell_keeps_invalid_input() {
        let theme = gridedit_config::Theme::light();
        let ctx = RenderContext::new(&theme);
        let registry = ColumnRegistry::with_builtins();
        let column = ColumnDefinition::new("qty", DataType::Number).editable(true);

        let cell = registry.edit_cell(&column, &Value::text("lots"), &ctx);
        assert_eq!(cell.data, Value::text("lots"));
        assert_eq!(cell.display_data, "lots");
        assert!(cell.has_validation_error());
    }
}
