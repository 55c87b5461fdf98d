//! Edit summary serialization
//!
//! A host can persist a session's pending changes and replay them later:
//!
//! ```json
//! {
//!   "edited_rows": { "0": { "qty": 42 } },
//!   "added_rows": [ { "id": "new", "qty": 1 } ],
//!   "deleted_rows": [2]
//! }
//! ```
//!
//! - `edited_rows` is keyed by original row and only covers snapshot rows
//! - `added_rows` lists live added rows in insertion order, every column
//! - `deleted_rows` lists deleted snapshot rows
//!
//! Values are kept as plain JSON and only typed when replayed, through the
//! handler of the column they belong to. A text value like `"12:30"` stays
//! text in a text column and becomes a time in a time column.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::column::ColumnDefinition;
use crate::columns::{ColumnRegistry, RenderContext};
use crate::error::{GridError, Result};
use crate::overlay::EditOverlay;
use crate::value::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditSummary {
    pub edited_rows: BTreeMap<usize, RowValues>,
    pub added_rows: Vec<RowValues>,
    pub deleted_rows: Vec<usize>,
}

/// Column id -> JSON value
pub type RowValues = BTreeMap<String, serde_json::Value>;

impl EditSummary {
    pub fn from_overlay(overlay: &EditOverlay, columns: &[ColumnDefinition], registry: &ColumnRegistry) -> Self {
        let value_of = |col: usize, original: usize| -> Option<(String, serde_json::Value)> {
            let column = columns.get(col)?;
            let cell = overlay.cell_ref(col, original)?;
            let value = match registry.resolve(column.data_type) {
                Some(handler) => handler.extract_value(cell),
                None => cell.data.clone(),
            };
            Some((column.id.clone(), to_json_value(&value)))
        };

        let mut edited_rows: BTreeMap<usize, RowValues> = BTreeMap::new();
        for ((col, original), _) in overlay.edited_cells() {
            if overlay.is_added_row(original) || overlay.is_deleted(original) {
                continue;
            }
            if let Some((id, value)) = value_of(col, original) {
                edited_rows.entry(original).or_default().insert(id, value);
            }
        }

        let added_rows = overlay
            .added_rows()
            .iter()
            .filter(|added| !overlay.is_deleted(added.original))
            .map(|added| {
                (0..columns.len())
                    .filter_map(|col| value_of(col, added.original))
                    .collect()
            })
            .collect();

        let deleted_rows = overlay
            .deleted_rows()
            .iter()
            .copied()
            .filter(|&row| row < overlay.snapshot_rows())
            .collect();

        Self {
            edited_rows,
            added_rows,
            deleted_rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.edited_rows.is_empty() && self.added_rows.is_empty() && self.deleted_rows.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Replay onto an overlay. Values go through the column handlers, so
    /// restored cells carry the same validation state a fresh edit would.
    /// Nothing is sent to the data source.
    pub fn apply_to(
        &self,
        overlay: &mut EditOverlay,
        columns: &[ColumnDefinition],
        registry: &ColumnRegistry,
        ctx: &RenderContext<'_>,
    ) -> Result<()> {
        let column_index = |id: &str| -> Result<usize> {
            columns
                .iter()
                .position(|c| c.id == id)
                .ok_or_else(|| GridError::ColumnNotFound(id.to_string()))
        };

        for (&original, values) in &self.edited_rows {
            if original >= overlay.snapshot_rows() {
                return Err(GridError::IndexOutOfBounds {
                    what: "original row",
                    index: original,
                    len: overlay.snapshot_rows(),
                });
            }
            for (id, value) in values {
                let col = column_index(id)?;
                let column = &columns[col];
                if !column.is_editable {
                    return Err(GridError::NotEditable { column: id.clone() });
                }
                let value = from_json_value(value, column, registry);
                overlay.set_cell(col, original, registry.edit_cell(column, &value, ctx))?;
            }
        }

        for values in &self.added_rows {
            let known: BTreeSet<&str> = columns.iter().map(|c| c.id.as_str()).collect();
            if let Some(unknown) = values.keys().find(|id| !known.contains(id.as_str())) {
                return Err(GridError::ColumnNotFound(unknown.clone()));
            }
            let cells = columns
                .iter()
                .enumerate()
                .map(|(col, column)| {
                    let value = match values.get(&column.id) {
                        Some(json) => from_json_value(json, column, registry),
                        None => registry.default_value(column),
                    };
                    (col, registry.edit_cell(column, &value, ctx))
                })
                .collect();
            overlay.add_row(columns, cells, None)?;
        }

        for &original in &self.deleted_rows {
            overlay.delete_row(original)?;
        }
        Ok(())
    }
}

/// Serialized form of a value. Temporal values keep sub-second precision;
/// NaN becomes null.
fn to_json_value(value: &Value) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or(serde_json::Value::Null)
}

/// Type a JSON value for `column` the way an edit would be: strings go
/// through the column handler, which parses them only when the column type
/// calls for it.
fn from_json_value(json: &serde_json::Value, column: &ColumnDefinition, registry: &ColumnRegistry) -> Value {
    let raw = match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Null),
        serde_json::Value::String(s) => Value::Text(s.clone()),
        serde_json::Value::Array(items) => Value::List(
            items
                .iter()
                .map(|item| match item {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
        ),
        other @ serde_json::Value::Object(_) => Value::Text(other.to_string()),
    };
    match registry.resolve(column.data_type) {
        Some(handler) => handler.extract_value(&Cell::from_value(raw)),
        None => raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::DataType;
    use gridedit_config::Theme;

    fn columns() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new("id", DataType::Text),
            ColumnDefinition::new("qty", DataType::Number).editable(true),
        ]
    }

    fn summary_json() -> &'static str {
        r#"{"edited_rows":{"1":{"qty":42.0}},"added_rows":[{"id":"new","qty":7.0}],"deleted_rows":[0]}"#
    }

    #[test]
    fn test_from_json_shape() {
        let summary = EditSummary::from_json(summary_json()).unwrap();
        assert_eq!(summary.edited_rows[&1]["qty"], serde_json::json!(42.0));
        assert_eq!(summary.added_rows.len(), 1);
        assert_eq!(summary.deleted_rows, vec![0]);
        assert_eq!(summary.to_json().unwrap(), summary_json());
    }

    #[test]
    fn test_missing_sections_default() {
        let summary = EditSummary::from_json("{}").unwrap();
        assert!(summary.is_empty());
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        let err = EditSummary::from_json("{\"deleted_rows\": \"x\"}").unwrap_err();
        assert!(matches!(err, GridError::Serialization(_)));
    }

    #[test]
    fn test_apply_then_summarize() {
        let theme = Theme::light();
        let ctx = RenderContext::new(&theme);
        let registry = ColumnRegistry::with_builtins();
        let columns = columns();

        let summary = EditSummary::from_json(summary_json()).unwrap();
        let mut overlay = EditOverlay::new(3);
        summary.apply_to(&mut overlay, &columns, &registry, &ctx).unwrap();

        assert_eq!(overlay.num_rows(), 3);
        assert!(overlay.is_added_row(3));
        assert_eq!(overlay.get_cell(1, 1).unwrap().data, Value::from(42));
        assert_eq!(EditSummary::from_overlay(&overlay, &columns, &registry), summary);
    }

    #[test]
    fn test_deleted_added_rows_are_omitted() {
        let theme = Theme::light();
        let ctx = RenderContext::new(&theme);
        let registry = ColumnRegistry::with_builtins();
        let columns = columns();

        let mut overlay = EditOverlay::new(2);
        let summary = EditSummary {
            added_rows: vec![BTreeMap::from([("qty".to_string(), serde_json::json!(1))])],
            ..Default::default()
        };
        summary.apply_to(&mut overlay, &columns, &registry, &ctx).unwrap();
        overlay.delete_row(2).unwrap();

        let after = EditSummary::from_overlay(&overlay, &columns, &registry);
        assert!(after.added_rows.is_empty());
        assert!(after.deleted_rows.is_empty());
    }

    #[test]
    fn test_unknown_or_read_only_column_rejected() {
        let theme = Theme::light();
        let ctx = RenderContext::new(&theme);
        let registry = ColumnRegistry::with_builtins();
        let mut overlay = EditOverlay::new(2);

        let unknown = EditSummary::from_json(r#"{"edited_rows":{"0":{"nope":1}}}"#).unwrap();
        assert_eq!(
            unknown.apply_to(&mut overlay, &columns(), &registry, &ctx),
            Err(GridError::ColumnNotFound("nope".into()))
        );

        let read_only = EditSummary::from_json(r#"{"edited_rows":{"0":{"id":"x"}}}"#).unwrap();
        assert_eq!(
            read_only.apply_to(&mut overlay, &columns(), &registry, &ctx),
            Err(GridError::NotEditable { column: "id".into() })
        );
    }

    #[test]
    fn test_text_that_looks_temporal_stays_text() {
        let theme = Theme::light();
        let ctx = RenderContext::new(&theme);
        let registry = ColumnRegistry::with_builtins();
        let columns = vec![
            ColumnDefinition::new("note", DataType::Text).editable(true),
            ColumnDefinition::new("at", DataType::DateTime).editable(true),
        ];

        let mut overlay = EditOverlay::new(2);
        overlay
            .set_cell(0, 0, registry.edit_cell(&columns[0], &Value::text("12:30"), &ctx))
            .unwrap();
        overlay
            .set_cell(0, 1, registry.edit_cell(&columns[0], &Value::text("2024-01-01T00:00:00.500"), &ctx))
            .unwrap();
        let at = chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_milli_opt(0, 0, 0, 500))
            .unwrap();
        overlay
            .set_cell(1, 0, registry.edit_cell(&columns[1], &Value::DateTime(at), &ctx))
            .unwrap();

        let json = EditSummary::from_overlay(&overlay, &columns, &registry).to_json().unwrap();
        let mut restored = EditOverlay::new(2);
        EditSummary::from_json(&json)
            .unwrap()
            .apply_to(&mut restored, &columns, &registry, &ctx)
            .unwrap();

        assert_eq!(restored.get_cell(0, 0).unwrap().data, Value::text("12:30"));
        assert_eq!(
            restored.get_cell(0, 1).unwrap().data,
            Value::text("2024-01-01T00:00:00.500")
        );
        assert_eq!(restored.get_cell(1, 0).unwrap().data, Value::DateTime(at));
    }
}
