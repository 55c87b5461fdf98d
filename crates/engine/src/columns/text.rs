use std::cell::RefCell;

use regex::Regex;
use rustc_hash::FxHashMap;

use crate::cell::{Cell, CellKind};
use crate::column::ColumnDefinition;
use crate::error::ConversionError;
use crate::validation::ValidationResult;
use crate::value::Value;

/// Free text. Non-text raw values are shown in their general rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextColumn {
    /// Strip surrounding whitespace from edited values
    pub trim_input: bool,
}

impl TextColumn {
    pub fn display(&self, value: &Value) -> Result<Cell, ConversionError> {
        let text = value.to_string();
        Ok(Cell::new(CellKind::Text, Value::Text(text.clone()), text))
    }

    pub fn extract(&self, data: &Value) -> Value {
        let text = match data {
            Value::Text(s) => s.clone(),
            other => other.to_string(),
        };
        if self.trim_input {
            Value::Text(text.trim().to_string())
        } else {
            Value::Text(text)
        }
    }

    pub fn validate(&self, value: &Value, column: &ColumnDefinition) -> ValidationResult {
        let Value::Text(text) = value else {
            return ValidationResult::invalid(format!("Expected text, got {}.", value.type_name()));
        };
        check_max_chars(text, column).and_then(|| check_pattern(text, column))
    }
}

pub(crate) fn check_max_chars(text: &str, column: &ColumnDefinition) -> ValidationResult {
    match column.params.max_chars {
        Some(max) if text.chars().count() > max => ValidationResult::invalid(format!(
            "The value exceeds the maximum of {max} characters."
        )),
        _ => ValidationResult::Valid,
    }
}

thread_local! {
    /// Compiled column patterns keyed by pattern text. A broken pattern is
    /// kept as its error message so it is reported once.
    static PATTERNS: RefCell<FxHashMap<String, Result<Regex, String>>> = RefCell::new(FxHashMap::default());
}

fn compiled_pattern(pattern: &str, column: &ColumnDefinition) -> Result<Regex, String> {
    PATTERNS.with(|patterns| {
        if let Some(compiled) = patterns.borrow().get(pattern) {
            return compiled.clone();
        }
        let compiled = Regex::new(&format!("^(?:{pattern})$")).map_err(|e| {
            log::warn!("Invalid validation pattern on column '{}': {}", column.id, e);
            e.to_string()
        });
        patterns.borrow_mut().insert(pattern.to_string(), compiled.clone());
        compiled
    })
}

/// Full-match check against the column's regex
pub(crate) fn check_pattern(text: &str, column: &ColumnDefinition) -> ValidationResult {
    let Some(pattern) = column.params.pattern.as_deref() else {
        return ValidationResult::Valid;
    };
    match compiled_pattern(pattern, column) {
        Ok(re) if re.is_match(text) => ValidationResult::Valid,
        Ok(_) => ValidationResult::invalid(format!("The value does not match the pattern {pattern}.")),
        Err(_) => ValidationResult::invalid(format!("Invalid validation pattern: {pattern}")),
    }
}
