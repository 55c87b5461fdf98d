//! Sort overlay
//!
//! Non-destructive permutation over the overlay's display enumeration:
//! - sorted display row -> pre-sort display row via `row_order`
//! - the edit overlay and snapshot never see sorted indices
//! - clearing restores the identity permutation
//!
//! Ordering is type-aware and stable. Missing values rank before everything
//! else ascending and therefore after everything descending.

use std::cmp::Ordering;

use chrono::{NaiveDateTime, NaiveTime};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::column::SortMode;
use crate::validation::parse_numeric_input;
use crate::value::Value;

// =============================================================================
// Sort configuration
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// What the caller asked for. `Auto` cycles asc → desc → none on the same
/// column and starts at asc on a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortRequest {
    Ascending,
    Descending,
    Auto,
}

impl From<SortDirection> for SortRequest {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Ascending => SortRequest::Ascending,
            SortDirection::Descending => SortRequest::Descending,
        }
    }
}

/// Active sort
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortState {
    pub column: usize,
    pub column_id: String,
    pub direction: SortDirection,
    pub mode: SortMode,
}

// =============================================================================
// SortOverlay
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct SortOverlay {
    state: Option<SortState>,
    /// sorted row -> pre-sort row; empty when unsorted
    row_order: Vec<usize>,
    /// pre-sort row -> sorted row
    inverse: Vec<usize>,
}

impl SortOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> Option<&SortState> {
        self.state.as_ref()
    }

    pub fn is_sorted(&self) -> bool {
        self.state.is_some()
    }

    /// Direction the next `sort_column` call should apply; `None` clears.
    pub fn next_direction(&self, column: usize, request: SortRequest, auto_reset: bool) -> Option<SortDirection> {
        let current = self
            .state
            .as_ref()
            .filter(|s| s.column == column)
            .map(|s| s.direction);

        match request {
            SortRequest::Auto => match current {
                None => Some(SortDirection::Ascending),
                Some(SortDirection::Ascending) => Some(SortDirection::Descending),
                Some(SortDirection::Descending) => None,
            },
            SortRequest::Ascending | SortRequest::Descending => {
                let requested = match request {
                    SortRequest::Descending => SortDirection::Descending,
                    _ => SortDirection::Ascending,
                };
                if auto_reset && current == Some(requested) {
                    None
                } else {
                    Some(requested)
                }
            }
        }
    }

    /// Install a permutation (stable sort required). `permutation` maps
    /// sorted row -> pre-sort row.
    pub fn apply(&mut self, state: SortState, permutation: Vec<usize>) {
        self.state = Some(state);
        self.row_order = permutation;
        self.rebuild_inverse();
    }

    pub fn clear(&mut self) {
        self.state = None;
        self.row_order.clear();
        self.inverse.clear();
    }

    /// Map a display row to its pre-sort row
    pub fn to_unsorted(&self, display_row: usize) -> usize {
        self.row_order.get(display_row).copied().unwrap_or(display_row)
    }

    /// Map a pre-sort row to the row it is displayed at
    pub fn to_sorted(&self, row: usize) -> usize {
        self.inverse.get(row).copied().unwrap_or(row)
    }

    /// A row was appended to the pre-sort enumeration. While sorted it goes
    /// to the end; the user re-sorts to integrate it.
    pub fn row_added(&mut self, row: usize) {
        if self.is_sorted() {
            self.row_order.push(row);
            self.rebuild_inverse();
        }
    }

    /// A pre-sort row was removed; later pre-sort rows shift up by one.
    pub fn row_removed(&mut self, row: usize) {
        if !self.is_sorted() {
            return;
        }
        if let Some(position) = self.row_order.iter().position(|&r| r == row) {
            self.row_order.remove(position);
        }
        for r in self.row_order.iter_mut() {
            if *r > row {
                *r -= 1;
            }
        }
        self.rebuild_inverse();
    }

    pub fn row_order(&self) -> &[usize] {
        &self.row_order
    }

    fn rebuild_inverse(&mut self) {
        self.inverse = vec![0; self.row_order.len()];
        for (sorted, &row) in self.row_order.iter().enumerate() {
            if let Some(slot) = self.inverse.get_mut(row) {
                *slot = sorted;
            }
        }
    }
}

// =============================================================================
// SortKey: typed key for comparison
// =============================================================================

/// Derived `Ord` ranks variants in declaration order:
/// Missing < Number < Temporal < Time < Text < Natural < Bool < List
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    /// Missing, NaN, still loading, or an error cell
    Missing,
    Number(OrderedFloat<f64>),
    /// Dates compare as midnight datetimes
    Temporal(NaiveDateTime),
    Time(NaiveTime),
    Text(String),
    Natural(Vec<NaturalChunk>),
    Bool(bool),
    List(Vec<String>),
}

/// Piece of a string split for natural ordering. Digit runs compare by
/// magnitude, so "a2" < "a10".
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum NaturalChunk {
    Digits { len: usize, digits: String },
    Text(String),
}

impl SortKey {
    pub fn from_cell(cell: &Cell, mode: SortMode) -> Self {
        if cell.is_missing_value || cell.is_loading || cell.is_error() || cell.data.is_missing() {
            return SortKey::Missing;
        }
        match mode {
            SortMode::Raw => SortKey::Text(cell.display_data.clone()),
            SortMode::Smart => match numeric(cell) {
                Some(n) => SortKey::Number(OrderedFloat(n)),
                None => SortKey::Natural(natural_chunks(&cell.display_data)),
            },
            SortMode::Default => Self::from_value(&cell.data),
        }
    }

    fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => SortKey::Missing,
            Value::Number(n) => SortKey::Number(OrderedFloat(*n)),
            Value::Date(d) => SortKey::Temporal(d.and_time(NaiveTime::default())),
            Value::DateTime(dt) => SortKey::Temporal(*dt),
            Value::Time(t) => SortKey::Time(*t),
            Value::Text(s) => SortKey::Text(s.to_lowercase()),
            Value::Bool(b) => SortKey::Bool(*b),
            Value::List(items) => SortKey::List(items.iter().map(|s| s.to_lowercase()).collect()),
        }
    }
}

fn numeric(cell: &Cell) -> Option<f64> {
    cell.data
        .as_f64()
        .or_else(|| cell.data.as_str().and_then(|s| parse_numeric_input(s, true).ok()))
}

fn natural_chunks(text: &str) -> Vec<NaturalChunk> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut in_digits = false;

    let flush = |current: &mut String, in_digits: bool, chunks: &mut Vec<NaturalChunk>| {
        if current.is_empty() {
            return;
        }
        let piece = std::mem::take(current);
        if in_digits {
            let digits = piece.trim_start_matches('0').to_string();
            chunks.push(NaturalChunk::Digits {
                len: digits.len(),
                digits,
            });
        } else {
            chunks.push(NaturalChunk::Text(piece.to_lowercase()));
        }
    };

    for c in text.chars() {
        let is_digit = c.is_ascii_digit();
        if is_digit != in_digits {
            flush(&mut current, in_digits, &mut chunks);
            in_digits = is_digit;
        }
        current.push(c);
    }
    flush(&mut current, in_digits, &mut chunks);
    chunks
}

/// Compare two cells under a sort mode, ascending
pub fn compare_cells(a: &Cell, b: &Cell, mode: SortMode) -> Ordering {
    SortKey::from_cell(a, mode).cmp(&SortKey::from_cell(b, mode))
}

// =============================================================================
// Sorting Logic
// =============================================================================

/// Stable sort of pre-sort rows by the cell each one shows in the sort
/// column. `cells[i]` is the cell at pre-sort row `i`. Returns the
/// permutation sorted row -> pre-sort row.
pub fn sort_permutation(cells: &[Cell], mode: SortMode, direction: SortDirection) -> Vec<usize> {
    let mut keyed: Vec<(SortKey, usize)> = cells
        .iter()
        .enumerate()
        .map(|(row, cell)| (SortKey::from_cell(cell, mode), row))
        .collect();

    // sort_by is stable: equal keys keep their pre-sort order in both
    // directions
    match direction {
        SortDirection::Ascending => keyed.sort_by(|a, b| a.0.cmp(&b.0)),
        SortDirection::Descending => keyed.sort_by(|a, b| b.0.cmp(&a.0)),
    }

    keyed.into_iter().map(|(_, row)| row).collect()
}

// =============================================================================
// Tests
// =============================================================================
