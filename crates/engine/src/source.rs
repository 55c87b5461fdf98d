//! Collaborator seams
//!
//! [`DataSource`] is the immutable snapshot plus its write-through
//! operations. Row indices passed to it are the source's own indices: for
//! snapshot rows that is the original row, for added rows whatever
//! `add_row` returned. Deleting a row must not shift the indices of other
//! rows; the source reports deleted rows through `deleted_rows` instead.
//!
//! [`CellStyler`] is the presentation-layer style overlay applied to
//! snapshot cells after conversion.

use std::collections::BTreeSet;
use std::future::Future;

use crate::cell::Cell;
use crate::column::ColumnDefinition;
use crate::error::SourceError;
use crate::value::Value;

pub trait DataSource {
    /// Snapshot rows, including rows the source reports as deleted
    fn row_count(&self) -> usize;

    fn column_count(&self) -> usize;

    fn column_definitions(&self) -> Vec<ColumnDefinition>;

    /// Synchronous read for sources that already hold the value in memory.
    /// `None` means the value has to be fetched with [`DataSource::cell_data`].
    fn cell_data_ready(&self, _col: usize, _row: usize) -> Option<Value> {
        None
    }

    fn cell_data(&self, col: usize, row: usize) -> impl Future<Output = Result<Value, SourceError>>;

    fn set_cell_data(&self, col: usize, row: usize, value: Value) -> impl Future<Output = Result<(), SourceError>>;

    /// Append a row; resolves to the new row's index
    fn add_row(&self) -> impl Future<Output = Result<usize, SourceError>>;

    /// Resolves to `false` when the source declines the deletion
    fn delete_row(&self, row: usize) -> impl Future<Output = Result<bool, SourceError>>;

    fn deleted_rows(&self) -> BTreeSet<usize>;

    /// Reload the snapshot. Column definitions and row count may change.
    fn refresh(&self) -> impl Future<Output = Result<(), SourceError>>;
}

/// Adjusts snapshot cells after type conversion (colors, tooltips, ...).
/// `row` is the original row.
pub trait CellStyler {
    fn style(&self, col: usize, row: usize, cell: &mut Cell);
}

impl<F> CellStyler for F
where
    F: Fn(usize, usize, &mut Cell),
{
    fn style(&self, col: usize, row: usize, cell: &mut Cell) {
        self(col, row, cell)
    }
}
