//! Edit overlay
//!
//! Sparse in-memory layer of edits, added rows and deleted rows superimposed
//! on the immutable snapshot. Everything here is keyed by *original* row
//! index; display rows only appear at the translation boundary
//! ([`EditOverlay::original_row_index`]).
//!
//! Row lifecycle:
//! - snapshot rows are Present until deleted; deletion is final
//! - added rows get a fresh synthetic index past the snapshot, never reused
//! - added rows can be deleted too, they stay in `added_rows` but leave the
//!   display enumeration

use std::collections::{BTreeMap, BTreeSet};

use rustc_hash::FxHashMap;

use crate::cell::Cell;
use crate::column::ColumnDefinition;
use crate::error::{GridError, Result};
use crate::row_index::RowIndex;

/// A row appended during the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddedRow {
    /// Synthetic original index
    pub original: usize,
    /// Row index the data source assigned to it
    pub source_row: usize,
}

#[derive(Debug, Clone)]
pub struct EditOverlay {
    snapshot_rows: usize,
    edits: FxHashMap<(usize, usize), Cell>,
    added_rows: Vec<AddedRow>,
    deleted_rows: BTreeSet<usize>,
    next_synthetic: usize,
    /// Logical clock for `Cell::last_updated`
    clock: u64,
    index: RowIndex,
}

impl EditOverlay {
    pub fn new(snapshot_rows: usize) -> Self {
        Self {
            snapshot_rows,
            edits: FxHashMap::default(),
            added_rows: Vec::new(),
            deleted_rows: BTreeSet::new(),
            next_synthetic: snapshot_rows,
            clock: 0,
            index: RowIndex::new(snapshot_rows),
        }
    }

    /// Overlay whose snapshot already has some rows marked deleted.
    /// Indices past the snapshot are ignored.
    pub fn with_deleted(snapshot_rows: usize, deleted: impl IntoIterator<Item = usize>) -> Self {
        let mut overlay = Self::new(snapshot_rows);
        let deleted: BTreeSet<usize> = deleted.into_iter().filter(|&r| r < snapshot_rows).collect();
        if !deleted.is_empty() {
            overlay.index = RowIndex::build(snapshot_rows, &[], &deleted);
            overlay.deleted_rows = deleted;
        }
        overlay
    }

    // ------------------------------------------------------------------------
    // Cells
    // ------------------------------------------------------------------------

    /// Record an edit and stamp it. No validation happens here.
    /// Returns the stamp written to `last_updated`.
    pub fn set_cell(&mut self, col: usize, original_row: usize, mut cell: Cell) -> Result<u64> {
        self.check_original(original_row)?;
        self.clock += 1;
        cell.last_updated = Some(self.clock);
        self.edits.insert((col, original_row), cell);
        Ok(self.clock)
    }

    /// Copy of the edit recorded at this position
    pub fn get_cell(&self, col: usize, original_row: usize) -> Option<Cell> {
        self.edits.get(&(col, original_row)).cloned()
    }

    pub(crate) fn cell_ref(&self, col: usize, original_row: usize) -> Option<&Cell> {
        self.edits.get(&(col, original_row))
    }

    /// Back to Unedited. Only used when a failed write is reverted.
    pub(crate) fn remove_cell(&mut self, col: usize, original_row: usize) -> Option<Cell> {
        self.edits.remove(&(col, original_row))
    }

    pub fn has_edit(&self, col: usize, original_row: usize) -> bool {
        self.edits.contains_key(&(col, original_row))
    }

    /// All edit records as `((col, original_row), cell)`, in no particular order
    pub fn edited_cells(&self) -> impl Iterator<Item = ((usize, usize), &Cell)> + '_ {
        self.edits.iter().map(|(&key, cell)| (key, cell))
    }

    pub fn edit_count(&self) -> usize {
        self.edits.len()
    }

    // ------------------------------------------------------------------------
    // Rows
    // ------------------------------------------------------------------------

    /// Append a synthetic row.
    ///
    /// `initial` must hold a cell for every editable column; other columns
    /// are optional. `source_row` is the data source's index for the row,
    /// defaulting to the synthetic index. Returns the synthetic index.
    pub fn add_row(
        &mut self,
        columns: &[ColumnDefinition],
        initial: BTreeMap<usize, Cell>,
        source_row: Option<usize>,
    ) -> Result<usize> {
        for (col, column) in columns.iter().enumerate() {
            if column.is_editable && !initial.contains_key(&col) {
                return Err(GridError::MissingInitialCell {
                    column: column.id.clone(),
                });
            }
        }

        let original = self.next_synthetic;
        self.next_synthetic += 1;
        self.added_rows.push(AddedRow {
            original,
            source_row: source_row.unwrap_or(original),
        });
        self.index.push(original);

        for (col, cell) in initial {
            self.set_cell(col, original, cell)?;
        }
        Ok(original)
    }

    /// Hide a row from the display. Deleting twice is a no-op; returns
    /// whether the row was newly deleted.
    pub fn delete_row(&mut self, original_row: usize) -> Result<bool> {
        self.check_original(original_row)?;
        if !self.deleted_rows.insert(original_row) {
            return Ok(false);
        }
        self.index.remove(original_row);
        Ok(true)
    }

    pub fn is_added_row(&self, original_row: usize) -> bool {
        original_row >= self.snapshot_rows && original_row < self.next_synthetic
    }

    pub fn is_deleted(&self, original_row: usize) -> bool {
        self.deleted_rows.contains(&original_row)
    }

    pub fn added_rows(&self) -> &[AddedRow] {
        &self.added_rows
    }

    pub fn deleted_rows(&self) -> &BTreeSet<usize> {
        &self.deleted_rows
    }

    /// Data-source row for an original row
    pub fn source_row(&self, original_row: usize) -> usize {
        if !self.is_added_row(original_row) {
            return original_row;
        }
        self.added_rows
            .get(original_row - self.snapshot_rows)
            .map(|added| added.source_row)
            .unwrap_or(original_row)
    }

    // ------------------------------------------------------------------------
    // Index translation
    // ------------------------------------------------------------------------

    pub fn original_row_index(&self, display_row: usize) -> Result<usize> {
        self.index
            .to_original(display_row)
            .ok_or(GridError::IndexOutOfBounds {
                what: "display row",
                index: display_row,
                len: self.index.len(),
            })
    }

    pub fn display_row_index(&self, original_row: usize) -> Option<usize> {
        self.index.to_display(original_row)
    }

    /// Effective row count: snapshot minus deleted, plus live added rows
    pub fn num_rows(&self) -> usize {
        self.index.len()
    }

    pub fn snapshot_rows(&self) -> usize {
        self.snapshot_rows
    }

    pub fn row_index(&self) -> &RowIndex {
        &self.index
    }

    fn check_original(&self, original_row: usize) -> Result<()> {
        if original_row >= self.next_synthetic {
            return Err(GridError::IndexOutOfBounds {
                what: "original row",
                index: original_row,
                len: self.next_synthetic,
            });
        }
        Ok(())
    }
}
