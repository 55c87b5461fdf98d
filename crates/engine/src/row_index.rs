//! Display ↔ original row translation
//!
//! Display space is what the grid enumerates before any sort: snapshot rows
//! in order with deleted rows skipped, followed by added rows in insertion
//! order (again skipping deleted ones). Original space is the stable index
//! into the snapshot, extended past its end by synthetic indices for added
//! rows.
//!
//! Both directions are O(1). Both maps are updated in place: an add appends
//! to them, a delete removes the row and shifts the display rows after it.
//! [`RowIndex::build`] constructs them from scratch when an overlay starts
//! with deleted rows. Cell edits never touch them.

use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowIndex {
    /// display row -> original row
    display_to_original: Vec<usize>,
    /// original row -> display row, `None` when deleted
    original_to_display: Vec<Option<usize>>,
}

impl RowIndex {
    /// Identity mapping over `snapshot_rows` rows
    pub fn new(snapshot_rows: usize) -> Self {
        Self {
            display_to_original: (0..snapshot_rows).collect(),
            original_to_display: (0..snapshot_rows).map(Some).collect(),
        }
    }

    /// Build the mapping from scratch.
    ///
    /// `added` lists the synthetic original indices in insertion order; they
    /// must all be `>= snapshot_rows`.
    pub fn build(snapshot_rows: usize, added: &[usize], deleted: &BTreeSet<usize>) -> Self {
        let originals = (0..snapshot_rows).chain(added.iter().copied());
        let total = snapshot_rows + added.len();

        let mut display_to_original = Vec::with_capacity(total.saturating_sub(deleted.len()));
        let mut original_to_display = vec![None; total];
        for original in originals {
            if deleted.contains(&original) {
                continue;
            }
            if original >= original_to_display.len() {
                original_to_display.resize(original + 1, None);
            }
            original_to_display[original] = Some(display_to_original.len());
            display_to_original.push(original);
        }

        Self {
            display_to_original,
            original_to_display,
        }
    }

    /// Number of display rows
    pub fn len(&self) -> usize {
        self.display_to_original.len()
    }

    pub fn is_empty(&self) -> bool {
        self.display_to_original.is_empty()
    }

    pub fn to_original(&self, display_row: usize) -> Option<usize> {
        self.display_to_original.get(display_row).copied()
    }

    pub fn to_display(&self, original_row: usize) -> Option<usize> {
        self.original_to_display.get(original_row).copied().flatten()
    }

    /// Append a freshly added row at the end of the enumeration
    pub fn push(&mut self, original_row: usize) {
        if original_row >= self.original_to_display.len() {
            self.original_to_display.resize(original_row + 1, None);
        }
        self.original_to_display[original_row] = Some(self.display_to_original.len());
        self.display_to_original.push(original_row);
    }

    /// Drop a row from the enumeration, shifting every later display row up
    /// by one. Returns the display row it occupied.
    pub fn remove(&mut self, original_row: usize) -> Option<usize> {
        let display_row = self.to_display(original_row)?;
        self.display_to_original.remove(display_row);
        self.original_to_display[original_row] = None;
        for &original in &self.display_to_original[display_row..] {
            if let Some(Some(d)) = self.original_to_display.get_mut(original) {
                *d -= 1;
            }
        }
        Some(display_row)
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.display_to_original.iter().copied()
    }
}
