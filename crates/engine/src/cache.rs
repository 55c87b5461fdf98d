//! Resolved-cell cache
//!
//! Holds cells converted from the snapshot, keyed by `(col, pre-sort row)`.
//! Edited and added cells are never stored here. Every wholesale clear bumps
//! the generation so asynchronous fetches issued before the clear can be
//! recognized and dropped when they land.

use rustc_hash::FxHashMap;

use crate::cell::Cell;

#[derive(Debug, Clone)]
pub struct CellCache {
    entries: FxHashMap<(usize, usize), Cell>,
    generation: u64,
    enabled: bool,
}

impl Default for CellCache {
    fn default() -> Self {
        Self::new(true)
    }
}

impl CellCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            entries: FxHashMap::default(),
            generation: 0,
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn get(&self, col: usize, row: usize) -> Option<&Cell> {
        self.entries.get(&(col, row))
    }

    /// Store a synchronously resolved cell. Ignored when disabled.
    pub fn insert(&mut self, col: usize, row: usize, cell: Cell) {
        if self.enabled {
            self.entries.insert((col, row), cell);
        }
    }

    /// Store a fetched cell. Always kept: for an asynchronous source this is
    /// the only copy of the value.
    pub fn fill(&mut self, col: usize, row: usize, cell: Cell) {
        self.entries.insert((col, row), cell);
    }

    pub fn invalidate(&mut self, col: usize, row: usize) -> bool {
        self.entries.remove(&(col, row)).is_some()
    }

    pub fn invalidate_column(&mut self, col: usize) {
        self.entries.retain(|&(c, _), _| c != col);
    }

    /// Drop everything and start a new generation
    pub fn clear(&mut self) {
        self.entries.clear();
        self.generation += 1;
        log::debug!("Cell cache cleared (generation {})", self.generation);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
