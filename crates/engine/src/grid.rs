//! DataGrid: the surface a renderer talks to
//!
//! Reads go sort overlay -> row index -> edit overlay -> cache -> snapshot:
//!
//! ```text
//! (col, display_row)
//!   -> SortOverlay::to_unsorted         pre-sort row
//!   -> EditOverlay::original_row_index  original row
//!   -> edit record (editable col / added row), re-derived through the handler
//!   -> CellCache (col, pre-sort row)
//!   -> DataSource value -> ColumnHandler::to_display_cell -> CellStyler
//! ```
//!
//! `get_cell` is total: every failure becomes an error cell.
//!
//! Writes land in the edit overlay synchronously. Forwarding to the data
//! source is returned to the host as a [`PendingWrite`] future; the host
//! drives it on its executor and hands the [`WriteOutcome`] back through
//! [`DataGrid::settle_write`].

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use gridedit_config::{EditorSettings, PersistFailurePolicy, Theme};
use rustc_hash::FxHashSet;

use crate::cache::CellCache;
use crate::cell::Cell;
use crate::column::ColumnDefinition;
use crate::columns::registry::missing_handler;
use crate::columns::{ColumnHandler, ColumnRegistry, RenderContext};
use crate::error::{GridError, Result, SourceError};
use crate::overlay::EditOverlay;
use crate::sort::{sort_permutation, SortDirection, SortOverlay, SortRequest, SortState};
use crate::source::{CellStyler, DataSource};
use crate::summary::EditSummary;
use crate::value::Value;

/// Write-through to the data source, driven by the host
pub type PendingWrite = Pin<Box<dyn Future<Output = WriteOutcome>>>;

/// Result of a forwarded write, to be passed to [`DataGrid::settle_write`]
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOutcome {
    pub col: usize,
    pub original_row: usize,
    /// `last_updated` stamp of the edit that was forwarded
    pub stamp: u64,
    pub result: std::result::Result<(), SourceError>,
    session: u64,
}

/// A snapshot read waiting for the data source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellFetch {
    pub col: usize,
    /// Pre-sort display row the result is cached under
    pub row: usize,
    pub original_row: usize,
    generation: u64,
}

pub struct DataGrid<S: DataSource + 'static> {
    source: Rc<S>,
    registry: Rc<ColumnRegistry>,
    settings: EditorSettings,
    theme: Theme,
    columns: Vec<ColumnDefinition>,
    /// Format overrides by column id, re-applied after refresh
    formats: HashMap<String, String>,
    overlay: EditOverlay,
    sort: SortOverlay,
    cache: CellCache,
    styler: Option<Box<dyn CellStyler>>,
    pending_fetches: Vec<CellFetch>,
    queued: FxHashSet<(usize, usize)>,
    /// Bumped on refresh so late write outcomes cannot touch the new overlay
    session: u64,
}

impl<S: DataSource + 'static> DataGrid<S> {
    pub fn new(source: Rc<S>, registry: Rc<ColumnRegistry>, settings: EditorSettings, theme: Theme) -> Self {
        let columns = source.column_definitions();
        let overlay = EditOverlay::with_deleted(source.row_count(), source.deleted_rows());
        let cache = CellCache::new(settings.cache.enabled);
        Self {
            source,
            registry,
            settings,
            theme,
            columns,
            formats: HashMap::new(),
            overlay,
            sort: SortOverlay::new(),
            cache,
            styler: None,
            pending_fetches: Vec::new(),
            queued: FxHashSet::default(),
            session: 0,
        }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Effective cell at a display coordinate. Never fails: problems are
    /// reported as error cells.
    pub fn get_cell(&mut self, col: usize, display_row: usize) -> Cell {
        match self.resolve(col, display_row) {
            Ok(cell) => cell,
            Err(e) => error_cell(&e),
        }
    }

    fn resolve(&mut self, col: usize, display_row: usize) -> Result<Cell> {
        if col >= self.columns.len() {
            return Err(GridError::IndexOutOfBounds {
                what: "column",
                index: col,
                len: self.columns.len(),
            });
        }
        let row_count = self.overlay.num_rows();
        if display_row >= row_count {
            return Err(GridError::IndexOutOfBounds {
                what: "row",
                index: display_row,
                len: row_count,
            });
        }
        let row = self.sort.to_unsorted(display_row);
        self.resolve_unsorted(col, row)
    }

    /// Resolve at a pre-sort row
    fn resolve_unsorted(&mut self, col: usize, row: usize) -> Result<Cell> {
        let original = self.overlay.original_row_index(row)?;
        let is_added = self.overlay.is_added_row(original);
        let column = &self.columns[col];

        if column.is_editable || is_added {
            if let Some(edit) = self.overlay.cell_ref(col, original) {
                let ctx = RenderContext::new(&self.theme);
                return Ok(match self.registry.resolve(column.data_type) {
                    Some(handler) => rederive(handler, edit, column, &ctx),
                    None => edit.clone(),
                });
            }
            if is_added {
                log::error!("Added row {} has no edit record for column '{}'", original, column.id);
                return Err(GridError::MissingAddedCell { col, row: original });
            }
        }

        if let Some(cell) = self.cache.get(col, row) {
            return Ok(cell.clone());
        }

        match self.source.cell_data_ready(col, original) {
            Some(value) => {
                let cell = self.snapshot_cell(col, original, &value)?;
                self.cache.insert(col, row, cell.clone());
                Ok(cell)
            }
            None => {
                self.queue_fetch(col, row, original);
                Ok(self.loading_cell(col))
            }
        }
    }

    /// Convert a snapshot value and apply the style overlay
    fn snapshot_cell(&self, col: usize, original: usize, value: &Value) -> Result<Cell> {
        let column = &self.columns[col];
        let mut cell = match self.registry.resolve(column.data_type) {
            Some(handler) => {
                let ctx = RenderContext::new(&self.theme);
                handler.to_display_cell(value, column, &ctx)?
            }
            None => {
                log::warn!("{}", missing_handler(column));
                Cell::placeholder(value, missing_handler(column))
            }
        };
        if let Some(styler) = &self.styler {
            styler.style(col, original, &mut cell);
        }
        Ok(cell)
    }

    /// Default-value stand-in shown while a fetch is in flight
    fn loading_cell(&self, col: usize) -> Cell {
        let column = &self.columns[col];
        let value = self.registry.default_value(column);
        let ctx = RenderContext::new(&self.theme);
        let mut cell = match self.registry.resolve(column.data_type) {
            Some(handler) => handler
                .to_display_cell(&value, column, &ctx)
                .unwrap_or_else(|_| Cell::new(handler.cell_kind(), value.clone(), "")),
            None => Cell::placeholder(&value, missing_handler(column)),
        };
        cell.is_loading = true;
        cell
    }

    fn queue_fetch(&mut self, col: usize, row: usize, original_row: usize) {
        if self.queued.insert((col, row)) {
            self.pending_fetches.push(CellFetch {
                col,
                row,
                original_row,
                generation: self.cache.generation(),
            });
        }
    }

    pub fn get_row_count(&self) -> usize {
        self.overlay.num_rows()
    }

    pub fn get_column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn get_column_definition(&self, col: usize) -> Option<&ColumnDefinition> {
        self.columns.get(col)
    }

    pub fn column_index(&self, id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.id == id)
    }

    /// Deleted rows as original indices
    pub fn get_deleted_rows(&self) -> BTreeSet<usize> {
        self.overlay.deleted_rows().clone()
    }

    pub fn overlay(&self) -> &EditOverlay {
        &self.overlay
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn sort_state(&self) -> Option<&SortState> {
        self.sort.state()
    }

    // ========================================================================
    // Asynchronous snapshot reads
    // ========================================================================

    /// Hand the queued fetches to the host. Results go back through
    /// [`DataGrid::apply_fetched`].
    pub fn take_pending_fetches(&mut self) -> Vec<CellFetch> {
        std::mem::take(&mut self.pending_fetches)
    }

    pub fn has_pending_fetches(&self) -> bool {
        !self.pending_fetches.is_empty()
    }

    /// Store a fetched value. Returns false when the fetch was superseded by
    /// a refresh, theme or format change, or cache clear.
    pub fn apply_fetched(&mut self, fetch: CellFetch, result: std::result::Result<Value, SourceError>) -> bool {
        if fetch.generation != self.cache.generation() {
            log::warn!(
                "Discarding stale fetch for ({}, {}) from generation {}",
                fetch.col,
                fetch.row,
                fetch.generation
            );
            return false;
        }
        self.queued.remove(&(fetch.col, fetch.row));

        let cell = match result {
            Ok(value) => self
                .snapshot_cell(fetch.col, fetch.original_row, &value)
                .unwrap_or_else(|e| error_cell(&e)),
            Err(e) => {
                log::warn!("Failed to load cell ({}, {}): {}", fetch.col, fetch.original_row, e);
                Cell::error("Error loading value", Some(e.to_string()))
            }
        };
        self.cache.fill(fetch.col, fetch.row, cell);
        true
    }

    /// Fetch every queued cell from the data source. Returns how many were
    /// stored.
    pub async fn load_pending(&mut self) -> usize {
        let source = Rc::clone(&self.source);
        let mut stored = 0;
        for fetch in self.take_pending_fetches() {
            let result = source.cell_data(fetch.col, fetch.original_row).await;
            if self.apply_fetched(fetch, result) {
                stored += 1;
            }
        }
        stored
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Record an edit. The edit is always stored so the user sees what they
    /// typed; it is forwarded to the data source only when it validates.
    ///
    /// Returns the write-through future, or `None` when nothing is forwarded.
    pub fn set_cell(&mut self, col: usize, display_row: usize, proposed: Cell) -> Option<PendingWrite> {
        let Some(column) = self.columns.get(col) else {
            log::warn!("Ignoring edit: column {} out of bounds", col);
            return None;
        };
        if !column.is_editable {
            log::warn!("Ignoring edit: column '{}' is not editable", column.id);
            return None;
        }
        let Some(handler) = self.registry.resolve(column.data_type) else {
            log::warn!("Ignoring edit: {}", missing_handler(column));
            return None;
        };
        if display_row >= self.overlay.num_rows() {
            log::warn!("Ignoring edit: row {} out of bounds", display_row);
            return None;
        }

        let row = self.sort.to_unsorted(display_row);
        let original = match self.overlay.original_row_index(row) {
            Ok(original) => original,
            Err(e) => {
                log::warn!("Ignoring edit: {}", e);
                return None;
            }
        };

        let value = handler.extract_value(&proposed);
        let ctx = RenderContext::new(&self.theme);
        let cell = handler.edit_cell(&value, column, &ctx);
        let is_valid = cell.validation_error.is_none();

        let stamp = match self.overlay.set_cell(col, original, cell) {
            Ok(stamp) => stamp,
            Err(e) => {
                log::warn!("Ignoring edit: {}", e);
                return None;
            }
        };
        self.cache.invalidate(col, row);

        if !is_valid {
            log::debug!("Edit at ({}, {}) failed validation; not persisted", col, original);
            return None;
        }

        let source = Rc::clone(&self.source);
        let source_row = self.overlay.source_row(original);
        let session = self.session;
        Some(Box::pin(async move {
            let result = source.set_cell_data(col, source_row, value).await;
            WriteOutcome {
                col,
                original_row: original,
                stamp,
                result,
                session,
            }
        }))
    }

    /// Apply the persistence-failure policy to a finished write.
    pub fn settle_write(&mut self, outcome: WriteOutcome) -> Result<()> {
        if outcome.session != self.session {
            log::debug!("Ignoring write outcome from before the last refresh");
            return Ok(());
        }
        let WriteOutcome {
            col,
            original_row,
            stamp,
            result,
            ..
        } = outcome;
        let Err(e) = result else {
            return Ok(());
        };

        log::warn!("Failed to persist cell ({}, {}): {}", col, original_row, e);
        if self.settings.persist.on_failure == PersistFailurePolicy::Revert {
            self.revert_edit(col, original_row, stamp);
        }
        Err(GridError::Source(e))
    }

    /// Drop an edit unless a newer one replaced it. Added rows go back to
    /// the column default since they must keep a record for every column.
    fn revert_edit(&mut self, col: usize, original_row: usize, stamp: u64) {
        let current = self.overlay.cell_ref(col, original_row).and_then(|c| c.last_updated);
        if current != Some(stamp) {
            return;
        }
        if self.overlay.is_added_row(original_row) {
            let column = &self.columns[col];
            let value = self.registry.default_value(column);
            let ctx = RenderContext::new(&self.theme);
            let cell = self.registry.edit_cell(column, &value, &ctx);
            if let Err(e) = self.overlay.set_cell(col, original_row, cell) {
                log::warn!("Could not revert cell ({}, {}): {}", col, original_row, e);
            }
        } else {
            self.overlay.remove_cell(col, original_row);
        }
        if let Some(row) = self.overlay.display_row_index(original_row) {
            self.cache.invalidate(col, row);
        }
    }

    /// Append a row once the data source has. Returns its display row.
    pub async fn add_row(&mut self) -> Result<usize> {
        if !self.settings.rows.mode.allows_row_changes() {
            return Err(GridError::RowsFixed);
        }
        let source_row = self.source.add_row().await?;

        let ctx = RenderContext::new(&self.theme);
        let cells: BTreeMap<usize, Cell> = self
            .columns
            .iter()
            .enumerate()
            .map(|(col, column)| {
                let value = self.registry.default_value(column);
                (col, self.registry.edit_cell(column, &value, &ctx))
            })
            .collect();
        let original = self.overlay.add_row(&self.columns, cells, Some(source_row))?;

        let row = self.overlay.num_rows() - 1;
        self.sort.row_added(row);
        log::debug!("Added row {} (source row {})", original, source_row);
        Ok(self.sort.to_sorted(row))
    }

    /// Delete the row at a display index once the data source has. A failed
    /// or declined source delete leaves the row in place.
    pub async fn delete_row(&mut self, display_row: usize) -> Result<()> {
        if !self.settings.rows.mode.allows_row_changes() {
            return Err(GridError::RowsFixed);
        }
        let row_count = self.overlay.num_rows();
        if display_row >= row_count {
            return Err(GridError::IndexOutOfBounds {
                what: "row",
                index: display_row,
                len: row_count,
            });
        }
        let row = self.sort.to_unsorted(display_row);
        let original = self.overlay.original_row_index(row)?;
        let source_row = self.overlay.source_row(original);

        if !self.source.delete_row(source_row).await? {
            return Err(GridError::DeleteRejected { row: display_row });
        }

        self.overlay.delete_row(original)?;
        self.sort.row_removed(row);
        // later pre-sort rows shifted, so every cache key after `row` is stale
        self.clear_cache();
        log::debug!("Deleted row {} (source row {})", original, source_row);
        Ok(())
    }

    /// Reload the snapshot and start over: columns, overlay, sort and cache
    /// are rebuilt. Pending edits are discarded.
    pub async fn refresh(&mut self) -> Result<()> {
        self.source.refresh().await?;

        self.columns = self.source.column_definitions();
        self.reapply_formats();
        self.overlay = EditOverlay::with_deleted(self.source.row_count(), self.source.deleted_rows());
        self.sort.clear();
        self.clear_cache();
        self.session += 1;
        log::debug!(
            "Refreshed: {} columns, {} rows",
            self.columns.len(),
            self.overlay.num_rows()
        );
        Ok(())
    }

    // ========================================================================
    // Presentation
    // ========================================================================

    pub fn update_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.clear_cache();
    }

    /// Set format overrides by column id. An empty format clears the
    /// override. Unknown ids are ignored with a warning.
    pub fn set_column_formats(&mut self, formats: &HashMap<String, String>) {
        for (id, format) in formats {
            if self.column_index(id).is_none() {
                log::warn!("Ignoring format for unknown column '{}'", id);
                continue;
            }
            if format.trim().is_empty() {
                self.formats.remove(id);
            } else {
                self.formats.insert(id.clone(), format.clone());
            }
        }
        self.reapply_formats();
        self.clear_cache();
    }

    fn reapply_formats(&mut self) {
        for column in &mut self.columns {
            let format = self.formats.get(&column.id).map(String::as_str);
            if column.format() != format {
                *column = column.with_format(format);
            }
        }
    }

    pub fn set_styler(&mut self, styler: Option<Box<dyn CellStyler>>) {
        self.styler = styler;
        self.clear_cache();
    }

    /// Drop every cached cell and queued fetch
    pub fn clear_cache(&mut self) {
        self.cache.clear();
        self.pending_fetches.clear();
        self.queued.clear();
    }

    /// Sort by a column. `auto_reset` falls back to the `sort.auto_reset`
    /// setting. Returns the direction now applied, `None` when unsorted.
    pub fn sort_column(
        &mut self,
        col: usize,
        request: SortRequest,
        auto_reset: Option<bool>,
    ) -> Result<Option<SortDirection>> {
        let Some(column) = self.columns.get(col) else {
            return Err(GridError::IndexOutOfBounds {
                what: "column",
                index: col,
                len: self.columns.len(),
            });
        };
        let auto_reset = auto_reset.unwrap_or(self.settings.sort.auto_reset);
        let Some(direction) = self.sort.next_direction(col, request, auto_reset) else {
            self.sort.clear();
            log::debug!("Sort cleared");
            return Ok(None);
        };

        let state = SortState {
            column: col,
            column_id: column.id.clone(),
            direction,
            mode: column.sort_mode,
        };
        let cells: Vec<Cell> = (0..self.overlay.num_rows())
            .map(|row| self.resolve_unsorted(col, row).unwrap_or_else(|e| error_cell(&e)))
            .collect();
        let permutation = sort_permutation(&cells, state.mode, direction);

        log::debug!("Sorted by '{}' {:?}", state.column_id, direction);
        self.sort.apply(state, permutation);
        Ok(Some(direction))
    }

    // ========================================================================
    // Edit summary
    // ========================================================================

    pub fn edit_summary(&self) -> EditSummary {
        EditSummary::from_overlay(&self.overlay, &self.columns, &self.registry)
    }

    /// Replay a saved summary onto a fresh overlay. Nothing is sent to the
    /// data source; on error the current overlay is left untouched.
    pub fn restore_edits(&mut self, summary: &EditSummary) -> Result<()> {
        let mut overlay = EditOverlay::with_deleted(self.source.row_count(), self.source.deleted_rows());
        let ctx = RenderContext::new(&self.theme);
        summary.apply_to(&mut overlay, &self.columns, &self.registry, &ctx)?;
        self.overlay = overlay;
        self.sort.clear();
        self.clear_cache();
        Ok(())
    }
}

/// Re-derive an edited cell so column presentation changes apply, keeping
/// the edit's stamp and validation state. A value the handler cannot display
/// is returned as recorded.
fn rederive(handler: &ColumnHandler, edit: &Cell, column: &ColumnDefinition, ctx: &RenderContext<'_>) -> Cell {
    let value = handler.extract_value(edit);
    match handler.to_display_cell(&value, column, ctx) {
        Ok(mut cell) => {
            cell.last_updated = edit.last_updated;
            cell.validation_error = edit.validation_error.clone();
            cell
        }
        Err(_) => edit.clone(),
    }
}

fn error_cell(error: &GridError) -> Cell {
    match error {
        GridError::IndexOutOfBounds { .. } => {
            log::error!("{}", error);
            Cell::error(
                "Index out of bounds",
                Some(format!("{}. This should never happen, please report this bug.", error)),
            )
        }
        GridError::MissingAddedCell { .. } => Cell::error("Error during cell creation", Some(error.to_string())),
        GridError::Conversion(e) => Cell::error("Incompatible value", Some(e.to_string())),
        other => Cell::error("Error", Some(other.to_string())),
    }
}
