// In-memory data source shared by the integration tests.
#![allow(dead_code)]

use std::cell::{Cell as Flag, RefCell};
use std::collections::BTreeSet;
use std::future::{ready, Future};
use std::rc::Rc;

use gridedit_config::{EditorSettings, Theme};
use gridedit_engine::{
    Cell, ColumnDefinition, ColumnRegistry, DataGrid, DataSource, DataType, SourceError, Value,
};

/// Row-major snapshot with switchable failure modes. Records every call
/// that would reach a real backend.
#[derive(Debug, Default)]
pub struct MemorySource {
    columns: RefCell<Vec<ColumnDefinition>>,
    rows: RefCell<Vec<Vec<Value>>>,
    deleted: RefCell<BTreeSet<usize>>,
    staged: RefCell<Option<(Vec<ColumnDefinition>, Vec<Vec<Value>>, BTreeSet<usize>)>>,

    /// Values only come through `cell_data` when false
    pub ready: Flag<bool>,
    pub fail_writes: Flag<bool>,
    pub fail_reads: Flag<bool>,
    pub reject_deletes: Flag<bool>,
    pub fail_adds: Flag<bool>,

    pub writes: RefCell<Vec<(usize, usize, Value)>>,
    pub fetches: RefCell<Vec<(usize, usize)>>,
    pub delete_calls: RefCell<Vec<usize>>,
}

impl MemorySource {
    pub fn new(columns: Vec<ColumnDefinition>, rows: Vec<Vec<Value>>) -> Self {
        let source = Self {
            columns: RefCell::new(columns),
            rows: RefCell::new(rows),
            ..Self::default()
        };
        source.ready.set(true);
        source
    }

    /// Deleted rows the source already knows about
    pub fn with_deleted(self, deleted: &[usize]) -> Self {
        *self.deleted.borrow_mut() = deleted.iter().copied().collect();
        self
    }

    /// Snapshot that `refresh` will switch to
    pub fn stage_refresh(&self, columns: Vec<ColumnDefinition>, rows: Vec<Vec<Value>>, deleted: &[usize]) {
        *self.staged.borrow_mut() = Some((columns, rows, deleted.iter().copied().collect()));
    }

    pub fn value(&self, col: usize, row: usize) -> Value {
        self.rows
            .borrow()
            .get(row)
            .and_then(|r| r.get(col))
            .cloned()
            .unwrap_or(Value::Null)
    }

    pub fn write_count(&self) -> usize {
        self.writes.borrow().len()
    }
}

impl DataSource for MemorySource {
    fn row_count(&self) -> usize {
        self.rows.borrow().len()
    }

    fn column_count(&self) -> usize {
        self.columns.borrow().len()
    }

    fn column_definitions(&self) -> Vec<ColumnDefinition> {
        self.columns.borrow().clone()
    }

    fn cell_data_ready(&self, col: usize, row: usize) -> Option<Value> {
        self.ready.get().then(|| self.value(col, row))
    }

    fn cell_data(&self, col: usize, row: usize) -> impl Future<Output = Result<Value, SourceError>> {
        self.fetches.borrow_mut().push((col, row));
        let result = if self.fail_reads.get() {
            Err(SourceError::new("read failed"))
        } else {
            Ok(self.value(col, row))
        };
        ready(result)
    }

    fn set_cell_data(&self, col: usize, row: usize, value: Value) -> impl Future<Output = Result<(), SourceError>> {
        self.writes.borrow_mut().push((col, row, value.clone()));
        let result = if self.fail_writes.get() {
            Err(SourceError::new("write failed"))
        } else {
            let mut rows = self.rows.borrow_mut();
            if let Some(slot) = rows.get_mut(row).and_then(|r| r.get_mut(col)) {
                *slot = value;
            }
            Ok(())
        };
        ready(result)
    }

    fn add_row(&self) -> impl Future<Output = Result<usize, SourceError>> {
        let result = if self.fail_adds.get() {
            Err(SourceError::new("add failed"))
        } else {
            let width = self.columns.borrow().len();
            let mut rows = self.rows.borrow_mut();
            rows.push(vec![Value::Null; width]);
            Ok(rows.len() - 1)
        };
        ready(result)
    }

    fn delete_row(&self, row: usize) -> impl Future<Output = Result<bool, SourceError>> {
        self.delete_calls.borrow_mut().push(row);
        let result = if self.reject_deletes.get() {
            Ok(false)
        } else {
            self.deleted.borrow_mut().insert(row);
            Ok(true)
        };
        ready(result)
    }

    fn deleted_rows(&self) -> BTreeSet<usize> {
        self.deleted.borrow().clone()
    }

    fn refresh(&self) -> impl Future<Output = Result<(), SourceError>> {
        if let Some((columns, rows, deleted)) = self.staged.borrow_mut().take() {
            *self.columns.borrow_mut() = columns;
            *self.rows.borrow_mut() = rows;
            *self.deleted.borrow_mut() = deleted;
        }
        ready(Ok(()))
    }
}

/// `id: text` (read-only), `qty: number` (editable), 3 rows
pub fn scenario_source() -> MemorySource {
    MemorySource::new(
        vec![
            ColumnDefinition::new("id", DataType::Text),
            ColumnDefinition::new("qty", DataType::Number).editable(true),
        ],
        vec![
            vec![Value::text("a"), Value::from(10)],
            vec![Value::text("b"), Value::from(20)],
            vec![Value::text("c"), Value::from(30)],
        ],
    )
}

pub fn grid(source: &Rc<MemorySource>) -> DataGrid<MemorySource> {
    grid_with(source, EditorSettings::default())
}

pub fn grid_with(source: &Rc<MemorySource>, settings: EditorSettings) -> DataGrid<MemorySource> {
    DataGrid::new(
        Rc::clone(source),
        Rc::new(ColumnRegistry::with_builtins()),
        settings,
        Theme::light(),
    )
}

/// Every display row of a column, as shown
pub fn column_display(grid: &mut DataGrid<MemorySource>, col: usize) -> Vec<String> {
    (0..grid.get_row_count())
        .map(|row| grid.get_cell(col, row).display_data)
        .collect()
}

/// Drive a pending write to completion and settle it
pub fn persist(grid: &mut DataGrid<MemorySource>, write: Option<gridedit_engine::PendingWrite>) -> Option<Result<(), gridedit_engine::GridError>> {
    let write = write?;
    let outcome = smol::block_on(write);
    Some(grid.settle_write(outcome))
}

pub fn edit(value: impl Into<Value>) -> Cell {
    Cell::from_value(value)
}
