pub mod cache;
pub mod cell;
pub mod column;
pub mod columns;
pub mod error;
pub mod format;
pub mod grid;
pub mod overlay;
pub mod row_index;
pub mod sort;
pub mod source;
pub mod summary;
pub mod validation;
pub mod value;

pub use cell::{Cell, CellKind};
pub use column::{ColumnDefinition, ColumnParams, DataType, SortMode};
pub use columns::{ColumnHandler, ColumnRegistry, RenderContext};
pub use error::{ConversionError, GridError, Result, SourceError};
pub use grid::{CellFetch, DataGrid, PendingWrite, WriteOutcome};
pub use overlay::{AddedRow, EditOverlay};
pub use row_index::RowIndex;
pub use sort::{SortDirection, SortRequest, SortState};
pub use source::{CellStyler, DataSource};
pub use summary::EditSummary;
pub use value::Value;
