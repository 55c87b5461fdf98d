use std::fmt;

/// A raw value could not be turned into a display cell.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionError {
    /// Rendering of the offending value
    pub value: String,
    pub reason: String,
}

impl ConversionError {
    pub fn new(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot display '{}': {}", self.value, self.reason)
    }
}

impl std::error::Error for ConversionError {}

/// Failure reported by the external data source.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceError {
    pub message: String,
}

impl SourceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data source error: {}", self.message)
    }
}

impl std::error::Error for SourceError {}

#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// Row or column index outside the current dimensions. Always a caller
    /// bug or a race with a row-count change.
    IndexOutOfBounds {
        what: &'static str,
        index: usize,
        len: usize,
    },
    /// No column with this id.
    ColumnNotFound(String),
    /// Write attempted on a read-only column.
    NotEditable { column: String },
    /// Row count is fixed by configuration.
    RowsFixed,
    /// An added row has no edit record for a column.
    MissingAddedCell { col: usize, row: usize },
    /// `add_row` was not given a cell for an editable column.
    MissingInitialCell { column: String },
    Conversion(ConversionError),
    Source(SourceError),
    /// The data source declined to delete the row.
    DeleteRejected { row: usize },
    Serialization(String),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfBounds { what, index, len } => {
                write!(f, "{what} index {index} out of bounds (len {len})")
            }
            Self::ColumnNotFound(id) => write!(f, "column not found: {id}"),
            Self::NotEditable { column } => write!(f, "column '{column}' is not editable"),
            Self::RowsFixed => write!(f, "rows cannot be added or deleted"),
            Self::MissingAddedCell { col, row } => {
                write!(f, "added row {row} has no value for column {col}")
            }
            Self::MissingInitialCell { column } => {
                write!(f, "no initial value supplied for editable column '{column}'")
            }
            Self::Conversion(e) => write!(f, "{e}"),
            Self::Source(e) => write!(f, "{e}"),
            Self::DeleteRejected { row } => write!(f, "data source refused to delete row {row}"),
            Self::Serialization(msg) => write!(f, "serialization error: {msg}"),
        }
    }
}

impl std::error::Error for GridError {}

impl From<ConversionError> for GridError {
    fn from(e: ConversionError) -> Self {
        GridError::Conversion(e)
    }
}

impl From<SourceError> for GridError {
    fn from(e: SourceError) -> Self {
        GridError::Source(e)
    }
}

impl From<serde_json::Error> for GridError {
    fn from(e: serde_json::Error) -> Self {
        GridError::Serialization(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GridError>;
