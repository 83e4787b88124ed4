/// Data layer: table model, loading, cleaning, statistics and rendering.
///
/// Architecture:
/// ```text
///  literals / .csv / .json / .parquet  (sample writes the files)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  Vec<Column>, row labels
///   └──────────┘
///        │
///        ├──► clean    dropna / fillna / to_datetime / replace / drop_duplicates
///        ├──► filter   row predicates → indices → new Table
///        ├──► stats    corr / describe / dtypes / null counts
///        ▼
///   ┌──────────┐
///   │ display   │  Table → Arrow RecordBatch → text grid
///   └──────────┘
/// ```

pub mod clean;
pub mod display;
pub mod filter;
pub mod loader;
pub mod model;
pub mod sample;
pub mod stats;

use thiserror::Error;

/// Errors from table operations other than file loading.
#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    #[error("column '{column}' has {got} values, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        got: usize,
    },

    #[error("no column named '{0}'")]
    UnknownColumn(String),

    #[error("index has {got} labels, expected {expected}")]
    IndexLength { expected: usize, got: usize },

    #[error("rendering table: {0}")]
    Arrow(String),
}

pub type Result<T> = std::result::Result<T, TableError>;
