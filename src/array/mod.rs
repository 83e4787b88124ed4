/// Array layer: thin, checked operations over `ndarray`.
///
/// Architecture:
/// ```text
///   literal data
///        │
///        ▼
///   ┌──────────┐
///   │  create   │  literals / arange / ones / zeros → Array
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐      ┌──────────┐      ┌──────────┐
///   │ indexing  │      │  shape    │      │  search   │
///   └──────────┘      └──────────┘      └──────────┘
///   index, slice       reshape, join,     mask, filter,
///   → views            split → views      sort → copies
/// ```
///
/// Views (`ArrayView`, `ArrayViewMut`) borrow the source storage, so writes
/// through a view land in the source. `to_owned()` is the copy.

pub mod create;
pub mod indexing;
pub mod search;
pub mod shape;

use thiserror::Error;

/// Errors raised by the checked array operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArrayError {
    #[error("cannot reshape array of {count} elements into shape {shape:?}")]
    ShapeMismatch { count: usize, shape: Vec<usize> },

    #[error("array of length {len} cannot be split into {sections} equal sections")]
    UnevenSplit { len: usize, sections: usize },

    #[error("cannot stack along axis {axis}: expected extent {expected} on axis {other_axis}, got {got}")]
    StackMismatch {
        axis: usize,
        other_axis: usize,
        expected: usize,
        got: usize,
    },

    #[error("need at least one array to join")]
    NothingToJoin,

    #[error("index {index} is out of bounds for axis of length {len}")]
    IndexOutOfBounds { index: isize, len: usize },

    #[error("axis {axis} is out of bounds for array with {ndim} dimensions")]
    AxisOutOfBounds { axis: usize, ndim: usize },

    #[error("row {row} has {got} elements, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        got: usize,
    },

    #[error("operation needs a contiguous array: {0}")]
    Layout(String),
}

pub type Result<T> = std::result::Result<T, ArrayError>;

pub(crate) fn check_axis(axis: usize, ndim: usize) -> Result<()> {
    if axis >= ndim {
        return Err(ArrayError::AxisOutOfBounds { axis, ndim });
    }
    Ok(())
}
