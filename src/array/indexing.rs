//! Element access and slicing with python-style bounds.
//!
//! Every slice here is a view: it consumes a view (or mutable view) of the
//! source and returns one over a sub-range of the same storage.

use ndarray::{ArrayBase, Axis, Data, Dimension, Ix1, Ix2, RawData, RemoveAxis, Slice};

use super::{check_axis, ArrayError, Result};

/// Map a possibly negative index onto `0..len`.
pub fn resolve_index(index: isize, len: usize) -> Result<usize> {
    let resolved = if index < 0 {
        len.checked_sub(index.unsigned_abs())
    } else {
        Some(index as usize).filter(|&i| i < len)
    };
    resolved.ok_or(ArrayError::IndexOutOfBounds { index, len })
}

/// Element `index` of a 1-D array.
pub fn get<A, S>(array: &ArrayBase<S, Ix1>, index: isize) -> Result<A>
where
    A: Clone,
    S: Data<Elem = A>,
{
    let i = resolve_index(index, array.len())?;
    Ok(array[i].clone())
}

/// Element `(row, col)` of a 2-D array.
pub fn get2<A, S>(array: &ArrayBase<S, Ix2>, row: isize, col: isize) -> Result<A>
where
    A: Clone,
    S: Data<Elem = A>,
{
    let (nrows, ncols) = array.dim();
    let r = resolve_index(row, nrows)?;
    let c = resolve_index(col, ncols)?;
    Ok(array[[r, c]].clone())
}

fn clamp_bound(bound: Option<isize>, len: usize, open: usize) -> usize {
    match bound {
        None => open,
        Some(b) if b < 0 => len.saturating_sub(b.unsigned_abs()),
        Some(b) => (b as usize).min(len),
    }
}

/// Half-open `start..end` range on `0..len`. Out-of-range bounds clamp, a
/// reversed range is empty.
pub fn slice_bounds(start: Option<isize>, end: Option<isize>, len: usize) -> (usize, usize) {
    let s = clamp_bound(start, len, 0);
    let e = clamp_bound(end, len, len);
    (s, e.max(s))
}

/// Restrict `axis` to `start..end`.
///
/// Works on `ArrayView` and `ArrayViewMut` alike; the result borrows the
/// same storage as its input.
pub fn slice_axis<S, D>(
    array: ArrayBase<S, D>,
    axis: usize,
    start: Option<isize>,
    end: Option<isize>,
) -> Result<ArrayBase<S, D>>
where
    S: RawData,
    D: Dimension,
{
    check_axis(axis, array.ndim())?;
    let (s, e) = slice_bounds(start, end, array.len_of(Axis(axis)));
    Ok(array.slice_axis_move(Axis(axis), Slice::from(s..e)))
}

/// Pick sub-array `index` along `axis`, dropping that axis.
pub fn index_axis<S, D>(
    array: ArrayBase<S, D>,
    axis: usize,
    index: isize,
) -> Result<ArrayBase<S, D::Smaller>>
where
    S: RawData,
    D: RemoveAxis,
{
    check_axis(axis, array.ndim())?;
    let i = resolve_index(index, array.len_of(Axis(axis)))?;
    Ok(array.index_axis_move(Axis(axis), i))
}
