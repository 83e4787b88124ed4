//! Shape manipulation: reshape, concatenate, horizontal/vertical stacking
//! and equal splits.

use ndarray::{
    concatenate as nd_concatenate, Array1, Array2, ArrayBase, ArrayView, ArrayView1, ArrayView2,
    ArrayViewD, Axis, Dimension, IxDyn, RawData,
};

use super::{check_axis, ArrayError, Result};

/// Reinterpret a view with a new shape, sharing the same storage.
///
/// The element count must be unchanged; the source must be in standard
/// (row-major, contiguous) layout.
pub fn reshape<'a, A, D>(view: ArrayView<'a, A, D>, shape: &[usize]) -> Result<ArrayViewD<'a, A>>
where
    D: Dimension,
{
    let count: usize = shape.iter().product();
    if count != view.len() {
        return Err(ArrayError::ShapeMismatch {
            count: view.len(),
            shape: shape.to_vec(),
        });
    }
    view.into_shape_with_order(IxDyn(shape))
        .map_err(|e| ArrayError::Layout(e.to_string()))
}

/// Join 1-D arrays end to end.
pub fn concatenate<A: Clone>(arrays: &[ArrayView1<'_, A>]) -> Result<Array1<A>> {
    if arrays.is_empty() {
        return Err(ArrayError::NothingToJoin);
    }
    nd_concatenate(Axis(0), arrays).map_err(|e| ArrayError::Layout(e.to_string()))
}

fn stack_along<A: Clone>(axis: usize, arrays: &[ArrayView2<'_, A>]) -> Result<Array2<A>> {
    let other_axis = 1 - axis;
    let Some(first) = arrays.first() else {
        return Err(ArrayError::NothingToJoin);
    };
    let expected = first.len_of(Axis(other_axis));
    for a in arrays {
        let got = a.len_of(Axis(other_axis));
        if got != expected {
            return Err(ArrayError::StackMismatch {
                axis,
                other_axis,
                expected,
                got,
            });
        }
    }
    nd_concatenate(Axis(axis), arrays).map_err(|e| ArrayError::Layout(e.to_string()))
}

/// Column-wise join. All inputs need the same number of rows.
pub fn hstack<A: Clone>(arrays: &[ArrayView2<'_, A>]) -> Result<Array2<A>> {
    stack_along(1, arrays)
}

/// Row-wise join. All inputs need the same number of columns.
pub fn vstack<A: Clone>(arrays: &[ArrayView2<'_, A>]) -> Result<Array2<A>> {
    stack_along(0, arrays)
}

/// Split `array` into `sections` equal parts along `axis`.
///
/// Each part is a view (or mutable view) of the input; no data is copied.
pub fn split<S, D>(array: ArrayBase<S, D>, sections: usize, axis: usize) -> Result<Vec<ArrayBase<S, D>>>
where
    S: RawData,
    D: Dimension,
    ArrayBase<S, D>: SplitAt,
{
    check_axis(axis, array.ndim())?;
    let len = array.len_of(Axis(axis));
    if sections == 0 || len % sections != 0 {
        return Err(ArrayError::UnevenSplit { len, sections });
    }

    let step = len / sections;
    let mut parts = Vec::with_capacity(sections);
    let mut rest = array;
    for _ in 1..sections {
        let (head, tail) = rest.split_at_axis(Axis(axis), step);
        parts.push(head);
        rest = tail;
    }
    parts.push(rest);
    Ok(parts)
}

/// Views that can be cut in two along an axis.
pub trait SplitAt: Sized {
    fn split_at_axis(self, axis: Axis, index: usize) -> (Self, Self);
}

impl<'a, A, D: Dimension> SplitAt for ArrayView<'a, A, D> {
    fn split_at_axis(self, axis: Axis, index: usize) -> (Self, Self) {
        self.split_at(axis, index)
    }
}

impl<'a, A, D: Dimension> SplitAt for ndarray::ArrayViewMut<'a, A, D> {
    fn split_at_axis(self, axis: Axis, index: usize) -> (Self, Self) {
        self.split_at(axis, index)
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{array, Array};

    use super::*;
    use crate::array::create::arange;

    #[test]
    fn reshape_keeps_storage() {
        let a = arange(10);
        let v = reshape(a.view(), &[2, 5]).unwrap();
        assert_eq!(v.shape(), &[2, 5]);
        assert_eq!(v[[1, 0]], 5);
        assert_eq!(v.as_ptr(), a.as_ptr());
    }

    #[test]
    fn reshape_rejects_wrong_count() {
        let a = arange(10);
        assert_eq!(
            reshape(a.view(), &[3, 3]).unwrap_err(),
            ArrayError::ShapeMismatch {
                count: 10,
                shape: vec![3, 3]
            }
        );
        assert!(reshape(a.view(), &[10]).is_ok());
        assert!(reshape(a.view(), &[2, 5, 1]).is_ok());
    }

    #[test]
    fn reshape_needs_contiguous_input() {
        let a = array![[1, 2, 3], [4, 5, 6]];
        let t = a.t();
        assert!(matches!(reshape(t, &[6]), Err(ArrayError::Layout(_))));
    }

    #[test]
    fn concatenate_joins_end_to_end() {
        let a = array![1, 2, 3, 4];
        let joined = concatenate(&[a.view(), a.view()]).unwrap();
        assert_eq!(joined, array![1, 2, 3, 4, 1, 2, 3, 4]);
        assert_eq!(concatenate::<i64>(&[]).unwrap_err(), ArrayError::NothingToJoin);
    }

    #[test]
    fn stacking() {
        let a = array![[1, 2, 3], [4, 5, 6]];
        let h = hstack(&[a.view(), a.view()]).unwrap();
        assert_eq!(h, array![[1, 2, 3, 1, 2, 3], [4, 5, 6, 4, 5, 6]]);
        let v = vstack(&[a.view(), a.view()]).unwrap();
        assert_eq!(v.shape(), &[4, 3]);
        assert_eq!(v.row(3), array![4, 5, 6]);
    }

    #[test]
    fn stacking_checks_the_other_axis() {
        let a = array![[1, 2, 3], [4, 5, 6]];
        let b = array![[7, 8], [9, 10]];
        assert!(hstack(&[a.view(), b.view()]).is_ok());
        assert_eq!(
            vstack(&[a.view(), b.view()]).unwrap_err(),
            ArrayError::StackMismatch {
                axis: 0,
                other_axis: 1,
                expected: 3,
                got: 2
            }
        );
        let c = array![[1, 2, 3]];
        assert!(hstack(&[a.view(), c.view()]).is_err());
        assert_eq!(vstack::<i32>(&[]).unwrap_err(), ArrayError::NothingToJoin);
        assert_eq!(hstack::<i32>(&[]).unwrap_err(), ArrayError::NothingToJoin);
    }

    #[test]
    fn split_into_equal_views() {
        let a = arange(10);
        let parts = split(a.view(), 2, 0).unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0], array![0, 1, 2, 3, 4]);
        assert_eq!(parts[1], array![5, 6, 7, 8, 9]);
        assert_eq!(concatenate(&parts).unwrap(), a);
    }

    #[test]
    fn split_fails_when_uneven() {
        let a = arange(10);
        assert_eq!(
            split(a.view(), 3, 0).unwrap_err(),
            ArrayError::UnevenSplit {
                len: 10,
                sections: 3
            }
        );
        assert!(split(a.view(), 0, 0).is_err());
        assert!(split(a.view(), 1, 1).is_err());
    }

    #[test]
    fn split_mut_parts_alias_the_source() {
        let mut a = Array::from_shape_vec((4, 2), (0..8).collect()).unwrap();
        {
            let mut parts = split(a.view_mut(), 2, 0).unwrap();
            parts[1][[0, 0]] = -1;
        }
        assert_eq!(a[[2, 0]], -1);
    }
}
