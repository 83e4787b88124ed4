//! Searching, filtering and sorting.
//!
//! Everything except [`sort_in_place`] returns a fresh array and leaves its
//! input untouched.

use std::cmp::Ordering;

use ndarray::{Array, Array1, ArrayBase, ArrayViewMut, Axis, Data, Dimension, Zip};

use super::{check_axis, Result};

/// Ascending order with NaN-like values (those unequal to themselves) last.
#[allow(clippy::eq_op)]
fn ascending<A: PartialOrd>(a: &A, b: &A) -> Ordering {
    a.partial_cmp(b).unwrap_or_else(|| {
        let a_nan = a != a;
        let b_nan = b != b;
        a_nan.cmp(&b_nan)
    })
}

/// Evaluate `pred` on every element.
pub fn mask<A, S, D, F>(array: &ArrayBase<S, D>, pred: F) -> Array<bool, D>
where
    S: Data<Elem = A>,
    D: Dimension,
    F: Fn(&A) -> bool,
{
    array.map(pred)
}

/// Elements whose mask entry is `true`, in row-major order.
///
/// # Panics
/// If `mask` and `array` differ in shape.
pub fn compress<A, S, D>(array: &ArrayBase<S, D>, mask: &Array<bool, D>) -> Array1<A>
where
    A: Clone,
    S: Data<Elem = A>,
    D: Dimension,
{
    let mut out = Vec::new();
    Zip::from(array).and(mask).for_each(|x, &keep| {
        if keep {
            out.push(x.clone());
        }
    });
    Array1::from_vec(out)
}

/// Elements satisfying `pred`, in row-major order.
pub fn filter<A, S, D, F>(array: &ArrayBase<S, D>, pred: F) -> Array1<A>
where
    A: Clone,
    S: Data<Elem = A>,
    D: Dimension,
    F: Fn(&A) -> bool,
{
    array.iter().filter(|&x| pred(x)).cloned().collect()
}

/// Sorted copy of all elements, flattened. Equal elements keep their order.
pub fn sort<A, S, D>(array: &ArrayBase<S, D>) -> Array1<A>
where
    A: Clone + PartialOrd,
    S: Data<Elem = A>,
    D: Dimension,
{
    let mut data: Vec<A> = array.iter().cloned().collect();
    data.sort_by(ascending);
    Array1::from_vec(data)
}

/// Sort every lane along `axis` in place.
pub fn sort_in_place<A, D>(mut array: ArrayViewMut<'_, A, D>, axis: usize) -> Result<()>
where
    A: Clone + PartialOrd,
    D: Dimension,
{
    check_axis(axis, array.ndim())?;
    let mut buf = Vec::with_capacity(array.len_of(Axis(axis)));
    for mut lane in array.lanes_mut(Axis(axis)) {
        buf.clear();
        buf.extend(lane.iter().cloned());
        buf.sort_by(ascending);
        for (slot, value) in lane.iter_mut().zip(buf.drain(..)) {
            *slot = value;
        }
    }
    Ok(())
}

/// Copy of `array` with every lane along `axis` sorted.
pub fn sort_axis<A, S, D>(array: &ArrayBase<S, D>, axis: usize) -> Result<Array<A, D>>
where
    A: Clone + PartialOrd,
    S: Data<Elem = A>,
    D: Dimension,
{
    let mut out = array.to_owned();
    sort_in_place(out.view_mut(), axis)?;
    Ok(out)
}
