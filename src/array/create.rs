use std::any::TypeId;

use ndarray::{Array, Array1, Array2, IntoDimension, Ix2};

use super::{ArrayError, Result};

/// Build a 2-D array from nested rows. Every row must have the same length.
pub fn from_rows<A: Clone>(rows: Vec<Vec<A>>) -> Result<Array2<A>> {
    let ncols = rows.first().map_or(0, Vec::len);
    let nrows = rows.len();
    let mut flat = Vec::with_capacity(nrows * ncols);

    for (row, values) in rows.into_iter().enumerate() {
        if values.len() != ncols {
            return Err(ArrayError::Ragged {
                row,
                expected: ncols,
                got: values.len(),
            });
        }
        flat.extend(values);
    }

    Array2::from_shape_vec((nrows, ncols), flat).map_err(|e| ArrayError::Layout(e.to_string()))
}

/// `0, 1, ..., n - 1` as integers.
pub fn arange(n: usize) -> Array1<i64> {
    (0..n as i64).collect()
}

pub fn ones<Sh: IntoDimension<Dim = Ix2>>(shape: Sh) -> Array2<f64> {
    Array::ones(shape.into_dimension())
}

pub fn zeros<Sh: IntoDimension<Dim = Ix2>>(shape: Sh) -> Array2<f64> {
    Array::zeros(shape.into_dimension())
}

/// Short name of an element type, in the usual `int64` / `float64` style.
pub fn element_type<A: 'static>() -> &'static str {
    let id = TypeId::of::<A>();
    if id == TypeId::of::<i64>() {
        "int64"
    } else if id == TypeId::of::<i32>() {
        "int32"
    } else if id == TypeId::of::<f64>() {
        "float64"
    } else if id == TypeId::of::<f32>() {
        "float32"
    } else if id == TypeId::of::<bool>() {
        "bool"
    } else {
        "object"
    }
}
