use anyhow::Result;
use log::info;
use ndarray::{array, Array1};

use crate::array::create::{arange, element_type, from_rows, ones, zeros};
use crate::array::indexing::{get, get2, index_axis, slice_axis};
use crate::array::search::{compress, filter, mask, sort, sort_axis};
use crate::array::shape::{concatenate, hstack, reshape, split, vstack};

/// Array walkthrough: creation, indexing, slicing, copy vs view, shape,
/// joining, splitting, searching, sorting and filtering.
pub fn run() -> Result<()> {
    info!("array walkthrough");

    // --- Creating arrays ---
    let mut arr: Array1<i64> = array![1, 2, 3, 4];
    println!("{arr}");

    let arr_2d = from_rows(vec![vec![1_i64, 2, 3], vec![4, 5, 6]])?;
    println!("{arr_2d}");

    let arr_range = arange(10);
    println!("{arr_range}");

    println!("{}", ones((3, 3)));
    println!("{}", zeros((2, 4)));

    // --- Indexing ---
    println!("{}", get(&arr, 2)?);
    println!("{}", get2(&arr_2d, 1, 2)?);
    println!("{}", get(&arr, -1)?);

    // --- Slicing ---
    println!("{}", slice_axis(arr.view(), 0, Some(1), Some(3))?);
    let row = index_axis(arr_2d.view(), 0, 1)?;
    println!("{}", slice_axis(row, 0, Some(1), None)?);

    // --- Element types ---
    let arr_int: Array1<i64> = array![1, 2, 3];
    let arr_float: Array1<f64> = array![1.1, 2.2, 3.3];
    println!("{arr_int}: {}", element_type::<i64>());
    println!("{arr_float}: {}", element_type::<f64>());

    // --- Copy vs view ---
    // A copy owns its data. A cell view shares it, so two live handles can
    // both write and see each other's writes.
    let mut arr_copy = arr.to_owned();
    arr_copy[0] = 99;
    {
        let arr_view = arr.cell_view();
        arr_view[0].set(88);
        let view_values: Vec<i64> = arr_view.iter().map(|c| c.get()).collect();
        println!("View: {view_values:?}");
    }
    println!("Original Array: {arr}");
    println!("Copy: {arr_copy}");

    // Writes through a slice land in the source.
    let mut small = array![1, 2, 3, 4];
    {
        let mut middle = slice_axis(small.view_mut(), 0, Some(1), Some(3))?;
        middle[0] = 99;
    }
    println!("After writing through a slice: {small}");

    // --- Shape ---
    println!("Shape of 2D array: {:?}", arr_2d.shape());

    // --- Reshape ---
    let arr_reshaped = reshape(arr_range.view(), &[2, 5])?;
    println!("{arr_reshaped}");
    if let Err(e) = reshape(arr_range.view(), &[3, 3]) {
        println!("Reshape to (3, 3) fails: {e}");
    }

    // --- Iterating ---
    for x in arr.iter() {
        println!("{x}");
    }
    for row in arr_2d.outer_iter() {
        println!("{row}");
    }

    // --- Joining ---
    let arr_concat = concatenate(&[arr.view(), arr.view()])?;
    println!("Concatenated array: {arr_concat}");
    let arr_stack_h = hstack(&[arr_2d.view(), arr_2d.view()])?;
    let arr_stack_v = vstack(&[arr_2d.view(), arr_2d.view()])?;
    println!("Horizontal Stack:\n{arr_stack_h}");
    println!("Vertical Stack:\n{arr_stack_v}");

    // --- Splitting ---
    let arr_split = split(arr_range.view(), 2, 0)?;
    let parts: Vec<String> = arr_split.iter().map(ToString::to_string).collect();
    println!("[{}]", parts.join(", "));

    // --- Searching ---
    let greater = mask(&arr_range, |&x| x > 5);
    println!("Elements greater than 5: {}", compress(&arr_range, &greater));

    // --- Sorting ---
    println!("Sorted Array: {}", sort(&arr_range));
    println!("Sorted 2D Array:\n{}", sort_axis(&arr_2d, 1)?);

    // --- Filtering ---
    println!("Filtered Array (less than 3): {}", filter(&arr, |&x| x < 3));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walkthrough_runs() {
        run().unwrap();
    }
}
