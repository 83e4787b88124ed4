//! Text rendering. Tables go through an Arrow `RecordBatch` so the grid
//! layout comes from `arrow::util::pretty`.

use std::fmt;
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::display::FormatOptions;
use arrow::util::pretty::pretty_format_batches_with_options;

use super::model::{Column, DType, Series, Table, Value};
use super::{Result, TableError};

/// Arrow array holding `col`, typed by the column's inferred dtype.
/// Mixed, string and timestamp columns are rendered to text.
fn column_to_arrow(col: &Column) -> (DataType, ArrayRef) {
    match col.dtype() {
        DType::Int64 => {
            let values: Vec<Option<i64>> = col
                .values
                .iter()
                .map(|v| match v {
                    Value::Integer(i) => Some(*i),
                    _ => None,
                })
                .collect();
            (DataType::Int64, Arc::new(Int64Array::from(values)))
        }
        DType::Float64 => {
            let values: Vec<Option<f64>> = col.values.iter().map(Value::as_f64).collect();
            (DataType::Float64, Arc::new(Float64Array::from(values)))
        }
        DType::Bool => {
            let values: Vec<Option<bool>> = col
                .values
                .iter()
                .map(|v| match v {
                    Value::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect();
            (DataType::Boolean, Arc::new(BooleanArray::from(values)))
        }
        DType::DateTime | DType::String | DType::Object | DType::Null => {
            let values: Vec<Option<String>> = col
                .values
                .iter()
                .map(|v| (!v.is_missing()).then(|| v.to_string()))
                .collect();
            (DataType::Utf8, Arc::new(StringArray::from(values)))
        }
    }
}

/// The table as a record batch. The first, unnamed column carries the row
/// labels.
pub fn to_record_batch(table: &Table) -> Result<RecordBatch> {
    let mut fields = vec![Field::new("", DataType::Utf8, false)];
    let mut arrays: Vec<ArrayRef> = vec![Arc::new(StringArray::from_iter_values(
        table.index().iter().map(ToString::to_string),
    ))];

    for col in table.columns() {
        let (data_type, array) = column_to_arrow(col);
        fields.push(Field::new(col.name.as_str(), data_type, true));
        arrays.push(array);
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)
        .map_err(|e| TableError::Arrow(e.to_string()))
}

/// Render `table` as a text grid, missing cells shown as `NaN`.
pub fn render(table: &Table) -> Result<String> {
    let batch = to_record_batch(table)?;
    let options = FormatOptions::default().with_null("NaN");
    pretty_format_batches_with_options(&[batch], &options)
        .map(|grid| grid.to_string())
        .map_err(|e| TableError::Arrow(e.to_string()))
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grid = render(self).map_err(|_| fmt::Error)?;
        f.write_str(&grid)
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<String> = self.index.iter().map(ToString::to_string).collect();
        let width = labels.iter().map(String::len).max().unwrap_or(0);
        for (label, value) in labels.iter().zip(&self.values) {
            writeln!(f, "{label:<width$}    {value}")?;
        }
        match &self.name {
            Some(name) => write!(f, "Name: {name}, dtype: {}", self.dtype()),
            None => write!(f, "dtype: {}", self.dtype()),
        }
    }
}

#[cfg(test)]
mod tests {
    use arrow::array::Array;

    use super::*;

    #[test]
    fn record_batch_types_follow_dtypes() {
        let t = Table::from_columns(vec![
            ("Name", vec![Value::from("Alice"), "Bob".into()]),
            ("Age", vec![25.into(), Value::Null]),
            ("Salary", vec![1.5.into(), 2.into()]),
            ("Active", vec![true.into(), false.into()]),
        ])
        .unwrap();
        let batch = to_record_batch(&t).unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), 5);
        let schema = batch.schema();
        assert_eq!(schema.field(1).data_type(), &DataType::Utf8);
        assert_eq!(schema.field(2).data_type(), &DataType::Int64);
        assert_eq!(schema.field(3).data_type(), &DataType::Float64);
        assert_eq!(schema.field(4).data_type(), &DataType::Boolean);
        assert_eq!(batch.column(2).null_count(), 1);
    }

    #[test]
    fn rendered_grid_shows_labels_and_missing() {
        let t = Table::from_columns(vec![("Age", vec![Value::Integer(25), Value::Null])])
            .unwrap()
            .with_index(["x", "y"])
            .unwrap();
        let text = t.to_string();
        assert!(text.contains("Age"));
        assert!(text.lines().any(|l| l.starts_with("| x ")));
        assert!(text.contains("NaN"));
    }

    #[test]
    fn series_layout() {
        let s = Series::new([1, 2]).with_index(["a", "bb"]).unwrap().named("n");
        assert_eq!(s.to_string(), "a     1\nbb    2\nName: n, dtype: int64");
    }
}
