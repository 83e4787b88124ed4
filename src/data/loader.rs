use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, AsArray, BooleanArray, Date32Array, Float32Array, Float64Array, Int32Array, Int64Array,
    TimestampMicrosecondArray, TimestampMillisecondArray, TimestampNanosecondArray,
    TimestampSecondArray,
};
use arrow::datatypes::{DataType, TimeUnit};
use chrono::{DateTime, NaiveDate, Utc};
use log::info;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::model::{Column, IndexLabel, Table, Value};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one record per line
/// * `.json`    – records (`[{ "col": v, ... }, ...]`) or columns
///   (`{ "col": { "label": v, ... }, ... }`) orientation
/// * `.parquet` – any flat Arrow schema
pub fn load_file(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    info!(
        "loaded {} rows x {} columns from {}",
        table.nrows(),
        table.ncols(),
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, then one record per row.
/// Empty cells are missing values; the rest are typed by [`guess_value_type`].
fn load_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut columns: Vec<Vec<Value>> = vec![Vec::new(); headers.len()];

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        for (col_idx, values) in columns.iter_mut().enumerate() {
            values.push(guess_value_type(record.get(col_idx).unwrap_or("")));
        }
    }

    let columns = headers
        .into_iter()
        .zip(columns)
        .map(|(name, values)| Column { name, values })
        .collect();
    Ok(Table::new(columns)?)
}

/// Integer, then float, then bool, then string. Empty means missing.
pub fn guess_value_type(s: &str) -> Value {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("nan") || s.eq_ignore_ascii_case("null") {
        return Value::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Value::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return Value::Float(f);
    }
    match s {
        "true" | "True" => Value::Bool(true),
        "false" | "False" => Value::Bool(false),
        _ => Value::String(s.to_string()),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON, either records-oriented (`df.to_json(orient='records')`):
///
/// ```json
/// [ { "Name": "Alice", "Age": 25 }, { "Name": "Bob", "Age": 30 } ]
/// ```
///
/// or columns-oriented (the default `df.to_json()`):
///
/// ```json
/// { "Name": { "0": "Alice", "1": "Bob" }, "Age": { "0": 25, "1": 30 } }
/// ```
///
/// A column may also be a plain array: `{ "Age": [25, 30] }`.
fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    match root {
        JsonValue::Array(records) => json_records(&records),
        JsonValue::Object(columns) => json_columns(&columns),
        _ => bail!("Expected a top-level JSON array or object"),
    }
}

fn json_records(records: &[JsonValue]) -> Result<Table> {
    // Column order: first appearance across records.
    let mut names: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !names.contains(key) {
                names.push(key.clone());
            }
        }
    }

    let columns = names
        .into_iter()
        .map(|name| {
            let values = records
                .iter()
                .map(|rec| rec.get(&name).map_or(Value::Null, json_to_value))
                .collect();
            Column { name, values }
        })
        .collect();
    Ok(Table::new(columns)?)
}

fn json_columns(columns: &Map<String, JsonValue>) -> Result<Table> {
    let mut labels: Vec<String> = Vec::new();
    let mut cells: Vec<(String, BTreeMap<String, Value>)> = Vec::new();
    let mut plain: Vec<Column> = Vec::new();

    for (name, col) in columns {
        match col {
            JsonValue::Object(entries) => {
                let mut by_label = BTreeMap::new();
                for (label, v) in entries {
                    if !labels.contains(label) {
                        labels.push(label.clone());
                    }
                    by_label.insert(label.clone(), json_to_value(v));
                }
                cells.push((name.clone(), by_label));
            }
            JsonValue::Array(values) => plain.push(Column {
                name: name.clone(),
                values: values.iter().map(json_to_value).collect(),
            }),
            _ => bail!("Column '{name}' is neither an object nor an array"),
        }
    }

    if !plain.is_empty() {
        if !cells.is_empty() {
            bail!("Cannot mix array and object columns");
        }
        return Ok(Table::new(plain)?);
    }

    let columns = cells
        .into_iter()
        .map(|(name, mut by_label)| Column {
            name,
            values: labels
                .iter()
                .map(|l| by_label.remove(l).unwrap_or(Value::Null))
                .collect(),
        })
        .collect();
    let table = Table::new(columns)?;

    let positional = labels
        .iter()
        .enumerate()
        .all(|(i, l)| l.parse::<usize>() == Ok(i));
    if positional {
        Ok(table)
    } else {
        Ok(table.with_index(labels.into_iter().map(IndexLabel::Name))?)
    }
}

fn json_to_value(val: &JsonValue) -> Value {
    match val {
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Null => Value::Null,
        other => Value::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with a flat schema; every column becomes a table
/// column. Works with files written by both **Pandas** (`df.to_parquet()`)
/// and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut columns: Vec<Vec<Value>> = vec![Vec::new(); names.len()];

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for (col_idx, values) in columns.iter_mut().enumerate() {
            let col_array = batch.column(col_idx);
            for row in 0..batch.num_rows() {
                values.push(
                    extract_value(col_array, row)
                        .with_context(|| format!("Row {row}, column '{}'", names[col_idx]))?,
                );
            }
        }
    }

    // Pandas stores its index as a `__index_level_0__` column.
    let mut index = None;
    let mut table_columns = Vec::with_capacity(names.len());
    for (name, values) in names.into_iter().zip(columns) {
        if name == "__index_level_0__" {
            index = Some(values);
        } else {
            table_columns.push(Column { name, values });
        }
    }

    let table = Table::new(table_columns)?;
    match index {
        Some(labels) => Ok(table.with_index(labels.iter().map(|v| v.to_string()))?),
        None => Ok(table),
    }
}

// -- Arrow helpers --

/// Extract a single cell from an Arrow column at a given row.
fn extract_value(col: &Arc<dyn Array>, row: usize) -> Result<Value> {
    if col.is_null(row) {
        return Ok(Value::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => Value::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Value::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => Value::Integer(downcast::<Int32Array>(col)?.value(row).into()),
        DataType::Int64 => Value::Integer(downcast::<Int64Array>(col)?.value(row)),
        DataType::Float32 => Value::Float(downcast::<Float32Array>(col)?.value(row).into()),
        DataType::Float64 => Value::Float(downcast::<Float64Array>(col)?.value(row)),
        DataType::Boolean => Value::Bool(downcast::<BooleanArray>(col)?.value(row)),
        DataType::Date32 => {
            let days = downcast::<Date32Array>(col)?.value(row);
            let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).context("epoch")?;
            let date = epoch
                .checked_add_signed(chrono::Duration::days(days.into()))
                .context("date out of range")?;
            Value::Timestamp(date.and_hms_opt(0, 0, 0).context("midnight")?)
        }
        DataType::Timestamp(unit, _) => {
            let micros = match unit {
                TimeUnit::Second => downcast::<TimestampSecondArray>(col)?
                    .value(row)
                    .checked_mul(1_000_000),
                TimeUnit::Millisecond => downcast::<TimestampMillisecondArray>(col)?
                    .value(row)
                    .checked_mul(1_000),
                TimeUnit::Microsecond => Some(downcast::<TimestampMicrosecondArray>(col)?.value(row)),
                TimeUnit::Nanosecond => Some(downcast::<TimestampNanosecondArray>(col)?.value(row) / 1_000),
            }
            .context("timestamp out of range")?;
            let t = DateTime::<Utc>::from_timestamp_micros(micros).context("timestamp out of range")?;
            Value::Timestamp(t.naive_utc())
        }
        other => Value::String(format!("{other:?}")),
    };
    Ok(value)
}

fn downcast<T: 'static>(col: &Arc<dyn Array>) -> Result<&T> {
    col.as_any()
        .downcast_ref::<T>()
        .with_context(|| format!("unexpected array for {:?}", col.data_type()))
}
