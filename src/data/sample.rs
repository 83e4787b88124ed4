//! Deterministic sample data for the table walkthrough, written as CSV,
//! JSON and Parquet.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use log::info;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// One row of the sample files. `None` cells are written as empty / null.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Record {
    pub name: Option<String>,
    pub age: i64,
    pub city: String,
    pub date: String,
    pub salary: Option<f64>,
}

/// Minimal deterministic PRNG (xoshiro256**)
pub struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    pub fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }
}

/// Staff rows with a missing name, a missing salary, an age of zero, a
/// malformed date, a compact date and a duplicated last row.
pub fn generate(rng: &mut SimpleRng) -> Vec<Record> {
    let names = ["Alice", "Bob", "Charlie", "Diana", "Eve", "Frank", "Grace", "Heidi"];
    let cities = ["New York", "Los Angeles", "Chicago", "Houston"];

    let mut rows: Vec<Record> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let age = 22 + rng.below(40) as i64;
            Record {
                name: Some(name.to_string()),
                age,
                city: cities[rng.below(cities.len())].to_string(),
                date: format!("2020/12/{:02}", i + 1),
                salary: Some((30_000.0 + 1_000.0 * age as f64 + 5_000.0 * rng.next_f64()).round()),
            }
        })
        .collect();

    rows[2].name = None;
    rows[3].salary = None;
    rows[4].age = 0;
    rows[5].date = "not a date".to_string();
    rows[6].date = "20201226".to_string();
    let duplicate = rows[1].clone();
    rows.push(duplicate);
    rows
}

pub fn write_csv(rows: &[Record], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

/// Records orientation: one object per row.
pub fn write_json(rows: &[Record], path: &Path) -> Result<()> {
    let file = File::create(path).context("creating JSON")?;
    serde_json::to_writer_pretty(file, rows).context("writing JSON")?;
    Ok(())
}

pub fn write_parquet(rows: &[Record], path: &Path) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Name", DataType::Utf8, true),
        Field::new("Age", DataType::Int64, false),
        Field::new("City", DataType::Utf8, false),
        Field::new("Date", DataType::Utf8, false),
        Field::new("Salary", DataType::Float64, true),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(
            rows.iter().map(|r| r.name.as_deref()).collect::<Vec<_>>(),
        )),
        Arc::new(Int64Array::from(rows.iter().map(|r| r.age).collect::<Vec<_>>())),
        Arc::new(StringArray::from(
            rows.iter().map(|r| r.city.as_str()).collect::<Vec<_>>(),
        )),
        Arc::new(StringArray::from(
            rows.iter().map(|r| r.date.as_str()).collect::<Vec<_>>(),
        )),
        Arc::new(Float64Array::from(rows.iter().map(|r| r.salary).collect::<Vec<_>>())),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

/// Write `data.csv`, `data.json` and `data.parquet` into `dir`.
pub fn write_all(rows: &[Record], dir: &Path) -> Result<()> {
    write_csv(rows, &dir.join("data.csv"))?;
    write_json(rows, &dir.join("data.json"))?;
    write_parquet(rows, &dir.join("data.parquet"))?;
    info!("wrote {} rows to {}", rows.len(), dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_file;
    use crate::data::model::{Column, Table, Value};

    fn expected(rows: &[Record]) -> Table {
        Table::new(vec![
            Column::new("Name", rows.iter().map(|r| r.name.clone())),
            Column::new("Age", rows.iter().map(|r| r.age)),
            Column::new("City", rows.iter().map(|r| r.city.clone())),
            Column::new("Date", rows.iter().map(|r| r.date.clone())),
            Column::new("Salary", rows.iter().map(|r| r.salary)),
        ])
        .unwrap()
    }

    #[test]
    fn generated_rows_carry_the_dirty_cases() {
        let rows = generate(&mut SimpleRng::new(42));
        assert_eq!(rows.len(), 9);
        assert!(rows[2].name.is_none());
        assert!(rows[3].salary.is_none());
        assert_eq!(rows[4].age, 0);
        assert_eq!(rows[8].name, rows[1].name);
        assert_eq!(rows[8].salary, rows[1].salary);
    }

    #[test]
    fn written_files_load_back() {
        let rows = generate(&mut SimpleRng::new(42));
        let dir = tempfile::tempdir().unwrap();
        write_all(&rows, dir.path()).unwrap();
        let want = expected(&rows);

        for name in ["data.json", "data.parquet"] {
            let loaded = load_file(&dir.path().join(name)).unwrap();
            assert_eq!(loaded, want, "{name}");
            assert_eq!(loaded.column("Name").unwrap().null_count(), 1);
            assert_eq!(loaded.column("Salary").unwrap().null_count(), 1);
            assert_eq!(loaded.drop_duplicates().nrows(), rows.len() - 1);
        }

        // CSV cells are typed by content, so the compact date reads as a number.
        let csv = load_file(&dir.path().join("data.csv")).unwrap();
        let mut want_csv = want.clone();
        let mut dates = want.column("Date").unwrap().clone();
        dates.values[6] = Value::Integer(20201226);
        want_csv.set_column(dates).unwrap();
        assert_eq!(csv, want_csv);
        assert_eq!(csv.drop_duplicates().nrows(), rows.len() - 1);
    }
}
