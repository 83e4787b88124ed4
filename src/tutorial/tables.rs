use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Result;
use log::{info, warn};

use crate::data::clean::to_datetime;
use crate::data::filter::RowSelection;
use crate::data::loader::load_file;
use crate::data::model::{Series, Table, Value};
use crate::data::stats::{corr, describe, dtypes, null_counts};

/// Files read by the walkthrough, relative to its data directory.
pub const DATA_FILES: [&str; 3] = ["data.csv", "data.json", "data.parquet"];

/// Staff records with the usual problems: a missing name, a missing salary,
/// an age of zero, a malformed date and a duplicated row.
fn staff() -> Result<Table> {
    Ok(Table::from_columns(vec![
        (
            "Name",
            vec![
                Value::from("Alice"),
                "Bob".into(),
                "Charlie".into(),
                Value::Null,
                "Eve".into(),
                "Bob".into(),
            ],
        ),
        ("Age", vec![25.into(), 30.into(), 35.into(), 0.into(), 28.into(), 30.into()]),
        (
            "Date",
            vec![
                "2020/12/01".into(),
                "2020/12/02".into(),
                "20201226".into(),
                "2020/12/04".into(),
                "not a date".into(),
                "2020/12/02".into(),
            ],
        ),
        (
            "Salary",
            vec![
                50000.0.into(),
                60000.0.into(),
                72000.0.into(),
                Value::Null,
                56000.0.into(),
                60000.0.into(),
            ],
        ),
    ])?)
}

/// Table walkthrough: series, frames, file loading, inspection, cleaning
/// and correlation. Data files are looked up in `data_dir`.
pub fn run(data_dir: &Path) -> Result<()> {
    info!("table walkthrough");

    // --- Series ---
    let series = Series::new([1, 2, 3, 4, 5]);
    println!("Series:\n{series}");
    let series_with_index = Series::new([1, 2, 3, 4, 5]).with_index(["a", "b", "c", "d", "e"])?;
    println!("Series with custom index:\n{series_with_index}");

    // --- Tables ---
    let df = Table::from_columns(vec![
        ("Name", vec![Value::from("Alice"), "Bob".into(), "Charlie".into()]),
        ("Age", vec![25.into(), 30.into(), 35.into()]),
        ("City", vec!["New York".into(), "Los Angeles".into(), "Chicago".into()]),
    ])?;
    println!("DataFrame:\n{df}");

    // --- Reading files ---
    for name in DATA_FILES {
        let path = data_dir.join(name);
        if !path.exists() {
            warn!("{} not found, skipping (run generate_sample to create it)", path.display());
            continue;
        }
        let loaded = load_file(&path)?;
        println!("Data from {name}:\n{loaded}");
    }

    // --- Analyzing ---
    println!("Summary Statistics:\n{}", describe(&df));
    println!("Data Types:\n{}", dtypes(&df));
    println!("Missing Values:\n{}", null_counts(&df));

    // --- Cleaning empty cells ---
    let mut df = staff()?;
    println!("Raw data:\n{df}");
    println!("Data without missing values:\n{}", df.dropna());
    println!("Data with NaN replaced by 0:\n{}", df.fillna(&Value::Integer(0)));

    // --- Cleaning wrong format ---
    let dates = to_datetime(df.column("Date")?);
    df.set_column(dates)?;
    println!("Data with Date in correct format:\n{df}");

    // --- Cleaning wrong data ---
    let ages = df.column("Age")?.replace(&Value::Integer(0), &Value::Integer(30));
    df.set_column(ages)?;
    println!("Data after replacing wrong values:\n{df}");

    // --- Filtering out unwanted rows ---
    let adults = df.filter_rows("Age", |v| v.as_f64().is_some_and(|a| a >= 18.0))?;
    println!("Rows with a plausible age:\n{adults}");
    let mut selection = RowSelection::new();
    selection.insert("Name".into(), BTreeSet::from([Value::from("Bob")]));
    println!("Rows for Bob:\n{}", df.filter_selected(&selection));

    // --- Removing duplicates ---
    let df_no_duplicates = df.drop_duplicates();
    println!("Data without duplicates:\n{df_no_duplicates}");

    // --- Correlations ---
    println!("Correlations:\n{}", corr(&df));
    let df_numeric = df.select(&["Age", "Salary"])?;
    println!("Correlation Matrix:\n{}", corr(&df_numeric));

    Ok(())
}
