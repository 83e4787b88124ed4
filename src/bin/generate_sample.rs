use std::path::Path;

use anyhow::Result;
use numframe::data::sample::{generate, write_all, SimpleRng};

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);
    write_all(&rows, Path::new("."))?;

    println!("Wrote {} rows to data.csv, data.json and data.parquet", rows.len());
    Ok(())
}
