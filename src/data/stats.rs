//! Summary statistics and Pearson correlation over numeric columns.

use std::fmt;

use ndarray::Array2;

use super::model::{Column, IndexLabel, Series, Table, Value};

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Pairwise Pearson coefficients. `None` marks an undefined entry: a column
/// with zero variance, or fewer than two rows where both columns are present.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Array2<Option<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[[i, j]]
    }

    /// The matrix as a table labeled by column name on both axes.
    pub fn to_table(&self) -> Table {
        let columns = self
            .columns
            .iter()
            .enumerate()
            .map(|(j, name)| Column {
                name: name.clone(),
                values: self.values.column(j).iter().map(|&v| Value::from(v)).collect(),
            })
            .collect();
        let index = self.columns.iter().cloned().map(IndexLabel::Name).collect();
        Table::from_parts(columns, index)
    }
}

impl fmt::Display for CorrelationMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_table())
    }
}

fn numeric_values(col: &Column) -> Vec<Option<f64>> {
    col.values.iter().map(Value::as_f64).collect()
}

/// Pearson coefficient over the rows where both inputs are present.
pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}

/// Correlation between every pair of numeric columns.
pub fn corr(table: &Table) -> CorrelationMatrix {
    let numeric: Vec<&Column> = table
        .columns()
        .iter()
        .filter(|c| c.dtype().is_numeric())
        .collect();
    let data: Vec<Vec<Option<f64>>> = numeric.iter().map(|c| numeric_values(c)).collect();

    let k = numeric.len();
    let mut values = Array2::from_elem((k, k), None);
    for i in 0..k {
        for j in i..k {
            let r = pearson(&data[i], &data[j]);
            // Rounding can leave the diagonal a hair off 1.
            let r = if i == j { r.map(|_| 1.0) } else { r };
            values[[i, j]] = r;
            values[[j, i]] = r;
        }
    }
    CorrelationMatrix {
        columns: numeric.iter().map(|c| c.name.clone()).collect(),
        values,
    }
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

/// Linear-interpolated quantile of sorted data.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

const DESCRIBE_ROWS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

fn describe_column(col: &Column) -> Vec<Value> {
    let mut xs: Vec<f64> = col.values.iter().filter_map(Value::as_f64).collect();
    if xs.is_empty() {
        let mut out = vec![Value::Float(0.0)];
        out.resize(DESCRIBE_ROWS.len(), Value::Null);
        return out;
    }
    xs.sort_by(f64::total_cmp);
    let n = xs.len() as f64;
    let mean = xs.iter().sum::<f64>() / n;
    let std = if xs.len() > 1 {
        Value::Float((xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt())
    } else {
        Value::Null
    };
    vec![
        Value::Float(n),
        Value::Float(mean),
        std,
        Value::Float(xs[0]),
        Value::Float(quantile(&xs, 0.25)),
        Value::Float(quantile(&xs, 0.5)),
        Value::Float(quantile(&xs, 0.75)),
        Value::Float(xs[xs.len() - 1]),
    ]
}

/// count / mean / std / min / quartiles / max of every numeric column.
pub fn describe(table: &Table) -> Table {
    let columns = table
        .columns()
        .iter()
        .filter(|c| c.dtype().is_numeric())
        .map(|c| Column {
            name: c.name.clone(),
            values: describe_column(c),
        })
        .collect::<Vec<_>>();
    let index = if columns.is_empty() {
        Vec::new()
    } else {
        DESCRIBE_ROWS.iter().map(|&s| IndexLabel::from(s)).collect()
    };
    Table::from_parts(columns, index)
}

fn per_column(table: &Table, f: impl Fn(&Column) -> Value) -> Series {
    Series {
        name: None,
        index: table
            .columns()
            .iter()
            .map(|c| IndexLabel::Name(c.name.clone()))
            .collect(),
        values: table.columns().iter().map(f).collect(),
    }
}

/// Inferred type name of every column.
pub fn dtypes(table: &Table) -> Series {
    per_column(table, |c| Value::String(c.dtype().to_string()))
}

/// Number of missing cells in every column.
pub fn null_counts(table: &Table) -> Series {
    per_column(table, |c| Value::Integer(c.null_count() as i64))
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn staff() -> Table {
        Table::from_columns(vec![
            ("Name", vec![Value::from("A"), "B".into(), "C".into(), "D".into()]),
            ("Age", vec![25.into(), 30.into(), 35.into(), 40.into()]),
            ("Salary", vec![50000.0.into(), 60000.0.into(), 70000.0.into(), 80000.0.into()]),
            ("Score", vec![4.0.into(), 3.0.into(), 2.0.into(), 1.0.into()]),
            ("Flat", vec![1.into(), 1.into(), 1.into(), 1.into()]),
        ])
        .unwrap()
    }

    #[test]
    fn correlation_matrix_shape_and_diagonal() {
        let m = corr(&staff());
        assert_eq!(m.columns, vec!["Age", "Salary", "Score", "Flat"]);
        assert_eq!(m.get("Age", "Age"), Some(1.0));
        assert_abs_diff_eq!(m.get("Age", "Salary").unwrap(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.get("Age", "Score").unwrap(), -1.0, epsilon = 1e-12);
        assert_eq!(m.get("Flat", "Flat"), None);
        assert_eq!(m.get("Age", "Flat"), None);
        for i in 0..4 {
            for j in 0..4 {
                assert_eq!(m.values[[i, j]], m.values[[j, i]]);
            }
        }
    }

    #[test]
    fn pearson_uses_pairwise_complete_rows() {
        let x = [Some(1.0), Some(2.0), None, Some(4.0)];
        let y = [Some(2.0), Some(4.0), Some(100.0), Some(8.0)];
        assert_abs_diff_eq!(pearson(&x, &y).unwrap(), 1.0, epsilon = 1e-12);
        assert_eq!(pearson(&[Some(1.0)], &[Some(2.0)]), None);
    }

    #[test]
    fn pearson_stays_in_range() {
        let x = [Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)];
        let y = [Some(2.0), Some(1.0), Some(4.0), Some(3.0), Some(5.0)];
        let r = pearson(&x, &y).unwrap();
        assert!((-1.0..=1.0).contains(&r));
        assert_abs_diff_eq!(r, 0.8, epsilon = 1e-12);
    }

    #[test]
    fn describe_matches_hand_computed_values() {
        let d = describe(&staff());
        assert_eq!(d.column_names(), vec!["Age", "Salary", "Score", "Flat"]);
        let age = &d.column("Age").unwrap().values;
        assert_eq!(age[0], Value::Float(4.0));
        assert_eq!(age[1], Value::Float(32.5));
        assert_abs_diff_eq!(age[2].as_f64().unwrap(), 6.454972243679028, epsilon = 1e-12);
        assert_eq!(age[3], Value::Float(25.0));
        assert_eq!(age[4], Value::Float(28.75));
        assert_eq!(age[5], Value::Float(32.5));
        assert_eq!(age[6], Value::Float(36.25));
        assert_eq!(age[7], Value::Float(40.0));
        assert_eq!(d.index()[2], IndexLabel::from("std"));
    }

    #[test]
    fn dtypes_and_null_counts() {
        let mut t = staff();
        t.set_column(Column::new("Age", [Some(25), None, Some(35), None])).unwrap();
        let types = dtypes(&t);
        assert_eq!(types.get(&"Name".into()), Some(&Value::from("object")));
        assert_eq!(types.get(&"Salary".into()), Some(&Value::from("float64")));
        let nulls = null_counts(&t);
        assert_eq!(nulls.get(&"Age".into()), Some(&Value::Integer(2)));
        assert_eq!(nulls.get(&"Name".into()), Some(&Value::Integer(0)));
    }
}
