//! Cleaning operations. All of them return new values and leave their
//! input untouched.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::debug;

use super::model::{Column, Table, Value};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d", "%m/%d/%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M:%S"];

/// Parse a date-like string. `None` when no known layout fits.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    for fmt in DATETIME_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(t);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    DateTime::parse_from_rfc3339(s).ok().map(|t| t.naive_utc())
}

/// Convert a column to timestamps. Entries that cannot be parsed become
/// `Null` instead of failing the whole column.
pub fn to_datetime(column: &Column) -> Column {
    let values = column
        .values
        .iter()
        .enumerate()
        .map(|(row, v)| match v {
            Value::Timestamp(_) | Value::Null => v.clone(),
            Value::String(s) => match parse_timestamp(s) {
                Some(t) => Value::Timestamp(t),
                None => {
                    debug!("{}[{row}]: '{s}' is not a date, coerced to null", column.name);
                    Value::Null
                }
            },
            other => {
                debug!("{}[{row}]: {other:?} is not a date, coerced to null", column.name);
                Value::Null
            }
        })
        .collect();
    Column {
        name: column.name.clone(),
        values,
    }
}

impl Column {
    /// Every value matching `from` replaced by `to`. Integers and floats
    /// compare numerically.
    pub fn replace(&self, from: &Value, to: &Value) -> Column {
        Column {
            name: self.name.clone(),
            values: self
                .values
                .iter()
                .map(|v| if v.matches(from) { to.clone() } else { v.clone() })
                .collect(),
        }
    }

    /// Missing entries replaced by `fill`.
    pub fn fillna(&self, fill: &Value) -> Column {
        Column {
            name: self.name.clone(),
            values: self
                .values
                .iter()
                .map(|v| if v.is_missing() { fill.clone() } else { v.clone() })
                .collect(),
        }
    }
}

impl Table {
    /// Rows without any missing value.
    pub fn dropna(&self) -> Table {
        let keep: Vec<usize> = (0..self.nrows())
            .filter(|&r| !self.row(r).iter().any(|v| v.is_missing()))
            .collect();
        debug!("dropna: removed {} of {} rows", self.nrows() - keep.len(), self.nrows());
        self.take(&keep)
    }

    /// Every missing cell replaced by `fill`.
    pub fn fillna(&self, fill: &Value) -> Table {
        self.map_columns(|c| c.fillna(fill))
    }

    /// [`Column::replace`] applied to every column.
    pub fn replace(&self, from: &Value, to: &Value) -> Table {
        self.map_columns(|c| c.replace(from, to))
    }

    /// Keep the first of each group of rows equal in every column.
    pub fn drop_duplicates(&self) -> Table {
        let mut seen: HashSet<Vec<&Value>> = HashSet::new();
        let keep: Vec<usize> = (0..self.nrows())
            .filter(|&r| seen.insert(self.row(r)))
            .collect();
        debug!(
            "drop_duplicates: removed {} of {} rows",
            self.nrows() - keep.len(),
            self.nrows()
        );
        self.take(&keep)
    }

    /// `f` must keep each column's name and length.
    fn map_columns(&self, f: impl Fn(&Column) -> Column) -> Table {
        let columns = self.columns().iter().map(f).collect();
        Table::from_parts(columns, self.index().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::data::model::IndexLabel;

    fn day(y: i32, m: u32, d: u32) -> Value {
        Value::Timestamp(NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap())
    }

    fn messy() -> Table {
        Table::from_columns(vec![
            ("Name", vec![Value::from("Alice"), "Bob".into(), Value::Null, "Alice".into()]),
            ("Age", vec![25.into(), 0.into(), 35.into(), 25.into()]),
            ("Salary", vec![50000.0.into(), Value::Null, 70000.0.into(), 50000.0.into()]),
        ])
        .unwrap()
    }

    #[test]
    fn dropna_removes_rows_with_any_missing_value() {
        let t = messy();
        let clean = t.dropna();
        assert_eq!(clean.nrows(), 2);
        assert_eq!(clean.index(), &[IndexLabel::Position(0), IndexLabel::Position(3)]);
        assert!((0..clean.nrows()).all(|r| clean.row(r).iter().all(|v| !v.is_missing())));
        assert_eq!(t.nrows(), 4);
    }

    #[test]
    fn dropna_treats_nan_as_missing() {
        let t = Table::from_columns(vec![("x", vec![1.0, f64::NAN, 3.0])]).unwrap();
        assert_eq!(t.dropna().nrows(), 2);
    }

    #[test]
    fn fillna_uses_the_constant() {
        let filled = messy().fillna(&Value::Integer(0));
        assert_eq!(filled.column("Name").unwrap().values[2], Value::Integer(0));
        assert_eq!(filled.column("Salary").unwrap().values[1], Value::Integer(0));
        assert_eq!(filled.dropna().nrows(), 4);
    }

    #[test]
    fn column_wise_cleaning_keeps_labels_and_order() {
        let t = messy().with_index(["a", "b", "c", "d"]).unwrap();
        let filled = t.fillna(&Value::Integer(0));
        assert_eq!(filled.index(), t.index());
        assert_eq!(filled.column_names(), vec!["Name", "Age", "Salary"]);
        let replaced = t.replace(&Value::Integer(0), &Value::Integer(30));
        assert_eq!(replaced.column("Age").unwrap().values[1], Value::Integer(30));
        assert_eq!(replaced.index()[1], IndexLabel::from("b"));
    }

    #[test]
    fn replace_wrong_ages() {
        let t = Table::from_columns(vec![("Age", vec![25, 30, 0])]).unwrap();
        let fixed = t.column("Age").unwrap().replace(&0.into(), &30.into());
        assert_eq!(fixed, Column::new("Age", [25, 30, 30]));
    }

    #[test]
    fn replace_matches_numerically() {
        let col = Column::new("x", [0.0, 1.5, 0.0]);
        let fixed = col.replace(&Value::Integer(0), &Value::Float(9.0));
        assert_eq!(fixed, Column::new("x", [9.0, 1.5, 9.0]));
    }

    #[test]
    fn table_wide_replace() {
        let t = messy().replace(&Value::from("Alice"), &Value::from("Alicia"));
        assert_eq!(t.column("Name").unwrap().values[3], Value::from("Alicia"));
    }

    #[test]
    fn drop_duplicates_keeps_first() {
        let t = messy();
        let unique = t.drop_duplicates();
        assert_eq!(unique.nrows(), 3);
        assert_eq!(
            unique.index(),
            &[IndexLabel::Position(0), IndexLabel::Position(1), IndexLabel::Position(2)]
        );
    }

    #[test]
    fn duplicate_rows_with_missing_values_collapse() {
        let t = Table::from_columns(vec![("a", vec![Value::Null, Value::Null]), ("b", vec![1.into(), 1.into()])])
            .unwrap();
        assert_eq!(t.drop_duplicates().nrows(), 1);
    }

    #[test]
    fn nan_rows_collapse_like_null_rows() {
        let t = Table::from_columns(vec![("x", vec![f64::NAN, f64::NAN]), ("y", vec![1.0, 1.0])]).unwrap();
        assert_eq!(t.drop_duplicates().nrows(), 1);

        let mixed = Table::from_columns(vec![
            ("x", vec![Value::Null, Value::Float(f64::NAN), Value::Float(2.0)]),
            ("y", vec![1.into(), 1.into(), 1.into()]),
        ])
        .unwrap();
        let unique = mixed.drop_duplicates();
        assert_eq!(unique.index(), &[IndexLabel::Position(0), IndexLabel::Position(2)]);

        let zeros = Table::from_columns(vec![("x", vec![0.0, -0.0])]).unwrap();
        assert_eq!(zeros.drop_duplicates().nrows(), 1);
    }

    #[test]
    fn to_datetime_coerces_bad_entries() {
        let col = Column::new(
            "Date",
            [
                Value::from("2020/12/01"),
                "2020-12-02".into(),
                "20201226".into(),
                "not a date".into(),
                Value::Null,
                Value::Integer(5),
            ],
        );
        let parsed = to_datetime(&col);
        assert_eq!(parsed.values[0], day(2020, 12, 1));
        assert_eq!(parsed.values[1], day(2020, 12, 2));
        assert_eq!(parsed.values[2], day(2020, 12, 26));
        assert_eq!(parsed.values[3], Value::Null);
        assert_eq!(parsed.values[4], Value::Null);
        assert_eq!(parsed.values[5], Value::Null);
        assert_eq!(col.values[3], Value::from("not a date"));
    }

    #[test]
    fn timestamps_keep_their_time() {
        let t = parse_timestamp("2021-03-04 05:06:07").unwrap();
        assert_eq!(t.to_string(), "2021-03-04 05:06:07");
        assert!(parse_timestamp("2021-03-04T05:06:07Z").is_some());
        assert!(parse_timestamp("12/26/2020").is_some());
        assert!(parse_timestamp("2020-13-01").is_none());
    }
}
