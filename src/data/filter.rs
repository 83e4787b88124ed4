use std::collections::{BTreeMap, BTreeSet};

use super::model::{Table, Value};
use super::Result;

// ---------------------------------------------------------------------------
// Row selection: which values are accepted per column
// ---------------------------------------------------------------------------

/// Per-column selection: maps column_name → set of accepted values.
/// Columns absent from the map are not constrained.
pub type RowSelection = BTreeMap<String, BTreeSet<Value>>;

/// Return indices of rows that pass every entry of `selection`.
///
/// A row passes a column entry when:
/// * The accepted set for that column is empty → nothing accepted → fails
/// * The row's value for that column is in the accepted set → passes
/// * The table has no such column → the row's value counts as `Null`
pub fn selected_indices(table: &Table, selection: &RowSelection) -> Vec<usize> {
    (0..table.nrows())
        .filter(|&row| {
            selection.iter().all(|(col, accepted)| {
                if accepted.is_empty() {
                    return false;
                }
                match table.column(col) {
                    Ok(c) => accepted.contains(&c.values[row]),
                    Err(_) => accepted.contains(&Value::Null),
                }
            })
        })
        .collect()
}

/// Return indices of rows whose value in `column` satisfies `pred`.
pub fn filtered_indices<F>(table: &Table, column: &str, pred: F) -> Result<Vec<usize>>
where
    F: Fn(&Value) -> bool,
{
    let col = table.column(column)?;
    Ok(col
        .values
        .iter()
        .enumerate()
        .filter(|(_, v)| pred(v))
        .map(|(i, _)| i)
        .collect())
}

impl Table {
    /// Rows whose value in `column` satisfies `pred`, in their original order.
    pub fn filter_rows<F>(&self, column: &str, pred: F) -> Result<Table>
    where
        F: Fn(&Value) -> bool,
    {
        let rows = filtered_indices(self, column, pred)?;
        Ok(self.take(&rows))
    }

    /// Rows accepted by every entry of `selection`.
    pub fn filter_selected(&self, selection: &RowSelection) -> Table {
        self.take(&selected_indices(self, selection))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cities() -> Table {
        Table::from_columns(vec![
            ("City", vec![Value::from("New York"), "Chicago".into(), "Chicago".into(), Value::Null]),
            ("Age", vec![25.into(), 30.into(), 35.into(), 40.into()]),
        ])
        .unwrap()
    }

    #[test]
    fn predicate_on_one_column() {
        let t = cities();
        let older = t
            .filter_rows("Age", |v| v.as_f64().is_some_and(|a| a > 28.0))
            .unwrap();
        assert_eq!(older.nrows(), 3);
        assert_eq!(older.column("Age").unwrap().values[0], Value::Integer(30));
        assert!(t.filter_rows("Nope", |_| true).is_err());
    }

    #[test]
    fn selection_by_value_set() {
        let t = cities();
        let mut sel = RowSelection::new();
        sel.insert("City".into(), BTreeSet::from([Value::from("Chicago"), Value::Null]));
        assert_eq!(selected_indices(&t, &sel), vec![1, 2, 3]);

        sel.insert("Age".into(), BTreeSet::from([Value::Integer(35)]));
        assert_eq!(t.filter_selected(&sel).nrows(), 1);

        sel.insert("City".into(), BTreeSet::new());
        assert!(selected_indices(&t, &sel).is_empty());
    }

    #[test]
    fn unknown_column_matches_only_null() {
        let t = cities();
        let mut sel = RowSelection::new();
        sel.insert("Missing".into(), BTreeSet::from([Value::Null]));
        assert_eq!(selected_indices(&t, &sel).len(), 4);
    }
}
