use std::collections::BTreeSet;
use std::fmt;

use chrono::{NaiveDateTime, Timelike};

use super::{Result, TableError};

// ---------------------------------------------------------------------------
// Value – a single cell in a column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common Pandas dtypes.
/// Rows are hashed and ordered for de-duplication, so `Value` must be `Ord`.
#[derive(Debug, Clone)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Timestamp(NaiveDateTime),
    /// Missing value.
    Null,
}

// -- Manual Eq/Ord/Hash so Value can live in BTreeSet / HashSet --
//
// A float NaN is missing, so it is equal to `Null` (and to any other NaN).
// `-0.0` is equal to `0.0`. Hashing follows the same classes.

fn rank(v: &Value) -> u8 {
    match v {
        _ if v.is_missing() => 0,
        Value::Bool(_) => 1,
        Value::Integer(_) => 2,
        Value::Float(_) => 3,
        Value::String(_) => 4,
        Value::Timestamp(_) => 5,
        Value::Null => 0,
    }
}

/// `-0.0` folded into `0.0`.
fn unsigned_zero(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else {
        v
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use Value::*;
        let (ra, rb) = (rank(self), rank(other));
        if ra != rb || ra == 0 {
            return ra.cmp(&rb);
        }
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => unsigned_zero(*a).total_cmp(&unsigned_zero(*b)),
            (String(a), String(b)) => a.cmp(b),
            (Timestamp(a), Timestamp(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        rank(self).hash(state);
        match self {
            _ if self.is_missing() => {}
            Value::String(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => unsigned_zero(*f).to_bits().hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Timestamp(t) => t.hash(state),
            Value::Null => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) if v.is_nan() => write!(f, "NaN"),
            Value::Float(v) if v.fract() == 0.0 && v.abs() < 1e15 => write!(f, "{v:.1}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Timestamp(t) if t.time().num_seconds_from_midnight() == 0 => {
                write!(f, "{}", t.date())
            }
            Value::Timestamp(t) => write!(f, "{t}"),
            Value::Null => write!(f, "NaN"),
        }
    }
}

impl Value {
    /// `Null`, or a float NaN.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Try to interpret the value as an `f64` for numeric statistics.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) if !v.is_nan() => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Equality where integers and floats compare by numeric value.
    pub fn matches(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Integer(_), Value::Float(_)) | (Value::Float(_), Value::Integer(_)) => {
                self.as_f64() == other.as_f64()
            }
            _ => self == other,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Timestamp(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

// ---------------------------------------------------------------------------
// DType – inferred type of a column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DType {
    Int64,
    Float64,
    Bool,
    DateTime,
    String,
    /// Mixed value types.
    Object,
    /// Every value is missing.
    Null,
}

impl DType {
    /// Infer from the non-missing values. Integers mixed with floats widen
    /// to `Float64`.
    pub fn infer<'a>(values: impl IntoIterator<Item = &'a Value>) -> DType {
        let mut seen: BTreeSet<u8> = BTreeSet::new();
        for v in values {
            if v.is_missing() {
                continue;
            }
            seen.insert(match v {
                Value::Integer(_) => 0,
                Value::Float(_) => 1,
                Value::Bool(_) => 2,
                Value::Timestamp(_) => 3,
                Value::String(_) => 4,
                Value::Null => unreachable!("missing values are skipped"),
            });
        }
        let kinds: Vec<u8> = seen.into_iter().collect();
        match kinds.as_slice() {
            [] => DType::Null,
            [0] => DType::Int64,
            [1] | [0, 1] => DType::Float64,
            [2] => DType::Bool,
            [3] => DType::DateTime,
            [4] => DType::String,
            _ => DType::Object,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, DType::Int64 | DType::Float64)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DType::Int64 => "int64",
            DType::Float64 => "float64",
            DType::Bool => "bool",
            DType::DateTime => "datetime64",
            DType::String | DType::Object => "object",
            DType::Null => "null",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Row labels
// ---------------------------------------------------------------------------

/// A row label: the default position or an explicit name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndexLabel {
    Position(usize),
    Name(String),
}

impl fmt::Display for IndexLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexLabel::Position(i) => write!(f, "{i}"),
            IndexLabel::Name(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for IndexLabel {
    fn from(s: &str) -> Self {
        IndexLabel::Name(s.to_string())
    }
}

impl From<String> for IndexLabel {
    fn from(s: String) -> Self {
        IndexLabel::Name(s)
    }
}

fn default_index(len: usize) -> Vec<IndexLabel> {
    (0..len).map(IndexLabel::Position).collect()
}

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

/// A named, ordered run of values.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new<V: Into<Value>>(name: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Column {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn dtype(&self) -> DType {
        DType::infer(&self.values)
    }

    /// Number of missing entries.
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_missing()).count()
    }
}

// ---------------------------------------------------------------------------
// Series – one labeled column
// ---------------------------------------------------------------------------

/// A one-dimensional labeled array.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: Option<String>,
    pub index: Vec<IndexLabel>,
    pub values: Vec<Value>,
}

impl Series {
    /// Series with the default `0..n` labels.
    pub fn new<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        Series {
            name: None,
            index: default_index(values.len()),
            values,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replace the labels. There must be one per value.
    pub fn with_index<L: Into<IndexLabel>>(mut self, labels: impl IntoIterator<Item = L>) -> Result<Self> {
        let index: Vec<IndexLabel> = labels.into_iter().map(Into::into).collect();
        if index.len() != self.values.len() {
            return Err(TableError::IndexLength {
                expected: self.values.len(),
                got: index.len(),
            });
        }
        self.index = index;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn dtype(&self) -> DType {
        DType::infer(&self.values)
    }

    /// Value under `label`, if any.
    pub fn get(&self, label: &IndexLabel) -> Option<&Value> {
        self.index
            .iter()
            .position(|l| l == label)
            .map(|i| &self.values[i])
    }
}

// ---------------------------------------------------------------------------
// Table – the labeled, column-oriented frame
// ---------------------------------------------------------------------------

/// Equal-length columns plus one label per row.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    index: Vec<IndexLabel>,
}

impl Table {
    /// Build from an ordered `name → values` mapping. Every column must
    /// have the same length.
    pub fn from_columns<N, V>(columns: Vec<(N, Vec<V>)>) -> Result<Self>
    where
        N: Into<String>,
        V: Into<Value>,
    {
        let columns = columns
            .into_iter()
            .map(|(name, values)| Column::new(name, values))
            .collect();
        Self::new(columns)
    }

    /// Build from already-typed columns.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let nrows = columns.first().map_or(0, Column::len);
        for col in &columns {
            if col.len() != nrows {
                return Err(TableError::LengthMismatch {
                    column: col.name.clone(),
                    expected: nrows,
                    got: col.len(),
                });
            }
        }
        Ok(Table {
            columns,
            index: default_index(nrows),
        })
    }

    /// Assemble a table whose shape is known to be consistent.
    pub(crate) fn from_parts(columns: Vec<Column>, index: Vec<IndexLabel>) -> Self {
        debug_assert!(columns.iter().all(|c| c.len() == index.len()));
        Table { columns, index }
    }

    /// Replace the row labels. There must be one per row.
    pub fn with_index<L: Into<IndexLabel>>(mut self, labels: impl IntoIterator<Item = L>) -> Result<Self> {
        let index: Vec<IndexLabel> = labels.into_iter().map(Into::into).collect();
        if index.len() != self.nrows() {
            return Err(TableError::IndexLength {
                expected: self.nrows(),
                got: index.len(),
            });
        }
        self.index = index;
        Ok(self)
    }

    pub fn nrows(&self) -> usize {
        self.index.len()
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nrows() == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn index(&self) -> &[IndexLabel] {
        &self.index
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| TableError::UnknownColumn(name.to_string()))
    }

    /// Column `name` as a series sharing the table's labels.
    pub fn series(&self, name: &str) -> Result<Series> {
        let col = self.column(name)?;
        Ok(Series {
            name: Some(col.name.clone()),
            index: self.index.clone(),
            values: col.values.clone(),
        })
    }

    /// Cells of row `i`, in column order.
    pub fn row(&self, i: usize) -> Vec<&Value> {
        self.columns.iter().map(|c| &c.values[i]).collect()
    }

    /// Replace the column with the same name, or append it.
    pub fn set_column(&mut self, column: Column) -> Result<()> {
        let got = column.len();
        if !self.columns.is_empty() && got != self.nrows() {
            return Err(TableError::LengthMismatch {
                column: column.name,
                expected: self.nrows(),
                got,
            });
        }
        if self.columns.is_empty() {
            self.index = default_index(column.len());
        }
        match self.columns.iter_mut().find(|c| c.name == column.name) {
            Some(slot) => *slot = column,
            None => self.columns.push(column),
        }
        Ok(())
    }

    /// New table holding only `names`, in that order.
    pub fn select(&self, names: &[&str]) -> Result<Table> {
        let columns = names
            .iter()
            .map(|n| self.column(n).cloned())
            .collect::<Result<Vec<_>>>()?;
        Ok(Table {
            columns,
            index: self.index.clone(),
        })
    }

    /// New table holding rows `rows`, in that order, labels included.
    pub fn take(&self, rows: &[usize]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                values: rows.iter().map(|&r| c.values[r].clone()).collect(),
            })
            .collect();
        Table {
            columns,
            index: rows.iter().map(|&r| self.index[r].clone()).collect(),
        }
    }
}
