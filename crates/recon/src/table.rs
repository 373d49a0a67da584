use std::collections::HashMap;
use std::fmt;

use ordered_float::OrderedFloat;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Cell values
// ---------------------------------------------------------------------------

/// A single cell as delivered by a document reader.
///
/// Equality is exact: `Number(40.0) != Number(40.000001)` and a number never
/// equals text, even when the text spells the same number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Number(f64),
    Text(String),
}

impl Value {
    /// Numeric value; NaN is stored as `Null`.
    pub fn number(n: f64) -> Self {
        if n.is_nan() {
            Self::Null
        } else {
            Self::Number(n)
        }
    }

    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Interpret free text from a table cell or CSV field.
    /// Empty → null, parseable float → number, anything else → text.
    pub fn parse_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Null;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Self::Number(n),
            _ => Self::Text(trimmed.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// True for null and for text that is only whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Number(_) => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Number(n) => write!(f, "{}", format_number(*n)),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Integers print without decimals.
pub(crate) fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

// ---------------------------------------------------------------------------
// Axis keys
// ---------------------------------------------------------------------------

/// Row or column key.
///
/// Ordering is total: blank < numbers < text, numbers compare numerically and
/// text by code point.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    Blank,
    Number(OrderedFloat<f64>),
    Text(String),
}

impl Key {
    /// Text goes through [`Value::parse_text`] first, so a header typed as
    /// text `"2023"` keys the same as the number 2023, and whitespace-only
    /// text is blank.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Self::Blank,
            Value::Number(n) => Self::Number(OrderedFloat(*n)),
            Value::Text(s) => match Value::parse_text(s) {
                Value::Text(s) => Self::Text(s),
                parsed => Self::from_value(&parsed),
            },
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Blank => Value::Null,
            Self::Number(n) => Value::Number(n.0),
            Self::Text(s) => Value::Text(s.clone()),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blank => Ok(()),
            Self::Number(n) => write!(f, "{}", format_number(n.0)),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<f64> for Key {
    fn from(n: f64) -> Self {
        Self::Number(OrderedFloat(n))
    }
}

// ---------------------------------------------------------------------------
// TableModel
// ---------------------------------------------------------------------------

/// Canonical matrix form of one extracted block.
///
/// Every key used in `cells` is present in `rows`/`columns`, and neither axis
/// holds duplicates. When a key repeats during construction the later
/// occurrence's values win and the key keeps its first position.
#[derive(Debug, Clone, PartialEq)]
pub struct TableModel {
    pub label: String,
    /// Header of the first column; drives orientation detection.
    pub index_name: String,
    rows: Vec<Key>,
    columns: Vec<Key>,
    cells: HashMap<(Key, Key), Value>,
}

impl TableModel {
    pub fn new(label: impl Into<String>, index_name: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            index_name: index_name.into(),
            rows: Vec::new(),
            columns: Vec::new(),
            cells: HashMap::new(),
        }
    }

    /// Build from a header row and data rows, first column being the row key.
    ///
    /// The block width is the header length without trailing nulls. A data row
    /// shorter than that, or with a non-null cell past it, is malformed.
    /// `row` numbers in errors are 1-based with the header as row 1.
    pub fn from_grid(
        label: impl Into<String>,
        header: &[Value],
        data: &[Vec<Value>],
    ) -> Result<Self, ReconError> {
        let label = label.into();
        let width = trimmed_len(header);
        let index_name = header.first().map(|v| v.to_string()).unwrap_or_default();
        let mut table = Self::new(label, index_name.trim());

        let columns: Vec<Key> = header
            .iter()
            .take(width)
            .skip(1)
            .map(Key::from_value)
            .collect();
        for column in &columns {
            if !table.insert_column(column.clone()) {
                log::warn!(
                    "block '{}': duplicate column '{}', later values win",
                    table.label,
                    column
                );
            }
        }

        for (i, row) in data.iter().enumerate() {
            let found = trimmed_len(row);
            if row.len() < width || found > width {
                return Err(ReconError::MalformedBlock {
                    label: table.label,
                    row: i + 2,
                    expected: width,
                    found: if row.len() < width { row.len() } else { found },
                });
            }
            if width == 0 {
                continue;
            }

            let key = Key::from_value(&row[0]);
            if !table.insert_row(key.clone()) {
                log::warn!(
                    "block '{}': duplicate identifier '{}', later values win",
                    table.label,
                    key
                );
            }
            for (column, value) in columns.iter().zip(&row[1..width]) {
                table.cells.insert((key.clone(), column.clone()), value.clone());
            }
        }

        Ok(table)
    }

    /// Adds a row key; returns false if it was already present.
    pub fn insert_row(&mut self, key: Key) -> bool {
        if self.rows.contains(&key) {
            return false;
        }
        self.rows.push(key);
        true
    }

    /// Adds a column key; returns false if it was already present.
    pub fn insert_column(&mut self, key: Key) -> bool {
        if self.columns.contains(&key) {
            return false;
        }
        self.columns.push(key);
        true
    }

    /// Set one cell, registering its keys on first use.
    pub fn set(&mut self, row: Key, column: Key, value: Value) {
        self.insert_row(row.clone());
        self.insert_column(column.clone());
        self.cells.insert((row, column), value);
    }

    pub fn get(&self, row: &Key, column: &Key) -> Option<&Value> {
        self.cells.get(&(row.clone(), column.clone()))
    }

    pub fn rows(&self) -> &[Key] {
        &self.rows
    }

    pub fn columns(&self) -> &[Key] {
        &self.columns
    }

    pub fn has_row(&self, key: &Key) -> bool {
        self.rows.contains(key)
    }

    pub fn has_column(&self, key: &Key) -> bool {
        self.columns.contains(key)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    /// Swap axes. The old column keys become identifiers under `index_name`.
    pub fn transposed(&self, index_name: &str) -> Self {
        let cells = self
            .cells
            .iter()
            .map(|((row, column), value)| ((column.clone(), row.clone()), value.clone()))
            .collect();
        Self {
            label: self.label.clone(),
            index_name: index_name.to_string(),
            rows: self.columns.clone(),
            columns: self.rows.clone(),
            cells,
        }
    }

    pub fn sort_axes(&mut self) {
        self.rows.sort();
        self.columns.sort();
    }
}

impl Serialize for TableModel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Repr<'a> {
            label: &'a str,
            index_name: &'a str,
            columns: &'a [Key],
            rows: Vec<RowRepr<'a>>,
        }

        #[derive(Serialize)]
        struct RowRepr<'a> {
            key: &'a Key,
            values: Vec<Value>,
        }

        let rows = self
            .rows
            .iter()
            .map(|key| RowRepr {
                key,
                values: self
                    .columns
                    .iter()
                    .map(|column| self.get(key, column).cloned().unwrap_or_default())
                    .collect(),
            })
            .collect();

        Repr {
            label: &self.label,
            index_name: &self.index_name,
            columns: &self.columns,
            rows,
        }
        .serialize(serializer)
    }
}

/// Length without trailing blank cells.
fn trimmed_len(row: &[Value]) -> usize {
    row.iter().rposition(|v| !v.is_blank()).map_or(0, |i| i + 1)
}
