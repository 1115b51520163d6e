use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use crate::config::ComparisonConfig;
use crate::error::CompareError;
use crate::model::TableSide;
use crate::table::{Row, Table};
use crate::value::CellValue;

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// Group identity: one normalized value per key column (or the row number in
/// position-only mode). Ordered lexicographically over `CellValue`'s total
/// order, so mixed-type tuples still sort deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Key(Vec<CellValue>);

impl Key {
    pub fn new(values: Vec<CellValue>) -> Self {
        Key(values)
    }

    /// Key for the `row_number`-th row (1-based) in position-only mode.
    pub fn position(row_number: usize) -> Self {
        Key(vec![CellValue::from(row_number as i64)])
    }

    pub fn values(&self) -> &[CellValue] {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{value}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// KeySpec
// ---------------------------------------------------------------------------

/// How to derive a row's key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySpec {
    Columns(Vec<String>),
    Position,
}

impl KeySpec {
    pub fn from_config(config: &ComparisonConfig) -> Self {
        if config.by_position {
            KeySpec::Position
        } else {
            KeySpec::Columns(config.key_columns.clone())
        }
    }

    /// Columns excluded from value comparison. Empty in position-only mode.
    pub fn key_columns(&self) -> &[String] {
        match self {
            KeySpec::Columns(columns) => columns,
            KeySpec::Position => &[],
        }
    }

    /// Key of the row at `index` (0-based) in its table.
    ///
    /// Columns are validated before extraction; a missing one reads as `Null`.
    pub fn key_of(&self, index: usize, row: &Row) -> Key {
        match self {
            KeySpec::Columns(columns) => Key(
                columns
                    .iter()
                    .map(|c| row.get(c).cloned().unwrap_or(CellValue::Null))
                    .collect(),
            ),
            KeySpec::Position => Key::position(index + 1),
        }
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Fail on the first required column missing from A or B (A checked first).
pub fn validate_keys<S: AsRef<str>>(
    table_a: &Table,
    table_b: &Table,
    key_columns: &[S],
) -> Result<(), CompareError> {
    for column in key_columns {
        let column = column.as_ref();
        for (side, table) in [(TableSide::A, table_a), (TableSide::B, table_b)] {
            if !table.has_column(column) {
                return Err(CompareError::MissingKeyColumn {
                    column: column.to_string(),
                    table: side,
                });
            }
        }
    }
    Ok(())
}

/// Distinct keys present in `table`.
pub fn unique_keys(table: &Table, spec: &KeySpec) -> BTreeSet<Key> {
    table
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| spec.key_of(i, row))
        .collect()
}

/// All rows of `table` whose key equals `key`, in table order.
pub fn rows_for_key<'t>(table: &'t Table, spec: &KeySpec, key: &Key) -> Vec<&'t Row> {
    table
        .rows()
        .iter()
        .enumerate()
        .filter(|(i, row)| spec.key_of(*i, row) == *key)
        .map(|(_, row)| row)
        .collect()
}

// ---------------------------------------------------------------------------
// KeyIndex
// ---------------------------------------------------------------------------

/// One-pass grouping of a table by key. For every key, `rows(key)` is exactly
/// `rows_for_key(table, spec, key)`.
#[derive(Debug)]
pub struct KeyIndex<'t> {
    groups: BTreeMap<Key, Vec<&'t Row>>,
}

impl<'t> KeyIndex<'t> {
    pub fn build(table: &'t Table, spec: &KeySpec) -> Self {
        let mut groups: BTreeMap<Key, Vec<&'t Row>> = BTreeMap::new();
        for (i, row) in table.rows().iter().enumerate() {
            groups.entry(spec.key_of(i, row)).or_default().push(row);
        }
        Self { groups }
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.groups.keys()
    }

    pub fn key_set(&self) -> BTreeSet<Key> {
        self.groups.keys().cloned().collect()
    }

    pub fn rows(&self, key: &Key) -> &[&'t Row] {
        self.groups.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.groups.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
