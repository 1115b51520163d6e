use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::CompareError;
use crate::value::CellValue;

// ---------------------------------------------------------------------------
// Row
// ---------------------------------------------------------------------------

/// One row: column name → value, in insertion order.
///
/// A column the row does not carry is "absent" (`get` returns `None`), which
/// is different from a present `CellValue::Null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<(String, CellValue)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<CellValue>,
    {
        let mut row = Row::new();
        for (column, value) in pairs {
            row.insert(column, value);
        }
        row
    }

    /// Set a column, replacing the value in place if the column already exists.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<CellValue>) {
        let column = column.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(name, _)| *name == column) {
            Some(slot) => slot.1 = value,
            None => self.cells.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub(crate) fn map_values<F>(&self, f: F) -> Row
    where
        F: Fn(&CellValue) -> CellValue,
    {
        Row {
            cells: self
                .cells
                .iter()
                .map(|(name, value)| (name.clone(), f(value)))
                .collect(),
        }
    }
}

/// Rows serialize as JSON objects with their column order preserved.
impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (name, value) in &self.cells {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// An in-memory table: ordered column list plus ordered rows sharing it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Build a table from positional rows. Every row must have exactly one
    /// value per column.
    pub fn from_rows<I, S>(columns: I, rows: Vec<Vec<CellValue>>) -> Result<Self, CompareError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Table::new(columns);
        for values in rows {
            table.push_row(values)?;
        }
        Ok(table)
    }

    /// Append a positional row.
    pub fn push_row(&mut self, values: Vec<CellValue>) -> Result<(), CompareError> {
        if values.len() != self.columns.len() {
            return Err(CompareError::TableShape {
                row: self.rows.len() + 1,
                expected: self.columns.len(),
                found: values.len(),
            });
        }
        let cells = self.columns.iter().cloned().zip(values).collect();
        self.rows.push(Row { cells });
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// A new table with `f` applied to every cell. Columns and row order are kept.
    pub(crate) fn map_values<F>(&self, f: F) -> Table
    where
        F: Fn(&CellValue) -> CellValue,
    {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().map(|row| row.map_values(&f)).collect(),
        }
    }
}
