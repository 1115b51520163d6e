use std::fmt;

use crate::model::TableSide;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompareError {
    /// A configured key or secondary-sort column is absent from a table.
    MissingKeyColumn { column: String, table: TableSide },
    /// Configuration violates its own invariants (missing sort column, no keys, etc.).
    InvalidConfiguration(String),
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// A positional row does not have one value per column.
    TableShape { row: usize, expected: usize, found: usize },
    /// The caller raised the cancel flag between key groups.
    Cancelled,
}

impl fmt::Display for CompareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingKeyColumn { column, table } => {
                write!(f, "key column '{column}' not found in table {table}")
            }
            Self::InvalidConfiguration(msg) => write!(f, "invalid configuration: {msg}"),
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::TableShape { row, expected, found } => {
                write!(f, "row {row}: expected {expected} values, found {found}")
            }
            Self::Cancelled => write!(f, "comparison cancelled"),
        }
    }
}

impl std::error::Error for CompareError {}
