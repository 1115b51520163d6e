use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::ComparisonConfig;
use crate::keys::Key;
use crate::summary::ComparisonSummary;
use crate::table::Row;

// ---------------------------------------------------------------------------
// Sides
// ---------------------------------------------------------------------------

/// Which input a table (or row) came from. A = before, B = after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TableSide {
    A,
    B,
}

impl std::fmt::Display for TableSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
        }
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Outcome for one aligned record.
///
/// `AddedRow` / `RemovedRow` are count mismatches inside a key both tables
/// share. `NewKey` / `RemovedKey` are keys present in only one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RowStatus {
    Match,
    Modified,
    AddedRow,
    RemovedRow,
    NewKey,
    RemovedKey,
}

impl RowStatus {
    pub const ALL: [RowStatus; 6] = [
        RowStatus::Match,
        RowStatus::Modified,
        RowStatus::AddedRow,
        RowStatus::RemovedRow,
        RowStatus::NewKey,
        RowStatus::RemovedKey,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RowStatus::Match => "MATCH",
            RowStatus::Modified => "MODIFIED",
            RowStatus::AddedRow => "ADDED_ROW",
            RowStatus::RemovedRow => "REMOVED_ROW",
            RowStatus::NewKey => "NEW_KEY",
            RowStatus::RemovedKey => "REMOVED_KEY",
        }
    }

    pub fn is_difference(&self) -> bool {
        !matches!(self, RowStatus::Match)
    }
}

impl std::fmt::Display for RowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedRecord {
    pub key: Key,
    pub row_a: Option<Row>,
    pub row_b: Option<Row>,
    pub status: RowStatus,
    /// Differing non-key columns, in column order. Empty unless `Modified`.
    pub changed_columns: Vec<String>,
}

impl AlignedRecord {
    pub fn paired(key: Key, row_a: Row, row_b: Row, status: RowStatus, changed_columns: Vec<String>) -> Self {
        Self {
            key,
            row_a: Some(row_a),
            row_b: Some(row_b),
            status,
            changed_columns,
        }
    }

    /// A-only record: `RemovedRow` inside a shared key, or `RemovedKey`.
    pub fn only_a(key: Key, row: Row, status: RowStatus) -> Self {
        Self {
            key,
            row_a: Some(row),
            row_b: None,
            status,
            changed_columns: Vec::new(),
        }
    }

    /// B-only record: `AddedRow` inside a shared key, or `NewKey`.
    pub fn only_b(key: Key, row: Row, status: RowStatus) -> Self {
        Self {
            key,
            row_a: None,
            row_b: Some(row),
            status,
            changed_columns: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonMetadata {
    /// The exact configuration the comparison ran with.
    pub config: ComparisonConfig,
    pub row_count_a: usize,
    pub row_count_b: usize,
    pub common_key_count: usize,
    pub engine_version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonResult {
    pub metadata: ComparisonMetadata,
    pub summary: ComparisonSummary,
    pub aligned_records: Vec<AlignedRecord>,
    pub keys_only_in_a: BTreeSet<Key>,
    pub keys_only_in_b: BTreeSet<Key>,
}

impl ComparisonResult {
    /// Records with the given status, in output order.
    pub fn records_with(&self, status: RowStatus) -> impl Iterator<Item = &AlignedRecord> {
        self.aligned_records.iter().filter(move |r| r.status == status)
    }

    /// Records that are not `Match`, in output order.
    pub fn differences(&self) -> impl Iterator<Item = &AlignedRecord> {
        self.aligned_records.iter().filter(|r| r.status.is_difference())
    }
}
