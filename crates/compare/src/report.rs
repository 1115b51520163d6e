//! Flat tabular layout of a comparison result.
//!
//! Renderers (CSV, spreadsheets, terminal tables) all want the same shape:
//! key columns, the A side, a status column, the B side, and the list of
//! changed cells. This module builds that shape once as plain strings.

use crate::model::ComparisonResult;
use crate::table::Row;

pub const ROW_HEADER: &str = "ROW";
pub const STATUS_HEADER: &str = "STATUS";
pub const CHANGED_HEADER: &str = "CHANGED CELLS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatReport {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Flatten `result` into one output row per aligned record.
pub fn flatten(result: &ComparisonResult) -> FlatReport {
    let config = &result.metadata.config;
    let key_headers: Vec<String> = if config.by_position {
        vec![ROW_HEADER.to_string()]
    } else {
        config.key_columns.clone()
    };

    let is_key = |column: &str| config.key_columns.iter().any(|k| k == column);
    let columns_a = side_columns(result.aligned_records.iter().filter_map(|r| r.row_a.as_ref()), &is_key);
    let columns_b = side_columns(result.aligned_records.iter().filter_map(|r| r.row_b.as_ref()), &is_key);

    let mut headers = key_headers;
    headers.extend(columns_a.iter().map(|c| format!("A: {c}")));
    headers.push(STATUS_HEADER.to_string());
    headers.extend(columns_b.iter().map(|c| format!("B: {c}")));
    headers.push(CHANGED_HEADER.to_string());

    let rows = result
        .aligned_records
        .iter()
        .map(|record| {
            let mut out: Vec<String> = record.key.values().iter().map(|v| v.to_string()).collect();
            out.extend(side_cells(record.row_a.as_ref(), &columns_a));
            out.push(record.status.as_str().to_string());
            out.extend(side_cells(record.row_b.as_ref(), &columns_b));
            out.push(record.changed_columns.join(", "));
            out
        })
        .collect();

    FlatReport { headers, rows }
}

/// Non-key columns across `rows`, first-seen order, no duplicates.
fn side_columns<'r>(rows: impl Iterator<Item = &'r Row>, is_key: &dyn Fn(&str) -> bool) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        for column in row.columns() {
            if !is_key(column) && !columns.iter().any(|c| c == column) {
                columns.push(column.to_string());
            }
        }
    }
    columns
}

fn side_cells(row: Option<&Row>, columns: &[String]) -> Vec<String> {
    columns
        .iter()
        .map(|c| {
            row.and_then(|r| r.get(c))
                .map(|v| v.to_string())
                .unwrap_or_default()
        })
        .collect()
}
