use crate::model::RowStatus;
use crate::table::Row;
use crate::value::CellValue;

/// Classify a present/present pair.
///
/// Every non-key column of `row_a` is compared with the same column of
/// `row_b`; columns `row_b` does not carry are skipped. Returns `Match`, or
/// `Modified` with every differing column in `row_a`'s column order.
pub fn classify<S: AsRef<str>>(row_a: &Row, row_b: &Row, key_columns: &[S]) -> (RowStatus, Vec<String>) {
    let changed = changed_columns(row_a, row_b, key_columns);
    if changed.is_empty() {
        (RowStatus::Match, changed)
    } else {
        (RowStatus::Modified, changed)
    }
}

/// Non-key columns whose values differ, full list (no early exit).
pub fn changed_columns<S: AsRef<str>>(row_a: &Row, row_b: &Row, key_columns: &[S]) -> Vec<String> {
    row_a
        .iter()
        .filter(|(column, _)| !key_columns.iter().any(|k| k.as_ref() == *column))
        .filter_map(|(column, value_a)| {
            let value_b = row_b.get(column)?;
            (!values_equal(value_a, value_b)).then(|| column.to_string())
        })
        .collect()
}

/// Cell equality: both null → equal, one null → different, otherwise
/// structural equality of the (already normalized) values.
pub fn values_equal(a: &CellValue, b: &CellValue) -> bool {
    match (a, b) {
        (CellValue::Null, CellValue::Null) => true,
        (CellValue::Null, _) | (_, CellValue::Null) => false,
        (a, b) => a == b,
    }
}
