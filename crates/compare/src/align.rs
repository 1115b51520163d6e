use crate::config::{AlignmentMethod, ComparisonConfig};
use crate::table::Row;

/// One slot of an aligned key group. At least one side is present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignedPair<'r> {
    pub a: Option<&'r Row>,
    pub b: Option<&'r Row>,
}

/// Pair the rows of one key group.
///
/// With `SecondarySort`, each side is first stably sorted by the sort column
/// (a side whose rows don't all carry the column is left in table order).
/// Pairing is then purely positional: index i of A with index i of B, and any
/// overflow past the shorter side becomes an A-only or B-only slot.
pub fn align<'r>(rows_a: &[&'r Row], rows_b: &[&'r Row], config: &ComparisonConfig) -> Vec<AlignedPair<'r>> {
    let (rows_a, rows_b) = match (config.alignment_method, config.secondary_sort_column.as_deref()) {
        (AlignmentMethod::SecondarySort, Some(column)) => {
            (sort_by_column(rows_a, column), sort_by_column(rows_b, column))
        }
        _ => (rows_a.to_vec(), rows_b.to_vec()),
    };

    let n = rows_a.len().max(rows_b.len());
    (0..n)
        .map(|i| AlignedPair {
            a: rows_a.get(i).copied(),
            b: rows_b.get(i).copied(),
        })
        .collect()
}

/// Stable ascending sort on `column`. Leaves the group untouched if any row
/// lacks the column.
fn sort_by_column<'r>(rows: &[&'r Row], column: &str) -> Vec<&'r Row> {
    let mut sorted = rows.to_vec();
    if rows.iter().all(|row| row.contains(column)) {
        sorted.sort_by(|x, y| x.get(column).cmp(&y.get(column)));
    }
    sorted
}
