use serde::Serialize;

use crate::model::{AlignedRecord, RowStatus};

/// Aggregate counts for one comparison.
///
/// The six status counts always sum to `total_rows_compared`, and
/// `keys_in_common + keys_only_in_x = total_unique_keys_x` for both sides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonSummary {
    pub total_unique_keys_a: usize,
    pub total_unique_keys_b: usize,
    pub keys_in_common: usize,
    pub keys_only_in_a: usize,
    pub keys_only_in_b: usize,
    pub total_rows_compared: usize,
    pub match_count: usize,
    pub modified_count: usize,
    pub added_row_count: usize,
    pub removed_row_count: usize,
    pub new_key_count: usize,
    pub removed_key_count: usize,
}

impl ComparisonSummary {
    pub fn count(&self, status: RowStatus) -> usize {
        match status {
            RowStatus::Match => self.match_count,
            RowStatus::Modified => self.modified_count,
            RowStatus::AddedRow => self.added_row_count,
            RowStatus::RemovedRow => self.removed_row_count,
            RowStatus::NewKey => self.new_key_count,
            RowStatus::RemovedKey => self.removed_key_count,
        }
    }

    /// True if any record is not a `Match`.
    pub fn has_differences(&self) -> bool {
        self.match_count != self.total_rows_compared
    }
}

/// Tally statuses and key-set sizes.
pub fn summarize(
    records: &[AlignedRecord],
    key_count_a: usize,
    key_count_b: usize,
    common_key_count: usize,
) -> ComparisonSummary {
    let mut summary = ComparisonSummary {
        total_unique_keys_a: key_count_a,
        total_unique_keys_b: key_count_b,
        keys_in_common: common_key_count,
        keys_only_in_a: key_count_a - common_key_count,
        keys_only_in_b: key_count_b - common_key_count,
        total_rows_compared: records.len(),
        ..ComparisonSummary::default()
    };

    for record in records {
        match record.status {
            RowStatus::Match => summary.match_count += 1,
            RowStatus::Modified => summary.modified_count += 1,
            RowStatus::AddedRow => summary.added_row_count += 1,
            RowStatus::RemovedRow => summary.removed_row_count += 1,
            RowStatus::NewKey => summary.new_key_count += 1,
            RowStatus::RemovedKey => summary.removed_key_count += 1,
        }
    }

    summary
}
