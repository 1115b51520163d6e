use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, trace};

use crate::align::align;
use crate::classify::classify;
use crate::config::ComparisonConfig;
use crate::error::CompareError;
use crate::keys::{validate_keys, Key, KeyIndex, KeySpec};
use crate::model::{AlignedRecord, ComparisonMetadata, ComparisonResult, RowStatus};
use crate::normalize::normalize;
use crate::summary::summarize;
use crate::table::Table;

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

/// Shared flag a host thread can raise to stop a running comparison.
///
/// Checked between key groups only, so a group's records are either all
/// emitted or not at all. A cancelled run returns `CompareError::Cancelled`.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn check(&self) -> Result<(), CompareError> {
        if self.is_cancelled() {
            Err(CompareError::Cancelled)
        } else {
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Compare table A (before) with table B (after).
///
/// Validate → normalize → partition keys → align + classify every common key
/// → emit only-A keys as `RemovedKey` → emit only-B keys as `NewKey` →
/// summarize. Each key set is walked in sorted order, so the same inputs
/// always produce the same `aligned_records`.
pub fn compare(
    table_a: &Table,
    table_b: &Table,
    config: &ComparisonConfig,
) -> Result<ComparisonResult, CompareError> {
    compare_cancellable(table_a, table_b, config, &CancelFlag::new())
}

/// `compare`, stopping with `CompareError::Cancelled` once `cancel` is raised.
pub fn compare_cancellable(
    table_a: &Table,
    table_b: &Table,
    config: &ComparisonConfig,
    cancel: &CancelFlag,
) -> Result<ComparisonResult, CompareError> {
    config.validate()?;
    validate_keys(table_a, table_b, &config.required_columns())?;

    let table_a = normalize(table_a, config);
    let table_b = normalize(table_b, config);
    debug!(
        "normalized {} rows from A and {} rows from B (trim={}, case_sensitive={})",
        table_a.len(),
        table_b.len(),
        config.trim_whitespace,
        config.case_sensitive
    );

    let spec = KeySpec::from_config(config);
    let index_a = KeyIndex::build(&table_a, &spec);
    let index_b = KeyIndex::build(&table_b, &spec);

    let keys_a = index_a.key_set();
    let keys_b = index_b.key_set();
    let common: Vec<&Key> = keys_a.intersection(&keys_b).collect();
    let only_a: BTreeSet<Key> = keys_a.difference(&keys_b).cloned().collect();
    let only_b: BTreeSet<Key> = keys_b.difference(&keys_a).cloned().collect();
    debug!(
        "key sets: {} in A, {} in B, {} common, {} only in A, {} only in B",
        keys_a.len(),
        keys_b.len(),
        common.len(),
        only_a.len(),
        only_b.len()
    );

    #[cfg(feature = "parallel")]
    let mut records = par_compare_common_keys(&common, &index_a, &index_b, &spec, config, cancel)?;
    #[cfg(not(feature = "parallel"))]
    let mut records = compare_common_keys(&common, &index_a, &index_b, &spec, config, cancel)?;

    for key in &only_a {
        cancel.check()?;
        for row in index_a.rows(key) {
            records.push(AlignedRecord::only_a(key.clone(), (*row).clone(), RowStatus::RemovedKey));
        }
    }

    for key in &only_b {
        cancel.check()?;
        for row in index_b.rows(key) {
            records.push(AlignedRecord::only_b(key.clone(), (*row).clone(), RowStatus::NewKey));
        }
    }

    let summary = summarize(&records, keys_a.len(), keys_b.len(), common.len());
    debug!(
        "{} records: {} match, {} modified, {} added, {} removed, {} new key, {} removed key",
        summary.total_rows_compared,
        summary.match_count,
        summary.modified_count,
        summary.added_row_count,
        summary.removed_row_count,
        summary.new_key_count,
        summary.removed_key_count
    );

    Ok(ComparisonResult {
        metadata: ComparisonMetadata {
            config: config.clone(),
            row_count_a: table_a.len(),
            row_count_b: table_b.len(),
            common_key_count: common.len(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
        },
        summary,
        aligned_records: records,
        keys_only_in_a: only_a,
        keys_only_in_b: only_b,
    })
}

// ---------------------------------------------------------------------------
// Common keys
// ---------------------------------------------------------------------------

#[cfg_attr(feature = "parallel", allow(dead_code))]
fn compare_common_keys(
    common: &[&Key],
    index_a: &KeyIndex<'_>,
    index_b: &KeyIndex<'_>,
    spec: &KeySpec,
    config: &ComparisonConfig,
    cancel: &CancelFlag,
) -> Result<Vec<AlignedRecord>, CompareError> {
    let mut records = Vec::new();
    for key in common {
        cancel.check()?;
        records.extend(compare_key_group(key, index_a, index_b, spec, config));
    }
    Ok(records)
}

/// Key groups are independent; rayon's indexed collect keeps sorted-key order.
#[cfg(feature = "parallel")]
fn par_compare_common_keys(
    common: &[&Key],
    index_a: &KeyIndex<'_>,
    index_b: &KeyIndex<'_>,
    spec: &KeySpec,
    config: &ComparisonConfig,
    cancel: &CancelFlag,
) -> Result<Vec<AlignedRecord>, CompareError> {
    use rayon::prelude::*;

    let groups = common
        .par_iter()
        .map(|key| {
            cancel.check()?;
            Ok(compare_key_group(key, index_a, index_b, spec, config))
        })
        .collect::<Result<Vec<_>, CompareError>>()?;
    Ok(groups.into_iter().flatten().collect())
}

/// Align and classify one key present in both tables.
fn compare_key_group(
    key: &Key,
    index_a: &KeyIndex<'_>,
    index_b: &KeyIndex<'_>,
    spec: &KeySpec,
    config: &ComparisonConfig,
) -> Vec<AlignedRecord> {
    let rows_a = index_a.rows(key);
    let rows_b = index_b.rows(key);
    trace!("key {key}: {} rows in A, {} rows in B", rows_a.len(), rows_b.len());

    align(rows_a, rows_b, config)
        .into_iter()
        .map(|pair| match (pair.a, pair.b) {
            (Some(a), Some(b)) => {
                let (status, changed) = classify(a, b, spec.key_columns());
                AlignedRecord::paired(key.clone(), a.clone(), b.clone(), status, changed)
            }
            (Some(a), None) => AlignedRecord::only_a(key.clone(), a.clone(), RowStatus::RemovedRow),
            (None, Some(b)) => AlignedRecord::only_b(key.clone(), b.clone(), RowStatus::AddedRow),
            (None, None) => unreachable!("aligned pair with neither side present"),
        })
        .collect()
}
