//! Result rendering: JSON document, flat CSV report, human summary.

use std::fmt::Write as _;

use serde::Serialize;
use tabcompare_engine::{flatten, ComparisonResult, RowStatus};

use crate::error::CliError;

/// Bumped whenever the JSON shape changes incompatibly.
pub const CONTRACT_VERSION: u32 = 1;

/// Number of differing records listed in the stderr summary.
pub const SAMPLE_DIFFERENCES: usize = 5;

#[derive(Serialize)]
struct JsonDocument<'a> {
    contract_version: u32,
    #[serde(flatten)]
    result: &'a ComparisonResult,
}

/// The full result as pretty JSON, newline terminated.
pub fn format_json(result: &ComparisonResult) -> Result<Vec<u8>, CliError> {
    let doc = JsonDocument {
        contract_version: CONTRACT_VERSION,
        result,
    };
    let mut bytes = serde_json::to_vec_pretty(&doc).map_err(|e| CliError::io(e.to_string()))?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// The flat report (key, A columns, status, B columns, changed cells) as CSV.
pub fn format_csv(result: &ComparisonResult) -> Result<Vec<u8>, CliError> {
    let report = flatten(result);
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());

    writer
        .write_record(&report.headers)
        .map_err(|e| CliError::io(e.to_string()))?;
    for row in &report.rows {
        writer.write_record(row).map_err(|e| CliError::io(e.to_string()))?;
    }

    writer.into_inner().map_err(|e| CliError::io(e.to_string()))
}

/// Human-readable summary for stderr.
pub fn format_summary(result: &ComparisonResult, label_a: &str, label_b: &str) -> String {
    let s = &result.summary;
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "A: {} rows ({})", result.metadata.row_count_a, label_a);
    let _ = writeln!(out, "B: {} rows ({})", result.metadata.row_count_b, label_b);
    let _ = writeln!(out, "keys: {} in A, {} in B, {} in common", s.total_unique_keys_a, s.total_unique_keys_b, s.keys_in_common);
    let _ = writeln!(out, "keys_only_in_a: {}", s.keys_only_in_a);
    let _ = writeln!(out, "keys_only_in_b: {}", s.keys_only_in_b);
    let _ = writeln!(out, "rows_compared: {}", s.total_rows_compared);
    for status in RowStatus::ALL {
        let _ = writeln!(out, "{}: {}", status.as_str().to_lowercase(), s.count(status));
    }

    let differences: Vec<_> = result.differences().collect();
    if !differences.is_empty() {
        let _ = writeln!(out, "sample differences:");
        for record in differences.iter().take(SAMPLE_DIFFERENCES) {
            if record.changed_columns.is_empty() {
                let _ = writeln!(out, "  [{}] {}", record.key, record.status);
            } else {
                let _ = writeln!(
                    out,
                    "  [{}] {} ({})",
                    record.key,
                    record.status,
                    record.changed_columns.join(", ")
                );
            }
        }
        if differences.len() > SAMPLE_DIFFERENCES {
            let _ = writeln!(out, "  ... {} more", differences.len() - SAMPLE_DIFFERENCES);
        }
    }

    out
}
