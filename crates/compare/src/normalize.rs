use crate::config::ComparisonConfig;
use crate::table::Table;
use crate::value::CellValue;

/// Apply the configured text rules to every cell of `table`, returning a new
/// table. Trim runs before case folding; non-text cells pass through.
pub fn normalize(table: &Table, config: &ComparisonConfig) -> Table {
    if !config.trim_whitespace && config.case_sensitive {
        return table.clone();
    }
    table.map_values(|value| normalize_value(value, config))
}

/// Normalize a single cell under `config`.
pub fn normalize_value(value: &CellValue, config: &ComparisonConfig) -> CellValue {
    match value {
        CellValue::Text(s) => {
            let trimmed = if config.trim_whitespace { s.trim() } else { s.as_str() };
            if config.case_sensitive {
                CellValue::Text(trimmed.to_string())
            } else {
                CellValue::Text(trimmed.to_lowercase())
            }
        }
        other => other.clone(),
    }
}
