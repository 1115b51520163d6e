//! Input loading: CSV / TSV / JSON text into an engine `Table`.
//!
//! Cells are typed the way a spreadsheet import would type them: empty is
//! null, `true`/`false` are booleans, anything that parses as a number is a
//! number, everything else is text kept verbatim (no trimming here; the
//! engine's normalizer owns that).

use std::io::{self, Read};
use std::path::Path;

use clap::ValueEnum;
use log::debug;
use tabcompare_engine::{CellValue, Table};

use crate::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Csv,
    Tsv,
    Json,
}

pub fn infer_format(path: &Path) -> Result<Format, CliError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        Some("csv") => Ok(Format::Csv),
        Some("tsv") | Some("tab") => Ok(Format::Tsv),
        Some("json") => Ok(Format::Json),
        _ => Err(CliError::args(format!(
            "cannot infer format from extension {:?}",
            ext.as_deref().unwrap_or("(none)")
        ))
        .with_hint("rename the file to .csv, .tsv or .json")),
    }
}

pub fn read_file(path: &Path, format: Format, delimiter: Option<u8>) -> Result<Table, CliError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CliError::io(format!("{}: {}", path.display(), e)))?;
    let table = parse_table(&content, format, delimiter)
        .map_err(|e| CliError { message: format!("{}: {}", path.display(), e.message), ..e })?;
    debug!(
        "loaded {}: {} columns, {} rows",
        path.display(),
        table.columns().len(),
        table.len()
    );
    Ok(table)
}

pub fn read_stdin(format: Format, delimiter: Option<u8>) -> Result<Table, CliError> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .map_err(|e| CliError::io(e.to_string()))?;

    if input.is_empty() {
        return Err(CliError::parse("no input received on stdin")
            .with_hint("cat before.csv | tabcompare compare - after.csv --key id"));
    }

    let table = parse_table(&input, format, delimiter)
        .map_err(|e| CliError { message: format!("stdin: {}", e.message), ..e })?;
    debug!("loaded stdin: {} columns, {} rows", table.columns().len(), table.len());
    Ok(table)
}

pub fn parse_table(content: &str, format: Format, delimiter: Option<u8>) -> Result<Table, CliError> {
    match format {
        Format::Csv => parse_delimited(content, delimiter.unwrap_or(b',')),
        Format::Tsv => parse_delimited(content, delimiter.unwrap_or(b'\t')),
        Format::Json => parse_json(content),
    }
}

// ============================================================================
// Delimited text
// ============================================================================

fn parse_delimited(content: &str, delimiter: u8) -> Result<Table, CliError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| CliError::parse(format!("header: {}", e)))?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(CliError::parse("missing header row"));
    }
    check_unique_headers(&headers)?;

    let mut table = Table::new(headers);
    for (row_idx, result) in reader.records().enumerate() {
        // Line 1 is the header.
        let line = row_idx + 2;
        let record = result.map_err(|e| CliError::parse(format!("line {}: {}", line, e)))?;
        let values = record.iter().map(infer_cell).collect();
        table
            .push_row(values)
            .map_err(|e| CliError::parse(format!("line {}: {}", line, e)))?;
    }

    Ok(table)
}

fn check_unique_headers(headers: &[String]) -> Result<(), CliError> {
    for (i, name) in headers.iter().enumerate() {
        if headers[..i].contains(name) {
            return Err(CliError::parse(format!("duplicate column name {:?}", name))
                .with_hint("every header must be unique so rows can be matched by column"));
        }
    }
    Ok(())
}

/// Type one delimited field.
pub fn infer_cell(field: &str) -> CellValue {
    if field.is_empty() {
        return CellValue::Null;
    }
    if field.eq_ignore_ascii_case("true") {
        return CellValue::Bool(true);
    }
    if field.eq_ignore_ascii_case("false") {
        return CellValue::Bool(false);
    }
    match parse_number(field) {
        Some(n) => CellValue::number(n),
        None => CellValue::text(field),
    }
}

/// Finite decimal numbers only. `f64::from_str` also accepts `nan`, `inf`
/// and `infinity`, which in a spreadsheet column are words.
fn parse_number(field: &str) -> Option<f64> {
    let first = field.chars().next()?;
    if !(first.is_ascii_digit() || matches!(first, '+' | '-' | '.')) {
        return None;
    }
    field.parse::<f64>().ok().filter(|n| n.is_finite())
}

// ============================================================================
// JSON
// ============================================================================

fn parse_json(content: &str) -> Result<Table, CliError> {
    let value: serde_json::Value = serde_json::from_str(content)
        .map_err(|e| CliError::parse(format!("JSON parse error: {}", e)))?;

    let rows = match value {
        serde_json::Value::Array(rows) => rows,
        _ => {
            return Err(CliError::parse("JSON must be an array of objects")
                .with_hint("e.g. [{\"id\": 1, \"name\": \"Alice\"}]"))
        }
    };

    let mut objects = Vec::with_capacity(rows.len());
    for (row_idx, row) in rows.into_iter().enumerate() {
        match row {
            serde_json::Value::Object(obj) => objects.push(obj),
            _ => return Err(CliError::parse(format!("row {}: expected object", row_idx + 1))),
        }
    }

    // Columns in first-seen order (serde_json is built with preserve_order).
    let mut columns: Vec<String> = Vec::new();
    for obj in &objects {
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let mut table = Table::new(columns.clone());
    for (row_idx, obj) in objects.iter().enumerate() {
        let values = columns
            .iter()
            .map(|c| obj.get(c).map(json_cell).unwrap_or(CellValue::Null))
            .collect();
        table
            .push_row(values)
            .map_err(|e| CliError::parse(format!("row {}: {}", row_idx + 1, e)))?;
    }

    Ok(table)
}

fn json_cell(value: &serde_json::Value) -> CellValue {
    match value {
        serde_json::Value::Null => CellValue::Null,
        serde_json::Value::Bool(b) => CellValue::Bool(*b),
        serde_json::Value::Number(n) => n.as_f64().map(CellValue::number).unwrap_or(CellValue::Null),
        serde_json::Value::String(s) => CellValue::text(s.as_str()),
        nested => CellValue::text(nested.to_string()),
    }
}
