//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract. Scripts branch on them.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success, tables are equivalent                       |
//! | 1    | Differences found (like `diff(1)`)                   |
//! | 2    | CLI usage error (bad args, unknown format)           |
//! | 3    | Key or sort column missing from an input table       |
//! | 4    | Invalid configuration (bad combination, bad TOML)    |
//! | 5    | Input could not be parsed                            |
//! | 6    | Read/write failure                                   |
//! | 130  | Comparison cancelled                                 |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into `exit_code_for`

use tabcompare_engine::CompareError;

/// Success - no differences.
pub const EXIT_SUCCESS: u8 = 0;

/// Differences found. Suppressed by `--exit-zero`.
pub const EXIT_DIFFS: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// A configured key (or secondary sort) column is not in table A or B.
pub const EXIT_MISSING_KEY: u8 = 3;

/// Configuration rejected: invalid combination or unparseable TOML.
pub const EXIT_CONFIG: u8 = 4;

/// Parse error reading an input table.
pub const EXIT_PARSE: u8 = 5;

/// File or stream IO failure.
pub const EXIT_IO: u8 = 6;

/// Comparison cancelled before it finished (shell convention for SIGINT).
pub const EXIT_CANCELLED: u8 = 130;

/// Map an engine error to its exit code.
pub fn exit_code_for(err: &CompareError) -> u8 {
    match err {
        CompareError::MissingKeyColumn { .. } => EXIT_MISSING_KEY,
        CompareError::InvalidConfiguration(_) | CompareError::ConfigParse(_) => EXIT_CONFIG,
        CompareError::TableShape { .. } => EXIT_PARSE,
        CompareError::Cancelled => EXIT_CANCELLED,
    }
}
