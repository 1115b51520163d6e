use tabcompare_engine::CompareError;

use crate::exit_codes::{exit_code_for, EXIT_CONFIG, EXIT_IO, EXIT_PARSE, EXIT_USAGE};

/// A failed command: exit code, one-line message and an optional hint.
///
/// `main` prints `error: <message>` and `hint:  <hint>` to stderr. An empty
/// message prints nothing, which is how "differences found" exits 1.
#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self { code: EXIT_PARSE, message: msg.into(), hint: None }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_CONFIG, message: msg.into(), hint: None }
    }

    /// Silent exit with `code`.
    pub fn exit(code: u8) -> Self {
        Self { code, message: String::new(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<CompareError> for CliError {
    fn from(err: CompareError) -> Self {
        let hint = match &err {
            CompareError::MissingKeyColumn { .. } => {
                Some("column names are matched exactly, including case".to_string())
            }
            CompareError::InvalidConfiguration(_) => {
                Some("pass --key <column> for keyed comparison, or --by-position".to_string())
            }
            _ => None,
        };
        Self { code: exit_code_for(&err), message: err.to_string(), hint }
    }
}
