use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CompareError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// How a comparison identifies and aligns rows.
///
/// Two ways to key rows:
/// - `key_columns` non-empty: rows are grouped by the tuple of those columns.
/// - `by_position = true` (and no key columns): each row is keyed by its
///   1-based row number.
///
/// Text normalization (`trim_whitespace`, then lower-casing unless
/// `case_sensitive`) applies to key cells too, so keys differing only by
/// case/whitespace collapse into one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComparisonConfig {
    #[serde(default)]
    pub key_columns: Vec<String>,
    #[serde(default)]
    pub by_position: bool,
    #[serde(default)]
    pub alignment_method: AlignmentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_sort_column: Option<String>,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default = "default_trim_whitespace")]
    pub trim_whitespace: bool,
}

fn default_trim_whitespace() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Alignment
// ---------------------------------------------------------------------------

/// Order used to pair rows within a key group before positional pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentMethod {
    /// Rows pair up in their original table order.
    #[default]
    Position,
    /// Each side is sorted by `secondary_sort_column` first.
    SecondarySort,
}

impl std::fmt::Display for AlignmentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Position => write!(f, "position"),
            Self::SecondarySort => write!(f, "secondary_sort"),
        }
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl ComparisonConfig {
    /// Key-based comparison with the default options
    /// (position alignment, case-insensitive, trimmed).
    pub fn new<I, S>(key_columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key_columns: key_columns.into_iter().map(Into::into).collect(),
            by_position: false,
            alignment_method: AlignmentMethod::Position,
            secondary_sort_column: None,
            case_sensitive: false,
            trim_whitespace: default_trim_whitespace(),
        }
    }

    /// Row-number comparison: row N of A against row N of B.
    pub fn position_only() -> Self {
        Self {
            by_position: true,
            ..Self::new(Vec::<String>::new())
        }
    }

    pub fn with_secondary_sort(mut self, column: impl Into<String>) -> Self {
        self.alignment_method = AlignmentMethod::SecondarySort;
        self.secondary_sort_column = Some(column.into());
        self
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn with_trim_whitespace(mut self, trim_whitespace: bool) -> Self {
        self.trim_whitespace = trim_whitespace;
        self
    }

    /// Every column that must exist in both tables: key columns, then the
    /// secondary sort column when one is configured.
    pub fn required_columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = self.key_columns.iter().map(String::as_str).collect();
        if let Some(ref sort) = self.secondary_sort_column {
            if !columns.contains(&sort.as_str()) {
                columns.push(sort);
            }
        }
        columns
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ComparisonConfig {
    pub fn from_toml(input: &str) -> Result<Self, CompareError> {
        let config = Self::parse_toml(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse without validating, for callers that layer more settings on
    /// top before running `validate`.
    pub fn parse_toml(input: &str) -> Result<Self, CompareError> {
        toml::from_str(input).map_err(|e| CompareError::ConfigParse(e.to_string()))
    }

    pub fn to_toml(&self) -> Result<String, CompareError> {
        toml::to_string(self).map_err(|e| CompareError::ConfigParse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), CompareError> {
        // Exactly one keying mode
        if self.by_position && !self.key_columns.is_empty() {
            return Err(CompareError::InvalidConfiguration(
                "by_position cannot be combined with key_columns".into(),
            ));
        }
        if !self.by_position && self.key_columns.is_empty() {
            return Err(CompareError::InvalidConfiguration(
                "at least one key column is required (or set by_position)".into(),
            ));
        }

        // Key column names must be usable and distinct
        let mut seen = HashSet::new();
        for column in &self.key_columns {
            if column.trim().is_empty() {
                return Err(CompareError::InvalidConfiguration(
                    "key column names cannot be blank".into(),
                ));
            }
            if !seen.insert(column.as_str()) {
                return Err(CompareError::InvalidConfiguration(format!(
                    "key column '{column}' is listed more than once"
                )));
            }
        }

        // Sort column iff secondary_sort
        match (self.alignment_method, &self.secondary_sort_column) {
            (AlignmentMethod::SecondarySort, None) => {
                return Err(CompareError::InvalidConfiguration(
                    "secondary_sort alignment requires secondary_sort_column".into(),
                ));
            }
            (AlignmentMethod::SecondarySort, Some(column)) if column.trim().is_empty() => {
                return Err(CompareError::InvalidConfiguration(
                    "secondary_sort_column cannot be blank".into(),
                ));
            }
            (AlignmentMethod::Position, Some(column)) => {
                return Err(CompareError::InvalidConfiguration(format!(
                    "secondary_sort_column '{column}' is only used with secondary_sort alignment"
                )));
            }
            _ => {}
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
