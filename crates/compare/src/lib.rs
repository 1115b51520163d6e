//! `tabcompare-engine`: keyed comparison of two in-memory tables.
//!
//! Pure engine crate: receives two pre-loaded tables and a configuration,
//! returns every row aligned and classified. No CLI or IO dependencies.

pub mod align;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod keys;
pub mod model;
pub mod normalize;
pub mod report;
pub mod summary;
pub mod table;
pub mod value;

pub use config::{AlignmentMethod, ComparisonConfig};
pub use engine::{compare, compare_cancellable, CancelFlag};
pub use error::CompareError;
pub use keys::{Key, KeySpec};
pub use model::{AlignedRecord, ComparisonMetadata, ComparisonResult, RowStatus, TableSide};
pub use report::{flatten, FlatReport};
pub use summary::ComparisonSummary;
pub use table::{Row, Table};
pub use value::CellValue;
