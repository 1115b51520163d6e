//! Library half of the `tabcompare` binary: input loading, output rendering
//! and the exit-code contract. `main.rs` owns argument parsing.

pub mod error;
pub mod exit_codes;
pub mod load;
pub mod output;

pub use error::CliError;
