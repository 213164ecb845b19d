//! Bulk load of SDWA CSV extracts into a SQLite database.
//!
//! A run provisions the schema, loads every source file in dependency order,
//! builds secondary indexes and reports a fixed set of counts. See
//! [`Pipeline`].

pub mod error;
pub mod output;
pub mod pipeline;
pub mod settings;
pub mod source;

pub use error::{Error, Result};
pub use pipeline::{Pipeline, RunFailure, RunOutcome, RunSummary, Stage};
pub use settings::{ConfigOverrides, EtlConfig};
pub use source::CsvSource;

#[cfg(test)]
mod tests;
