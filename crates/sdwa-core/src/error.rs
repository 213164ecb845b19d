//! Error types for `sdwa-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("column {column:?} is not declared by table {table}")]
  UnknownColumn { table: &'static str, column: String },

  #[error("column {column:?} appears more than once in the header for {table}")]
  DuplicateColumn { table: &'static str, column: String },

  #[error("source header for {0} is empty")]
  EmptyHeader(&'static str),

  #[error("source error: {0}")]
  Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
