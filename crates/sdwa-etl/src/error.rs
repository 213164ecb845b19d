//! Error type for `sdwa-etl`.

use std::path::PathBuf;

use thiserror::Error;

use crate::pipeline::RunFailure;

#[derive(Debug, Error)]
pub enum Error {
  #[error("data directory not found: {0}")]
  DataDirMissing(PathBuf),

  #[error("database already exists: {0} (use --replace to overwrite)")]
  OutputExists(PathBuf),

  #[error("failed to remove {path}: {source}")]
  RemoveOutput {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("config error: {0}")]
  Config(#[from] config::ConfigError),

  #[error("invalid configuration: {0}")]
  InvalidConfig(String),

  #[error(transparent)]
  Run(#[from] RunFailure),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
