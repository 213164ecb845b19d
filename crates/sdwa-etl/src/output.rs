//! Pre-flight checks on the input directory and destination file.

use std::path::Path;

use crate::{EtlConfig, Error, Result};

/// Check that the data directory exists and that the destination is free.
///
/// An existing destination is deleted when `replace` is set and refused
/// otherwise.
pub fn prepare(config: &EtlConfig) -> Result<()> {
  if !config.data_dir.is_dir() {
    return Err(Error::DataDirMissing(config.data_dir.clone()));
  }
  prepare_output(&config.db_path, config.replace)
}

pub fn prepare_output(path: &Path, replace: bool) -> Result<()> {
  if !path.exists() {
    return Ok(());
  }
  if !replace {
    return Err(Error::OutputExists(path.to_path_buf()));
  }

  tracing::info!(path = %path.display(), "removing existing database");
  std::fs::remove_file(path).map_err(|source| Error::RemoveOutput {
    path: path.to_path_buf(),
    source,
  })
}
