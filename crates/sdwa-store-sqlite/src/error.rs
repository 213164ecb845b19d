//! Error type for `sdwa-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("record error: {0}")]
  Core(#[from] sdwa_core::Error),

  #[error("connection error: {0}")]
  Connection(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("batch size must be at least 1")]
  ZeroBatchSize,

  #[error("refusing to run a statement that writes: {0}")]
  NotReadOnly(String),
}

impl Error {
  /// Whether SQLite rejected a row because its parent water system is
  /// missing.
  pub fn is_foreign_key_violation(&self) -> bool {
    let err = match self {
      Error::Sqlite(e) => e,
      Error::Connection(tokio_rusqlite::Error::Rusqlite(e)) => e,
      _ => return false,
    };
    matches!(
      err,
      rusqlite::Error::SqliteFailure(f, _)
        if f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
