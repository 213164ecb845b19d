//! Layered run configuration.
//!
//! Precedence, lowest first: built-in defaults, an optional TOML file,
//! `SDWA_*` environment variables, explicit command-line flags.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use sdwa_store_sqlite::LoadOptions;

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EtlConfig {
  /// Directory holding the `SDWA_*.csv` source files.
  pub data_dir:       PathBuf,
  /// Destination SQLite file.
  pub db_path:        PathBuf,
  /// Delete an existing `db_path` instead of refusing to run.
  pub replace:        bool,
  pub batch_size:     usize,
  pub progress_every: u64,
}

impl Default for EtlConfig {
  fn default() -> Self {
    let load = LoadOptions::default();
    Self {
      data_dir:       PathBuf::from("./data"),
      db_path:        PathBuf::from("./sdwa_georgia.db"),
      replace:        false,
      batch_size:     load.batch_size,
      progress_every: load.progress_every,
    }
  }
}

/// Values supplied on the command line; `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
  pub data_dir:   Option<PathBuf>,
  pub db_path:    Option<PathBuf>,
  pub replace:    Option<bool>,
  pub batch_size: Option<usize>,
}

impl EtlConfig {
  /// Build the configuration from every layer. `file` need not exist.
  pub fn load(file: &Path, overrides: ConfigOverrides) -> Result<Self> {
    let defaults = Self::default();

    let settings = config::Config::builder()
      .set_default("data_dir", path_value(&defaults.data_dir))?
      .set_default("db_path", path_value(&defaults.db_path))?
      .set_default("replace", defaults.replace)?
      .set_default("batch_size", defaults.batch_size as i64)?
      .set_default("progress_every", defaults.progress_every as i64)?
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix("SDWA"))
      .set_override_option("data_dir", overrides.data_dir.as_deref().map(path_value))?
      .set_override_option("db_path", overrides.db_path.as_deref().map(path_value))?
      .set_override_option("replace", overrides.replace)?
      .set_override_option("batch_size", overrides.batch_size.map(|b| b as i64))?
      .build()?;

    let cfg: Self = settings.try_deserialize()?;
    cfg.validate()?;
    Ok(cfg)
  }

  pub fn validate(&self) -> Result<()> {
    if self.batch_size == 0 {
      return Err(Error::InvalidConfig("batch_size must be at least 1".into()));
    }
    Ok(())
  }

  pub fn load_options(&self) -> LoadOptions {
    LoadOptions {
      batch_size:     self.batch_size,
      progress_every: self.progress_every,
    }
  }
}

fn path_value(path: &Path) -> String { path.to_string_lossy().into_owned() }

#[cfg(test)]
mod tests {
  use super::*;

  fn missing_file() -> PathBuf { PathBuf::from("/nonexistent/sdwa-etl.toml") }

  #[test]
  fn defaults_apply_without_file() {
    let cfg = EtlConfig::load(&missing_file(), ConfigOverrides::default()).unwrap();
    assert_eq!(cfg, EtlConfig::default());
    assert_eq!(cfg.data_dir, PathBuf::from("./data"));
    assert_eq!(cfg.db_path, PathBuf::from("./sdwa_georgia.db"));
    assert!(!cfg.replace);
    assert_eq!(cfg.load_options(), LoadOptions::default());
  }

  #[test]
  fn file_then_flags_take_precedence() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("sdwa-etl.toml");
    std::fs::write(
      &file,
      "data_dir = \"/srv/sdwa\"\ndb_path = \"/tmp/from-file.db\"\nbatch_size = 250\n",
    )
    .unwrap();

    let cfg = EtlConfig::load(
      &file,
      ConfigOverrides {
        db_path: Some(PathBuf::from("/tmp/from-flag.db")),
        replace: Some(true),
        ..ConfigOverrides::default()
      },
    )
    .unwrap();

    assert_eq!(cfg.data_dir, PathBuf::from("/srv/sdwa"));
    assert_eq!(cfg.db_path, PathBuf::from("/tmp/from-flag.db"));
    assert_eq!(cfg.batch_size, 250);
    assert!(cfg.replace);
  }

  #[test]
  fn zero_batch_size_is_rejected() {
    let err = EtlConfig::load(
      &missing_file(),
      ConfigOverrides { batch_size: Some(0), ..ConfigOverrides::default() },
    )
    .unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(_)));
  }
}
