//! The four-stage load run: schema, files, indexes, validation.

use std::{fmt, time::Duration};

use chrono::Utc;
use sdwa_core::{
  LOAD_ORDER,
  validation::{Check, VALIDATIONS, ValidationReport},
};
use sdwa_store_sqlite::{LoadReport, SqliteStore};
use thiserror::Error;

use crate::{CsvSource, EtlConfig};

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// The stage a run was in when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
  Connect,
  Schema,
  Load { table: &'static str },
  Index,
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Stage::Connect => f.write_str("connect"),
      Stage::Schema => f.write_str("schema creation"),
      Stage::Load { table } => write!(f, "load of {table}"),
      Stage::Index => f.write_str("index creation"),
    }
  }
}

#[derive(Debug, Error)]
#[error("{stage} failed: {source}")]
pub struct RunFailure {
  pub stage:  Stage,
  #[source]
  pub source: sdwa_store_sqlite::Error,
}

impl RunFailure {
  fn at(stage: Stage) -> impl FnOnce(sdwa_store_sqlite::Error) -> Self {
    move |source| Self { stage, source }
  }
}

/// What a completed run did.
#[derive(Debug)]
pub struct RunSummary {
  pub tables_created: usize,
  /// One entry per file that was present, in load order.
  pub loads:          Vec<LoadReport>,
  /// Source files that were absent and skipped.
  pub missing_files:  Vec<&'static str>,
  pub indexes_built:  usize,
  /// Validation runs after everything is committed, so its failure is
  /// reported here rather than failing the run.
  pub validation:     Result<ValidationReport, sdwa_store_sqlite::Error>,
  pub elapsed:        Duration,
}

impl RunSummary {
  pub fn rows_written(&self, table: &str) -> Option<u64> {
    self
      .loads
      .iter()
      .find(|l| l.table == table)
      .map(|l| l.rows_written)
  }
}

pub type RunOutcome = Result<RunSummary, RunFailure>;

// ─── Pipeline ────────────────────────────────────────────────────────────────

/// One bulk pass over a data directory into one database file.
pub struct Pipeline {
  config: EtlConfig,
  checks: &'static [Check],
}

impl Pipeline {
  pub fn new(config: EtlConfig) -> Self { Self { config, checks: &VALIDATIONS } }

  /// Run every stage in order, stopping at the first failure.
  ///
  /// The store is closed on every path. Tables loaded before a failure keep
  /// their committed rows.
  pub async fn run(&self) -> RunOutcome {
    let started = Utc::now();
    let clock = std::time::Instant::now();
    tracing::info!(%started, db = %self.config.db_path.display(), "starting load run");

    let store = SqliteStore::open(&self.config.db_path)
      .await
      .map_err(RunFailure::at(Stage::Connect))?;
    tracing::info!(db = %self.config.db_path.display(), "connected to database");

    let outcome = self.run_stages(&store).await;

    match store.close().await {
      Ok(()) => tracing::info!("database connection closed"),
      Err(e) => tracing::warn!(error = %e, "failed to close database"),
    }

    let mut summary = outcome.inspect_err(|failure| {
      tracing::error!(stage = %failure.stage, error = %failure.source, "load run failed");
    })?;
    summary.elapsed = clock.elapsed();
    tracing::info!(elapsed = ?summary.elapsed, "load run completed");
    Ok(summary)
  }

  async fn run_stages(&self, store: &SqliteStore) -> RunOutcome {
    tracing::info!("creating database schema");
    let tables_created = store
      .provision_schema()
      .await
      .map_err(RunFailure::at(Stage::Schema))?;

    let options = self.config.load_options();
    let mut loads = Vec::new();
    let mut missing_files = Vec::new();

    for table in LOAD_ORDER {
      let path = self.config.data_dir.join(table.file_name);
      if !path.exists() {
        tracing::warn!(file = table.file_name, "source file not found, skipping");
        missing_files.push(table.file_name);
        continue;
      }

      let stage = Stage::Load { table: table.name };
      tracing::info!(file = table.file_name, table = table.name, "loading");

      let source = CsvSource::open(&path)
        .map_err(|e| RunFailure { stage, source: e.into() })?;
      let report = store
        .load_table(table, source, options)
        .await
        .map_err(RunFailure::at(stage))?;

      tracing::info!(
        table = table.name,
        rows = report.rows_written,
        skipped = report.rows_skipped,
        "loaded"
      );
      loads.push(report);
    }

    tracing::info!("creating indexes");
    let indexes_built = store
      .build_indexes()
      .await
      .map_err(RunFailure::at(Stage::Index))?;
    tracing::info!(count = indexes_built, "created indexes");

    Ok(RunSummary {
      tables_created,
      loads,
      missing_files,
      indexes_built,
      validation: validate(store, self.checks).await,
      elapsed: Duration::ZERO,
    })
  }
}

async fn validate(
  store: &SqliteStore,
  checks: &'static [Check],
) -> Result<ValidationReport, sdwa_store_sqlite::Error> {
  tracing::info!("validating loaded data");
  match store.validate(checks).await {
    Ok(report) => {
      for (label, count) in &report.counts {
        tracing::info!("  {label}: {count}");
      }
      Ok(report)
    }
    Err(e) => {
      tracing::error!(error = %e, "validation query failed");
      Err(e)
    }
  }
}
