//! Batched upsert of one source into one table.

use rusqlite::{Connection, Transaction};
use sdwa_core::{RecordSource, TableDef};

use crate::{Error, Result};

/// Tuning for [`SqliteStore::load_table`](crate::SqliteStore::load_table).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
  /// Records accumulated before a batch is flushed.
  pub batch_size:     usize,
  /// A progress event is logged each time the running total crosses a
  /// multiple of this value.
  pub progress_every: u64,
}

impl Default for LoadOptions {
  fn default() -> Self {
    Self { batch_size: 1000, progress_every: 10_000 }
  }
}

/// Outcome of loading one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
  pub table:        &'static str,
  /// Records upserted. Skipped records are not counted.
  pub rows_written: u64,
  /// Records discarded because a required key column was empty.
  pub rows_skipped: u64,
}

type Row = Vec<Option<String>>;

/// Drain `source` into `table` inside one transaction.
///
/// Nothing is committed unless every batch succeeds.
pub fn load<S: RecordSource>(
  conn: &mut Connection,
  table: &'static TableDef,
  source: S,
  options: LoadOptions,
) -> Result<LoadReport> {
  if options.batch_size == 0 {
    return Err(Error::ZeroBatchSize);
  }

  let sql = table.upsert_sql(source.header().columns())?;
  let tx = conn.transaction()?;

  let mut report = LoadReport { table: table.name, rows_written: 0, rows_skipped: 0 };
  let mut batch: Vec<Row> = Vec::with_capacity(options.batch_size);

  for record in source {
    let record = record?;

    if let Some(column) = record.missing_key(table) {
      tracing::trace!(table = table.name, column, "skipping record without key");
      report.rows_skipped += 1;
      continue;
    }

    batch.push(record.into_values());

    if batch.len() >= options.batch_size {
      let before = report.rows_written;
      report.rows_written += flush(&tx, &sql, &mut batch)?;
      log_progress(table, before, report.rows_written, options.progress_every);
    }
  }

  if !batch.is_empty() {
    report.rows_written += flush(&tx, &sql, &mut batch)?;
  }

  tx.commit()?;
  Ok(report)
}

/// Upsert every buffered row with one prepared statement and clear the
/// buffer.
fn flush(tx: &Transaction<'_>, sql: &str, batch: &mut Vec<Row>) -> Result<u64> {
  let mut stmt = tx.prepare_cached(sql)?;
  for row in batch.iter() {
    stmt.execute(rusqlite::params_from_iter(row.iter()))?;
  }
  let written = batch.len() as u64;
  batch.clear();
  Ok(written)
}

fn log_progress(table: &TableDef, before: u64, after: u64, every: u64) {
  if every > 0 && after / every > before / every {
    tracing::info!(table = table.name, rows = after, "load progress");
  }
}
