//! [`SqliteStore`] — the destination database of a load run.

use std::path::Path;

use sdwa_core::{
  RecordSource, TableDef,
  validation::{Check, ValidationReport},
};

use crate::{
  Error, Result,
  loader::{self, LoadOptions, LoadReport},
  schema::{self, PRAGMAS},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A relational store backed by a single SQLite file.
///
/// Foreign-key enforcement is switched on as soon as the connection opens.
/// The connection closes when the store is dropped; [`SqliteStore::close`]
/// does so explicitly and surfaces any error.
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path`.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init().await?;
    Ok(store)
  }

  async fn init(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(PRAGMAS)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Create all catalog tables (if absent) in dependency order, atomically.
  pub async fn provision_schema(&self) -> Result<usize> {
    let created = self
      .conn
      .call(|conn| Ok(schema::provision(conn)?))
      .await?;
    Ok(created)
  }

  /// Upsert every record of `source` into `table` in one transaction.
  pub async fn load_table<S: RecordSource>(
    &self,
    table: &'static TableDef,
    source: S,
    options: LoadOptions,
  ) -> Result<LoadReport> {
    self
      .conn
      .call(move |conn| Ok(loader::load(conn, table, source, options)))
      .await?
  }

  /// Create all secondary indexes (if absent), atomically.
  pub async fn build_indexes(&self) -> Result<usize> {
    let built = self
      .conn
      .call(|conn| Ok(schema::build_indexes(conn)?))
      .await?;
    Ok(built)
  }

  /// Run aggregate `checks` (normally
  /// [`VALIDATIONS`](sdwa_core::validation::VALIDATIONS)). Never writes.
  pub async fn validate(&self, checks: &'static [Check]) -> Result<ValidationReport> {
    let counts = self
      .conn
      .call(move |conn| {
        let mut counts = Vec::with_capacity(checks.len());
        for check in checks {
          let n: i64 = conn.query_row(check.sql, [], |row| row.get(0))?;
          counts.push((check.label, n));
        }
        Ok(counts)
      })
      .await?;
    Ok(ValidationReport { counts })
  }

  /// Number of rows currently in `table`.
  pub async fn count_rows(&self, table: &'static TableDef) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM {}", table.name);
    let n: i64 = self
      .conn
      .call(move |conn| Ok(conn.query_row(&sql, [], |row| row.get(0))?))
      .await?;
    Ok(n)
  }

  /// Run a query returning the first column of every row as nullable text.
  ///
  /// Statements that could modify the database are refused before they run.
  pub async fn query_column(&self, sql: impl Into<String>) -> Result<Vec<Option<String>>> {
    let sql = sql.into();
    self
      .conn
      .call(move |conn| Ok(query_column(conn, &sql)))
      .await?
  }

  /// Close the connection, reporting any error SQLite raises while doing so.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }
}

fn query_column(conn: &rusqlite::Connection, sql: &str) -> Result<Vec<Option<String>>> {
  let mut stmt = conn.prepare(sql)?;
  if !stmt.readonly() {
    return Err(Error::NotReadOnly(sql.to_owned()));
  }
  let rows = stmt
    .query_map([], |row| row.get(0))?
    .collect::<rusqlite::Result<Vec<Option<String>>>>()?;
  Ok(rows)
}

#[cfg(test)]
impl SqliteStore {
  /// Run raw fixture SQL, bypassing the catalog.
  pub(crate) async fn setup_sql(&self, sql: &'static str) {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(sql)?;
        Ok(())
      })
      .await
      .expect("fixture sql");
  }
}
