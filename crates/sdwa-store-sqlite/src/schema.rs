//! Schema provisioning and index construction.
//!
//! Both run inside a single transaction: a failing statement rolls back every
//! table (or index) created in that call.

use rusqlite::Connection;
use sdwa_core::{LOAD_ORDER, index::INDEXES};

/// Executed on every new connection before any other statement. Without it
/// SQLite accepts rows whose water system does not exist.
pub const PRAGMAS: &str = "PRAGMA foreign_keys = ON;";

/// Create every catalog table in load order. Returns the number of tables.
pub fn provision(conn: &mut Connection) -> rusqlite::Result<usize> {
  let tx = conn.transaction()?;
  for table in LOAD_ORDER {
    tx.execute_batch(&table.create_sql())?;
    tracing::info!(table = table.name, "created table");
  }
  tx.commit()?;
  Ok(LOAD_ORDER.len())
}

/// Create every secondary index. Returns the number of indexes.
pub fn build_indexes(conn: &mut Connection) -> rusqlite::Result<usize> {
  let tx = conn.transaction()?;
  for index in &INDEXES {
    tx.execute_batch(&index.create_sql())?;
    tracing::debug!(index = index.name, table = index.table.name, "created index");
  }
  tx.commit()?;
  Ok(INDEXES.len())
}
