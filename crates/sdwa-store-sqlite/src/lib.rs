//! SQLite backend for the SDWA bulk loader.
//!
//! Wraps [`tokio_rusqlite`] so every statement runs on the connection's
//! dedicated thread. One [`SqliteStore`] owns one database file for the
//! lifetime of a load run.

mod loader;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use loader::{LoadOptions, LoadReport};
pub use store::SqliteStore;
