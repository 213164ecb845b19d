//! Core types for the SDWA bulk loader.
//!
//! This crate is deliberately free of database and file-format dependencies.
//! It declares the fixed relational catalog (tables, keys, indexes and
//! validation queries) and the record model every source and store agrees on.

pub mod catalog;
pub mod error;
pub mod index;
pub mod record;
pub mod source;
pub mod validation;

pub use catalog::{LOAD_ORDER, TableDef};
pub use error::{Error, Result};
pub use record::{Header, Record};
pub use source::RecordSource;
