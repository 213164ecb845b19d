//! The seam between record producers (files) and the store.

use crate::{Header, Record, Result};

/// A lazy, single-pass sequence of records sharing one header.
///
/// Sources are moved onto the store's database thread and drained there, so
/// they must be `Send`.
pub trait RecordSource: Iterator<Item = Result<Record>> + Send + 'static {
  fn header(&self) -> &Header;
}

/// An in-memory source, mostly useful for tests and small fixtures.
#[derive(Debug)]
pub struct VecSource {
  header:  std::sync::Arc<Header>,
  records: std::vec::IntoIter<Vec<String>>,
}

impl VecSource {
  pub fn new(header: Header, records: Vec<Vec<String>>) -> Self {
    Self {
      header:  std::sync::Arc::new(header),
      records: records.into_iter(),
    }
  }
}

impl Iterator for VecSource {
  type Item = Result<Record>;

  fn next(&mut self) -> Option<Self::Item> {
    let values = self.records.next()?;
    Some(Ok(Record::new(self.header.clone(), values)))
  }
}

impl RecordSource for VecSource {
  fn header(&self) -> &Header { &self.header }
}
