//! CSV-backed [`RecordSource`].

use std::{fs::File, path::Path, sync::Arc};

use sdwa_core::{Error, Header, Record, RecordSource, Result};

/// Streams the records of one CSV file. The first row is the header.
pub struct CsvSource {
  header:  Arc<Header>,
  records: csv::StringRecordsIntoIter<File>,
}

impl CsvSource {
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    let mut reader = csv::ReaderBuilder::new()
      .has_headers(true)
      .flexible(true)
      .from_path(path)
      .map_err(source_error)?;

    let header = Header::new(reader.headers().map_err(source_error)?.iter());

    Ok(Self {
      header:  Arc::new(header),
      records: reader.into_records(),
    })
  }
}

impl Iterator for CsvSource {
  type Item = Result<Record>;

  fn next(&mut self) -> Option<Self::Item> {
    let record = match self.records.next()? {
      Ok(r) => r,
      Err(e) => return Some(Err(source_error(e))),
    };
    if record.len() > self.header.len() {
      tracing::warn!(
        line = record.position().map_or(0, csv::Position::line),
        fields = record.len(),
        columns = self.header.len(),
        "dropping fields beyond the header"
      );
    }
    let values = record.iter().map(str::to_owned).collect();
    Some(Ok(Record::new(self.header.clone(), values)))
  }
}

impl RecordSource for CsvSource {
  fn header(&self) -> &Header { &self.header }
}

fn source_error(e: csv::Error) -> Error { Error::Source(Box::new(e)) }
