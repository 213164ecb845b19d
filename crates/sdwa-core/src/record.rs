//! Header-relative records read from a source file.

use std::sync::Arc;

use crate::catalog::TableDef;

/// Ordered column names declared by a source file's first row.
///
/// Source files choose their own column order, so every value is matched to
/// its column by position in this header rather than by the table's declared
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
  columns: Vec<String>,
}

impl Header {
  pub fn new<I, S>(columns: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self { columns: columns.into_iter().map(Into::into).collect() }
  }

  pub fn columns(&self) -> &[String] { &self.columns }

  pub fn len(&self) -> usize { self.columns.len() }

  pub fn is_empty(&self) -> bool { self.columns.is_empty() }

  /// Index of `column`, matched ASCII case-insensitively like SQLite
  /// identifiers.
  pub fn position(&self, column: &str) -> Option<usize> {
    self
      .columns
      .iter()
      .position(|c| c.eq_ignore_ascii_case(column))
  }
}

/// One data row: raw text values positionally matched to a shared header.
#[derive(Debug, Clone)]
pub struct Record {
  header: Arc<Header>,
  values: Vec<String>,
}

impl Record {
  /// Short rows are padded with empty values. Fields beyond the header have
  /// no column and are dropped.
  pub fn new(header: Arc<Header>, mut values: Vec<String>) -> Self {
    values.resize(header.len(), String::new());
    Self { header, values }
  }

  /// Raw text of `column`, or `None` when the header lacks it.
  pub fn get(&self, column: &str) -> Option<&str> {
    self
      .header
      .position(column)
      .map(|i| self.values[i].as_str())
  }

  /// The first skip-key column of `table` that is absent or empty.
  pub fn missing_key(&self, table: &TableDef) -> Option<&'static str> {
    table
      .skip_without
      .iter()
      .copied()
      .find(|col| self.get(col).is_none_or(str::is_empty))
  }

  /// Values in header order with every empty string mapped to `None`.
  pub fn into_values(self) -> Vec<Option<String>> {
    self
      .values
      .into_iter()
      .map(|v| if v.is_empty() { None } else { Some(v) })
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::{REF_CODE_VALUES, VIOLATIONS};

  fn header(cols: &[&str]) -> Arc<Header> { Arc::new(Header::new(cols.iter().copied())) }

  fn values(vals: &[&str]) -> Vec<String> { vals.iter().map(|v| v.to_string()).collect() }

  #[test]
  fn empty_strings_become_null() {
    let h = header(&["A", "B", "C"]);
    let r = Record::new(h, values(&["x", "", "0"]));
    assert_eq!(
      r.into_values(),
      vec![Some("x".to_string()), None, Some("0".to_string())]
    );
  }

  #[test]
  fn short_rows_are_padded_with_null() {
    let h = header(&["A", "B", "C"]);
    let r = Record::new(h, values(&["x"]));
    assert_eq!(r.get("C"), Some(""));
    assert_eq!(r.into_values(), vec![Some("x".to_string()), None, None]);
  }

  #[test]
  fn fields_beyond_the_header_are_dropped() {
    let h = header(&["A", "B", "C"]);
    let r = Record::new(h, values(&["x", "y", "z", ""]));
    assert_eq!(
      r.into_values(),
      vec![Some("x".to_string()), Some("y".to_string()), Some("z".to_string())]
    );
  }

  #[test]
  fn lookup_ignores_ascii_case() {
    let h = header(&["pwsid", "Violation_Id"]);
    let r = Record::new(h, values(&["GA001", ""]));
    assert_eq!(r.get("PWSID"), Some("GA001"));
    assert_eq!(r.missing_key(&VIOLATIONS), Some("VIOLATION_ID"));
  }

  #[test]
  fn lookup_is_by_header_position() {
    let h = header(&["PWSID", "SUBMISSIONYEARQUARTER"]);
    let r = Record::new(h, values(&["GA001", "2024Q1"]));
    assert_eq!(r.get("SUBMISSIONYEARQUARTER"), Some("2024Q1"));
    assert_eq!(r.get("PWSID"), Some("GA001"));
    assert_eq!(r.get("MISSING"), None);
  }

  #[test]
  fn violation_without_id_is_flagged() {
    let h = header(&["SUBMISSIONYEARQUARTER", "PWSID", "VIOLATION_ID"]);
    let empty = Record::new(h.clone(), values(&["2024Q1", "GA001", ""]));
    assert_eq!(empty.missing_key(&VIOLATIONS), Some("VIOLATION_ID"));

    let ok = Record::new(h, values(&["2024Q1", "GA001", "V1"]));
    assert_eq!(ok.missing_key(&VIOLATIONS), None);

    let absent = Record::new(header(&["PWSID"]), values(&["GA001"]));
    assert_eq!(absent.missing_key(&VIOLATIONS), Some("VIOLATION_ID"));
  }

  #[test]
  fn tables_without_skip_keys_never_skip() {
    let h = header(&["VALUE_TYPE", "VALUE_CODE"]);
    let r = Record::new(h, values(&["", ""]));
    assert_eq!(r.missing_key(&REF_CODE_VALUES), None);
  }
}
