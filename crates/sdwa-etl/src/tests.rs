//! End-to-end runs over CSV fixtures in a temporary directory.

use std::{
  io,
  path::{Path, PathBuf},
  sync::{Arc, Mutex},
};

use sdwa_core::catalog::{
  FACILITIES, LOAD_ORDER, REF_CODE_VALUES, SITE_VISITS, VIOLATIONS, WATER_SYSTEMS,
};
use sdwa_store_sqlite::SqliteStore;
use tempfile::TempDir;

use crate::{EtlConfig, Pipeline, Stage, output};

const REF_CODES: &str = "\
VALUE_TYPE,VALUE_CODE,VALUE_DESCRIPTION
ACTIVITY,A,Active
ACTIVITY,I,Inactive
OWNER,L,Local government
";

const SYSTEMS: &str = "\
SUBMISSIONYEARQUARTER,PWSID,PWS_NAME,PWS_ACTIVITY_CODE,POPULATION_SERVED_COUNT
2024Q1,GA0010000,Alpha Water,A,1200
2024Q1,GA0020000,Beta Utility,I,
";

const FACILITY_ROWS: &str = "\
SUBMISSIONYEARQUARTER,PWSID,FACILITY_ID,FACILITY_NAME
2024Q1,GA0010000,F1,Well 1
2024Q1,GA0020000,F2,
";

const VIOLATION_ROWS: &str = "\
PWSID,SUBMISSIONYEARQUARTER,VIOLATION_ID,VIOLATION_STATUS
GA0010000,2024Q1,V1,Unaddressed
GA0010000,2024Q1,V2,Resolved
GA0020000,2024Q1,,Unaddressed
GA0020000,2024Q1,V3,Unaddressed
GA0020000,2024Q1,V4,Addressed
";

struct Fixture {
  dir: TempDir,
}

impl Fixture {
  fn new() -> Self {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("data")).unwrap();
    Self { dir }
  }

  fn with(self, table: &str, contents: &str) -> Self {
    std::fs::write(self.data_dir().join(format!("{table}.csv")), contents).unwrap();
    self
  }

  fn data_dir(&self) -> PathBuf { self.dir.path().join("data") }

  fn db_path(&self) -> PathBuf { self.dir.path().join("sdwa.db") }

  fn config(&self) -> EtlConfig {
    EtlConfig {
      data_dir: self.data_dir(),
      db_path: self.db_path(),
      ..EtlConfig::default()
    }
  }
}

fn full() -> Fixture {
  Fixture::new()
    .with(REF_CODE_VALUES.name, REF_CODES)
    .with(WATER_SYSTEMS.name, SYSTEMS)
    .with(FACILITIES.name, FACILITY_ROWS)
    .with(VIOLATIONS.name, VIOLATION_ROWS)
}

async fn count(db: &Path, table: &'static sdwa_core::TableDef) -> i64 {
  let store = SqliteStore::open(db).await.unwrap();
  let n = store.count_rows(table).await.unwrap();
  store.close().await.unwrap();
  n
}

#[tokio::test]
async fn reference_codes_and_systems_are_counted() {
  let fx = Fixture::new()
    .with(REF_CODE_VALUES.name, REF_CODES)
    .with(WATER_SYSTEMS.name, SYSTEMS);

  let summary = Pipeline::new(fx.config()).run().await.unwrap();
  let report = summary.validation.as_ref().unwrap();

  assert_eq!(report.get("Total water systems"), Some(2));
  assert_eq!(report.get("Reference code values"), Some(3));
  assert_eq!(report.get("Active water systems"), Some(1));
  assert_eq!(summary.tables_created, LOAD_ORDER.len());
  assert_eq!(summary.indexes_built, sdwa_core::index::INDEXES.len());
}

#[tokio::test]
async fn violations_without_id_are_dropped() {
  let summary = Pipeline::new(full().config()).run().await.unwrap();

  assert_eq!(summary.rows_written(VIOLATIONS.name), Some(4));
  let report = summary.validation.unwrap();
  assert_eq!(report.get("Total violations"), Some(4));
  assert_eq!(report.get("Systems with unaddressed violations"), Some(2));
}

#[tokio::test]
async fn row_counts_match_inputs() {
  let fx = full();
  Pipeline::new(fx.config()).run().await.unwrap();

  let db = fx.db_path();
  assert_eq!(count(&db, &REF_CODE_VALUES).await, 3);
  assert_eq!(count(&db, &WATER_SYSTEMS).await, 2);
  assert_eq!(count(&db, &FACILITIES).await, 2);
  assert_eq!(count(&db, &VIOLATIONS).await, 4);
}

#[tokio::test]
async fn empty_fields_load_as_null() {
  let fx = full();
  Pipeline::new(fx.config()).run().await.unwrap();

  let store = SqliteStore::open(fx.db_path()).await.unwrap();
  let pops = store
    .query_column(
      "SELECT typeof(POPULATION_SERVED_COUNT) FROM SDWA_PUB_WATER_SYSTEMS ORDER BY PWSID",
    )
    .await
    .unwrap();
  assert_eq!(pops, vec![Some("integer".to_string()), Some("null".to_string())]);

  let names = store
    .query_column("SELECT FACILITY_NAME FROM SDWA_FACILITIES WHERE FACILITY_ID = 'F2'")
    .await
    .unwrap();
  assert_eq!(names, vec![None]);
  store.close().await.unwrap();
}

#[tokio::test]
async fn rerun_against_same_store_is_idempotent() {
  let fx = full();
  Pipeline::new(fx.config()).run().await.unwrap();
  let second = Pipeline::new(fx.config()).run().await.unwrap();

  let report = second.validation.unwrap();
  assert_eq!(report.get("Total water systems"), Some(2));
  assert_eq!(report.get("Total violations"), Some(4));
  assert_eq!(count(&fx.db_path(), &FACILITIES).await, 2);
}

#[tokio::test]
async fn replace_recreates_the_store() {
  let fx = full();
  let first = Pipeline::new(fx.config()).run().await.unwrap();
  assert!(fx.db_path().exists());

  assert!(matches!(
    output::prepare(&fx.config()),
    Err(crate::Error::OutputExists(_))
  ));

  let config = EtlConfig { replace: true, ..fx.config() };
  output::prepare(&config).unwrap();
  assert!(!fx.db_path().exists());

  let second = Pipeline::new(config).run().await.unwrap();
  assert_eq!(first.validation.unwrap(), second.validation.unwrap());
}

/// Log sink shared between a test and its thread-local subscriber.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
  fn contents(&self) -> String {
    String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
  }
}

impl io::Write for LogBuffer {
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    self.0.lock().unwrap().extend_from_slice(buf);
    Ok(buf.len())
  }

  fn flush(&mut self) -> io::Result<()> { Ok(()) }
}

#[tokio::test]
async fn missing_file_is_skipped() {
  let fx = Fixture::new()
    .with(REF_CODE_VALUES.name, REF_CODES)
    .with(WATER_SYSTEMS.name, SYSTEMS)
    .with(VIOLATIONS.name, VIOLATION_ROWS);

  let logs = LogBuffer::default();
  let writer = logs.clone();
  let subscriber = tracing_subscriber::fmt()
    .with_ansi(false)
    .with_max_level(tracing::Level::WARN)
    .with_writer(move || writer.clone())
    .finish();
  let _guard = tracing::subscriber::set_default(subscriber);

  let summary = Pipeline::new(fx.config()).run().await.unwrap();

  let logged = logs.contents();
  assert!(logged.contains("WARN"), "{logged}");
  assert!(logged.contains("source file not found"), "{logged}");
  assert!(logged.contains("SDWA_FACILITIES.csv"), "{logged}");

  assert!(summary.missing_files.contains(&FACILITIES.file_name));
  assert!(summary.missing_files.contains(&SITE_VISITS.file_name));
  assert_eq!(summary.rows_written(FACILITIES.name), None);
  assert_eq!(count(&fx.db_path(), &FACILITIES).await, 0);
}

#[tokio::test]
async fn orphan_rows_abort_the_run() {
  let fx = Fixture::new()
    .with(WATER_SYSTEMS.name, SYSTEMS)
    .with(
      FACILITIES.name,
      "SUBMISSIONYEARQUARTER,PWSID,FACILITY_ID\n2024Q1,GA9999999,F1\n",
    )
    .with(VIOLATIONS.name, VIOLATION_ROWS);

  let failure = Pipeline::new(fx.config()).run().await.unwrap_err();

  assert_eq!(failure.stage, Stage::Load { table: FACILITIES.name });
  assert!(failure.source.is_foreign_key_violation());

  // Earlier files stay committed; later files are never attempted.
  let db = fx.db_path();
  assert_eq!(count(&db, &WATER_SYSTEMS).await, 2);
  assert_eq!(count(&db, &FACILITIES).await, 0);
  assert_eq!(count(&db, &VIOLATIONS).await, 0);
}

#[tokio::test]
async fn lowercase_headers_and_trailing_commas_load() {
  let fx = Fixture::new().with(
    REF_CODE_VALUES.name,
    "value_type,value_code,value_description\nA,B,C,\nD,E,F\n",
  );

  let summary = Pipeline::new(fx.config()).run().await.unwrap();
  assert_eq!(summary.rows_written(REF_CODE_VALUES.name), Some(2));
  assert_eq!(count(&fx.db_path(), &REF_CODE_VALUES).await, 2);
}

#[tokio::test]
async fn unknown_column_aborts_the_run() {
  let fx = Fixture::new().with(REF_CODE_VALUES.name, "VALUE_TYPE,VALUE_CODE,EXTRA\nA,B,C\n");

  let failure = Pipeline::new(fx.config()).run().await.unwrap_err();
  assert_eq!(failure.stage, Stage::Load { table: REF_CODE_VALUES.name });
  assert!(failure.to_string().contains("EXTRA"));
}
