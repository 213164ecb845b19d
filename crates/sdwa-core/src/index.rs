//! Secondary indexes built after the bulk load.

use crate::catalog::{
  FACILITIES, GEOGRAPHIC_AREAS, LCR_SAMPLES, REF_CODE_VALUES, SITE_VISITS, TableDef,
  VIOLATIONS, WATER_SYSTEMS,
};

/// A non-unique secondary index over one or more columns of a table.
#[derive(Debug, PartialEq, Eq)]
pub struct IndexDef {
  pub name:    &'static str,
  pub table:   &'static TableDef,
  pub columns: &'static [&'static str],
}

impl IndexDef {
  pub fn create_sql(&self) -> String {
    format!(
      "CREATE INDEX IF NOT EXISTS {} ON {}({})",
      self.name,
      self.table.name,
      self.columns.join(", ")
    )
  }
}

const fn index(
  name: &'static str,
  table: &'static TableDef,
  columns: &'static [&'static str],
) -> IndexDef {
  IndexDef { name, table, columns }
}

pub const INDEXES: [IndexDef; 16] = [
  index("idx_pws_activity", &WATER_SYSTEMS, &["PWS_ACTIVITY_CODE"]),
  index("idx_pws_type", &WATER_SYSTEMS, &["PWS_TYPE_CODE"]),
  index("idx_pws_state", &WATER_SYSTEMS, &["STATE_CODE"]),
  index("idx_vio_status", &VIOLATIONS, &["VIOLATION_STATUS"]),
  index("idx_vio_health", &VIOLATIONS, &["IS_HEALTH_BASED_IND"]),
  index("idx_vio_dates", &VIOLATIONS, &["NON_COMPL_PER_BEGIN_DATE", "NON_COMPL_PER_END_DATE"]),
  index("idx_vio_contaminant", &VIOLATIONS, &["CONTAMINANT_CODE"]),
  index("idx_fac_type", &FACILITIES, &["FACILITY_TYPE_CODE"]),
  index("idx_fac_seller", &FACILITIES, &["SELLER_PWSID"]),
  index("idx_lcr_contaminant", &LCR_SAMPLES, &["CONTAMINANT_CODE"]),
  index("idx_lcr_dates", &LCR_SAMPLES, &["SAMPLING_END_DATE"]),
  index("idx_visit_date", &SITE_VISITS, &["VISIT_DATE"]),
  index("idx_geo_county", &GEOGRAPHIC_AREAS, &["COUNTY_SERVED"]),
  index("idx_geo_city", &GEOGRAPHIC_AREAS, &["CITY_SERVED"]),
  index("idx_geo_zip", &GEOGRAPHIC_AREAS, &["ZIP_CODE_SERVED"]),
  index("idx_ref_type", &REF_CODE_VALUES, &["VALUE_TYPE"]),
];
