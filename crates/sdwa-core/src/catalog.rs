//! The fixed relational catalog: ten tables, their columns and keys.
//!
//! The catalog is versionless. DDL is rendered from these declarations with
//! `CREATE TABLE IF NOT EXISTS`, so provisioning an existing database is a
//! no-op.

use crate::{Error, Result};

// ─── Column ──────────────────────────────────────────────────────────────────

/// SQLite type affinity of a declared column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affinity {
  Text,
  Integer,
  Real,
}

impl Affinity {
  pub fn as_sql(self) -> &'static str {
    match self {
      Affinity::Text => "TEXT",
      Affinity::Integer => "INTEGER",
      Affinity::Real => "REAL",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
  pub name:     &'static str,
  pub affinity: Affinity,
  pub not_null: bool,
}

const fn text(name: &'static str) -> Column {
  Column { name, affinity: Affinity::Text, not_null: false }
}

const fn integer(name: &'static str) -> Column {
  Column { name, affinity: Affinity::Integer, not_null: false }
}

const fn real(name: &'static str) -> Column {
  Column { name, affinity: Affinity::Real, not_null: false }
}

const fn key(name: &'static str) -> Column {
  Column { name, affinity: Affinity::Text, not_null: true }
}

const fn integer_key(name: &'static str) -> Column {
  Column { name, affinity: Affinity::Integer, not_null: true }
}

// ─── Table ───────────────────────────────────────────────────────────────────

/// Reporting period column, part of every business table's key.
pub const PERIOD: &str = "SUBMISSIONYEARQUARTER";
/// Water system identifier column, part of every business table's key.
pub const SYSTEM_ID: &str = "PWSID";

/// Declaration of one destination table.
#[derive(Debug, PartialEq, Eq)]
pub struct TableDef {
  pub name:            &'static str,
  /// Source file inside the input directory.
  pub file_name:       &'static str,
  pub columns:         &'static [Column],
  pub primary_key:     &'static [&'static str],
  /// Whether `(SUBMISSIONYEARQUARTER, PWSID)` references the water system
  /// table.
  pub references_system: bool,
  /// Key columns that, when absent or empty, cause the record to be
  /// discarded instead of written.
  pub skip_without:    &'static [&'static str],
}

impl TableDef {
  /// Declared column matching `name` ASCII case-insensitively, as SQLite
  /// resolves identifiers.
  pub fn column(&self, name: &str) -> Option<&'static Column> {
    self
      .columns
      .iter()
      .find(|c| c.name.eq_ignore_ascii_case(name))
  }

  /// `CREATE TABLE IF NOT EXISTS` statement for this table.
  pub fn create_sql(&self) -> String {
    let mut lines: Vec<String> = self
      .columns
      .iter()
      .map(|c| {
        let null = if c.not_null { " NOT NULL" } else { "" };
        format!("    {} {}{null}", c.name, c.affinity.as_sql())
      })
      .collect();

    lines.push(format!("    PRIMARY KEY ({})", self.primary_key.join(", ")));

    if self.references_system {
      lines.push(format!(
        "    FOREIGN KEY ({PERIOD}, {SYSTEM_ID}) REFERENCES {}({PERIOD}, {SYSTEM_ID})",
        WATER_SYSTEMS.name
      ));
    }

    format!(
      "CREATE TABLE IF NOT EXISTS {} (\n{}\n)",
      self.name,
      lines.join(",\n")
    )
  }

  /// Upsert statement whose column list follows `header` order.
  ///
  /// Every header column must be declared by the table exactly once; the
  /// names are interpolated into SQL only after that check.
  pub fn upsert_sql<S: AsRef<str>>(&self, header: &[S]) -> Result<String> {
    if header.is_empty() {
      return Err(Error::EmptyHeader(self.name));
    }

    let mut names: Vec<&'static str> = Vec::with_capacity(header.len());
    for raw in header {
      let raw = raw.as_ref();
      let column = self.column(raw).ok_or_else(|| Error::UnknownColumn {
        table:  self.name,
        column: raw.to_owned(),
      })?;
      if names.contains(&column.name) {
        return Err(Error::DuplicateColumn {
          table:  self.name,
          column: raw.to_owned(),
        });
      }
      names.push(column.name);
    }

    let placeholders: Vec<String> =
      (1..=names.len()).map(|i| format!("?{i}")).collect();

    Ok(format!(
      "INSERT OR REPLACE INTO {} ({}) VALUES ({})",
      self.name,
      names.join(", "),
      placeholders.join(", ")
    ))
  }
}

/// Creation and load order. The reference table comes first, then the
/// water system root, then every table that references it.
pub const LOAD_ORDER: [&TableDef; 10] = [
  &REF_CODE_VALUES,
  &WATER_SYSTEMS,
  &FACILITIES,
  &VIOLATIONS,
  &LCR_SAMPLES,
  &SITE_VISITS,
  &GEOGRAPHIC_AREAS,
  &SERVICE_AREAS,
  &EVENTS_MILESTONES,
  &PN_VIOLATION_ASSOC,
];

// ─── Declarations ────────────────────────────────────────────────────────────

pub const REF_CODE_VALUES: TableDef = TableDef {
  name:              "SDWA_REF_CODE_VALUES",
  file_name:         "SDWA_REF_CODE_VALUES.csv",
  columns:           &[key("VALUE_TYPE"), key("VALUE_CODE"), text("VALUE_DESCRIPTION")],
  primary_key:       &["VALUE_TYPE", "VALUE_CODE"],
  references_system: false,
  skip_without:      &[],
};

pub const WATER_SYSTEMS: TableDef = TableDef {
  name:              "SDWA_PUB_WATER_SYSTEMS",
  file_name:         "SDWA_PUB_WATER_SYSTEMS.csv",
  columns:           &[
    key(PERIOD),
    key(SYSTEM_ID),
    text("PWS_NAME"),
    text("PRIMACY_AGENCY_CODE"),
    text("EPA_REGION"),
    text("SEASON_BEGIN_DATE"),
    text("SEASON_END_DATE"),
    text("PWS_ACTIVITY_CODE"),
    text("PWS_DEACTIVATION_DATE"),
    text("PWS_TYPE_CODE"),
    text("DBPR_SCHEDULE_CAT_CODE"),
    text("CDS_ID"),
    text("GW_SW_CODE"),
    text("LT2_SCHEDULE_CAT_CODE"),
    text("OWNER_TYPE_CODE"),
    integer("POPULATION_SERVED_COUNT"),
    text("POP_CAT_2_CODE"),
    text("POP_CAT_3_CODE"),
    text("POP_CAT_4_CODE"),
    text("POP_CAT_5_CODE"),
    text("POP_CAT_11_CODE"),
    text("PRIMACY_TYPE"),
    text("PRIMARY_SOURCE_CODE"),
    text("IS_GRANT_ELIGIBLE_IND"),
    text("IS_WHOLESALER_IND"),
    text("IS_SCHOOL_OR_DAYCARE_IND"),
    integer("SERVICE_CONNECTIONS_COUNT"),
    text("SUBMISSION_STATUS_CODE"),
    text("ORG_NAME"),
    text("ADMIN_NAME"),
    text("EMAIL_ADDR"),
    text("PHONE_NUMBER"),
    text("PHONE_EXT_NUMBER"),
    text("FAX_NUMBER"),
    text("ALT_PHONE_NUMBER"),
    text("ADDRESS_LINE1"),
    text("ADDRESS_LINE2"),
    text("CITY_NAME"),
    text("ZIP_CODE"),
    text("COUNTRY_CODE"),
    text("FIRST_REPORTED_DATE"),
    text("LAST_REPORTED_DATE"),
    text("STATE_CODE"),
    text("SOURCE_WATER_PROTECTION_CODE"),
    text("SOURCE_PROTECTION_BEGIN_DATE"),
    text("OUTSTANDING_PERFORMER"),
    text("OUTSTANDING_PERFORM_BEGIN_DATE"),
    text("REDUCED_RTCR_MONITORING"),
    text("REDUCED_MONITORING_BEGIN_DATE"),
    text("REDUCED_MONITORING_END_DATE"),
    text("SEASONAL_STARTUP_SYSTEM"),
  ],
  primary_key:       &[PERIOD, SYSTEM_ID],
  references_system: false,
  skip_without:      &[],
};

pub const FACILITIES: TableDef = TableDef {
  name:              "SDWA_FACILITIES",
  file_name:         "SDWA_FACILITIES.csv",
  columns:           &[
    key(PERIOD),
    key(SYSTEM_ID),
    key("FACILITY_ID"),
    text("FACILITY_NAME"),
    text("STATE_FACILITY_ID"),
    text("FACILITY_ACTIVITY_CODE"),
    text("FACILITY_DEACTIVATION_DATE"),
    text("FACILITY_TYPE_CODE"),
    text("SUBMISSION_STATUS_CODE"),
    text("IS_SOURCE_IND"),
    text("WATER_TYPE_CODE"),
    text("AVAILABILITY_CODE"),
    text("SELLER_TREATMENT_CODE"),
    text("SELLER_PWSID"),
    text("SELLER_PWS_NAME"),
    text("FILTRATION_STATUS_CODE"),
    text("IS_SOURCE_TREATED_IND"),
    text("FIRST_REPORTED_DATE"),
    text("LAST_REPORTED_DATE"),
  ],
  primary_key:       &[PERIOD, SYSTEM_ID, "FACILITY_ID"],
  references_system: true,
  skip_without:      &[],
};

/// Violations carry an optional `FACILITY_ID` that is deliberately not a
/// foreign key.
pub const VIOLATIONS: TableDef = TableDef {
  name:              "SDWA_VIOLATIONS_ENFORCEMENT",
  file_name:         "SDWA_VIOLATIONS_ENFORCEMENT.csv",
  columns:           &[
    key(PERIOD),
    key(SYSTEM_ID),
    key("VIOLATION_ID"),
    text("FACILITY_ID"),
    text("COMPL_PER_BEGIN_DATE"),
    text("COMPL_PER_END_DATE"),
    text("NON_COMPL_PER_BEGIN_DATE"),
    text("NON_COMPL_PER_END_DATE"),
    text("PWS_DEACTIVATION_DATE"),
    text("VIOLATION_CODE"),
    text("VIOLATION_CATEGORY_CODE"),
    text("IS_HEALTH_BASED_IND"),
    text("CONTAMINANT_CODE"),
    real("VIOL_MEASURE"),
    text("UNIT_OF_MEASURE"),
    text("FEDERAL_MCL"),
    real("STATE_MCL"),
    text("IS_MAJOR_VIOL_IND"),
    integer("SEVERITY_IND_CNT"),
    text("CALCULATED_RTC_DATE"),
    text("VIOLATION_STATUS"),
    integer("PUBLIC_NOTIFICATION_TIER"),
    integer("CALCULATED_PUB_NOTIF_TIER"),
    text("VIOL_ORIGINATOR_CODE"),
    text("SAMPLE_RESULT_ID"),
    text("CORRECTIVE_ACTION_ID"),
    text("RULE_CODE"),
    text("RULE_GROUP_CODE"),
    text("RULE_FAMILY_CODE"),
    text("VIOL_FIRST_REPORTED_DATE"),
    text("VIOL_LAST_REPORTED_DATE"),
    text("ENFORCEMENT_ID"),
    text("ENFORCEMENT_DATE"),
    text("ENFORCEMENT_ACTION_TYPE_CODE"),
    text("ENF_ACTION_CATEGORY"),
    text("ENF_ORIGINATOR_CODE"),
    text("ENF_FIRST_REPORTED_DATE"),
    text("ENF_LAST_REPORTED_DATE"),
  ],
  primary_key:       &[PERIOD, SYSTEM_ID, "VIOLATION_ID"],
  references_system: true,
  skip_without:      &["VIOLATION_ID"],
};

pub const LCR_SAMPLES: TableDef = TableDef {
  name:              "SDWA_LCR_SAMPLES",
  file_name:         "SDWA_LCR_SAMPLES.csv",
  columns:           &[
    key(PERIOD),
    key(SYSTEM_ID),
    key("SAMPLE_ID"),
    text("SAMPLING_END_DATE"),
    text("SAMPLING_START_DATE"),
    text("RECONCILIATION_ID"),
    text("SAMPLE_FIRST_REPORTED_DATE"),
    text("SAMPLE_LAST_REPORTED_DATE"),
    integer_key("SAR_ID"),
    text("CONTAMINANT_CODE"),
    text("RESULT_SIGN_CODE"),
    real("SAMPLE_MEASURE"),
    text("UNIT_OF_MEASURE"),
    text("SAR_FIRST_REPORTED_DATE"),
    text("SAR_LAST_REPORTED_DATE"),
  ],
  primary_key:       &[PERIOD, SYSTEM_ID, "SAMPLE_ID", "SAR_ID"],
  references_system: true,
  skip_without:      &[],
};

pub const SITE_VISITS: TableDef = TableDef {
  name:              "SDWA_SITE_VISITS",
  file_name:         "SDWA_SITE_VISITS.csv",
  columns:           &[
    key(PERIOD),
    key(SYSTEM_ID),
    key("VISIT_ID"),
    text("VISIT_DATE"),
    text("AGENCY_TYPE_CODE"),
    text("VISIT_REASON_CODE"),
    text("MANAGEMENT_OPS_EVAL_CODE"),
    text("SOURCE_WATER_EVAL_CODE"),
    text("SECURITY_EVAL_CODE"),
    text("PUMPS_EVAL_CODE"),
    text("OTHER_EVAL_CODE"),
    text("COMPLIANCE_EVAL_CODE"),
    text("DATA_VERIFICATION_EVAL_CODE"),
    text("TREATMENT_EVAL_CODE"),
    text("FINISHED_WATER_STOR_EVAL_CODE"),
    text("DISTRIBUTION_EVAL_CODE"),
    text("FINANCIAL_EVAL_CODE"),
    text("VISIT_COMMENTS"),
    text("FIRST_REPORTED_DATE"),
    text("LAST_REPORTED_DATE"),
  ],
  primary_key:       &[PERIOD, SYSTEM_ID, "VISIT_ID"],
  references_system: true,
  skip_without:      &[],
};

pub const GEOGRAPHIC_AREAS: TableDef = TableDef {
  name:              "SDWA_GEOGRAPHIC_AREAS",
  file_name:         "SDWA_GEOGRAPHIC_AREAS.csv",
  columns:           &[
    key(PERIOD),
    key(SYSTEM_ID),
    key("GEO_ID"),
    key("AREA_TYPE_CODE"),
    text("TRIBAL_CODE"),
    text("STATE_SERVED"),
    text("ANSI_ENTITY_CODE"),
    text("ZIP_CODE_SERVED"),
    text("CITY_SERVED"),
    text("COUNTY_SERVED"),
    text("LAST_REPORTED_DATE"),
  ],
  primary_key:       &[PERIOD, SYSTEM_ID, "GEO_ID", "AREA_TYPE_CODE"],
  references_system: true,
  skip_without:      &[],
};

/// One row per system per reporting period.
pub const SERVICE_AREAS: TableDef = TableDef {
  name:              "SDWA_SERVICE_AREAS",
  file_name:         "SDWA_SERVICE_AREAS.csv",
  columns:           &[
    key(PERIOD),
    key(SYSTEM_ID),
    text("SERVICE_AREA_TYPE_CODE"),
    text("IS_PRIMARY_SERVICE_AREA_CODE"),
    text("FIRST_REPORTED_DATE"),
    text("LAST_REPORTED_DATE"),
  ],
  primary_key:       &[PERIOD, SYSTEM_ID],
  references_system: true,
  skip_without:      &[],
};

pub const EVENTS_MILESTONES: TableDef = TableDef {
  name:              "SDWA_EVENTS_MILESTONES",
  file_name:         "SDWA_EVENTS_MILESTONES.csv",
  columns:           &[
    key(PERIOD),
    key(SYSTEM_ID),
    key("EVENT_SCHEDULE_ID"),
    text("EVENT_END_DATE"),
    text("EVENT_ACTUAL_DATE"),
    text("EVENT_COMMENTS_TEXT"),
    text("EVENT_MILESTONE_CODE"),
    text("EVENT_REASON_CODE"),
    text("FIRST_REPORTED_DATE"),
    text("LAST_REPORTED_DATE"),
  ],
  primary_key:       &[PERIOD, SYSTEM_ID, "EVENT_SCHEDULE_ID"],
  references_system: true,
  skip_without:      &[],
};

/// `RELATED_VIOLATION_ID` points at a violation but is not enforced.
pub const PN_VIOLATION_ASSOC: TableDef = TableDef {
  name:              "SDWA_PN_VIOLATION_ASSOC",
  file_name:         "SDWA_PN_VIOLATION_ASSOC.csv",
  columns:           &[
    key(PERIOD),
    key(SYSTEM_ID),
    key("PN_VIOLATION_ID"),
    text("RELATED_VIOLATION_ID"),
    text("COMPL_PER_BEGIN_DATE"),
    text("COMPL_PER_END_DATE"),
    text("NON_COMPL_PER_BEGIN_DATE"),
    text("NON_COMPL_PER_END_DATE"),
    text("VIOLATION_CODE"),
    text("CONTAMINANT_CODE"),
    text("FIRST_REPORTED_DATE"),
    text("LAST_REPORTED_DATE"),
  ],
  primary_key:       &[PERIOD, SYSTEM_ID, "PN_VIOLATION_ID"],
  references_system: true,
  skip_without:      &[],
};

// ─── Tests ───────────────────────────────────────────────────────────────────
