//! Post-load aggregate checks. Read-only.

/// One aggregate query reported after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Check {
  pub label: &'static str,
  pub sql:   &'static str,
}

pub const VALIDATIONS: [Check; 5] = [
  Check {
    label: "Total water systems",
    sql:   "SELECT COUNT(*) FROM SDWA_PUB_WATER_SYSTEMS",
  },
  Check {
    label: "Total violations",
    sql:   "SELECT COUNT(*) FROM SDWA_VIOLATIONS_ENFORCEMENT",
  },
  Check {
    label: "Active water systems",
    sql:   "SELECT COUNT(*) FROM SDWA_PUB_WATER_SYSTEMS WHERE PWS_ACTIVITY_CODE = 'A'",
  },
  Check {
    label: "Systems with unaddressed violations",
    sql:   "SELECT COUNT(DISTINCT PWSID) FROM SDWA_VIOLATIONS_ENFORCEMENT \
            WHERE VIOLATION_STATUS = 'Unaddressed'",
  },
  Check {
    label: "Reference code values",
    sql:   "SELECT COUNT(*) FROM SDWA_REF_CODE_VALUES",
  },
];

/// Counts produced by [`VALIDATIONS`], in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
  pub counts: Vec<(&'static str, i64)>,
}

impl ValidationReport {
  pub fn get(&self, label: &str) -> Option<i64> {
    self
      .counts
      .iter()
      .find(|(l, _)| *l == label)
      .map(|(_, n)| *n)
  }
}
