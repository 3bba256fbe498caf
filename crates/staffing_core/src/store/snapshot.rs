//! Read-only JSON view of a company for reporting tools.
//!
//! The snapshot includes the cached aggregates so consumers do not have to
//! recompute them. It is an export format only; loading goes through the
//! flat text codec.

use crate::company::Company;
use crate::ledger::AssignmentKey;
use crate::model::employee::Employee;
use crate::model::project::Project;
use crate::store::{StoreError, StoreResult};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CompanySnapshot<'a> {
    pub name: &'a str,
    pub industry: &'a str,
    pub location: &'a str,
    pub founded_year: i32,
    pub employees: &'a [Employee],
    pub projects: &'a [Project],
    /// Ledger rows in key order.
    pub assignments: Vec<AssignmentRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AssignmentRow {
    #[serde(flatten)]
    pub key: AssignmentKey,
    pub hours: u32,
}

impl<'a> CompanySnapshot<'a> {
    pub fn of(company: &'a Company) -> Self {
        Self {
            name: company.name(),
            industry: company.industry(),
            location: company.location(),
            founded_year: company.founded_year(),
            employees: company.get_all_employees(),
            projects: company.get_all_projects(),
            assignments: company
                .ledger()
                .iter()
                .map(|(key, hours)| AssignmentRow { key, hours })
                .collect(),
        }
    }
}

/// Pretty-printed JSON snapshot of `company`.
pub fn render_json(company: &Company) -> StoreResult<String> {
    serde_json::to_string_pretty(&CompanySnapshot::of(company)).map_err(StoreError::Json)
}
