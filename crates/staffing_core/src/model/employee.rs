//! Employee domain model.
//!
//! # Responsibility
//! - Define the employee record and its role-specific payloads.
//! - Derive weekly capacity, availability and bonus.
//!
//! # Invariants
//! - `id` is immutable once constructed.
//! - `employment_rate` is always in `(0, 1]`.
//! - `current_weekly_hours` mirrors the ledger sum for this employee after
//!   every aggregation pass; it is never written by callers.

use crate::model::phase::{EmployeeRole, TaskType};
use crate::model::{
    require_at_most, require_non_negative, require_text, ValidationError, BASE_WEEKLY_HOURS,
};
use crate::model::project::ProjectId;
use serde::Serialize;
use std::collections::BTreeSet;

pub type EmployeeId = u32;

const MAX_YEARS_OF_EXPERIENCE: f64 = 50.0;
const MAX_NUMBER_OF_PROJECTS: u32 = 10_000;
const MAX_BUGS_FOUND: u32 = 100_000;

const MANAGER_SALARY_MULTIPLIER: f64 = 0.25;
const DEVELOPER_SALARY_MULTIPLIER: f64 = 0.20;
const DEVELOPER_EXPERIENCE_BONUS: f64 = 500.0;
const DESIGNER_SALARY_MULTIPLIER: f64 = 0.15;
const DESIGNER_PROJECT_BONUS: f64 = 800.0;
const QA_SALARY_MULTIPLIER: f64 = 0.10;
const QA_BUG_BONUS: f64 = 100.0;

/// Role-specific employee payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum EmployeeKind {
    Manager {
        managed_project_id: Option<ProjectId>,
    },
    Developer {
        programming_language: String,
        years_of_experience: f64,
    },
    Designer {
        design_tool: String,
        number_of_projects: u32,
    },
    Qa {
        testing_type: String,
        bugs_found: u32,
    },
}

impl EmployeeKind {
    pub fn role(&self) -> EmployeeRole {
        match self {
            Self::Manager { .. } => EmployeeRole::Manager,
            Self::Developer { .. } => EmployeeRole::Developer,
            Self::Designer { .. } => EmployeeRole::Designer,
            Self::Qa { .. } => EmployeeRole::Qa,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Manager { .. } => Ok(()),
            Self::Developer {
                programming_language,
                years_of_experience,
            } => {
                require_text("programming language", programming_language.clone())?;
                require_non_negative("years of experience", *years_of_experience)?;
                if *years_of_experience > MAX_YEARS_OF_EXPERIENCE {
                    return Err(ValidationError::AboveMaximum {
                        field: "years of experience",
                        value: years_of_experience.ceil() as u64,
                        max: MAX_YEARS_OF_EXPERIENCE as u64,
                    });
                }
                Ok(())
            }
            Self::Designer {
                design_tool,
                number_of_projects,
            } => {
                require_text("design tool", design_tool.clone())?;
                require_at_most(
                    "number of projects",
                    *number_of_projects,
                    MAX_NUMBER_OF_PROJECTS,
                )?;
                Ok(())
            }
            Self::Qa {
                testing_type,
                bugs_found,
            } => {
                require_text("testing type", testing_type.clone())?;
                require_at_most("bugs found", *bugs_found, MAX_BUGS_FOUND)?;
                Ok(())
            }
        }
    }
}

/// Company employee.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Employee {
    id: EmployeeId,
    pub(crate) name: String,
    pub(crate) salary: f64,
    pub(crate) department: String,
    pub(crate) employment_rate: f64,
    pub(crate) is_active: bool,
    pub(crate) kind: EmployeeKind,
    pub(crate) project_history: BTreeSet<ProjectId>,
    pub(crate) current_weekly_hours: u32,
}

impl Employee {
    /// Creates an active employee with no assigned hours.
    ///
    /// # Errors
    /// - Blank name or department.
    /// - Negative or non-finite salary.
    /// - Employment rate outside `(0, 1]`.
    /// - Invalid role payload (blank text, out-of-range counters).
    pub fn new(
        id: EmployeeId,
        name: impl Into<String>,
        salary: f64,
        department: impl Into<String>,
        employment_rate: f64,
        kind: EmployeeKind,
    ) -> Result<Self, ValidationError> {
        let name = require_text("employee name", name.into())?;
        let department = require_text("department", department.into())?;
        let salary = require_non_negative("salary", salary)?;
        let employment_rate = validate_employment_rate(employment_rate)?;
        kind.validate()?;

        Ok(Self {
            id,
            name,
            salary,
            department,
            employment_rate,
            is_active: true,
            kind,
            project_history: BTreeSet::new(),
            current_weekly_hours: 0,
        })
    }

    pub fn id(&self) -> EmployeeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Monthly salary.
    pub fn salary(&self) -> f64 {
        self.salary
    }

    pub fn department(&self) -> &str {
        &self.department
    }

    pub fn employment_rate(&self) -> f64 {
        self.employment_rate
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn kind(&self) -> &EmployeeKind {
        &self.kind
    }

    pub fn role(&self) -> EmployeeRole {
        self.kind.role()
    }

    /// Projects this employee has ever held hours on.
    pub fn project_history(&self) -> &BTreeSet<ProjectId> {
        &self.project_history
    }

    /// `BASE_WEEKLY_HOURS * employment_rate`, rounded to whole hours.
    pub fn weekly_hours_capacity(&self) -> u32 {
        (f64::from(BASE_WEEKLY_HOURS) * self.employment_rate).round() as u32
    }

    /// Hours currently held in the ledger, as of the last aggregation pass.
    pub fn current_weekly_hours(&self) -> u32 {
        self.current_weekly_hours
    }

    pub fn available_hours(&self) -> u32 {
        self.weekly_hours_capacity()
            .saturating_sub(self.current_weekly_hours)
    }

    pub fn can_work_on(&self, task_type: TaskType) -> bool {
        self.role() == task_type.required_role()
    }

    pub fn bonus(&self) -> f64 {
        match &self.kind {
            EmployeeKind::Manager { .. } => self.salary * MANAGER_SALARY_MULTIPLIER,
            EmployeeKind::Developer {
                years_of_experience,
                ..
            } => {
                self.salary * DEVELOPER_SALARY_MULTIPLIER
                    + years_of_experience * DEVELOPER_EXPERIENCE_BONUS
            }
            EmployeeKind::Designer {
                number_of_projects,
                ..
            } => {
                self.salary * DESIGNER_SALARY_MULTIPLIER
                    + f64::from(*number_of_projects) * DESIGNER_PROJECT_BONUS
            }
            EmployeeKind::Qa { bugs_found, .. } => {
                self.salary * QA_SALARY_MULTIPLIER + f64::from(*bugs_found) * QA_BUG_BONUS
            }
        }
    }

    pub(crate) fn set_salary(&mut self, salary: f64) -> Result<(), ValidationError> {
        self.salary = require_non_negative("salary", salary)?;
        Ok(())
    }
}

/// Checks that a rate is a finite fraction in `(0, 1]`.
pub fn validate_employment_rate(rate: f64) -> Result<f64, ValidationError> {
    if !rate.is_finite() || rate <= 0.0 || rate > 1.0 {
        return Err(ValidationError::InvalidEmploymentRate(rate));
    }
    Ok(rate)
}

#[cfg(test)]
mod tests {
    use super::{Employee, EmployeeKind};
    use crate::model::phase::{EmployeeRole, TaskType};
    use crate::model::ValidationError;

    fn developer(rate: f64) -> Employee {
        Employee::new(
            1,
            "Ada",
            3200.0,
            "Engineering",
            rate,
            EmployeeKind::Developer {
                programming_language: "Rust".to_string(),
                years_of_experience: 4.0,
            },
        )
        .unwrap()
    }

    #[test]
    fn capacity_scales_with_rate() {
        assert_eq!(developer(1.0).weekly_hours_capacity(), 40);
        assert_eq!(developer(0.75).weekly_hours_capacity(), 30);
        assert_eq!(developer(0.25).weekly_hours_capacity(), 10);
    }

    #[test]
    fn constructor_rejects_invalid_input() {
        let kind = EmployeeKind::Manager {
            managed_project_id: None,
        };
        assert_eq!(
            Employee::new(1, " ", 10.0, "Ops", 1.0, kind.clone()).unwrap_err(),
            ValidationError::EmptyField("employee name")
        );
        assert!(matches!(
            Employee::new(1, "Bo", -1.0, "Ops", 1.0, kind.clone()).unwrap_err(),
            ValidationError::NegativeValue { .. }
        ));
        assert_eq!(
            Employee::new(1, "Bo", 10.0, "Ops", 1.5, kind).unwrap_err(),
            ValidationError::InvalidEmploymentRate(1.5)
        );
    }

    #[test]
    fn bonus_depends_on_variant() {
        let dev = developer(1.0);
        assert_eq!(dev.bonus(), 3200.0 * 0.20 + 4.0 * 500.0);
        assert_eq!(dev.role(), EmployeeRole::Developer);
        assert!(dev.can_work_on(TaskType::Development));
        assert!(!dev.can_work_on(TaskType::Qa));
    }
}
