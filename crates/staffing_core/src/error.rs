//! Core error taxonomy.
//!
//! # Responsibility
//! - Give callers one typed error for every company/ledger operation.
//! - Separate user-correctable failures from failures that should abort.

use crate::ledger::AssignmentKey;
use crate::model::employee::EmployeeId;
use crate::model::project::ProjectId;
use crate::model::task::TaskId;
use crate::model::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CoreResult<T> = Result<T, CoreError>;

/// One broken ceiling, either proposed or found in the current ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapacityViolation {
    /// Employee total would exceed `weekly_hours_capacity`.
    Employee {
        employee_id: EmployeeId,
        capacity: u32,
        total: u32,
    },
    /// Task total would exceed the task's estimated hours.
    Task {
        project_id: ProjectId,
        task_id: TaskId,
        estimated: u32,
        total: u32,
    },
}

impl CapacityViolation {
    /// Hours above the ceiling.
    pub fn excess(&self) -> u32 {
        match self {
            Self::Employee {
                capacity, total, ..
            } => total.saturating_sub(*capacity),
            Self::Task {
                estimated, total, ..
            } => total.saturating_sub(*estimated),
        }
    }
}

impl Display for CapacityViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Employee {
                employee_id,
                capacity,
                total,
            } => write!(
                f,
                "employee {employee_id} would hold {total}h of {capacity}h weekly capacity"
            ),
            Self::Task {
                project_id,
                task_id,
                estimated,
                total,
            } => write!(
                f,
                "task {task_id} of project {project_id} would hold {total}h of {estimated}h estimated"
            ),
        }
    }
}

/// Error for company, ledger, aggregation and planner operations.
#[derive(Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Malformed or out-of-range input.
    Validation(ValidationError),
    EmployeeNotFound(EmployeeId),
    ProjectNotFound(ProjectId),
    TaskNotFound {
        project_id: ProjectId,
        task_id: TaskId,
    },
    /// Well-formed request that the current state does not allow.
    InvalidAssignment(String),
    /// Proposed hours break a ceiling.
    CapacityExceeded(CapacityViolation),
    /// Capacity fixer hit its pass bound with violations left.
    UnresolvableCapacityConflict {
        passes: usize,
        remaining: Vec<CapacityViolation>,
    },
}

impl CoreError {
    /// Whether the failure is a user-correctable warning rather than an
    /// abort-and-log condition.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, Self::UnresolvableCapacityConflict { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::EmployeeNotFound(_) | Self::ProjectNotFound(_) | Self::TaskNotFound { .. }
        )
    }

    pub(crate) fn invalid(key: AssignmentKey, reason: &str) -> Self {
        Self::InvalidAssignment(format!("{key}: {reason}"))
    }
}

impl Display for CoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::EmployeeNotFound(id) => write!(f, "employee not found: {id}"),
            Self::ProjectNotFound(id) => write!(f, "project not found: {id}"),
            Self::TaskNotFound {
                project_id,
                task_id,
            } => write!(f, "task not found: {task_id} in project {project_id}"),
            Self::InvalidAssignment(reason) => write!(f, "invalid assignment: {reason}"),
            Self::CapacityExceeded(violation) => write!(f, "capacity exceeded: {violation}"),
            Self::UnresolvableCapacityConflict { passes, remaining } => write!(
                f,
                "capacity conflicts unresolved after {passes} passes ({} remaining)",
                remaining.len()
            ),
        }
    }
}

impl Error for CoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for CoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}
