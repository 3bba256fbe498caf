//! Domain model for companies, employees, projects and tasks.
//!
//! # Responsibility
//! - Define validated entity records and their derived read-only metrics.
//! - Hold the fixed domain constants used by capacity and cost math.
//!
//! # Invariants
//! - Constructors reject invalid input with `ValidationError`; nothing is
//!   silently clamped.
//! - Derived totals (`current_weekly_hours`, `allocated_hours`,
//!   `employee_costs`) are written only by the aggregation passes.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod employee;
pub mod phase;
pub mod project;
pub mod task;

/// Weekly hours of a full-time (rate 1.0) employee.
pub const BASE_WEEKLY_HOURS: u32 = 40;
/// Working hours in a month; converts monthly salary into an hourly rate.
pub const HOURS_PER_MONTH: f64 = 160.0;
/// Working hours per calendar day of a project's duration.
pub const HOURS_PER_DAY: u32 = 8;
/// Upper bound for any single weekly hour figure.
pub const MAX_HOURS_PER_WEEK: u32 = 168;
/// Upper bound for task/project hour estimates.
pub const MAX_ESTIMATED_HOURS: u32 = 100_000;
/// Upper bound for task priority.
pub const MAX_PRIORITY: u32 = 100;
/// Share of the project's average budget per estimated hour that a
/// candidate's hourly rate may reach during auto-assignment.
pub const MAX_AFFORDABLE_RATE_SHARE: f64 = 0.7;

/// Converts a monthly salary into the hourly rate used for every cost figure.
pub fn hourly_rate(monthly_salary: f64) -> f64 {
    monthly_salary / HOURS_PER_MONTH
}

/// Cost of `hours` worked by an employee with the given monthly salary.
pub fn assignment_cost(monthly_salary: f64, hours: u32) -> f64 {
    hourly_rate(monthly_salary) * f64::from(hours)
}

/// Validation failures raised by entity constructors and setters.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Required text field is blank after trim.
    EmptyField(&'static str),
    /// Monetary or numeric field is negative or not finite.
    NegativeValue { field: &'static str, value: f64 },
    /// Integer field is above its allowed maximum.
    AboveMaximum {
        field: &'static str,
        value: u64,
        max: u64,
    },
    /// Employment rate outside `(0, 1]`.
    InvalidEmploymentRate(f64),
    /// Project end date is earlier than its start date.
    EndBeforeStart { start: String, end: String },
    /// Estimated hours exceed `days * HOURS_PER_DAY` of the project window.
    EstimateExceedsDeadline { estimated: u32, capacity: u32 },
    /// Phase label is not one of the known phases.
    UnknownPhase(String),
    /// Task type label is not one of the known task types.
    UnknownTaskType(String),
    /// Employee type label is not one of the known variants.
    UnknownEmployeeType(String),
    /// Entity id is already taken inside its collection.
    DuplicateId { entity: &'static str, id: u32 },
    /// Phase change would move an ordered phase backwards.
    PhaseRegression { from: String, to: String },
    /// Founded year outside the supported range.
    InvalidYear(i32),
    /// Assignment scale factor outside `[0, 1]`.
    InvalidScaleFactor(f64),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "{field} cannot be empty"),
            Self::NegativeValue { field, value } => {
                write!(f, "{field} must be a non-negative number, got {value}")
            }
            Self::AboveMaximum { field, value, max } => {
                write!(f, "{field} must be at most {max}, got {value}")
            }
            Self::InvalidEmploymentRate(rate) => {
                write!(f, "employment rate must be in (0, 1], got {rate}")
            }
            Self::EndBeforeStart { start, end } => {
                write!(f, "end date {end} is before start date {start}")
            }
            Self::EstimateExceedsDeadline {
                estimated,
                capacity,
            } => write!(
                f,
                "estimated hours {estimated} exceed deadline capacity {capacity}"
            ),
            Self::UnknownPhase(value) => write!(f, "unknown phase: `{value}`"),
            Self::UnknownTaskType(value) => write!(f, "unknown task type: `{value}`"),
            Self::UnknownEmployeeType(value) => write!(f, "unknown employee type: `{value}`"),
            Self::DuplicateId { entity, id } => write!(f, "{entity} id {id} already exists"),
            Self::PhaseRegression { from, to } => {
                write!(f, "cannot move phase backwards from {from} to {to}")
            }
            Self::InvalidYear(year) => write!(f, "founded year {year} is out of range"),
            Self::InvalidScaleFactor(factor) => {
                write!(f, "scale factor must be in [0, 1], got {factor}")
            }
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_text(field: &'static str, value: String) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(value)
}

pub(crate) fn require_non_negative(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::NegativeValue { field, value });
    }
    Ok(value)
}

pub(crate) fn require_at_most(field: &'static str, value: u32, max: u32) -> Result<u32, ValidationError> {
    if value > max {
        return Err(ValidationError::AboveMaximum {
            field,
            value: u64::from(value),
            max: u64::from(max),
        });
    }
    Ok(value)
}
