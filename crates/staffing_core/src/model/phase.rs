//! Roles, phases and task types plus the fixed lookup tables between them.
//!
//! # Invariants
//! - `as_str()` labels round-trip through the matching `parse()` function.
//! - Phase→role and task-type→role mappings are fixed tables; the planner
//!   never infers roles any other way.

use crate::model::ValidationError;
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Employee role discriminant, one per employee variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EmployeeRole {
    Manager,
    Developer,
    Designer,
    Qa,
}

impl EmployeeRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manager => "Manager",
            Self::Developer => "Developer",
            Self::Designer => "Designer",
            Self::Qa => "QA",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value.trim() {
            "Manager" => Ok(Self::Manager),
            "Developer" => Ok(Self::Developer),
            "Designer" => Ok(Self::Designer),
            "QA" => Ok(Self::Qa),
            other => Err(ValidationError::UnknownEmployeeType(other.to_string())),
        }
    }
}

impl Display for EmployeeRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Project lifecycle stage.
///
/// Covers both the status-style labels (Planning, Active, ...) and the SDLC
/// labels (Analysis, Design, ...) used by stored data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ProjectPhase {
    Planning,
    Active,
    InProgress,
    Completed,
    OnHold,
    Analysis,
    Design,
    Development,
    Testing,
    Deployment,
    Maintenance,
}

impl ProjectPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Planning => "Planning",
            Self::Active => "Active",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::OnHold => "On Hold",
            Self::Analysis => "Analysis",
            Self::Design => "Design",
            Self::Development => "Development",
            Self::Testing => "Testing",
            Self::Deployment => "Deployment",
            Self::Maintenance => "Maintenance",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value.trim() {
            "Planning" => Ok(Self::Planning),
            "Active" => Ok(Self::Active),
            "In Progress" => Ok(Self::InProgress),
            "Completed" => Ok(Self::Completed),
            "On Hold" => Ok(Self::OnHold),
            "Analysis" => Ok(Self::Analysis),
            "Design" => Ok(Self::Design),
            "Development" => Ok(Self::Development),
            "Testing" => Ok(Self::Testing),
            "Deployment" => Ok(Self::Deployment),
            "Maintenance" => Ok(Self::Maintenance),
            other => Err(ValidationError::UnknownPhase(other.to_string())),
        }
    }

    /// Role the planner staffs during this phase.
    ///
    /// `None` means the phase does not restrict roles.
    pub fn expected_role(self) -> Option<EmployeeRole> {
        match self {
            Self::Analysis | Self::Planning => Some(EmployeeRole::Manager),
            Self::Design => Some(EmployeeRole::Designer),
            Self::Development => Some(EmployeeRole::Developer),
            Self::Testing => Some(EmployeeRole::Qa),
            Self::Deployment => Some(EmployeeRole::Manager),
            _ => None,
        }
    }

    /// Position in the SDLC sequence; `None` for status-style phases.
    pub fn order(self) -> Option<u8> {
        match self {
            Self::Analysis => Some(1),
            Self::Planning => Some(2),
            Self::Design => Some(3),
            Self::Development => Some(4),
            Self::Testing => Some(5),
            Self::Deployment => Some(6),
            Self::Maintenance => Some(7),
            Self::Completed => Some(8),
            Self::Active | Self::InProgress | Self::OnHold => None,
        }
    }

    pub fn is_completed(self) -> bool {
        self == Self::Completed
    }
}

impl Display for ProjectPhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of work a task represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TaskType {
    Management,
    Development,
    Design,
    #[serde(rename = "QA")]
    Qa,
}

impl TaskType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Management => "Management",
            Self::Development => "Development",
            Self::Design => "Design",
            Self::Qa => "QA",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value.trim() {
            "Management" => Ok(Self::Management),
            "Development" => Ok(Self::Development),
            "Design" => Ok(Self::Design),
            "QA" => Ok(Self::Qa),
            other => Err(ValidationError::UnknownTaskType(other.to_string())),
        }
    }

    /// Only employees of this role may hold hours on the task.
    pub fn required_role(self) -> EmployeeRole {
        match self {
            Self::Management => EmployeeRole::Manager,
            Self::Development => EmployeeRole::Developer,
            Self::Design => EmployeeRole::Designer,
            Self::Qa => EmployeeRole::Qa,
        }
    }
}

impl Display for TaskType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task progress derived from allocated vs estimated hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Planned,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn derive(allocated_hours: u32, estimated_hours: u32) -> Self {
        if allocated_hours == 0 {
            Self::Planned
        } else if estimated_hours > 0 && allocated_hours >= estimated_hours {
            Self::Completed
        } else {
            Self::InProgress
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Planned => "Planned",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EmployeeRole, ProjectPhase, TaskStatus, TaskType};

    #[test]
    fn phase_labels_round_trip() {
        for phase in [
            ProjectPhase::Planning,
            ProjectPhase::InProgress,
            ProjectPhase::OnHold,
            ProjectPhase::Testing,
        ] {
            assert_eq!(ProjectPhase::parse(phase.as_str()).unwrap(), phase);
        }
        assert!(ProjectPhase::parse("Shipping").is_err());
    }

    #[test]
    fn phase_maps_to_expected_role() {
        assert_eq!(
            ProjectPhase::Development.expected_role(),
            Some(EmployeeRole::Developer)
        );
        assert_eq!(ProjectPhase::Testing.expected_role(), Some(EmployeeRole::Qa));
        assert_eq!(
            ProjectPhase::Deployment.expected_role(),
            Some(EmployeeRole::Manager)
        );
        assert_eq!(ProjectPhase::Maintenance.expected_role(), None);
        assert_eq!(ProjectPhase::Active.expected_role(), None);
    }

    #[test]
    fn task_type_requires_matching_role() {
        assert_eq!(TaskType::Qa.required_role(), EmployeeRole::Qa);
        assert_eq!(
            TaskType::Management.required_role(),
            EmployeeRole::Manager
        );
    }

    #[test]
    fn status_follows_allocation() {
        assert_eq!(TaskStatus::derive(0, 10), TaskStatus::Planned);
        assert_eq!(TaskStatus::derive(4, 10), TaskStatus::InProgress);
        assert_eq!(TaskStatus::derive(10, 10), TaskStatus::Completed);
        assert_eq!(TaskStatus::derive(3, 0), TaskStatus::InProgress);
    }
}
