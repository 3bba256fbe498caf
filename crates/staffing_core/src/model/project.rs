//! Project domain model.
//!
//! # Responsibility
//! - Own the ordered task list of one project.
//! - Enforce the deadline capacity rule (`days * HOURS_PER_DAY`) for direct
//!   and task-derived estimates.
//!
//! # Invariants
//! - `end_date >= start_date` when an end date is set.
//! - `estimated_hours()` never exceeds `deadline_capacity()` when it exists.
//! - `allocated_hours` equals the sum of task allocated hours after every
//!   aggregation pass.

use crate::model::phase::ProjectPhase;
use crate::model::task::{Task, TaskId};
use crate::model::{
    require_at_most, require_non_negative, require_text, ValidationError, HOURS_PER_DAY,
    MAX_ESTIMATED_HOURS,
};
use chrono::NaiveDate;
use serde::Serialize;

pub type ProjectId = u32;

/// Input for creating a project.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDraft {
    pub name: String,
    pub description: String,
    pub phase: ProjectPhase,
    pub start_date: NaiveDate,
    /// Open-ended when `None`; no deadline capacity applies.
    pub end_date: Option<NaiveDate>,
    pub budget: f64,
    pub client_name: String,
    pub initial_estimated_hours: u32,
}

/// Client project with its tasks and cached totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    id: ProjectId,
    name: String,
    description: String,
    pub(crate) phase: ProjectPhase,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    budget: f64,
    client_name: String,
    initial_estimated_hours: u32,
    pub(crate) tasks: Vec<Task>,
    pub(crate) allocated_hours: u32,
    pub(crate) employee_costs: f64,
}

impl Project {
    /// Creates a project without tasks.
    ///
    /// # Errors
    /// - Blank name, negative budget, end before start.
    /// - Initial estimate above the deadline capacity.
    pub fn new(id: ProjectId, draft: ProjectDraft) -> Result<Self, ValidationError> {
        let name = require_text("project name", draft.name)?;
        let budget = require_non_negative("budget", draft.budget)?;
        let initial_estimated_hours = require_at_most(
            "estimated hours",
            draft.initial_estimated_hours,
            MAX_ESTIMATED_HOURS,
        )?;
        if let Some(end) = draft.end_date {
            if end < draft.start_date {
                return Err(ValidationError::EndBeforeStart {
                    start: draft.start_date.to_string(),
                    end: end.to_string(),
                });
            }
        }

        let project = Self {
            id,
            name,
            description: draft.description,
            phase: draft.phase,
            start_date: draft.start_date,
            end_date: draft.end_date,
            budget,
            client_name: draft.client_name,
            initial_estimated_hours,
            tasks: Vec::new(),
            allocated_hours: 0,
            employee_costs: 0.0,
        };
        project.check_deadline(initial_estimated_hours)?;
        Ok(project)
    }

    pub fn id(&self) -> ProjectId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn phase(&self) -> ProjectPhase {
        self.phase
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    pub fn budget(&self) -> f64 {
        self.budget
    }

    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    pub fn initial_estimated_hours(&self) -> u32 {
        self.initial_estimated_hours
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, task_id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == task_id)
    }

    /// Smallest task id not yet used in this project.
    pub fn next_task_id(&self) -> TaskId {
        self.tasks.iter().map(Task::id).max().map_or(1, |max| max + 1)
    }

    pub fn tasks_estimated_total(&self) -> u32 {
        self.tasks.iter().map(Task::estimated_hours).sum()
    }

    /// `max(initial estimate, sum of task estimates)`.
    pub fn estimated_hours(&self) -> u32 {
        self.initial_estimated_hours
            .max(self.tasks_estimated_total())
    }

    /// Cached sum of task allocated hours.
    pub fn allocated_hours(&self) -> u32 {
        self.allocated_hours
    }

    /// Cached ledger-derived cost of all employee hours on this project.
    pub fn employee_costs(&self) -> f64 {
        self.employee_costs
    }

    pub fn remaining_budget(&self) -> f64 {
        self.budget - self.employee_costs
    }

    /// Calendar days between start and end, end exclusive.
    pub fn days_duration(&self) -> Option<u32> {
        self.end_date
            .map(|end| (end - self.start_date).num_days().max(0) as u32)
    }

    /// Most hours the project window can hold: `days * HOURS_PER_DAY`.
    pub fn deadline_capacity(&self) -> Option<u32> {
        self.days_duration()
            .map(|days| days.saturating_mul(HOURS_PER_DAY))
    }

    pub(crate) fn check_deadline(&self, estimated: u32) -> Result<(), ValidationError> {
        match self.deadline_capacity() {
            Some(capacity) if estimated > capacity => {
                Err(ValidationError::EstimateExceedsDeadline {
                    estimated,
                    capacity,
                })
            }
            _ => Ok(()),
        }
    }

    /// Appends a task after the uniqueness and deadline checks.
    pub(crate) fn push_task(&mut self, task: Task) -> Result<(), ValidationError> {
        if self.task(task.id()).is_some() {
            return Err(ValidationError::DuplicateId {
                entity: "task",
                id: task.id(),
            });
        }
        let projected = self
            .initial_estimated_hours
            .max(self.tasks_estimated_total().saturating_add(task.estimated_hours()));
        self.check_deadline(projected)?;
        self.tasks.push(task);
        Ok(())
    }

    pub(crate) fn set_phase(&mut self, phase: ProjectPhase) -> Result<(), ValidationError> {
        if let (Some(current), Some(next)) = (self.phase.order(), phase.order()) {
            if next < current {
                return Err(ValidationError::PhaseRegression {
                    from: self.phase.as_str().to_string(),
                    to: phase.as_str().to_string(),
                });
            }
        }
        self.phase = phase;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Project, ProjectDraft};
    use crate::model::phase::{ProjectPhase, TaskType};
    use crate::model::task::Task;
    use crate::model::ValidationError;
    use chrono::NaiveDate;

    fn draft(days: i64, estimate: u32) -> ProjectDraft {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        ProjectDraft {
            name: "Portal".to_string(),
            description: String::new(),
            phase: ProjectPhase::Development,
            start_date: start,
            end_date: Some(start + chrono::Duration::days(days)),
            budget: 10_000.0,
            client_name: "Acme".to_string(),
            initial_estimated_hours: estimate,
        }
    }

    #[test]
    fn estimate_is_capped_by_deadline() {
        assert!(Project::new(1, draft(10, 80)).is_ok());
        assert_eq!(
            Project::new(1, draft(10, 81)).unwrap_err(),
            ValidationError::EstimateExceedsDeadline {
                estimated: 81,
                capacity: 80
            }
        );
    }

    #[test]
    fn end_before_start_is_rejected() {
        assert!(matches!(
            Project::new(1, draft(-1, 0)).unwrap_err(),
            ValidationError::EndBeforeStart { .. }
        ));
    }

    #[test]
    fn task_estimates_count_against_deadline() {
        let mut project = Project::new(1, draft(5, 10)).unwrap();
        project
            .push_task(Task::new(1, "API", TaskType::Development, 30, 1).unwrap())
            .unwrap();
        assert_eq!(project.estimated_hours(), 30);
        let err = project
            .push_task(Task::new(2, "UI", TaskType::Design, 11, 1).unwrap())
            .unwrap_err();
        assert!(matches!(err, ValidationError::EstimateExceedsDeadline { .. }));
        assert_eq!(project.next_task_id(), 2);
    }

    #[test]
    fn ordered_phase_cannot_move_backwards() {
        let mut project = Project::new(1, draft(5, 0)).unwrap();
        assert!(project.set_phase(ProjectPhase::Design).is_err());
        project.set_phase(ProjectPhase::Testing).unwrap();
        project.set_phase(ProjectPhase::OnHold).unwrap();
        assert_eq!(project.phase(), ProjectPhase::OnHold);
    }
}
