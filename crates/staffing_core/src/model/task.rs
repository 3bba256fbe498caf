//! Task domain model.
//!
//! # Invariants
//! - `id` is unique inside its owning project.
//! - `allocated_hours` and `status` change only through aggregation.

use crate::model::phase::{TaskStatus, TaskType};
use crate::model::{require_at_most, require_text, ValidationError, MAX_ESTIMATED_HOURS, MAX_PRIORITY};
use serde::Serialize;

pub type TaskId = u32;

/// Unit of work inside a project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    id: TaskId,
    name: String,
    task_type: TaskType,
    estimated_hours: u32,
    priority: u32,
    allocated_hours: u32,
    status: TaskStatus,
}

impl Task {
    /// Creates a planned task with no allocated hours.
    pub fn new(
        id: TaskId,
        name: impl Into<String>,
        task_type: TaskType,
        estimated_hours: u32,
        priority: u32,
    ) -> Result<Self, ValidationError> {
        let name = require_text("task name", name.into())?;
        let estimated_hours =
            require_at_most("estimated hours", estimated_hours, MAX_ESTIMATED_HOURS)?;
        let priority = require_at_most("priority", priority, MAX_PRIORITY)?;
        Ok(Self {
            id,
            name,
            task_type,
            estimated_hours,
            priority,
            allocated_hours: 0,
            status: TaskStatus::Planned,
        })
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn task_type(&self) -> TaskType {
        self.task_type
    }

    pub fn estimated_hours(&self) -> u32 {
        self.estimated_hours
    }

    pub fn priority(&self) -> u32 {
        self.priority
    }

    pub fn allocated_hours(&self) -> u32 {
        self.allocated_hours
    }

    /// Hours still needed to reach the estimate.
    pub fn remaining_hours(&self) -> u32 {
        self.estimated_hours.saturating_sub(self.allocated_hours)
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub(crate) fn set_allocated_hours(&mut self, hours: u32) {
        self.allocated_hours = hours;
        self.status = TaskStatus::derive(hours, self.estimated_hours);
    }
}
