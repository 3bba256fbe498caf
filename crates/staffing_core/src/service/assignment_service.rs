//! Ledger use-cases.
//!
//! # Responsibility
//! - Validate references, status rules and ceilings before writing hours.
//! - Keep `project_history` and the cached totals in step with every write.
//!
//! # Invariants
//! - A checked write never leaves an employee above `weekly_hours_capacity`
//!   or a task above `estimated_hours`.
//! - Restore writes bypass ceilings and status rules but never reference
//!   checks.
//! - Role/task-type matching is not enforced here; only the planner filters
//!   by role.

use crate::company::Company;
use crate::error::{CoreError, CoreResult};
use crate::ledger::AssignmentKey;
use crate::model::employee::EmployeeId;
use crate::model::project::ProjectId;
use crate::model::task::TaskId;
use crate::model::{require_at_most, ValidationError, MAX_HOURS_PER_WEEK};
use log::{debug, info};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WriteMode {
    /// Status rules and ceilings apply to increases.
    Checked,
    /// Snapshot replay; only references and the per-entry bound apply.
    Restore,
}

impl Company {
    /// Replaces the hours of one assignment; zero deletes it.
    ///
    /// # Errors
    /// - `*NotFound` for unknown employee, project or task.
    /// - `InvalidAssignment` when an inactive employee or a completed project
    ///   would gain hours.
    /// - `CapacityExceeded` when either ceiling would break.
    pub fn set_task_assignment(
        &mut self,
        employee_id: EmployeeId,
        project_id: ProjectId,
        task_id: TaskId,
        hours: u32,
    ) -> CoreResult<()> {
        let key = AssignmentKey::new(employee_id, project_id, task_id);
        self.write_assignment(key, hours, WriteMode::Checked)?;
        self.refresh_key(key);
        Ok(())
    }

    /// Adds hours on top of the existing value and returns the new total.
    pub fn add_task_assignment(
        &mut self,
        employee_id: EmployeeId,
        project_id: ProjectId,
        task_id: TaskId,
        hours: u32,
    ) -> CoreResult<u32> {
        let key = AssignmentKey::new(employee_id, project_id, task_id);
        if hours == 0 {
            return Err(CoreError::invalid(key, "hours to add must be positive"));
        }
        let total = self.ledger.get(&key).saturating_add(hours);
        self.write_assignment(key, total, WriteMode::Checked)?;
        self.refresh_key(key);
        Ok(total)
    }

    /// Deletes one assignment. Returns whether an entry existed.
    pub fn remove_task_assignment(
        &mut self,
        employee_id: EmployeeId,
        project_id: ProjectId,
        task_id: TaskId,
    ) -> bool {
        let key = AssignmentKey::new(employee_id, project_id, task_id);
        let removed = self.ledger.remove(&key).is_some();
        if removed {
            self.refresh_key(key);
            debug!(
                "event=assignment_remove module=assignment status=ok {}",
                key
            );
        }
        removed
    }

    /// Hours at one key, 0 when absent.
    pub fn get_task_assignment(
        &self,
        employee_id: EmployeeId,
        project_id: ProjectId,
        task_id: TaskId,
    ) -> u32 {
        self.ledger
            .get(&AssignmentKey::new(employee_id, project_id, task_id))
    }

    /// Sum of one employee's hours across the tasks of one project.
    pub fn get_employee_project_hours(&self, employee_id: EmployeeId, project_id: ProjectId) -> u32 {
        self.ledger.employee_project_total(employee_id, project_id)
    }

    pub fn get_employee_task_hours(
        &self,
        employee_id: EmployeeId,
        project_id: ProjectId,
        task_id: TaskId,
    ) -> u32 {
        self.get_task_assignment(employee_id, project_id, task_id)
    }

    /// Deletes every entry of one employee. Returns the number removed.
    pub fn remove_employee_task_assignments(&mut self, employee_id: EmployeeId) -> CoreResult<usize> {
        self.require_employee(employee_id)?;
        let removed = self.ledger.remove_where(|key| key.employee_id == employee_id);
        self.recalculate_all();
        info!(
            "event=assignments_release module=assignment status=ok employee_id={} removed={}",
            employee_id,
            removed.len()
        );
        Ok(removed.len())
    }

    /// Multiplies each of the employee's entries by `factor`, rounding down,
    /// then trims whatever still exceeds their capacity.
    pub fn scale_employee_task_assignments(
        &mut self,
        employee_id: EmployeeId,
        factor: f64,
    ) -> CoreResult<()> {
        if !factor.is_finite() || !(0.0..=1.0).contains(&factor) {
            return Err(ValidationError::InvalidScaleFactor(factor).into());
        }
        let capacity = self.require_employee(employee_id)?.weekly_hours_capacity();

        let entries: Vec<(AssignmentKey, u32)> = self.ledger.employee_entries(employee_id).collect();
        for (key, hours) in &entries {
            let scaled = (f64::from(*hours) * factor).floor() as u32;
            self.ledger.put(*key, scaled);
        }

        let total = self.ledger.employee_total(employee_id);
        if total > capacity {
            let remaining: Vec<(AssignmentKey, u32)> =
                self.ledger.employee_entries(employee_id).collect();
            self.reduce_entries(remaining, total - capacity);
        }
        self.recalculate_all();
        info!(
            "event=assignments_scale module=assignment status=ok employee_id={} factor={} entries={}",
            employee_id,
            factor,
            entries.len()
        );
        Ok(())
    }

    /// Writes a persisted value without ceiling or status checks.
    pub fn restore_task_assignment(
        &mut self,
        employee_id: EmployeeId,
        project_id: ProjectId,
        task_id: TaskId,
        hours: u32,
    ) -> CoreResult<()> {
        let key = AssignmentKey::new(employee_id, project_id, task_id);
        self.write_assignment(key, hours, WriteMode::Restore)?;
        self.refresh_key(key);
        Ok(())
    }

    /// Snapshot of the whole ledger.
    pub fn get_all_task_assignments(&self) -> BTreeMap<AssignmentKey, u32> {
        self.ledger.snapshot()
    }

    /// Validates and writes `hours` at `key` without refreshing caches.
    /// Returns the previous value.
    pub(crate) fn write_assignment(
        &mut self,
        key: AssignmentKey,
        hours: u32,
        mode: WriteMode,
    ) -> CoreResult<u32> {
        let employee = self.require_employee(key.employee_id)?;
        let project = self.require_project(key.project_id)?;
        self.require_task(key.project_id, key.task_id)?;
        require_at_most("assignment hours", hours, MAX_HOURS_PER_WEEK)?;

        let previous = self.ledger.get(&key);
        if mode == WriteMode::Checked && hours > previous {
            if !employee.is_active() {
                return Err(CoreError::invalid(key, "employee is inactive"));
            }
            if project.phase().is_completed() {
                return Err(CoreError::invalid(key, "project is completed"));
            }
            self.check_ceilings(key, hours)?;
        }

        self.ledger.put(key, hours);
        if hours > 0 {
            if let Some(employee) = self.employee_mut(key.employee_id) {
                employee.project_history.insert(key.project_id);
            }
        }
        debug!(
            "event=assignment_write module=assignment status=ok {} hours={} previous={}",
            key, hours, previous
        );
        Ok(previous)
    }

    fn refresh_key(&mut self, key: AssignmentKey) {
        self.refresh_employee(key.employee_id);
        self.refresh_project(key.project_id);
    }
}
