//! Capacity checks and repair.
//!
//! # Responsibility
//! - Check the employee and task ceilings for a proposed write.
//! - Report every ceiling the current ledger breaks.
//! - Reduce entries until no ceiling is broken.
//!
//! # Invariants
//! - The fixer only lowers or deletes entries, so fixing one axis never
//!   breaks the other.
//! - Reductions cut the largest entry first; equal entries are cut in
//!   descending key order. Output is deterministic for a given ledger.

use crate::company::Company;
use crate::error::{CapacityViolation, CoreError, CoreResult};
use crate::ledger::AssignmentKey;
use log::{info, warn};

/// One entry lowered by the fixer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reduction {
    pub key: AssignmentKey,
    pub from: u32,
    pub to: u32,
}

/// Outcome of a successful `fix_task_assignments_to_capacity` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixReport {
    /// Passes that changed at least one entry.
    pub passes: usize,
    pub reductions: Vec<Reduction>,
}

impl FixReport {
    pub fn is_noop(&self) -> bool {
        self.reductions.is_empty()
    }

    pub fn hours_removed(&self) -> u32 {
        self.reductions.iter().map(|r| r.from - r.to).sum()
    }
}

impl Company {
    /// Fails with `CapacityExceeded` when writing `hours` at `key` would
    /// push the employee or the task past its ceiling.
    pub(crate) fn check_ceilings(&self, key: AssignmentKey, hours: u32) -> CoreResult<()> {
        let existing = self.ledger.get(&key);
        let employee = self.require_employee(key.employee_id)?;
        let capacity = employee.weekly_hours_capacity();
        let employee_total = (self.ledger.employee_total(key.employee_id) - existing) + hours;
        if employee_total > capacity {
            return Err(CoreError::CapacityExceeded(CapacityViolation::Employee {
                employee_id: key.employee_id,
                capacity,
                total: employee_total,
            }));
        }

        let estimated = self.require_task(key.project_id, key.task_id)?.estimated_hours();
        let task_total = (self.ledger.task_total(key.project_id, key.task_id) - existing) + hours;
        if task_total > estimated {
            return Err(CoreError::CapacityExceeded(CapacityViolation::Task {
                project_id: key.project_id,
                task_id: key.task_id,
                estimated,
                total: task_total,
            }));
        }
        Ok(())
    }

    /// Every broken ceiling in the ledger: tasks first (project order, then
    /// task order), then employees in insertion order.
    pub fn capacity_violations(&self) -> Vec<CapacityViolation> {
        let mut violations = Vec::new();
        let task_totals = self.ledger.task_totals();
        for project in &self.projects {
            for task in project.tasks() {
                let total = task_totals
                    .get(&(project.id(), task.id()))
                    .copied()
                    .unwrap_or(0);
                if total > task.estimated_hours() {
                    violations.push(CapacityViolation::Task {
                        project_id: project.id(),
                        task_id: task.id(),
                        estimated: task.estimated_hours(),
                        total,
                    });
                }
            }
        }

        let employee_totals = self.ledger.employee_totals();
        for employee in &self.employees {
            let total = employee_totals.get(&employee.id()).copied().unwrap_or(0);
            let capacity = employee.weekly_hours_capacity();
            if total > capacity {
                violations.push(CapacityViolation::Employee {
                    employee_id: employee.id(),
                    capacity,
                    total,
                });
            }
        }
        violations
    }

    /// Lowers entries until no task exceeds its estimate and no employee
    /// exceeds their capacity, then runs both aggregation passes.
    ///
    /// # Errors
    /// - `UnresolvableCapacityConflict` when violations remain after
    ///   `max_fix_passes` passes. The ledger keeps the partial repair.
    pub fn fix_task_assignments_to_capacity(&mut self) -> CoreResult<FixReport> {
        let max_passes = self.config.max_fix_passes;
        let mut report = FixReport::default();

        loop {
            let violations = self.capacity_violations();
            if violations.is_empty() {
                break;
            }
            if report.passes >= max_passes {
                self.recalculate_all();
                warn!(
                    "event=capacity_fix module=capacity status=error passes={} remaining={}",
                    report.passes,
                    violations.len()
                );
                return Err(CoreError::UnresolvableCapacityConflict {
                    passes: report.passes,
                    remaining: violations,
                });
            }

            for violation in &violations {
                let reductions = match violation {
                    CapacityViolation::Task {
                        project_id,
                        task_id,
                        estimated,
                        ..
                    } => {
                        let total = self.ledger.task_total(*project_id, *task_id);
                        if total <= *estimated {
                            continue;
                        }
                        let entries = self.ledger.task_entries(*project_id, *task_id).collect();
                        self.reduce_entries(entries, total - estimated)
                    }
                    CapacityViolation::Employee {
                        employee_id,
                        capacity,
                        ..
                    } => {
                        let total = self.ledger.employee_total(*employee_id);
                        if total <= *capacity {
                            continue;
                        }
                        let entries = self.ledger.employee_entries(*employee_id).collect();
                        self.reduce_entries(entries, total - capacity)
                    }
                };
                report.reductions.extend(reductions);
            }
            report.passes += 1;
        }

        self.recalculate_all();
        info!(
            "event=capacity_fix module=capacity status=ok passes={} reductions={} hours_removed={}",
            report.passes,
            report.reductions.len(),
            report.hours_removed()
        );
        Ok(report)
    }

    /// Removes `excess` hours from `entries`, largest entry first.
    pub(crate) fn reduce_entries(
        &mut self,
        mut entries: Vec<(AssignmentKey, u32)>,
        mut excess: u32,
    ) -> Vec<Reduction> {
        entries.sort_by(|(key_a, hours_a), (key_b, hours_b)| {
            hours_b.cmp(hours_a).then_with(|| key_b.cmp(key_a))
        });

        let mut reductions = Vec::new();
        for (key, hours) in entries {
            if excess == 0 {
                break;
            }
            let cut = hours.min(excess);
            let to = hours - cut;
            self.ledger.put(key, to);
            excess -= cut;
            reductions.push(Reduction {
                key,
                from: hours,
                to,
            });
        }
        reductions
    }
}
