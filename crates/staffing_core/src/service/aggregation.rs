//! Aggregation passes.
//!
//! # Responsibility
//! - Derive `current_weekly_hours`, task `allocated_hours`, project
//!   `allocated_hours` and project `employee_costs` from the ledger.
//!
//! # Invariants
//! - Passes read only the ledger and entity attributes; running a pass twice
//!   yields the same cached values.
//! - Ledger entries whose employee is missing contribute hours but no cost.

use crate::company::Company;
use crate::model::assignment_cost;
use crate::model::employee::EmployeeId;
use crate::model::project::{Project, ProjectId};
use crate::model::task::TaskId;
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap};

impl Company {
    /// Sets each employee's `current_weekly_hours` to their ledger total.
    pub fn recalculate_employee_hours(&mut self) {
        let totals = self.ledger.employee_totals();
        for employee in &mut self.employees {
            employee.current_weekly_hours = totals.get(&employee.id()).copied().unwrap_or(0);
        }
        debug!(
            "event=recalc_employee_hours module=aggregation status=ok employees={}",
            self.employees.len()
        );
    }

    /// Sets task and project allocations and project costs from the ledger.
    pub fn recalculate_task_allocated_hours(&mut self) {
        let task_totals = self.ledger.task_totals();
        let costs = self.ledger_costs();
        for project in &mut self.projects {
            let project_id = project.id();
            let cost = costs.get(&project_id).copied().unwrap_or(0.0);
            apply_project_totals(
                project,
                |task_id| task_totals.get(&(project_id, task_id)).copied().unwrap_or(0),
                cost,
            );
        }
        debug!(
            "event=recalc_task_hours module=aggregation status=ok projects={}",
            self.projects.len()
        );
    }

    /// Both passes; the state every public mutation ends in.
    pub fn recalculate_all(&mut self) {
        self.recalculate_employee_hours();
        self.recalculate_task_allocated_hours();
    }

    /// Ledger-derived cost of all hours booked on one project.
    pub fn project_cost_from_ledger(&self, project_id: ProjectId) -> f64 {
        let salaries = self.salary_index();
        self.ledger
            .project_entries(project_id)
            .filter_map(|(key, hours)| {
                salaries
                    .get(&key.employee_id)
                    .map(|salary| assignment_cost(*salary, hours))
            })
            .sum()
    }

    /// Recomputes the cached hours of one employee.
    pub(crate) fn refresh_employee(&mut self, employee_id: EmployeeId) {
        let total = self.ledger.employee_total(employee_id);
        if let Some(employee) = self.employee_mut(employee_id) {
            employee.current_weekly_hours = total;
        }
    }

    /// Recomputes task allocations and the cost of one project.
    pub(crate) fn refresh_project(&mut self, project_id: ProjectId) {
        let cost = self.project_cost_from_ledger(project_id);
        let mut totals: BTreeMap<TaskId, u32> = BTreeMap::new();
        for (key, hours) in self.ledger.project_entries(project_id) {
            *totals.entry(key.task_id).or_insert(0) += hours;
        }
        if let Some(project) = self.project_mut(project_id) {
            apply_project_totals(
                project,
                |task_id| totals.get(&task_id).copied().unwrap_or(0),
                cost,
            );
        }
    }

    fn salary_index(&self) -> HashMap<EmployeeId, f64> {
        self.employees
            .iter()
            .map(|employee| (employee.id(), employee.salary()))
            .collect()
    }

    fn ledger_costs(&self) -> BTreeMap<ProjectId, f64> {
        let salaries = self.salary_index();
        let mut costs = BTreeMap::new();
        for (key, hours) in self.ledger.iter() {
            match salaries.get(&key.employee_id) {
                Some(salary) => {
                    *costs.entry(key.project_id).or_insert(0.0) += assignment_cost(*salary, hours);
                }
                None => warn!(
                    "event=recalc_task_hours module=aggregation status=skip reason=missing_employee {}",
                    key
                ),
            }
        }
        costs
    }
}

fn apply_project_totals<F>(project: &mut Project, allocated_for: F, cost: f64)
where
    F: Fn(TaskId) -> u32,
{
    let mut project_total = 0u32;
    for task in &mut project.tasks {
        let allocated = allocated_for(task.id());
        task.set_allocated_hours(allocated);
        project_total = project_total.saturating_add(allocated);
    }
    project.allocated_hours = project_total;
    project.employee_costs = cost;
}
