//! Auto-assignment planner.
//!
//! # Responsibility
//! - Fill the unallocated hours of a project's tasks with eligible, active
//!   employees.
//! - Report what was planned and which tasks stayed under-allocated.
//!
//! # Invariants
//! - Planned hours never push an employee past capacity, a task past its
//!   estimate, or (with `respect_budget`) the project past its budget.
//! - Candidate and task ordering are total orders, so two runs on equal
//!   state plan the same hours.
//! - On success and on failure the caches are rebuilt once before
//!   returning.

use crate::company::Company;
use crate::config::{PoolOrder, TaskOrder};
use crate::error::{CoreError, CoreResult};
use crate::ledger::AssignmentKey;
use crate::model::employee::EmployeeId;
use crate::model::phase::{EmployeeRole, TaskType};
use crate::model::project::ProjectId;
use crate::model::task::TaskId;
use crate::model::{assignment_cost, hourly_rate, MAX_AFFORDABLE_RATE_SHARE};
use crate::service::assignment_service::WriteMode;
use log::{info, warn};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedAssignment {
    pub employee_id: EmployeeId,
    pub task_id: TaskId,
    /// Hours added by this run.
    pub hours: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnderAllocatedTask {
    pub task_id: TaskId,
    pub missing_hours: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AutoAssignReport {
    pub project_id: ProjectId,
    pub assignments: Vec<PlannedAssignment>,
    pub under_allocated: Vec<UnderAllocatedTask>,
}

impl AutoAssignReport {
    pub fn hours_assigned(&self) -> u32 {
        self.assignments.iter().map(|a| a.hours).sum()
    }

    pub fn is_fully_allocated(&self) -> bool {
        self.under_allocated.is_empty()
    }
}

struct Candidate {
    id: EmployeeId,
    role: EmployeeRole,
    salary: f64,
    hourly_rate: f64,
    rate_cents: u64,
    capacity: u32,
}

struct TaskTarget {
    id: TaskId,
    task_type: TaskType,
    estimated: u32,
    remaining: u32,
    priority: u32,
}

impl Company {
    /// Plans hours for every task of a project.
    ///
    /// # Errors
    /// - `ProjectNotFound`.
    /// - `InvalidAssignment` when the project is completed.
    pub fn auto_assign_project(&mut self, project_id: ProjectId) -> CoreResult<AutoAssignReport> {
        self.auto_assign(project_id, None)
    }

    /// Plans hours for a single task.
    pub fn auto_assign_task(
        &mut self,
        project_id: ProjectId,
        task_id: TaskId,
    ) -> CoreResult<AutoAssignReport> {
        self.require_task(project_id, task_id)?;
        self.auto_assign(project_id, Some(task_id))
    }

    fn auto_assign(
        &mut self,
        project_id: ProjectId,
        only_task: Option<TaskId>,
    ) -> CoreResult<AutoAssignReport> {
        let planner = self.config.planner.clone();
        let project = self.require_project(project_id)?;
        if project.phase().is_completed() {
            return Err(CoreError::InvalidAssignment(format!(
                "project {project_id} is completed"
            )));
        }

        let phase_role = project.phase().expected_role();
        let budget = project.budget();
        let project_estimate = project.estimated_hours();
        let mut targets: Vec<TaskTarget> = project
            .tasks()
            .iter()
            .filter(|task| only_task.map_or(true, |id| id == task.id()))
            .map(|task| TaskTarget {
                id: task.id(),
                task_type: task.task_type(),
                estimated: task.estimated_hours(),
                remaining: task.remaining_hours(),
                priority: task.priority(),
            })
            .collect();
        if planner.task_order == TaskOrder::PriorityDescending {
            targets.sort_by(|a, b| b.priority.cmp(&a.priority));
        }

        let max_affordable_rate = if project_estimate > 0 {
            budget / f64::from(project_estimate) * MAX_AFFORDABLE_RATE_SHARE
        } else {
            f64::INFINITY
        };
        let candidates: Vec<Candidate> = self
            .employees
            .iter()
            .filter(|employee| employee.is_active())
            .filter(|employee| phase_role.map_or(true, |role| employee.role() == role))
            .filter(|employee| {
                !planner.respect_budget
                    || (employee.salary() <= budget
                        && hourly_rate(employee.salary()) <= max_affordable_rate)
            })
            .map(|employee| {
                let rate = hourly_rate(employee.salary());
                Candidate {
                    id: employee.id(),
                    role: employee.role(),
                    salary: employee.salary(),
                    hourly_rate: rate,
                    rate_cents: (rate * 100.0).round() as u64,
                    capacity: employee.weekly_hours_capacity(),
                }
            })
            .collect();

        let mut usage: BTreeMap<EmployeeId, u32> = self.ledger.employee_totals();
        let mut remaining_budget = budget - self.project_cost_from_ledger(project_id);
        let mut report = AutoAssignReport {
            project_id,
            ..AutoAssignReport::default()
        };

        for target in &targets {
            if target.estimated == 0 {
                continue;
            }
            let mut need = target.remaining;
            if need == 0 {
                continue;
            }

            let available = |candidate: &Candidate, usage: &BTreeMap<EmployeeId, u32>| {
                candidate
                    .capacity
                    .saturating_sub(usage.get(&candidate.id).copied().unwrap_or(0))
            };
            let mut pool: Vec<&Candidate> = candidates
                .iter()
                .filter(|c| c.role == target.task_type.required_role())
                .filter(|c| available(c, &usage) > 0)
                .collect();
            pool.sort_by(|a, b| match planner.pool_order {
                PoolOrder::CheapestFirst => a
                    .rate_cents
                    .cmp(&b.rate_cents)
                    .then_with(|| available(b, &usage).cmp(&available(a, &usage)))
                    .then_with(|| a.id.cmp(&b.id)),
                PoolOrder::ById => a.id.cmp(&b.id),
            });

            for candidate in pool {
                if need == 0 {
                    break;
                }
                let mut hours = need.min(available(candidate, &usage));
                if planner.respect_budget && candidate.hourly_rate > 0.0 {
                    let affordable = (remaining_budget / candidate.hourly_rate).floor().max(0.0);
                    hours = hours.min(affordable.min(f64::from(u32::MAX)) as u32);
                }
                if hours == 0 {
                    continue;
                }

                let key = AssignmentKey::new(candidate.id, project_id, target.id);
                let total = self.ledger.get(&key) + hours;
                if let Err(err) = self.write_assignment(key, total, WriteMode::Checked) {
                    self.recalculate_all();
                    warn!(
                        "event=auto_assign module=planner status=error project_id={} {} err={}",
                        project_id, key, err
                    );
                    return Err(err);
                }

                *usage.entry(candidate.id).or_insert(0) += hours;
                need -= hours;
                remaining_budget -= assignment_cost(candidate.salary, hours);
                report.assignments.push(PlannedAssignment {
                    employee_id: candidate.id,
                    task_id: target.id,
                    hours,
                });
            }

            if need > 0 {
                report.under_allocated.push(UnderAllocatedTask {
                    task_id: target.id,
                    missing_hours: need,
                });
            }
        }

        self.recalculate_all();
        info!(
            "event=auto_assign module=planner status=ok project_id={} assignments={} hours={} under_allocated={}",
            project_id,
            report.assignments.len(),
            report.hours_assigned(),
            report.under_allocated.len()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use crate::company::Company;
    use crate::config::{CoreConfig, PoolOrder, TaskOrder};
    use crate::model::employee::{Employee, EmployeeKind};
    use crate::model::phase::{ProjectPhase, TaskType};
    use crate::model::project::{Project, ProjectDraft};
    use crate::model::task::Task;
    use chrono::NaiveDate;

    fn developer(id: u32, salary: f64) -> Employee {
        Employee::new(
            id,
            format!("Dev {id}"),
            salary,
            "Engineering",
            1.0,
            EmployeeKind::Developer {
                programming_language: "Rust".to_string(),
                years_of_experience: 2.0,
            },
        )
        .unwrap()
    }

    fn company(config: CoreConfig, budget: f64) -> Company {
        let mut company = Company::with_config("Acme", "Software", "Oslo", 1999, config).unwrap();
        company
            .add_project(
                Project::new(
                    1,
                    ProjectDraft {
                        name: "Billing".to_string(),
                        description: String::new(),
                        phase: ProjectPhase::Development,
                        start_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
                        end_date: None,
                        budget,
                        client_name: "Client".to_string(),
                        initial_estimated_hours: 0,
                    },
                )
                .unwrap(),
            )
            .unwrap();
        company
    }

    #[test]
    fn cheaper_developer_is_used_first() {
        let mut company = company(CoreConfig::default(), 50_000.0);
        company.add_employee(developer(1, 6400.0)).unwrap();
        company.add_employee(developer(2, 3200.0)).unwrap();
        company
            .add_task(1, Task::new(1, "API", TaskType::Development, 50, 1).unwrap())
            .unwrap();

        let report = company.auto_assign_project(1).unwrap();
        assert_eq!(company.get_task_assignment(2, 1, 1), 40);
        assert_eq!(company.get_task_assignment(1, 1, 1), 10);
        assert!(report.is_fully_allocated());
        assert_eq!(report.hours_assigned(), 50);
    }

    #[test]
    fn by_id_order_ignores_cost() {
        let mut config = CoreConfig::default();
        config.planner.pool_order = PoolOrder::ById;
        let mut company = company(config, 50_000.0);
        company.add_employee(developer(1, 6400.0)).unwrap();
        company.add_employee(developer(2, 3200.0)).unwrap();
        company
            .add_task(1, Task::new(1, "API", TaskType::Development, 20, 1).unwrap())
            .unwrap();

        company.auto_assign_project(1).unwrap();
        assert_eq!(company.get_task_assignment(1, 1, 1), 20);
        assert_eq!(company.get_task_assignment(2, 1, 1), 0);
    }

    #[test]
    fn priority_order_serves_urgent_task_first() {
        let mut config = CoreConfig::default();
        config.planner.task_order = TaskOrder::PriorityDescending;
        let mut company = company(config, 50_000.0);
        company.add_employee(developer(1, 3200.0)).unwrap();
        company
            .add_task(1, Task::new(1, "Docs", TaskType::Development, 30, 1).unwrap())
            .unwrap();
        company
            .add_task(1, Task::new(2, "Hotfix", TaskType::Development, 30, 9).unwrap())
            .unwrap();

        let report = company.auto_assign_project(1).unwrap();
        assert_eq!(company.get_task_assignment(1, 1, 2), 30);
        assert_eq!(company.get_task_assignment(1, 1, 1), 10);
        assert_eq!(report.under_allocated.len(), 1);
        assert_eq!(report.under_allocated[0].task_id, 1);
        assert_eq!(report.under_allocated[0].missing_hours, 20);
    }

    #[test]
    fn remaining_budget_clamps_hours() {
        // Dev 1 costs 20 per hour against a cap of 4800 / 160 * 0.7 = 21.
        // 80h booked at 55 per hour cost 4400, so 400 buys 20 more hours.
        let mut company = company(CoreConfig::default(), 4800.0);
        company.add_employee(developer(1, 3200.0)).unwrap();
        company.add_employee(developer(2, 8800.0)).unwrap();
        company
            .add_task(1, Task::new(1, "API", TaskType::Development, 40, 1).unwrap())
            .unwrap();
        company
            .add_task(1, Task::new(2, "Jobs", TaskType::Development, 120, 1).unwrap())
            .unwrap();
        company.restore_task_assignment(2, 1, 2, 80).unwrap();

        let report = company.auto_assign_project(1).unwrap();
        assert_eq!(company.get_task_assignment(1, 1, 1), 20);
        assert_eq!(company.get_task_assignment(1, 1, 2), 0);
        assert_eq!(report.hours_assigned(), 20);
        assert_eq!(report.under_allocated.len(), 2);
        assert_eq!(report.under_allocated[0].task_id, 1);
        assert_eq!(report.under_allocated[0].missing_hours, 20);
        assert!((company.project(1).unwrap().remaining_budget()).abs() < 1e-9);
    }

    #[test]
    fn budget_can_be_ignored() {
        let mut config = CoreConfig::default();
        config.planner.respect_budget = false;
        let mut company = company(config, 100.0);
        company.add_employee(developer(1, 3200.0)).unwrap();
        company
            .add_task(1, Task::new(1, "API", TaskType::Development, 10, 1).unwrap())
            .unwrap();

        company.auto_assign_project(1).unwrap();
        assert_eq!(company.get_task_assignment(1, 1, 1), 10);
        assert!(company.project(1).unwrap().remaining_budget() < 0.0);
    }

    #[test]
    fn completed_project_is_rejected() {
        let mut company = company(CoreConfig::default(), 1000.0);
        company
            .set_project_phase(1, ProjectPhase::Completed)
            .unwrap();
        assert!(company.auto_assign_project(1).is_err());
        assert!(company.auto_assign_task(1, 7).unwrap_err().is_not_found());
    }
}
