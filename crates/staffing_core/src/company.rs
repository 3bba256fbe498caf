//! Company aggregate.
//!
//! # Responsibility
//! - Exclusively own employees, projects (with tasks) and the assignment
//!   ledger of one company.
//! - Provide entity lifecycle operations that keep the ledger clean.
//!
//! # Invariants
//! - Employee ids and project ids are unique within the company.
//! - No ledger entry references a missing employee, project or task.
//! - Every lifecycle operation that touches the ledger ends with the
//!   aggregation passes, so cached totals never outlive one call.
//!
//! Ledger operations, aggregation, capacity checks and the planner live in
//! `crate::service` as further `impl Company` blocks.

use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::ledger::AssignmentLedger;
use crate::model::employee::{validate_employment_rate, Employee, EmployeeId};
use crate::model::phase::ProjectPhase;
use crate::model::project::{Project, ProjectId};
use crate::model::task::{Task, TaskId};
use crate::model::{require_text, ValidationError};
use log::{debug, info};

const MIN_FOUNDED_YEAR: i32 = 1800;
const MAX_FOUNDED_YEAR: i32 = 2100;

/// Headline figures for reports.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyStatistics {
    pub employee_count: usize,
    pub active_employee_count: usize,
    pub project_count: usize,
    pub total_salaries: f64,
    pub total_budget: f64,
    pub total_allocated_hours: u32,
    pub total_employee_costs: f64,
}

/// How `retire_employee` disposed of an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retirement {
    /// Kept as inactive because project history references them.
    Fired,
    /// Hard-deleted; nothing referenced them.
    Removed,
}

/// One company with its people, projects and assignment ledger.
#[derive(Debug, Clone)]
pub struct Company {
    name: String,
    industry: String,
    location: String,
    founded_year: i32,
    pub(crate) employees: Vec<Employee>,
    pub(crate) projects: Vec<Project>,
    pub(crate) ledger: AssignmentLedger,
    pub(crate) config: CoreConfig,
}

impl Company {
    /// Creates an empty company using the default configuration.
    pub fn new(
        name: impl Into<String>,
        industry: impl Into<String>,
        location: impl Into<String>,
        founded_year: i32,
    ) -> Result<Self, ValidationError> {
        Self::with_config(name, industry, location, founded_year, CoreConfig::default())
    }

    pub fn with_config(
        name: impl Into<String>,
        industry: impl Into<String>,
        location: impl Into<String>,
        founded_year: i32,
        config: CoreConfig,
    ) -> Result<Self, ValidationError> {
        let name = require_text("company name", name.into())?;
        if !(MIN_FOUNDED_YEAR..=MAX_FOUNDED_YEAR).contains(&founded_year) {
            return Err(ValidationError::InvalidYear(founded_year));
        }
        Ok(Self {
            name,
            industry: industry.into(),
            location: location.into(),
            founded_year,
            employees: Vec::new(),
            projects: Vec::new(),
            ledger: AssignmentLedger::new(),
            config,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn industry(&self) -> &str {
        &self.industry
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn founded_year(&self) -> i32 {
        self.founded_year
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: CoreConfig) {
        self.config = config;
    }

    pub fn ledger(&self) -> &AssignmentLedger {
        &self.ledger
    }

    // ---- employees ----

    /// All employees in insertion order.
    pub fn get_all_employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn employee(&self, employee_id: EmployeeId) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id() == employee_id)
    }

    pub(crate) fn employee_mut(&mut self, employee_id: EmployeeId) -> Option<&mut Employee> {
        self.employees.iter_mut().find(|e| e.id() == employee_id)
    }

    pub(crate) fn require_employee(&self, employee_id: EmployeeId) -> CoreResult<&Employee> {
        self.employee(employee_id)
            .ok_or(CoreError::EmployeeNotFound(employee_id))
    }

    pub fn next_employee_id(&self) -> EmployeeId {
        self.employees
            .iter()
            .map(Employee::id)
            .max()
            .map_or(1, |max| max + 1)
    }

    pub fn add_employee(&mut self, employee: Employee) -> CoreResult<()> {
        if self.employee(employee.id()).is_some() {
            return Err(ValidationError::DuplicateId {
                entity: "employee",
                id: employee.id(),
            }
            .into());
        }
        debug!(
            "event=employee_add module=company status=ok employee_id={} role={}",
            employee.id(),
            employee.role()
        );
        self.employees.push(employee);
        Ok(())
    }

    /// Hard-deletes an employee and every ledger entry they hold.
    pub fn remove_employee(&mut self, employee_id: EmployeeId) -> CoreResult<()> {
        self.remove_employee_task_assignments(employee_id)?;
        self.employees.retain(|e| e.id() != employee_id);
        self.recalculate_all();
        info!(
            "event=employee_remove module=company status=ok employee_id={}",
            employee_id
        );
        Ok(())
    }

    /// Marks an employee inactive and releases all their hours.
    pub fn fire_employee(&mut self, employee_id: EmployeeId) -> CoreResult<()> {
        self.remove_employee_task_assignments(employee_id)?;
        if let Some(employee) = self.employee_mut(employee_id) {
            employee.is_active = false;
        }
        info!(
            "event=employee_fire module=company status=ok employee_id={}",
            employee_id
        );
        Ok(())
    }

    /// Fires employees referenced by project history, deletes the rest.
    pub fn retire_employee(&mut self, employee_id: EmployeeId) -> CoreResult<Retirement> {
        let has_history = !self
            .require_employee(employee_id)?
            .project_history()
            .is_empty();
        if has_history {
            self.fire_employee(employee_id)?;
            Ok(Retirement::Fired)
        } else {
            self.remove_employee(employee_id)?;
            Ok(Retirement::Removed)
        }
    }

    /// Changes the employment rate; a reduction scales the employee's
    /// assignments by `new / old` so they fit the smaller capacity.
    pub fn set_employment_rate(&mut self, employee_id: EmployeeId, rate: f64) -> CoreResult<()> {
        let rate = validate_employment_rate(rate)?;
        let employee = self
            .employee_mut(employee_id)
            .ok_or(CoreError::EmployeeNotFound(employee_id))?;
        let previous = employee.employment_rate;
        employee.employment_rate = rate;

        if rate < previous {
            self.scale_employee_task_assignments(employee_id, rate / previous)?;
        } else {
            self.refresh_employee(employee_id);
        }
        Ok(())
    }

    /// Changes a salary and re-derives project costs.
    pub fn set_salary(&mut self, employee_id: EmployeeId, salary: f64) -> CoreResult<()> {
        self.employee_mut(employee_id)
            .ok_or(CoreError::EmployeeNotFound(employee_id))?
            .set_salary(salary)?;
        self.recalculate_task_allocated_hours();
        Ok(())
    }

    // ---- projects ----

    /// All projects (with nested tasks) in insertion order.
    pub fn get_all_projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn project(&self, project_id: ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| p.id() == project_id)
    }

    pub(crate) fn project_mut(&mut self, project_id: ProjectId) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| p.id() == project_id)
    }

    pub(crate) fn require_project(&self, project_id: ProjectId) -> CoreResult<&Project> {
        self.project(project_id)
            .ok_or(CoreError::ProjectNotFound(project_id))
    }

    pub(crate) fn require_task(&self, project_id: ProjectId, task_id: TaskId) -> CoreResult<&Task> {
        self.require_project(project_id)?
            .task(task_id)
            .ok_or(CoreError::TaskNotFound {
                project_id,
                task_id,
            })
    }

    pub fn next_project_id(&self) -> ProjectId {
        self.projects
            .iter()
            .map(Project::id)
            .max()
            .map_or(1, |max| max + 1)
    }

    pub fn add_project(&mut self, project: Project) -> CoreResult<()> {
        if self.project(project.id()).is_some() {
            return Err(ValidationError::DuplicateId {
                entity: "project",
                id: project.id(),
            }
            .into());
        }
        debug!(
            "event=project_add module=company status=ok project_id={} phase={}",
            project.id(),
            project.phase()
        );
        self.projects.push(project);
        Ok(())
    }

    /// Deletes a project, its tasks and every ledger entry on it.
    pub fn remove_project(&mut self, project_id: ProjectId) -> CoreResult<()> {
        self.require_project(project_id)?;
        let removed = self
            .ledger
            .remove_where(|key| key.project_id == project_id);
        self.projects.retain(|p| p.id() != project_id);
        self.recalculate_all();
        info!(
            "event=project_remove module=company status=ok project_id={} removed_assignments={}",
            project_id,
            removed.len()
        );
        Ok(())
    }

    /// Adds a task after the id-uniqueness and deadline-capacity checks.
    pub fn add_task(&mut self, project_id: ProjectId, task: Task) -> CoreResult<()> {
        let project = self
            .project_mut(project_id)
            .ok_or(CoreError::ProjectNotFound(project_id))?;
        let task_id = task.id();
        project.push_task(task)?;
        debug!(
            "event=task_add module=company status=ok project_id={} task_id={}",
            project_id, task_id
        );
        Ok(())
    }

    pub fn set_project_phase(&mut self, project_id: ProjectId, phase: ProjectPhase) -> CoreResult<()> {
        self.project_mut(project_id)
            .ok_or(CoreError::ProjectNotFound(project_id))?
            .set_phase(phase)?;
        Ok(())
    }

    pub fn statistics(&self) -> CompanyStatistics {
        CompanyStatistics {
            employee_count: self.employees.len(),
            active_employee_count: self.employees.iter().filter(|e| e.is_active()).count(),
            project_count: self.projects.len(),
            total_salaries: self.employees.iter().map(Employee::salary).sum(),
            total_budget: self.projects.iter().map(Project::budget).sum(),
            total_allocated_hours: self.projects.iter().map(Project::allocated_hours).sum(),
            total_employee_costs: self.projects.iter().map(Project::employee_costs).sum(),
        }
    }
}
