use chrono::NaiveDate;
use staffing_core::{
    AssignmentKey, CapacityViolation, Company, Employee, EmployeeKind, Project, ProjectDraft,
    ProjectPhase, Reduction, Task, TaskType,
};

fn developer(id: u32, rate: f64) -> Employee {
    Employee::new(
        id,
        format!("Dev {id}"),
        3200.0,
        "Engineering",
        rate,
        EmployeeKind::Developer {
            programming_language: "Go".to_string(),
            years_of_experience: 1.0,
        },
    )
    .unwrap()
}

/// Dev 1 holds 40h of capacity, dev 2 holds 20h. Task 1 estimates 30h,
/// task 2 estimates 50h.
fn company() -> Company {
    let mut company = Company::new("Acme", "Software", "Faro", 2012).unwrap();
    company.add_employee(developer(1, 1.0)).unwrap();
    company.add_employee(developer(2, 0.5)).unwrap();
    company
        .add_project(
            Project::new(
                1,
                ProjectDraft {
                    name: "Portal".to_string(),
                    description: String::new(),
                    phase: ProjectPhase::Development,
                    start_date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
                    end_date: None,
                    budget: 50_000.0,
                    client_name: "Client".to_string(),
                    initial_estimated_hours: 0,
                },
            )
            .unwrap(),
        )
        .unwrap();
    company
        .add_task(1, Task::new(1, "API", TaskType::Development, 30, 2).unwrap())
        .unwrap();
    company
        .add_task(1, Task::new(2, "Jobs", TaskType::Development, 50, 1).unwrap())
        .unwrap();
    company
}

fn overloaded() -> Company {
    let mut company = company();
    company.restore_task_assignment(1, 1, 1, 25).unwrap();
    company.restore_task_assignment(2, 1, 1, 15).unwrap();
    company.restore_task_assignment(1, 1, 2, 30).unwrap();
    company.restore_task_assignment(2, 1, 2, 10).unwrap();
    company
}

#[test]
fn violations_list_tasks_before_employees() {
    let company = overloaded();
    assert_eq!(
        company.capacity_violations(),
        vec![
            CapacityViolation::Task {
                project_id: 1,
                task_id: 1,
                estimated: 30,
                total: 40,
            },
            CapacityViolation::Employee {
                employee_id: 1,
                capacity: 40,
                total: 55,
            },
            CapacityViolation::Employee {
                employee_id: 2,
                capacity: 20,
                total: 25,
            },
        ]
    );
}

#[test]
fn one_pass_repairs_both_axes() {
    let mut company = overloaded();
    let report = company.fix_task_assignments_to_capacity().unwrap();

    assert_eq!(report.passes, 1);
    assert_eq!(
        report.reductions,
        vec![
            Reduction {
                key: AssignmentKey::new(1, 1, 1),
                from: 25,
                to: 15,
            },
            Reduction {
                key: AssignmentKey::new(1, 1, 2),
                from: 30,
                to: 25,
            },
            Reduction {
                key: AssignmentKey::new(2, 1, 1),
                from: 15,
                to: 10,
            },
        ]
    );
    assert_eq!(report.hours_removed(), 20);
    assert!(company.capacity_violations().is_empty());

    assert_eq!(company.employee(1).unwrap().current_weekly_hours(), 40);
    assert_eq!(company.employee(2).unwrap().current_weekly_hours(), 20);
    let project = company.project(1).unwrap();
    assert_eq!(project.task(1).unwrap().allocated_hours(), 25);
    assert_eq!(project.task(2).unwrap().allocated_hours(), 35);
    assert_eq!(project.allocated_hours(), 60);
    assert!((project.employee_costs() - 1200.0).abs() < 1e-9);
}

#[test]
fn equal_entries_cut_larger_key_first() {
    let mut company = company();
    company.restore_task_assignment(1, 1, 1, 20).unwrap();
    company.restore_task_assignment(2, 1, 1, 20).unwrap();

    company.fix_task_assignments_to_capacity().unwrap();
    assert_eq!(company.get_task_assignment(1, 1, 1), 20);
    assert_eq!(company.get_task_assignment(2, 1, 1), 10);
}

#[test]
fn entries_cut_to_zero_are_deleted() {
    let mut company = company();
    company.set_employment_rate(2, 0.25).unwrap();
    company.restore_task_assignment(2, 1, 1, 10).unwrap();
    company.restore_task_assignment(2, 1, 2, 12).unwrap();

    let report = company.fix_task_assignments_to_capacity().unwrap();
    assert_eq!(report.hours_removed(), 12);
    assert_eq!(company.get_task_assignment(2, 1, 2), 0);
    assert_eq!(company.get_task_assignment(2, 1, 1), 10);
    assert_eq!(company.get_all_task_assignments().len(), 1);
    assert_eq!(company.project(1).unwrap().task(2).unwrap().allocated_hours(), 0);
}

#[test]
fn fixing_is_deterministic() {
    let mut first = overloaded();
    let mut second = overloaded();
    assert_eq!(
        first.fix_task_assignments_to_capacity().unwrap(),
        second.fix_task_assignments_to_capacity().unwrap()
    );
    assert_eq!(first.get_all_task_assignments(), second.get_all_task_assignments());
    assert!(first.fix_task_assignments_to_capacity().unwrap().is_noop());
}
