use chrono::NaiveDate;
use staffing_core::{
    CapacityViolation, Company, CoreError, Employee, EmployeeKind, Project, ProjectDraft,
    ProjectPhase, Task, TaskType, ValidationError,
};

fn developer(id: u32, rate: f64) -> Employee {
    Employee::new(
        id,
        format!("Dev {id}"),
        3200.0,
        "Engineering",
        rate,
        EmployeeKind::Developer {
            programming_language: "Rust".to_string(),
            years_of_experience: 4.0,
        },
    )
    .unwrap()
}

fn setup() -> Company {
    let mut company = Company::new("Acme", "Software", "Porto", 2004).unwrap();
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
                    start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                    end_date: None,
                    budget: 100_000.0,
                    client_name: "Client".to_string(),
                    initial_estimated_hours: 0,
                },
            )
            .unwrap(),
        )
        .unwrap();
    company
        .add_task(1, Task::new(1, "API", TaskType::Development, 30, 5).unwrap())
        .unwrap();
    company
        .add_task(1, Task::new(2, "Jobs", TaskType::Development, 50, 3).unwrap())
        .unwrap();
    company
}

#[test]
fn set_overwrites_and_zero_deletes() {
    let mut company = setup();
    company.set_task_assignment(1, 1, 1, 10).unwrap();
    assert_eq!(company.get_task_assignment(1, 1, 1), 10);

    company.set_task_assignment(1, 1, 1, 4).unwrap();
    assert_eq!(company.get_employee_task_hours(1, 1, 1), 4);
    assert_eq!(company.employee(1).unwrap().current_weekly_hours(), 4);
    assert_eq!(company.project(1).unwrap().task(1).unwrap().allocated_hours(), 4);

    company.set_task_assignment(1, 1, 1, 0).unwrap();
    assert!(company.get_all_task_assignments().is_empty());
    assert_eq!(company.employee(1).unwrap().current_weekly_hours(), 0);
}

#[test]
fn employee_capacity_is_inclusive() {
    let mut company = setup();
    company.set_task_assignment(1, 1, 2, 40).unwrap();

    let err = company.add_task_assignment(1, 1, 1, 1).unwrap_err();
    assert_eq!(
        err,
        CoreError::CapacityExceeded(CapacityViolation::Employee {
            employee_id: 1,
            capacity: 40,
            total: 41,
        })
    );
    assert_eq!(company.get_task_assignment(1, 1, 1), 0);
    assert_eq!(company.employee(1).unwrap().current_weekly_hours(), 40);
}

#[test]
fn task_estimate_is_inclusive() {
    let mut company = setup();
    company.set_task_assignment(1, 1, 1, 20).unwrap();
    company.set_task_assignment(2, 1, 1, 10).unwrap();
    assert_eq!(company.project(1).unwrap().task(1).unwrap().allocated_hours(), 30);

    let err = company.add_task_assignment(2, 1, 1, 1).unwrap_err();
    assert!(matches!(
        err,
        CoreError::CapacityExceeded(CapacityViolation::Task {
            estimated: 30,
            total: 31,
            ..
        })
    ));
}

#[test]
fn add_accumulates_and_rejects_zero() {
    let mut company = setup();
    assert_eq!(company.add_task_assignment(1, 1, 2, 5).unwrap(), 5);
    assert_eq!(company.add_task_assignment(1, 1, 2, 7).unwrap(), 12);
    assert!(matches!(
        company.add_task_assignment(1, 1, 2, 0),
        Err(CoreError::InvalidAssignment(_))
    ));
}

#[test]
fn unknown_references_are_not_found() {
    let mut company = setup();
    assert_eq!(
        company.set_task_assignment(9, 1, 1, 1).unwrap_err(),
        CoreError::EmployeeNotFound(9)
    );
    assert_eq!(
        company.set_task_assignment(1, 9, 1, 1).unwrap_err(),
        CoreError::ProjectNotFound(9)
    );
    assert_eq!(
        company.set_task_assignment(1, 1, 9, 1).unwrap_err(),
        CoreError::TaskNotFound {
            project_id: 1,
            task_id: 9
        }
    );
    assert!(company.restore_task_assignment(9, 1, 1, 1).unwrap_err().is_not_found());
}

#[test]
fn single_entry_is_capped_even_on_restore() {
    let mut company = setup();
    assert!(matches!(
        company.restore_task_assignment(1, 1, 2, 169),
        Err(CoreError::Validation(ValidationError::AboveMaximum { .. }))
    ));
}

#[test]
fn inactive_employee_cannot_gain_hours() {
    let mut company = setup();
    company.fire_employee(1).unwrap();
    assert!(matches!(
        company.set_task_assignment(1, 1, 1, 5),
        Err(CoreError::InvalidAssignment(_))
    ));
    company.restore_task_assignment(1, 1, 1, 5).unwrap();
    assert_eq!(company.get_task_assignment(1, 1, 1), 5);
}

#[test]
fn completed_project_only_allows_reductions() {
    let mut company = setup();
    company.set_task_assignment(1, 1, 1, 6).unwrap();
    company
        .set_project_phase(1, ProjectPhase::Completed)
        .unwrap();

    assert!(matches!(
        company.add_task_assignment(1, 1, 1, 1),
        Err(CoreError::InvalidAssignment(_))
    ));
    company.set_task_assignment(1, 1, 1, 2).unwrap();
    assert_eq!(company.get_task_assignment(1, 1, 1), 2);
}

#[test]
fn remove_reports_whether_entry_existed() {
    let mut company = setup();
    company.set_task_assignment(2, 1, 2, 8).unwrap();
    assert!(company.remove_task_assignment(2, 1, 2));
    assert!(!company.remove_task_assignment(2, 1, 2));
    assert_eq!(company.project(1).unwrap().allocated_hours(), 0);
}

#[test]
fn project_hours_sum_across_tasks() {
    let mut company = setup();
    company.set_task_assignment(1, 1, 1, 12).unwrap();
    company.set_task_assignment(1, 1, 2, 9).unwrap();
    company.set_task_assignment(2, 1, 2, 3).unwrap();
    assert_eq!(company.get_employee_project_hours(1, 1), 21);
    assert_eq!(company.get_employee_project_hours(2, 1), 3);
    assert_eq!(company.get_employee_project_hours(1, 2), 0);
}

#[test]
fn writes_record_project_history() {
    let mut company = setup();
    company.set_task_assignment(2, 1, 1, 3).unwrap();
    company.remove_task_assignment(2, 1, 1);
    assert!(company.employee(2).unwrap().project_history().contains(&1));
    assert!(company.employee(1).unwrap().project_history().is_empty());
}

#[test]
fn releasing_employee_clears_only_their_entries() {
    let mut company = setup();
    company.set_task_assignment(1, 1, 1, 10).unwrap();
    company.set_task_assignment(1, 1, 2, 10).unwrap();
    company.set_task_assignment(2, 1, 1, 5).unwrap();

    assert_eq!(company.remove_employee_task_assignments(1).unwrap(), 2);
    assert_eq!(company.get_all_task_assignments().len(), 1);
    assert_eq!(company.employee(1).unwrap().current_weekly_hours(), 0);
    assert_eq!(company.project(1).unwrap().allocated_hours(), 5);
    assert_eq!(
        company.remove_employee_task_assignments(7).unwrap_err(),
        CoreError::EmployeeNotFound(7)
    );
}

#[test]
fn scaling_rounds_down_and_validates_factor() {
    let mut company = setup();
    company.set_task_assignment(1, 1, 1, 25).unwrap();
    company.set_task_assignment(1, 1, 2, 15).unwrap();

    company.scale_employee_task_assignments(1, 0.5).unwrap();
    assert_eq!(company.get_task_assignment(1, 1, 1), 12);
    assert_eq!(company.get_task_assignment(1, 1, 2), 7);
    assert_eq!(company.employee(1).unwrap().current_weekly_hours(), 19);

    for factor in [1.5, -0.1, f64::NAN] {
        assert!(matches!(
            company.scale_employee_task_assignments(1, factor),
            Err(CoreError::Validation(ValidationError::InvalidScaleFactor(_)))
        ));
    }
}

#[test]
fn scaling_trims_restored_overflow_to_capacity() {
    let mut company = setup();
    company.restore_task_assignment(1, 1, 2, 50).unwrap();
    company.scale_employee_task_assignments(1, 1.0).unwrap();
    assert_eq!(company.get_task_assignment(1, 1, 2), 40);
}

#[test]
fn rate_reduction_scales_assignments() {
    let mut company = setup();
    company.set_task_assignment(1, 1, 1, 25).unwrap();
    company.set_task_assignment(1, 1, 2, 15).unwrap();

    company.set_employment_rate(1, 0.5).unwrap();
    let employee = company.employee(1).unwrap();
    assert_eq!(employee.weekly_hours_capacity(), 20);
    assert_eq!(employee.current_weekly_hours(), 19);
    assert!(company.capacity_violations().is_empty());

    assert!(company.set_employment_rate(1, 0.0).is_err());
}

#[test]
fn restore_bypasses_ceiling_that_set_enforces() {
    let mut company = setup();
    assert!(matches!(
        company.set_task_assignment(1, 1, 2, 45),
        Err(CoreError::CapacityExceeded(CapacityViolation::Employee { .. }))
    ));
    company.restore_task_assignment(1, 1, 2, 45).unwrap();
    assert_eq!(company.employee(1).unwrap().current_weekly_hours(), 45);
    assert_eq!(company.capacity_violations().len(), 1);
}
