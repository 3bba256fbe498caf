//! Staffing CLI.
//!
//! # Responsibility
//! - Wire `staffing_core` to a flat data file.
//! - Print plain-text summaries and planner/fixer reports.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::info;
use staffing_core::{
    init_logging, load_company, render_json, save_company, AutoAssignReport, Company, CoreConfig,
    Employee, EmployeeKind, FixReport, Project, ProjectDraft, ProjectPhase, Task, TaskType,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "staffing")]
#[command(author, version, about = "Company staffing and task assignment ledger", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, requires = "log_dir")]
    log_level: Option<String>,

    /// Directory for rolling log files; logging stays off when omitted
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// JSON file with core settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a sample company, auto-assign every project and print it
    Demo {
        /// Also write the company to this file
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Print employees, projects and assignments of a data file
    Summary {
        file: PathBuf,
        /// Print a JSON snapshot instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Set the hours of one assignment
    Assign {
        file: PathBuf,
        #[arg(short, long)]
        employee: u32,
        #[arg(short, long)]
        project: u32,
        #[arg(short, long)]
        task: u32,
        /// Zero removes the assignment
        #[arg(long)]
        hours: u32,
    },

    /// Run the auto-assignment planner on a project
    AutoAssign {
        file: PathBuf,
        #[arg(short, long)]
        project: u32,
        /// Restrict planning to one task
        #[arg(short, long)]
        task: Option<u32>,
    },

    /// Trim assignments until every capacity ceiling holds
    Fix { file: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(dir) = &cli.log_dir {
        let dir = absolute(dir)?;
        let level = cli
            .log_level
            .as_deref()
            .unwrap_or_else(|| staffing_core::default_log_level());
        init_logging(level, &dir).context("failed to start logging")?;
    }

    let config = match &cli.config {
        Some(path) => CoreConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => CoreConfig::default(),
    };

    match cli.command {
        Commands::Demo { save } => {
            let mut company = demo_company(config)?;
            let project_ids: Vec<u32> = company.get_all_projects().iter().map(Project::id).collect();
            for project_id in project_ids {
                let report = company.auto_assign_project(project_id)?;
                print_auto_assign(&report);
            }
            print_summary(&company);
            if let Some(path) = save {
                save_company(&company, &path)?;
                println!("saved to {}", path.display());
            }
        }
        Commands::Summary { file, json } => {
            let company = open(&file, config)?;
            if json {
                println!("{}", render_json(&company)?);
            } else {
                print_summary(&company);
            }
        }
        Commands::Assign {
            file,
            employee,
            project,
            task,
            hours,
        } => {
            let mut company = open(&file, config)?;
            company
                .set_task_assignment(employee, project, task, hours)
                .with_context(|| {
                    format!("cannot assign employee {employee} to task {task} of project {project}")
                })?;
            save_company(&company, &file)?;
            println!(
                "employee {employee} now holds {}h of {}h capacity",
                company.ledger().employee_total(employee),
                company
                    .employee(employee)
                    .map_or(0, Employee::weekly_hours_capacity)
            );
        }
        Commands::AutoAssign {
            file,
            project,
            task,
        } => {
            let mut company = open(&file, config)?;
            let report = match task {
                Some(task) => company.auto_assign_task(project, task)?,
                None => company.auto_assign_project(project)?,
            };
            print_auto_assign(&report);
            save_company(&company, &file)?;
        }
        Commands::Fix { file } => {
            let mut company = open(&file, config)?;
            let report = company.fix_task_assignments_to_capacity()?;
            print_fix(&report);
            save_company(&company, &file)?;
        }
    }
    Ok(())
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir()?.join(path))
}

fn open(path: &Path, config: CoreConfig) -> Result<Company> {
    let company = load_company(path, config)
        .with_context(|| format!("failed to load {}", path.display()))?;
    info!(
        "event=cli_open module=cli status=ok path={}",
        path.display()
    );
    Ok(company)
}

fn print_summary(company: &Company) {
    println!(
        "{} ({}, {}, founded {})",
        company.name(),
        company.industry(),
        company.location(),
        company.founded_year()
    );

    println!("\nEmployees:");
    for employee in company.get_all_employees() {
        println!(
            "  #{:<3} {:<20} {:<9} {:>3}/{:<3}h{}",
            employee.id(),
            employee.name(),
            employee.role().as_str(),
            employee.current_weekly_hours(),
            employee.weekly_hours_capacity(),
            if employee.is_active() { "" } else { " (inactive)" }
        );
    }

    println!("\nProjects:");
    for project in company.get_all_projects() {
        println!(
            "  #{:<3} {:<20} {:<12} {:>5}/{:<5}h  cost {:.2} of {:.2}",
            project.id(),
            project.name(),
            project.phase().as_str(),
            project.allocated_hours(),
            project.estimated_hours(),
            project.employee_costs(),
            project.budget()
        );
        for task in project.tasks() {
            println!(
                "       task #{:<3} {:<18} {:<11} {:>4}/{:<4}h {}",
                task.id(),
                task.name(),
                task.task_type().as_str(),
                task.allocated_hours(),
                task.estimated_hours(),
                task.status().as_str()
            );
        }
    }

    println!("\nAssignments:");
    for (key, hours) in company.ledger().iter() {
        println!("  {key} hours={hours}");
    }

    let stats = company.statistics();
    println!(
        "\n{} employees ({} active), {} projects, {}h allocated, costs {:.2}",
        stats.employee_count,
        stats.active_employee_count,
        stats.project_count,
        stats.total_allocated_hours,
        stats.total_employee_costs
    );
}

fn print_auto_assign(report: &AutoAssignReport) {
    println!(
        "project {}: planned {}h in {} assignments",
        report.project_id,
        report.hours_assigned(),
        report.assignments.len()
    );
    for planned in &report.assignments {
        println!(
            "  employee {} -> task {}: +{}h",
            planned.employee_id, planned.task_id, planned.hours
        );
    }
    for task in &report.under_allocated {
        println!(
            "  task {} still needs {}h",
            task.task_id, task.missing_hours
        );
    }
}

fn print_fix(report: &FixReport) {
    if report.is_noop() {
        println!("no capacity violations");
        return;
    }
    println!(
        "removed {}h in {} passes",
        report.hours_removed(),
        report.passes
    );
    for reduction in &report.reductions {
        println!(
            "  {}: {}h -> {}h",
            reduction.key, reduction.from, reduction.to
        );
    }
}

fn date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => Ok(date),
        None => bail!("invalid date {year}-{month}-{day}"),
    }
}

fn demo_company(config: CoreConfig) -> Result<Company> {
    let mut company = Company::with_config("Northwind Labs", "Software", "Lisbon", 2009, config)?;

    company.add_employee(Employee::new(
        1,
        "Ana Costa",
        7200.0,
        "Management",
        1.0,
        EmployeeKind::Manager {
            managed_project_id: Some(1),
        },
    )?)?;
    company.add_employee(Employee::new(
        2,
        "Rui Matos",
        4800.0,
        "Engineering",
        1.0,
        EmployeeKind::Developer {
            programming_language: "Rust".to_string(),
            years_of_experience: 6.0,
        },
    )?)?;
    company.add_employee(Employee::new(
        3,
        "Sofia Lima",
        4000.0,
        "Engineering",
        0.5,
        EmployeeKind::Developer {
            programming_language: "TypeScript".to_string(),
            years_of_experience: 3.0,
        },
    )?)?;
    company.add_employee(Employee::new(
        4,
        "Marta Reis",
        4400.0,
        "Design",
        0.75,
        EmployeeKind::Designer {
            design_tool: "Figma".to_string(),
            number_of_projects: 14,
        },
    )?)?;
    company.add_employee(Employee::new(
        5,
        "Joao Pires",
        3600.0,
        "Quality",
        1.0,
        EmployeeKind::Qa {
            testing_type: "Automation".to_string(),
            bugs_found: 230,
        },
    )?)?;

    company.add_project(Project::new(
        1,
        ProjectDraft {
            name: "Billing Portal".to_string(),
            description: "Self-service invoices".to_string(),
            phase: ProjectPhase::Development,
            start_date: date(2025, 1, 6)?,
            end_date: Some(date(2025, 3, 28)?),
            budget: 60_000.0,
            client_name: "Harbor Bank".to_string(),
            initial_estimated_hours: 0,
        },
    )?)?;
    company.add_task(1, Task::new(1, "Invoice API", TaskType::Development, 50, 8)?)?;
    company.add_task(1, Task::new(2, "PDF export", TaskType::Development, 20, 4)?)?;
    company.add_task(1, Task::new(3, "Release plan", TaskType::Management, 10, 2)?)?;

    company.add_project(Project::new(
        2,
        ProjectDraft {
            name: "Mobile Refresh".to_string(),
            description: "New app look".to_string(),
            phase: ProjectPhase::Design,
            start_date: date(2025, 2, 3)?,
            end_date: None,
            budget: 25_000.0,
            client_name: "Verde Retail".to_string(),
            initial_estimated_hours: 40,
        },
    )?)?;
    company.add_task(2, Task::new(1, "Style guide", TaskType::Design, 24, 5)?)?;
    company.add_task(2, Task::new(2, "Usability tests", TaskType::Qa, 12, 3)?)?;

    Ok(company)
}
