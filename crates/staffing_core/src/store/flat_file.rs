//! Flat text codec.
//!
//! One record per line, fields separated by `|`. Backslash escapes `\\`,
//! `\|`, `\n` and `\r` inside fields. The first line is the version header.
//!
//! ```text
//! STAFFING_DATA v1
//! COMPANY|name|industry|location|founded_year
//! EMPLOYEE|id|Developer|name|salary|department|rate|active|language|years
//! HISTORY|employee_id|project_id,project_id
//! PROJECT|id|name|description|phase|start|end or -|budget|client|initial_hours
//! TASK|project_id|task_id|name|type|estimated_hours|priority
//! ASSIGNMENT|employee_id|project_id|task_id|hours
//! ```

use crate::company::Company;
use crate::config::CoreConfig;
use crate::error::CoreError;
use crate::model::employee::{Employee, EmployeeKind};
use crate::model::phase::{EmployeeRole, ProjectPhase, TaskType};
use crate::model::project::{Project, ProjectDraft, ProjectId};
use crate::model::task::Task;
use crate::store::{StoreError, StoreResult};
use chrono::NaiveDate;
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const FORMAT_VERSION: u32 = 1;
const DATE_FORMAT: &str = "%Y-%m-%d";
const NONE_MARKER: &str = "-";

static HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^STAFFING_DATA v(\d+)$").expect("valid header regex"));

/// Writes `company` to `path` through a sibling temporary file.
pub fn save_company(company: &Company, path: &Path) -> StoreResult<()> {
    let rendered = render_company(company);
    let staging = staging_path(path);
    std::fs::write(&staging, rendered)?;
    std::fs::rename(&staging, path)?;
    info!(
        "event=company_save module=store status=ok path={} employees={} projects={} assignments={}",
        path.display(),
        company.get_all_employees().len(),
        company.get_all_projects().len(),
        company.ledger().len()
    );
    Ok(())
}

/// Reads a company from `path`; caches are rebuilt before returning.
pub fn load_company(path: &Path, config: CoreConfig) -> StoreResult<Company> {
    let raw = std::fs::read_to_string(path)?;
    let company = parse_company(&raw, config)?;
    info!(
        "event=company_load module=store status=ok path={} employees={} projects={} assignments={}",
        path.display(),
        company.get_all_employees().len(),
        company.get_all_projects().len(),
        company.ledger().len()
    );
    Ok(company)
}

/// `company.txt` stages as `company.txt.tmp`, leaving `company.tmp` alone.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

pub fn render_company(company: &Company) -> String {
    let mut lines = vec![format!("STAFFING_DATA v{FORMAT_VERSION}")];
    lines.push(join(&[
        "COMPANY".to_string(),
        escape(company.name()),
        escape(company.industry()),
        escape(company.location()),
        company.founded_year().to_string(),
    ]));

    for employee in company.get_all_employees() {
        lines.push(render_employee(employee));
    }
    for employee in company.get_all_employees() {
        if employee.project_history().is_empty() {
            continue;
        }
        let history: Vec<String> = employee
            .project_history()
            .iter()
            .map(ToString::to_string)
            .collect();
        lines.push(join(&[
            "HISTORY".to_string(),
            employee.id().to_string(),
            history.join(","),
        ]));
    }

    for project in company.get_all_projects() {
        lines.push(join(&[
            "PROJECT".to_string(),
            project.id().to_string(),
            escape(project.name()),
            escape(project.description()),
            escape(project.phase().as_str()),
            project.start_date().format(DATE_FORMAT).to_string(),
            project
                .end_date()
                .map_or_else(|| NONE_MARKER.to_string(), |d| d.format(DATE_FORMAT).to_string()),
            project.budget().to_string(),
            escape(project.client_name()),
            project.initial_estimated_hours().to_string(),
        ]));
        for task in project.tasks() {
            lines.push(join(&[
                "TASK".to_string(),
                project.id().to_string(),
                task.id().to_string(),
                escape(task.name()),
                escape(task.task_type().as_str()),
                task.estimated_hours().to_string(),
                task.priority().to_string(),
            ]));
        }
    }

    for (key, hours) in company.ledger().iter() {
        lines.push(join(&[
            "ASSIGNMENT".to_string(),
            key.employee_id.to_string(),
            key.project_id.to_string(),
            key.task_id.to_string(),
            hours.to_string(),
        ]));
    }

    let mut rendered = lines.join("\n");
    rendered.push('\n');
    rendered
}

/// Parses a whole document. Any bad record fails the load.
pub fn parse_company(raw: &str, config: CoreConfig) -> StoreResult<Company> {
    let mut lines = raw
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());

    let (header_line, header) = lines
        .next()
        .ok_or_else(|| StoreError::parse(1, "missing header"))?;
    let captures = HEADER_RE
        .captures(header.trim_end())
        .ok_or_else(|| StoreError::parse(header_line, "expected `STAFFING_DATA v1` header"))?;
    let version: u32 = captures[1]
        .parse()
        .map_err(|_| StoreError::parse(header_line, "version is not a number"))?;
    if version != FORMAT_VERSION {
        return Err(StoreError::UnsupportedVersion(version));
    }

    let mut company: Option<Company> = None;
    let mut last_line = header_line;
    for (line_no, line) in lines {
        last_line = line_no;
        let record = Record::parse(line_no, line)?;
        if record.kind() == "COMPANY" {
            if company.is_some() {
                return Err(StoreError::parse(line_no, "duplicate COMPANY record"));
            }
            company = Some(read_company(&record, config.clone())?);
            continue;
        }
        let company = company
            .as_mut()
            .ok_or_else(|| StoreError::parse(line_no, "COMPANY record must come first"))?;
        apply_record(company, &record)?;
    }

    let mut company =
        company.ok_or_else(|| StoreError::parse(last_line, "missing COMPANY record"))?;
    company.recalculate_all();
    Ok(company)
}

fn render_employee(employee: &Employee) -> String {
    let mut fields = vec![
        "EMPLOYEE".to_string(),
        employee.id().to_string(),
        employee.role().as_str().to_string(),
        escape(employee.name()),
        employee.salary().to_string(),
        escape(employee.department()),
        employee.employment_rate().to_string(),
        employee.is_active().to_string(),
    ];
    match employee.kind() {
        EmployeeKind::Manager { managed_project_id } => fields.push(
            managed_project_id.map_or_else(|| NONE_MARKER.to_string(), |id| id.to_string()),
        ),
        EmployeeKind::Developer {
            programming_language,
            years_of_experience,
        } => {
            fields.push(escape(programming_language));
            fields.push(years_of_experience.to_string());
        }
        EmployeeKind::Designer {
            design_tool,
            number_of_projects,
        } => {
            fields.push(escape(design_tool));
            fields.push(number_of_projects.to_string());
        }
        EmployeeKind::Qa {
            testing_type,
            bugs_found,
        } => {
            fields.push(escape(testing_type));
            fields.push(bugs_found.to_string());
        }
    }
    join(&fields)
}

fn read_company(record: &Record, config: CoreConfig) -> StoreResult<Company> {
    record.expect_len(5)?;
    Company::with_config(
        record.text(1),
        record.text(2),
        record.text(3),
        record.number(4, "founded year")?,
        config,
    )
    .map_err(|err| record.model(err.into()))
}

fn apply_record(company: &mut Company, record: &Record) -> StoreResult<()> {
    match record.kind() {
        "EMPLOYEE" => {
            let employee = read_employee(record)?;
            company
                .add_employee(employee)
                .map_err(|err| record.model(err))
        }
        "HISTORY" => {
            record.expect_len(3)?;
            let employee_id = record.number(1, "employee id")?;
            let mut history: Vec<ProjectId> = Vec::new();
            for raw in record.text(2).split(',').filter(|id| !id.is_empty()) {
                history.push(
                    raw.trim()
                        .parse()
                        .map_err(|_| record.error(format!("invalid project id `{raw}`")))?,
                );
            }
            let employee = company
                .employee_mut(employee_id)
                .ok_or_else(|| record.model(CoreError::EmployeeNotFound(employee_id)))?;
            employee.project_history.extend(history);
            Ok(())
        }
        "PROJECT" => {
            record.expect_len(10)?;
            let phase = ProjectPhase::parse(record.text(4)).map_err(|err| record.model(err.into()))?;
            let draft = ProjectDraft {
                name: record.text(2).to_string(),
                description: record.text(3).to_string(),
                phase,
                start_date: record.date(5)?,
                end_date: if record.text(6) == NONE_MARKER {
                    None
                } else {
                    Some(record.date(6)?)
                },
                budget: record.number(7, "budget")?,
                client_name: record.text(8).to_string(),
                initial_estimated_hours: record.number(9, "estimated hours")?,
            };
            let project = Project::new(record.number(1, "project id")?, draft)
                .map_err(|err| record.model(err.into()))?;
            company.add_project(project).map_err(|err| record.model(err))
        }
        "TASK" => {
            record.expect_len(7)?;
            let task_type =
                TaskType::parse(record.text(4)).map_err(|err| record.model(err.into()))?;
            let task = Task::new(
                record.number(2, "task id")?,
                record.text(3),
                task_type,
                record.number(5, "estimated hours")?,
                record.number(6, "priority")?,
            )
            .map_err(|err| record.model(err.into()))?;
            company
                .add_task(record.number(1, "project id")?, task)
                .map_err(|err| record.model(err))
        }
        "ASSIGNMENT" => {
            record.expect_len(5)?;
            company
                .restore_task_assignment(
                    record.number(1, "employee id")?,
                    record.number(2, "project id")?,
                    record.number(3, "task id")?,
                    record.number(4, "hours")?,
                )
                .map_err(|err| record.model(err))
        }
        other => Err(record.error(format!("unknown record type `{other}`"))),
    }
}

fn read_employee(record: &Record) -> StoreResult<Employee> {
    let role = EmployeeRole::parse(record.text(2)).map_err(|err| record.model(err.into()))?;
    let kind = match role {
        EmployeeRole::Manager => {
            record.expect_len(9)?;
            let managed_project_id = if record.text(8) == NONE_MARKER {
                None
            } else {
                Some(record.number(8, "managed project id")?)
            };
            EmployeeKind::Manager { managed_project_id }
        }
        EmployeeRole::Developer => {
            record.expect_len(10)?;
            EmployeeKind::Developer {
                programming_language: record.text(8).to_string(),
                years_of_experience: record.number(9, "years of experience")?,
            }
        }
        EmployeeRole::Designer => {
            record.expect_len(10)?;
            EmployeeKind::Designer {
                design_tool: record.text(8).to_string(),
                number_of_projects: record.number(9, "number of projects")?,
            }
        }
        EmployeeRole::Qa => {
            record.expect_len(10)?;
            EmployeeKind::Qa {
                testing_type: record.text(8).to_string(),
                bugs_found: record.number(9, "bugs found")?,
            }
        }
    };

    let mut employee = Employee::new(
        record.number(1, "employee id")?,
        record.text(3),
        record.number(4, "salary")?,
        record.text(5),
        record.number(6, "employment rate")?,
        kind,
    )
    .map_err(|err| record.model(err.into()))?;
    employee.is_active = record.number(7, "active flag")?;
    Ok(employee)
}

struct Record {
    line: usize,
    fields: Vec<String>,
}

impl Record {
    fn parse(line: usize, raw: &str) -> StoreResult<Self> {
        let fields = split_fields(raw).map_err(|message| StoreError::parse(line, message))?;
        Ok(Self { line, fields })
    }

    fn kind(&self) -> &str {
        self.text(0)
    }

    fn text(&self, index: usize) -> &str {
        self.fields.get(index).map_or("", String::as_str)
    }

    fn expect_len(&self, expected: usize) -> StoreResult<()> {
        if self.fields.len() != expected {
            return Err(self.error(format!(
                "{} record needs {expected} fields, got {}",
                self.kind(),
                self.fields.len()
            )));
        }
        Ok(())
    }

    fn number<T: FromStr>(&self, index: usize, what: &str) -> StoreResult<T> {
        let raw = self.text(index);
        raw.trim()
            .parse()
            .map_err(|_| self.error(format!("invalid {what} `{raw}`")))
    }

    fn date(&self, index: usize) -> StoreResult<NaiveDate> {
        let raw = self.text(index);
        NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map_err(|err| self.error(format!("invalid date `{raw}`: {err}")))
    }

    fn error(&self, message: String) -> StoreError {
        StoreError::parse(self.line, message)
    }

    fn model(&self, source: CoreError) -> StoreError {
        StoreError::Model {
            line: self.line,
            source,
        }
    }
}

fn join(fields: &[String]) -> String {
    fields.join("|")
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '|' => escaped.push_str("\\|"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn split_fields(line: &str) -> Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some('\\') => current.push('\\'),
                Some('|') => current.push('|'),
                Some('n') => current.push('\n'),
                Some('r') => current.push('\r'),
                Some(other) => return Err(format!("unknown escape `\\{other}`")),
                None => return Err("dangling escape at end of line".to_string()),
            },
            '|' => fields.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    fields.push(current);
    Ok(fields)
}
