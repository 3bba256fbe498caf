//! Core domain logic for company staffing.
//! This crate is the single source of truth for assignment invariants.

pub mod company;
pub mod config;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod model;
pub mod service;
pub mod session;
pub mod store;

pub use company::{Company, CompanyStatistics, Retirement};
pub use config::{ConfigError, CoreConfig, PlannerConfig, PoolOrder, TaskOrder};
pub use error::{CapacityViolation, CoreError, CoreResult};
pub use ledger::{AssignmentKey, AssignmentLedger};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::employee::{Employee, EmployeeId, EmployeeKind};
pub use model::phase::{EmployeeRole, ProjectPhase, TaskStatus, TaskType};
pub use model::project::{Project, ProjectDraft, ProjectId};
pub use model::task::{Task, TaskId};
pub use model::ValidationError;
pub use service::{AutoAssignReport, FixReport, PlannedAssignment, Reduction, UnderAllocatedTask};
pub use session::{CompanyHandle, Session};
pub use store::{load_company, render_json, save_company, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
