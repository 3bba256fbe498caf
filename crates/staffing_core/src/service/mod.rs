//! Company use-case services.
//!
//! # Responsibility
//! - Validated reads and writes of the assignment ledger.
//! - Rebuild cached employee, task and project totals from the ledger.
//! - Detect and repair capacity violations.
//! - Plan assignments for a project's tasks.
//!
//! Every submodule extends `Company` with further `impl` blocks; none of
//! them holds state of its own.

pub mod aggregation;
pub mod assignment_service;
pub mod capacity;
pub mod planner;

pub use capacity::{FixReport, Reduction};
pub use planner::{AutoAssignReport, PlannedAssignment, UnderAllocatedTask};
