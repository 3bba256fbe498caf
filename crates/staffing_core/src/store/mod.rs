//! Company persistence.
//!
//! # Responsibility
//! - Save and load a whole company as one flat text document.
//! - Export a JSON snapshot for reporting.
//! - Report format problems with the offending line number.
//!
//! # Invariants
//! - Cached aggregates are never persisted; loading rebuilds them.
//! - A failed load returns no partial company.

pub mod flat_file;
pub mod snapshot;

use crate::error::CoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use flat_file::{load_company, parse_company, render_company, save_company};
pub use snapshot::{render_json, AssignmentRow, CompanySnapshot};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    /// Malformed record; `line` is 1-based.
    Parse { line: usize, message: String },
    /// Well-formed record rejected by a domain constructor or ledger write.
    Model { line: usize, source: CoreError },
    UnsupportedVersion(u32),
    Json(serde_json::Error),
}

impl StoreError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "store io error: {err}"),
            Self::Parse { line, message } => write!(f, "line {line}: {message}"),
            Self::Model { line, source } => write!(f, "line {line}: {source}"),
            Self::UnsupportedVersion(version) => {
                write!(f, "unsupported data version {version}")
            }
            Self::Json(err) => write!(f, "snapshot encoding failed: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Model { source, .. } => Some(source),
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
