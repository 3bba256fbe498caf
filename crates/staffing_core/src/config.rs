//! Runtime configuration for the assignment services.
//!
//! # Responsibility
//! - Carry the tunables of the capacity fixer and the auto-assignment planner.
//! - Parse them from JSON with every field optional.
//!
//! Fixed domain constants (weekly base hours, hours per month) are not
//! configurable; they live in `crate::model`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

const DEFAULT_MAX_FIX_PASSES: usize = 8;

/// Candidate ordering inside one planner pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolOrder {
    /// Lowest hourly rate first, then most available hours, then lowest id.
    #[default]
    CheapestFirst,
    /// Ascending employee id.
    ById,
}

/// Order in which the planner visits a project's tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskOrder {
    /// Task list order of the project.
    #[default]
    Declared,
    /// Highest priority first; declared order breaks ties.
    PriorityDescending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Clamp planned hours to the project's remaining budget and skip
    /// employees the project cannot afford.
    pub respect_budget: bool,
    pub pool_order: PoolOrder,
    pub task_order: TaskOrder,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            respect_budget: true,
            pool_order: PoolOrder::default(),
            task_order: TaskOrder::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Upper bound on capacity-fixer passes before it gives up.
    pub max_fix_passes: usize,
    pub planner: PlannerConfig,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            max_fix_passes: DEFAULT_MAX_FIX_PASSES,
            planner: PlannerConfig::default(),
        }
    }
}

impl CoreConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(ConfigError::Parse)
    }

    pub fn from_json_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_json_str(&raw)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read config: {err}"),
            Self::Parse(err) => write!(f, "invalid config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}
