//! Error taxonomy for the scheduling engine.

use thiserror::Error;

use crate::cp::CpError;
use crate::domain::Hour;

/// Errors surfaced by scenario validation and the solve pipeline.
///
/// Infeasibility is *not* an error: a solve against impossible coverage
/// returns a [`crate::schedule::Schedule`] with `is_feasible = false`.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("operating window is empty: start hour {start} must be before end hour {end}")]
    EmptyOperatingWindow { start: Hour, end: Hour },

    #[error("no days open")]
    NoDaysOpen,

    #[error("employee {employee} has no roles and cannot be scheduled")]
    NoRoles { employee: String },

    #[error("employee {employee} references unknown role {role}")]
    UnknownRole { employee: String, role: String },

    #[error("{owner} references unknown role {role}")]
    UnknownCoverageRole { owner: String, role: String },

    #[error("employee {employee} has min hours {min} above max hours {max}")]
    HourBoundsReversed { employee: String, min: u32, max: u32 },

    #[error("unknown employee {0}")]
    UnknownEmployee(String),

    #[error("invalid policy: {0}")]
    InvalidPolicy(String),

    #[error("cp backend failed: {0}")]
    Backend(#[from] CpError),
}

impl ScheduleError {
    /// True for the invalid-input family (everything except backend failures).
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, ScheduleError::Backend(_))
    }
}
