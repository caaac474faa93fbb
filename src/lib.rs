//! Constraint-based weekly staff rostering.
//!
//! Builds an optimization model over boolean hour-by-hour assignment
//! variables, solves it through a narrow CP backend interface, and assembles
//! the result into consolidated shifts with coverage, cost and fairness
//! metrics. Alternative schedules are produced by excluding previously
//! returned raw solutions.

pub mod assemble;
pub mod constraints;
pub mod coverage;
pub mod cp;
pub mod demo_data;
pub mod domain;
pub mod dto;
pub mod error;
pub mod metrics;
pub mod milp;
#[cfg(feature = "pumpkin")]
pub mod pumpkin;
pub mod schedule;
pub mod solver;
pub mod time_off;

pub use domain::{BusinessScenario, SchedulingPolicy};
pub use error::ScheduleError;
pub use schedule::Schedule;
pub use solver::{format_schedule, ScheduleSolver};
