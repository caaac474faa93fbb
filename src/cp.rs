//! Narrow interface to the constraint-programming engine.
//!
//! The model builder talks only to [`CpBackend`]; the only modules that name
//! a concrete solver library are the realizations — [`crate::milp`] (always
//! available) and `crate::pumpkin` (behind the `pumpkin` feature). Any
//! CP-SAT-class engine can stand behind this trait.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Handle to a boolean decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(pub usize);

impl VarId {
    /// The variable itself as a literal.
    pub fn lit(self) -> Lit {
        Lit {
            var: self,
            negated: false,
        }
    }

    /// The negation of the variable as a literal.
    pub fn negated(self) -> Lit {
        Lit {
            var: self,
            negated: true,
        }
    }
}

/// A possibly-negated boolean variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lit {
    pub var: VarId,
    pub negated: bool,
}

/// Comparison operator for linear constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmp {
    Le,
    Ge,
    Eq,
}

/// Terminal state of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CpStatus {
    Optimal,
    Feasible,
    Infeasible,
}

/// Raw result of a solve: status plus one value per created variable.
#[derive(Debug, Clone)]
pub struct CpSolution {
    pub status: CpStatus,
    pub objective_value: i64,
    /// Indexed by [`VarId`]; empty when infeasible.
    pub values: Vec<i64>,
    pub wall_time_ms: f64,
}

impl CpSolution {
    pub fn is_set(&self, var: VarId) -> bool {
        self.values.get(var.0).copied().unwrap_or(0) != 0
    }
}

/// Failure inside the engine itself (not infeasibility).
#[derive(Debug, Error)]
pub enum CpError {
    #[error("solver backend error: {0}")]
    Backend(String),
}

/// The constraint surface the model builder relies on.
///
/// All variables are boolean. Linear terms are `(coefficient, variable)` pairs
/// with integer coefficients.
pub trait CpBackend {
    /// Creates a fresh boolean variable. Names are advisory (debugging only).
    fn new_bool(&mut self, name: &str) -> VarId;

    /// Adds `Σ coef·var  cmp  rhs`.
    fn add_linear(&mut self, terms: &[(i64, VarId)], cmp: Cmp, rhs: i64);

    /// Adds a clause: at least one literal is true. An empty clause makes the
    /// model infeasible.
    fn add_bool_or(&mut self, lits: &[Lit]);

    /// Adds `a ⇒ b`.
    fn add_implication(&mut self, a: Lit, b: Lit);

    /// Constrains `target = max(inputs)`. Empty `inputs` force `target = 0`.
    fn add_max_equality(&mut self, target: VarId, inputs: &[VarId]);

    /// Full reification: `lit ⇔ (Σ coef·var  cmp  rhs)`.
    fn add_reified_linear(&mut self, lit: VarId, terms: &[(i64, VarId)], cmp: Cmp, rhs: i64);

    /// Sets the objective to maximize `Σ weight·var`. Replaces any prior objective.
    fn maximize(&mut self, terms: &[(i64, VarId)]);

    /// Runs the engine. The time limit is a wall-clock soft cap; backends
    /// without a deadline hook treat it as advisory.
    fn solve(self, time_limit: Duration) -> Result<CpSolution, CpError>;
}
