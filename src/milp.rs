//! MILP realization of [`CpBackend`] on `good_lp`, the default backend.
//!
//! Every variable is binary, so the CP-style primitives (implication, clause,
//! max-equality, reification) lower to linear rows. An LP solver has no
//! notion of an enforcement literal, so reification is encoded with big-M
//! bounds derived from the term coefficients; `crate::pumpkin` (behind the
//! `pumpkin` feature) posts the same rows natively as implied-constraint
//! pairs instead.

use std::time::{Duration, Instant};

use good_lp::{
    constraint, default_solver, variable, variables, Constraint, Expression, ProblemVariables,
    ResolutionError, Solution, SolverModel, Variable,
};
use tracing::debug;

use crate::cp::{Cmp, CpBackend, CpError, CpSolution, CpStatus, Lit, VarId};

pub struct MilpBackend {
    vars: ProblemVariables,
    handles: Vec<Variable>,
    constraints: Vec<Constraint>,
    objective: Vec<(i64, VarId)>,
}

impl MilpBackend {
    pub fn new() -> Self {
        Self {
            vars: variables!(),
            handles: Vec::new(),
            constraints: Vec::new(),
            objective: Vec::new(),
        }
    }

    pub fn num_vars(&self) -> usize {
        self.handles.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    fn expr(&self, terms: &[(i64, VarId)]) -> Expression {
        let mut expr = Expression::default();
        for &(coef, var) in terms {
            expr += coef as f64 * self.handles[var.0];
        }
        expr
    }

    /// `x` for a positive literal, `1 - x` for a negated one.
    fn lit_expr(&self, lit: Lit) -> Expression {
        let var = self.handles[lit.var.0];
        if lit.negated {
            -1.0 * var + 1.0
        } else {
            Expression::from(var)
        }
    }

    fn push_cmp(&mut self, expr: Expression, cmp: Cmp, rhs: f64) {
        let c = match cmp {
            Cmp::Le => constraint!(expr <= rhs),
            Cmp::Ge => constraint!(expr >= rhs),
            Cmp::Eq => constraint!(expr == rhs),
        };
        self.constraints.push(c);
    }

    /// Bounds of `Σ coef·var` over binary variables.
    fn term_bounds(terms: &[(i64, VarId)]) -> (i64, i64) {
        let lb = terms.iter().map(|&(c, _)| c.min(0)).sum();
        let ub = terms.iter().map(|&(c, _)| c.max(0)).sum();
        (lb, ub)
    }

    /// `lit = 1 ⇒ Σ terms ≥ rhs`.
    fn enforce_ge_if(&mut self, lit: VarId, terms: &[(i64, VarId)], rhs: i64) {
        let (lb, _) = Self::term_bounds(terms);
        let z = self.handles[lit.0];
        let expr = self.expr(terms) + (lb - rhs) as f64 * z;
        self.push_cmp(expr, Cmp::Ge, lb as f64);
    }

    /// `lit = 1 ⇒ Σ terms ≤ rhs`.
    fn enforce_le_if(&mut self, lit: VarId, terms: &[(i64, VarId)], rhs: i64) {
        let (_, ub) = Self::term_bounds(terms);
        let z = self.handles[lit.0];
        let expr = self.expr(terms) + (ub - rhs) as f64 * z;
        self.push_cmp(expr, Cmp::Le, ub as f64);
    }
}

impl Default for MilpBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CpBackend for MilpBackend {
    fn new_bool(&mut self, name: &str) -> VarId {
        let var = self.vars.add(variable().binary().name(name));
        self.handles.push(var);
        VarId(self.handles.len() - 1)
    }

    fn add_linear(&mut self, terms: &[(i64, VarId)], cmp: Cmp, rhs: i64) {
        let expr = self.expr(terms);
        self.push_cmp(expr, cmp, rhs as f64);
    }

    fn add_bool_or(&mut self, lits: &[Lit]) {
        if lits.is_empty() {
            // An empty clause is unsatisfiable; a binary bounded above 1 with
            // a >= 2 row makes that explicit to the solver.
            let sink = self.new_bool("unsat_clause");
            let expr = Expression::from(self.handles[sink.0]);
            self.push_cmp(expr, Cmp::Ge, 2.0);
            return;
        }
        let mut expr = Expression::default();
        for &lit in lits {
            expr += self.lit_expr(lit);
        }
        self.push_cmp(expr, Cmp::Ge, 1.0);
    }

    fn add_implication(&mut self, a: Lit, b: Lit) {
        let expr = self.lit_expr(a) - self.lit_expr(b);
        self.push_cmp(expr, Cmp::Le, 0.0);
    }

    fn add_max_equality(&mut self, target: VarId, inputs: &[VarId]) {
        let t = self.handles[target.0];
        if inputs.is_empty() {
            self.push_cmp(Expression::from(t), Cmp::Le, 0.0);
            return;
        }
        let mut sum = Expression::default();
        for &input in inputs {
            let x = self.handles[input.0];
            self.push_cmp(Expression::from(t) - x, Cmp::Ge, 0.0);
            sum += x;
        }
        self.push_cmp(Expression::from(t) - sum, Cmp::Le, 0.0);
    }

    fn add_reified_linear(&mut self, lit: VarId, terms: &[(i64, VarId)], cmp: Cmp, rhs: i64) {
        match cmp {
            Cmp::Ge => {
                self.enforce_ge_if(lit, terms, rhs);
                // ¬lit ⇒ Σ ≤ rhs - 1
                let (_, ub) = Self::term_bounds(terms);
                let z = self.handles[lit.0];
                let expr = self.expr(terms) - (ub - rhs + 1) as f64 * z;
                self.push_cmp(expr, Cmp::Le, (rhs - 1) as f64);
            }
            Cmp::Le => {
                self.enforce_le_if(lit, terms, rhs);
                // ¬lit ⇒ Σ ≥ rhs + 1
                let (lb, _) = Self::term_bounds(terms);
                let z = self.handles[lit.0];
                let expr = self.expr(terms) + (rhs + 1 - lb) as f64 * z;
                self.push_cmp(expr, Cmp::Ge, (rhs + 1) as f64);
            }
            Cmp::Eq => {
                self.enforce_ge_if(lit, terms, rhs);
                self.enforce_le_if(lit, terms, rhs);
                // ¬lit ⇒ Σ ≠ rhs, split over two direction literals.
                let below = self.new_bool("reified_eq_below");
                let above = self.new_bool("reified_eq_above");
                self.add_bool_or(&[lit.lit(), below.lit(), above.lit()]);
                self.enforce_le_if(below, terms, rhs - 1);
                self.enforce_ge_if(above, terms, rhs + 1);
            }
        }
    }

    fn maximize(&mut self, terms: &[(i64, VarId)]) {
        self.objective = terms.to_vec();
    }

    fn solve(self, time_limit: Duration) -> Result<CpSolution, CpError> {
        // microlp exposes no deadline hook; the cap stays advisory here and
        // bounded models keep solves short in practice.
        debug!(
            vars = self.handles.len(),
            constraints = self.constraints.len(),
            time_limit_s = time_limit.as_secs_f64(),
            "starting MILP solve"
        );

        let started = Instant::now();
        let objective_terms = self.objective.clone();
        let handles = self.handles.clone();

        let mut expr = Expression::default();
        for &(weight, var) in &objective_terms {
            expr += weight as f64 * handles[var.0];
        }

        let mut model = self.vars.maximise(expr).using(default_solver);
        for c in self.constraints {
            model = model.with(c);
        }

        match model.solve() {
            Ok(solution) => {
                let values: Vec<i64> = handles
                    .iter()
                    .map(|&v| solution.value(v).round() as i64)
                    .collect();
                let objective_value = objective_terms
                    .iter()
                    .map(|&(weight, var)| weight * values[var.0])
                    .sum();
                Ok(CpSolution {
                    // Branch-and-bound is exact, so a solution is an optimum.
                    status: CpStatus::Optimal,
                    objective_value,
                    values,
                    wall_time_ms: started.elapsed().as_secs_f64() * 1000.0,
                })
            }
            Err(ResolutionError::Infeasible) => Ok(CpSolution {
                status: CpStatus::Infeasible,
                objective_value: 0,
                values: Vec::new(),
                wall_time_ms: started.elapsed().as_secs_f64() * 1000.0,
            }),
            Err(err) => Err(CpError::Backend(err.to_string())),
        }
    }
}
