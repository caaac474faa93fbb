//! Native CP realization of [`CpBackend`] on the Pumpkin solver.
//!
//! Enabled with the `pumpkin` cargo feature. Booleans are 0/1 domain
//! variables; a reified row posts as a pair of half-reified constraints (the
//! constraint under the literal, its negation under the literal's negation),
//! so no big-M derivation is involved. Literals are channeled to the 0/1
//! variables lazily, only where a constraint is actually reified.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use pumpkin_solver::constraints as pk;
use pumpkin_solver::optimisation::linear_sat_unsat::LinearSatUnsat;
use pumpkin_solver::optimisation::OptimisationDirection;
use pumpkin_solver::results::{OptimisationResult, ProblemSolution, SolutionReference};
use pumpkin_solver::termination::TimeBudget;
use pumpkin_solver::variables::{DomainId, Literal, TransformableVariable};
use pumpkin_solver::Solver;
use tracing::debug;

use crate::cp::{Cmp, CpBackend, CpError, CpSolution, CpStatus, Lit, VarId};

pub struct PumpkinBackend {
    solver: Solver,
    vars: Vec<DomainId>,
    /// Channel literal per variable, created on first reified use.
    literals: Vec<Option<Literal>>,
    objective: Vec<(i64, VarId)>,
}

impl PumpkinBackend {
    pub fn new() -> Self {
        Self {
            solver: Solver::default(),
            vars: Vec::new(),
            literals: Vec::new(),
            objective: Vec::new(),
        }
    }

    pub fn num_vars(&self) -> usize {
        self.vars.len()
    }

    fn post_cmp(&mut self, terms: &[(i64, VarId)], cmp: Cmp, rhs: i64) {
        let views: Vec<_> = terms
            .iter()
            .map(|&(coef, var)| self.vars[var.0].scaled(coef as i32))
            .collect();
        let tag = self.solver.new_constraint_tag();
        let _ = match cmp {
            Cmp::Le => self
                .solver
                .add_constraint(pk::less_than_or_equals(views, rhs as i32, tag))
                .post(),
            Cmp::Ge => self
                .solver
                .add_constraint(pk::greater_than_or_equals(views, rhs as i32, tag))
                .post(),
            Cmp::Eq => self
                .solver
                .add_constraint(pk::equals(views, rhs as i32, tag))
                .post(),
        };
    }

    /// Posts `Σ terms cmp rhs`, enforced only while `lit` holds.
    fn post_cmp_if(&mut self, lit: Literal, terms: &[(i64, VarId)], cmp: Cmp, rhs: i64) {
        let views: Vec<_> = terms
            .iter()
            .map(|&(coef, var)| self.vars[var.0].scaled(coef as i32))
            .collect();
        let tag = self.solver.new_constraint_tag();
        let _ = match cmp {
            Cmp::Le => self
                .solver
                .add_constraint(pk::less_than_or_equals(views, rhs as i32, tag))
                .implied_by(lit),
            Cmp::Ge => self
                .solver
                .add_constraint(pk::greater_than_or_equals(views, rhs as i32, tag))
                .implied_by(lit),
            Cmp::Eq => self
                .solver
                .add_constraint(pk::equals(views, rhs as i32, tag))
                .implied_by(lit),
        };
    }

    /// The solver literal channeled to `var` (`lit ⇔ var = 1`).
    fn literal_for(&mut self, var: VarId) -> Literal {
        if let Some(lit) = self.literals[var.0] {
            return lit;
        }
        let lit = self.solver.new_literal();
        self.post_cmp_if(lit, &[(1, var)], Cmp::Ge, 1);
        self.post_cmp_if(!lit, &[(1, var)], Cmp::Le, 0);
        self.literals[var.0] = Some(lit);
        lit
    }

    /// `(coefficient, constant)` so that a boolean literal reads as
    /// `coefficient · x + constant`.
    fn lit_term(lit: Lit) -> (i64, i64) {
        if lit.negated {
            (-1, 1)
        } else {
            (1, 0)
        }
    }
}

impl Default for PumpkinBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CpBackend for PumpkinBackend {
    fn new_bool(&mut self, _name: &str) -> VarId {
        let var = self.solver.new_bounded_integer(0, 1);
        self.vars.push(var);
        self.literals.push(None);
        VarId(self.vars.len() - 1)
    }

    fn add_linear(&mut self, terms: &[(i64, VarId)], cmp: Cmp, rhs: i64) {
        self.post_cmp(terms, cmp, rhs);
    }

    fn add_bool_or(&mut self, lits: &[Lit]) {
        if lits.is_empty() {
            // An empty clause is unsatisfiable; a 0/1 variable forced to 2
            // makes that explicit to the solver.
            let sink = self.new_bool("unsat_clause");
            self.post_cmp(&[(1, sink)], Cmp::Ge, 2);
            return;
        }
        // At least one literal true: Σ (coef·x + constant) ≥ 1.
        let mut terms = Vec::with_capacity(lits.len());
        let mut constant = 0;
        for &lit in lits {
            let (coef, offset) = Self::lit_term(lit);
            terms.push((coef, lit.var));
            constant += offset;
        }
        self.post_cmp(&terms, Cmp::Ge, 1 - constant);
    }

    fn add_implication(&mut self, a: Lit, b: Lit) {
        // expr(a) ≤ expr(b), with negation constants folded into the rhs.
        let (ca, ka) = Self::lit_term(a);
        let (cb, kb) = Self::lit_term(b);
        self.post_cmp(&[(ca, a.var), (-cb, b.var)], Cmp::Le, kb - ka);
    }

    fn add_max_equality(&mut self, target: VarId, inputs: &[VarId]) {
        if inputs.is_empty() {
            self.post_cmp(&[(1, target)], Cmp::Le, 0);
            return;
        }
        let mut sum = Vec::with_capacity(inputs.len() + 1);
        sum.push((1, target));
        for &input in inputs {
            self.post_cmp(&[(1, target), (-1, input)], Cmp::Ge, 0);
            sum.push((-1, input));
        }
        self.post_cmp(&sum, Cmp::Le, 0);
    }

    fn add_reified_linear(&mut self, lit: VarId, terms: &[(i64, VarId)], cmp: Cmp, rhs: i64) {
        // One half-reified pair per direction: the constraint while the
        // literal holds, its negation while the literal's negation holds.
        let z = self.literal_for(lit);
        match cmp {
            Cmp::Ge => {
                self.post_cmp_if(z, terms, Cmp::Ge, rhs);
                self.post_cmp_if(!z, terms, Cmp::Le, rhs - 1);
            }
            Cmp::Le => {
                self.post_cmp_if(z, terms, Cmp::Le, rhs);
                self.post_cmp_if(!z, terms, Cmp::Ge, rhs + 1);
            }
            Cmp::Eq => {
                self.post_cmp_if(z, terms, Cmp::Eq, rhs);
                let views: Vec<_> = terms
                    .iter()
                    .map(|&(coef, var)| self.vars[var.0].scaled(coef as i32))
                    .collect();
                let tag = self.solver.new_constraint_tag();
                let _ = self
                    .solver
                    .add_constraint(pk::not_equals(views, rhs as i32, tag))
                    .implied_by(!z);
            }
        }
    }

    fn maximize(&mut self, terms: &[(i64, VarId)]) {
        self.objective = terms.to_vec();
    }

    fn solve(mut self, time_limit: Duration) -> Result<CpSolution, CpError> {
        // A variable can carry several objective terms (a preferred hour also
        // tilted by the strategy); merge them before building the linkage row.
        let mut merged: BTreeMap<usize, i64> = BTreeMap::new();
        for &(weight, var) in &self.objective {
            *merged.entry(var.0).or_insert(0) += weight;
        }
        let lb: i64 = merged.values().map(|&w| w.min(0)).sum();
        let ub: i64 = merged.values().map(|&w| w.max(0)).sum();

        debug!(
            vars = self.vars.len(),
            objective_terms = merged.len(),
            time_limit_s = time_limit.as_secs_f64(),
            "starting CP solve"
        );

        let objective = self.solver.new_bounded_integer(lb as i32, ub as i32);
        let mut views: Vec<_> = merged
            .iter()
            .map(|(&index, &weight)| self.vars[index].scaled(weight as i32))
            .collect();
        views.push(objective.scaled(-1));
        let tag = self.solver.new_constraint_tag();
        let _ = self.solver.add_constraint(pk::equals(views, 0, tag)).post();

        let started = Instant::now();
        let mut brancher = self.solver.default_brancher();
        let mut termination = TimeBudget::starting_now(time_limit);
        fn noop_callback<B>(_: &Solver, _: SolutionReference, _: &B) {}
        let result = self.solver.optimise(
            &mut brancher,
            &mut termination,
            LinearSatUnsat::new(OptimisationDirection::Maximise, objective, noop_callback),
        );

        let wall_time_ms = started.elapsed().as_secs_f64() * 1000.0;
        let (status, values) = match result {
            OptimisationResult::Optimal(solution) => (
                CpStatus::Optimal,
                self.vars
                    .iter()
                    .map(|&var| i64::from(solution.get_integer_value(var)))
                    .collect::<Vec<i64>>(),
            ),
            // The deadline hit while an incumbent was in hand.
            OptimisationResult::Satisfiable(solution) => (
                CpStatus::Feasible,
                self.vars
                    .iter()
                    .map(|&var| i64::from(solution.get_integer_value(var)))
                    .collect::<Vec<i64>>(),
            ),
            // A timeout without any solution is reported as infeasible.
            OptimisationResult::Unsatisfiable | OptimisationResult::Unknown => {
                return Ok(CpSolution {
                    status: CpStatus::Infeasible,
                    objective_value: 0,
                    values: Vec::new(),
                    wall_time_ms,
                });
            }
        };

        let objective_value = merged
            .iter()
            .map(|(&index, &weight)| weight * values[index])
            .sum();

        Ok(CpSolution {
            status,
            objective_value,
            values,
            wall_time_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::build_model;
    use crate::coverage::compile_coverage;
    use crate::domain::{
        BusinessScenario, Employee, Role, SchedulingPolicy, SchedulingStrategy,
        ShiftRoleRequirement, ShiftTemplate,
    };

    const NO_LIMIT: Duration = Duration::from_secs(60);

    #[test]
    fn test_maximize_free_binary() {
        let mut backend = PumpkinBackend::new();
        let x = backend.new_bool("x");
        backend.maximize(&[(7, x)]);
        let solution = backend.solve(NO_LIMIT).unwrap();
        assert!(solution.is_set(x));
        assert_eq!(solution.objective_value, 7);
    }

    #[test]
    fn test_bool_or_with_negations() {
        let mut backend = PumpkinBackend::new();
        let x = backend.new_bool("x");
        let y = backend.new_bool("y");
        backend.add_bool_or(&[x.negated(), y.negated()]);
        backend.maximize(&[(1, x), (1, y)]);
        let solution = backend.solve(NO_LIMIT).unwrap();
        assert_eq!(solution.objective_value, 1);
    }

    #[test]
    fn test_reified_ge_forward() {
        let mut backend = PumpkinBackend::new();
        let x = backend.new_bool("x");
        let y = backend.new_bool("y");
        let z = backend.new_bool("z");
        backend.add_reified_linear(z, &[(1, x), (1, y)], Cmp::Ge, 2);
        backend.add_linear(&[(1, x), (1, y)], Cmp::Le, 1);
        backend.maximize(&[(1, z)]);
        let solution = backend.solve(NO_LIMIT).unwrap();
        assert!(!solution.is_set(z));
    }

    #[test]
    fn test_reified_ge_reverse() {
        let mut backend = PumpkinBackend::new();
        let x = backend.new_bool("x");
        let y = backend.new_bool("y");
        let z = backend.new_bool("z");
        backend.add_reified_linear(z, &[(1, x), (1, y)], Cmp::Ge, 2);
        backend.add_linear(&[(1, x)], Cmp::Ge, 1);
        backend.add_linear(&[(1, y)], Cmp::Ge, 1);
        backend.maximize(&[(-1, z)]);
        let solution = backend.solve(NO_LIMIT).unwrap();
        assert!(solution.is_set(z));
        assert_eq!(solution.objective_value, -1);
    }

    #[test]
    fn test_contradiction_is_infeasible() {
        let mut backend = PumpkinBackend::new();
        let x = backend.new_bool("x");
        backend.add_linear(&[(1, x)], Cmp::Ge, 1);
        backend.add_linear(&[(1, x)], Cmp::Le, 0);
        backend.maximize(&[(1, x)]);
        let solution = backend.solve(NO_LIMIT).unwrap();
        assert_eq!(solution.status, CpStatus::Infeasible);
    }

    #[test]
    fn test_scheduling_model_end_to_end() {
        let mut scenario = BusinessScenario::new("biz", "Test")
            .with_window(9, 13)
            .with_days_open([0]);
        scenario.roles.push(Role::new("r", "Worker", "#336699"));
        scenario.shift_templates.push(
            ShiftTemplate::new("t", "Demand", 9, 11)
                .with_role(ShiftRoleRequirement::new("r", 1))
                .with_days([0]),
        );
        let mut emp = Employee::new("amy", "amy").with_role("r").with_hours(0, 8);
        emp.add_availability(0, 9, 13);
        scenario.employees.push(emp);

        let policy = SchedulingPolicy {
            strategy: SchedulingStrategy::Minimize,
            ..SchedulingPolicy::default()
        };
        let requirements = compile_coverage(&scenario);
        let mut backend = PumpkinBackend::new();
        let vars = build_model(&mut backend, &scenario, &requirements, &policy, &[]);
        let solution = backend.solve(NO_LIMIT).unwrap();

        assert_eq!(solution.status, CpStatus::Optimal);
        let assigned = vars
            .shift
            .values()
            .filter(|&&var| solution.is_set(var))
            .count();
        assert_eq!(assigned, 2);
    }
}
