//! Solve pipeline: compile coverage, build the model, run the CP backend and
//! assemble the result.
//!
//! A [`ScheduleSolver`] owns one scenario and the list of raw solutions it has
//! already returned; requesting an alternative excludes all of them. One
//! solver instance per caller thread; a solve blocks until the backend is done.

use std::fmt::Write as _;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::assemble::assemble;
use crate::constraints::{build_model, RawAssignment};
use crate::coverage::compile_coverage;
use crate::cp::{CpBackend, CpStatus};
use crate::domain::{BusinessScenario, CoverageRequirement, SchedulingPolicy};
use crate::error::ScheduleError;
use crate::metrics::{compute_metrics, infeasible_metrics};
use crate::milp::MilpBackend;
use crate::schedule::Schedule;

pub struct ScheduleSolver {
    scenario: BusinessScenario,
    previous_solutions: Vec<RawAssignment>,
}

impl ScheduleSolver {
    /// Validates the scenario and wraps it in a solver.
    pub fn new(scenario: BusinessScenario) -> Result<Self, ScheduleError> {
        scenario.validate()?;
        Ok(Self {
            scenario,
            previous_solutions: Vec::new(),
        })
    }

    pub fn scenario(&self) -> &BusinessScenario {
        &self.scenario
    }

    /// Mutable access for edits between solves (availability, time off, ...).
    /// Edits invalidate the excluded-solution list; call [`Self::reset`] when
    /// the change should forget previously returned schedules.
    pub fn scenario_mut(&mut self) -> &mut BusinessScenario {
        &mut self.scenario
    }

    /// Raw solutions returned so far for this scenario.
    pub fn previous_solutions(&self) -> &[RawAssignment] {
        &self.previous_solutions
    }

    /// Clears the excluded-solution list.
    pub fn reset(&mut self) {
        self.previous_solutions.clear();
    }

    /// Produces a weekly schedule. With `find_alternative`, the model must
    /// differ from every previously returned raw solution in at least one
    /// variable.
    pub fn solve(
        &mut self,
        policy: &SchedulingPolicy,
        time_limit: Duration,
        find_alternative: bool,
    ) -> Result<Schedule, ScheduleError> {
        let started = Instant::now();
        self.scenario.validate()?;
        policy.validate()?;

        let requirements = compile_coverage(&self.scenario);
        let excluded: &[RawAssignment] = if find_alternative {
            &self.previous_solutions
        } else {
            &[]
        };

        let mut backend = MilpBackend::new();
        let vars = build_model(&mut backend, &self.scenario, &requirements, policy, excluded);

        if !vars.unstaffable.is_empty() {
            debug!(
                unstaffable = vars.unstaffable.len(),
                "coverage requires roles nobody can fill"
            );
            return Ok(self.infeasible_schedule(&requirements, started));
        }

        if vars.shift.is_empty() {
            // No employees and no demand to violate: an empty roster stands.
            return Ok(self.feasible_schedule(RawAssignment::new(), &requirements, 0, started));
        }

        let solution = backend.solve(time_limit)?;
        match solution.status {
            CpStatus::Infeasible => {
                info!(
                    solve_time_ms = started.elapsed().as_millis() as u64,
                    "no feasible schedule"
                );
                Ok(self.infeasible_schedule(&requirements, started))
            }
            CpStatus::Optimal | CpStatus::Feasible => {
                let raw: RawAssignment = vars
                    .shift
                    .iter()
                    .map(|(key, &var)| (key.clone(), solution.is_set(var)))
                    .collect();
                let schedule =
                    self.feasible_schedule(raw, &requirements, solution.objective_value, started);
                info!(
                    solution_index = schedule.solution_index,
                    objective = schedule.objective_value,
                    coverage_pct = schedule.coverage_percentage(),
                    solve_time_ms = schedule.solve_time_ms,
                    "schedule solved"
                );
                Ok(schedule)
            }
        }
    }

    fn feasible_schedule(
        &mut self,
        raw: RawAssignment,
        requirements: &[CoverageRequirement],
        objective_value: i64,
        started: Instant,
    ) -> Schedule {
        self.previous_solutions.push(raw.clone());

        let mut schedule = assemble(&self.scenario, &raw);
        schedule.metrics = compute_metrics(&self.scenario, requirements, &schedule);
        schedule.total_hours_needed = schedule.metrics.total_slots_required;
        schedule.total_hours_filled = schedule.metrics.total_slots_filled;
        schedule.is_feasible = true;
        schedule.solution_index = self.previous_solutions.len() as u32;
        schedule.objective_value = objective_value;
        schedule.solve_time_ms = started.elapsed().as_secs_f64() * 1000.0;
        schedule
    }

    fn infeasible_schedule(
        &self,
        requirements: &[CoverageRequirement],
        started: Instant,
    ) -> Schedule {
        let mut schedule = Schedule::default();
        schedule.metrics = infeasible_metrics(&self.scenario, requirements);
        schedule.total_hours_needed = schedule.metrics.total_slots_required;
        schedule.total_hours_filled = 0;
        schedule.is_feasible = false;
        schedule.solution_index = 0;
        schedule.solve_time_ms = started.elapsed().as_secs_f64() * 1000.0;
        schedule
    }
}

const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Renders a schedule as a week grid plus a per-employee summary.
pub fn format_schedule(schedule: &Schedule, scenario: &BusinessScenario) -> String {
    let mut out = String::new();
    let rule = "=".repeat(90);
    let dash = "-".repeat(90);

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(
        out,
        "SCHEDULE #{} - {}",
        schedule.solution_index, scenario.name
    );
    let _ = writeln!(
        out,
        "Coverage: {:.1}% | Solve: {:.0}ms | Score: {}",
        schedule.coverage_percentage(),
        schedule.solve_time_ms,
        schedule.objective_value
    );
    let _ = writeln!(out, "{rule}");

    let mut header = format!("{:<8}", "Time");
    for &day in &scenario.days_open {
        let _ = write!(header, "{:<12}", DAY_NAMES[usize::from(day).min(6)]);
    }
    let _ = writeln!(out, "{header}");
    let _ = writeln!(out, "{dash}");

    for hour in scenario.operating_hours() {
        let mut row = format!("{hour:02}:00   ");
        for &day in &scenario.days_open {
            let cell = match schedule.slot_assignments.get(&(day, hour)) {
                Some(entries) => {
                    let names: Vec<String> = entries
                        .iter()
                        .map(|(employee_id, _)| {
                            let name = scenario
                                .employee(employee_id)
                                .map(|e| e.name.as_str())
                                .unwrap_or(employee_id.as_str());
                            name.chars().take(6).collect()
                        })
                        .collect();
                    names.join(",").chars().take(10).collect::<String>()
                }
                None => "---".to_string(),
            };
            let _ = write!(row, "{cell:<12}");
        }
        let _ = writeln!(out, "{row}");
    }

    let _ = writeln!(out, "{dash}");
    let _ = writeln!(out, "\nEmployee Summary:");
    for emp in &scenario.employees {
        let hours = schedule.employee_hours.get(&emp.id).copied().unwrap_or(0);
        let ot = schedule.employee_overtime.get(&emp.id).copied().unwrap_or(0);
        let consecutive = schedule.consecutive_days.get(&emp.id).copied().unwrap_or(0);
        let status = if emp.min_hours <= hours && hours <= emp.max_hours {
            "OK"
        } else {
            "!!"
        };
        let ot_str = if ot > 0 {
            format!("+{ot}OT")
        } else {
            String::new()
        };
        let _ = writeln!(
            out,
            "  {:<12} {:>2}hrs {:<6} consec:{} [{}]",
            emp.name, hours, ot_str, consecutive, status
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Employee, Role};

    fn empty_scenario() -> BusinessScenario {
        let mut scenario = BusinessScenario::new("biz", "Empty Shop").with_window(9, 11);
        scenario.roles.push(Role::new("r", "Role", "#123456"));
        scenario
    }

    #[test]
    fn test_new_rejects_invalid_scenario() {
        let mut scenario = empty_scenario();
        scenario.employees.push(Employee::new("e1", "Amy Cole"));
        assert!(ScheduleSolver::new(scenario).is_err());
    }

    #[test]
    fn test_solve_without_demand_is_trivially_feasible() {
        let mut solver = ScheduleSolver::new(empty_scenario()).unwrap();
        let schedule = solver
            .solve(&SchedulingPolicy::default(), Duration::from_secs(5), false)
            .unwrap();
        assert!(schedule.is_feasible);
        assert!(schedule.assignments.is_empty());
        assert_eq!(schedule.solution_index, 1);
        assert_eq!(schedule.total_hours_needed, 0);
    }

    #[test]
    fn test_reset_clears_history() {
        let mut solver = ScheduleSolver::new(empty_scenario()).unwrap();
        solver
            .solve(&SchedulingPolicy::default(), Duration::from_secs(5), false)
            .unwrap();
        assert_eq!(solver.previous_solutions().len(), 1);
        solver.reset();
        assert!(solver.previous_solutions().is_empty());
    }

    #[test]
    fn test_format_schedule_renders_grid() {
        let scenario = empty_scenario();
        let schedule = Schedule::default();
        let text = format_schedule(&schedule, &scenario);
        assert!(text.contains("SCHEDULE #0 - Empty Shop"));
        assert!(text.contains("09:00"));
        assert!(text.contains("Mon"));
        assert!(text.contains("Employee Summary:"));
    }
}
