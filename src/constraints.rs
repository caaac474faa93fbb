//! Model builder: translates a scenario, compiled coverage and a policy into
//! a CP model over boolean `shift[employee, day, hour, role]` variables.
//!
//! A fresh model is built for every solve. Iteration is sorted by
//! `(employee_id, day, hour, role_id)` throughout, so identical inputs emit an
//! identical model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cp::{Cmp, CpBackend, VarId};
use crate::domain::{
    BusinessScenario, CoverageRequirement, Day, DayCapMode, Employee, Hour, SchedulingPolicy,
    SchedulingStrategy,
};

/// Reward per coverage requirement whose minimum is met.
pub const WEIGHT_COVERAGE: i64 = 1000;
/// Bonus per hour worked in a preferred slot.
pub const WEIGHT_PREFERENCE: i64 = 10;
/// Penalty per day over the full-time days-per-week cap (preferred mode).
pub const WEIGHT_EXTRA_DAY_FT: i64 = 5;
/// Penalty per day over the part-time days-per-week cap (preferred mode).
pub const WEIGHT_EXTRA_DAY_PT: i64 = 5;
/// Penalty scale for weekend days given to employees above the historical mean.
pub const WEIGHT_FAIRNESS: i64 = 10;
/// Penalty per hour beyond 40 when overtime is allowed.
pub const WEIGHT_OVERTIME: i64 = 20;
/// Per-hour tilt applied by the minimize/maximize strategies.
pub const WEIGHT_STRATEGY_HOURS: i64 = 5;

/// Identity of one `shift` decision variable.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShiftKey {
    pub employee_id: String,
    pub day: Day,
    pub hour: Hour,
    pub role_id: String,
}

/// Full binding of every `shift` variable in one solution. Used to exclude
/// previously returned schedules when an alternative is requested.
pub type RawAssignment = BTreeMap<ShiftKey, bool>;

/// Variable handles the driver needs back out of the builder.
pub struct ModelVars {
    pub shift: BTreeMap<ShiftKey, VarId>,
    pub works_day: BTreeMap<(String, Day), VarId>,
    /// Requirements with a positive minimum and no eligible employee at all.
    /// Under hard coverage minimums the model cannot be satisfied; the driver
    /// short-circuits instead of handing the backend an empty sum.
    pub unstaffable: Vec<CoverageRequirement>,
}

/// Builds the complete model and sets the maximization objective.
pub fn build_model<B: CpBackend>(
    backend: &mut B,
    scenario: &BusinessScenario,
    requirements: &[CoverageRequirement],
    policy: &SchedulingPolicy,
    excluded: &[RawAssignment],
) -> ModelVars {
    let hours: Vec<Hour> = scenario.operating_hours().collect();
    let days: Vec<Day> = scenario.days_open.iter().copied().collect();

    let mut employees: Vec<&Employee> = scenario.employees.iter().collect();
    employees.sort_by(|a, b| a.id.cmp(&b.id));

    let mut shift: BTreeMap<ShiftKey, VarId> = BTreeMap::new();
    let mut works_day: BTreeMap<(String, Day), VarId> = BTreeMap::new();
    let mut objective: Vec<(i64, VarId)> = Vec::new();

    // Per-(employee, day, hour) role variables, and the aggregated
    // "working this hour" variable reused by several constraints.
    let mut role_vars: Vec<Vec<Vec<Vec<VarId>>>> = Vec::with_capacity(employees.len());
    let mut working: Vec<Vec<Vec<VarId>>> = Vec::with_capacity(employees.len());
    let mut works_day_vars: Vec<Vec<VarId>> = Vec::with_capacity(employees.len());

    // ========================================================================
    // Decision variables
    // ========================================================================

    for emp in &employees {
        let mut per_day = Vec::with_capacity(days.len());
        for &day in &days {
            let mut per_hour = Vec::with_capacity(hours.len());
            for &hour in &hours {
                let mut vars = Vec::with_capacity(emp.roles.len());
                for role_id in &emp.roles {
                    let var =
                        backend.new_bool(&format!("shift_{}_{}_{}_{}", emp.id, day, hour, role_id));
                    shift.insert(
                        ShiftKey {
                            employee_id: emp.id.clone(),
                            day,
                            hour,
                            role_id: role_id.clone(),
                        },
                        var,
                    );
                    vars.push(var);
                }
                per_hour.push(vars);
            }
            per_day.push(per_hour);
        }
        role_vars.push(per_day);
    }

    for (ei, emp) in employees.iter().enumerate() {
        let mut per_day = Vec::with_capacity(days.len());
        for (di, &day) in days.iter().enumerate() {
            let mut per_hour = Vec::with_capacity(hours.len());
            for (hi, &hour) in hours.iter().enumerate() {
                let var = backend.new_bool(&format!("working_{}_{}_{}", emp.id, day, hour));
                backend.add_max_equality(var, &role_vars[ei][di][hi]);
                per_hour.push(var);
            }
            per_day.push(per_hour);
        }
        working.push(per_day);
    }

    for (ei, emp) in employees.iter().enumerate() {
        let mut per_day = Vec::with_capacity(days.len());
        for (di, &day) in days.iter().enumerate() {
            let var = backend.new_bool(&format!("works_day_{}_{}", emp.id, day));
            backend.add_max_equality(var, &working[ei][di]);
            works_day.insert((emp.id.clone(), day), var);
            per_day.push(var);
        }
        works_day_vars.push(per_day);
    }

    // ========================================================================
    // Hard constraints
    // ========================================================================

    // Availability & time-off: blocked slots force every role variable to 0.
    for (ei, emp) in employees.iter().enumerate() {
        for (di, &day) in days.iter().enumerate() {
            for (hi, &hour) in hours.iter().enumerate() {
                if !emp.is_available(day, hour) {
                    for &var in &role_vars[ei][di][hi] {
                        backend.add_linear(&[(1, var)], Cmp::Le, 0);
                    }
                }
            }
        }
    }

    // One role per hour.
    for (ei, _) in employees.iter().enumerate() {
        for di in 0..days.len() {
            for hi in 0..hours.len() {
                let terms: Vec<(i64, VarId)> =
                    role_vars[ei][di][hi].iter().map(|&v| (1, v)).collect();
                backend.add_linear(&terms, Cmp::Le, 1);
            }
        }
    }

    // Daily hour cap.
    for (ei, _) in employees.iter().enumerate() {
        for di in 0..days.len() {
            let terms: Vec<(i64, VarId)> = role_vars[ei][di]
                .iter()
                .flatten()
                .map(|&v| (1, v))
                .collect();
            backend.add_linear(&terms, Cmp::Le, i64::from(policy.max_hours_per_day));
        }
    }

    // Coverage minimum (reified reward, optionally hard) and maximum (hard).
    let mut unstaffable = Vec::new();
    for req in requirements {
        if !scenario.days_open.contains(&req.day) {
            continue;
        }
        if req.hour < scenario.start_hour || req.hour >= scenario.end_hour {
            continue;
        }

        let mut terms: Vec<(i64, VarId)> = Vec::new();
        for emp in &employees {
            if !emp.has_role(&req.role_id) {
                continue;
            }
            let key = ShiftKey {
                employee_id: emp.id.clone(),
                day: req.day,
                hour: req.hour,
                role_id: req.role_id.clone(),
            };
            if let Some(&var) = shift.get(&key) {
                terms.push((1, var));
            }
        }

        if terms.is_empty() {
            if req.min_staff > 0 && policy.hard_coverage_minimums {
                unstaffable.push(req.clone());
            }
            continue;
        }

        let met = backend.new_bool(&format!("cov_{}_{}_{}", req.day, req.hour, req.role_id));
        backend.add_reified_linear(met, &terms, Cmp::Ge, i64::from(req.min_staff));
        objective.push((WEIGHT_COVERAGE, met));

        if policy.hard_coverage_minimums {
            backend.add_linear(&terms, Cmp::Ge, i64::from(req.min_staff));
        }
        backend.add_linear(&terms, Cmp::Le, i64::from(req.max_staff));
    }

    // Supervision: whenever a supervised employee works an hour, some
    // supervisor works the same hour. Without any supervisor on staff such an
    // employee can never work.
    let supervisor_indices: Vec<usize> = employees
        .iter()
        .enumerate()
        .filter(|(_, e)| e.can_supervise)
        .map(|(i, _)| i)
        .collect();
    for (ei, emp) in employees.iter().enumerate() {
        if !emp.needs_supervision {
            continue;
        }
        for di in 0..days.len() {
            for hi in 0..hours.len() {
                let own = working[ei][di][hi];
                if supervisor_indices.is_empty() {
                    backend.add_linear(&[(1, own)], Cmp::Le, 0);
                } else {
                    let mut terms: Vec<(i64, VarId)> = supervisor_indices
                        .iter()
                        .map(|&si| (1, working[si][di][hi]))
                        .collect();
                    terms.push((-1, own));
                    backend.add_linear(&terms, Cmp::Ge, 0);
                }
            }
        }
    }

    // Weekly hour bounds.
    let weekly_terms: Vec<Vec<(i64, VarId)>> = employees
        .iter()
        .enumerate()
        .map(|(ei, _)| {
            role_vars[ei]
                .iter()
                .flatten()
                .flatten()
                .map(|&v| (1, v))
                .collect()
        })
        .collect();
    for (ei, emp) in employees.iter().enumerate() {
        backend.add_linear(&weekly_terms[ei], Cmp::Ge, i64::from(emp.min_hours));
        backend.add_linear(
            &weekly_terms[ei],
            Cmp::Le,
            i64::from(emp.effective_max_hours()),
        );
    }

    // Shift starts, minimum shift length, split caps.
    let min_len = usize::from(policy.min_shift_hours);
    for (ei, emp) in employees.iter().enumerate() {
        let mut split_day_vars: Vec<VarId> = Vec::new();

        for (di, &day) in days.iter().enumerate() {
            let mut day_starts: Vec<VarId> = Vec::with_capacity(hours.len());

            for hi in 0..hours.len() {
                let cur = working[ei][di][hi];
                let start = if hi == 0 {
                    // The hour before opening counts as not working.
                    cur
                } else {
                    let prev = working[ei][di][hi - 1];
                    let start =
                        backend.new_bool(&format!("start_{}_{}_{}", emp.id, day, hours[hi]));
                    // start ⇔ cur ∧ ¬prev
                    backend.add_linear(&[(1, start), (-1, cur)], Cmp::Le, 0);
                    backend.add_linear(&[(1, start), (1, prev)], Cmp::Le, 1);
                    backend.add_linear(&[(1, start), (-1, cur), (1, prev)], Cmp::Ge, 0);
                    start
                };

                if hi + min_len <= hours.len() {
                    for k in 1..min_len {
                        backend.add_implication(start.lit(), working[ei][di][hi + k].lit());
                    }
                } else {
                    // Too close to closing for a full shift; no start here.
                    backend.add_linear(&[(1, start)], Cmp::Le, 0);
                }
                day_starts.push(start);
            }

            let start_terms: Vec<(i64, VarId)> = day_starts.iter().map(|&v| (1, v)).collect();
            backend.add_linear(&start_terms, Cmp::Le, i64::from(policy.max_splits_per_day));

            if day_starts.len() >= 2 {
                let has_split = backend.new_bool(&format!("has_split_{}_{}", emp.id, day));
                backend.add_reified_linear(has_split, &start_terms, Cmp::Ge, 2);
                split_day_vars.push(has_split);
            }
        }

        if !split_day_vars.is_empty() {
            let terms: Vec<(i64, VarId)> = split_day_vars.iter().map(|&v| (1, v)).collect();
            backend.add_linear(&terms, Cmp::Le, i64::from(policy.max_split_shifts_per_week));
        }
    }

    // Days-per-week cap, hard or as an escalating penalty ladder.
    for (ei, emp) in employees.iter().enumerate() {
        let (cap, mode) = policy.day_cap_for(emp);
        let day_terms: Vec<(i64, VarId)> =
            works_day_vars[ei].iter().map(|&v| (1, v)).collect();
        match mode {
            DayCapMode::Off => {}
            DayCapMode::Required => {
                backend.add_linear(&day_terms, Cmp::Le, i64::from(cap));
            }
            DayCapMode::Preferred => {
                let weight = if emp.is_full_time() {
                    WEIGHT_EXTRA_DAY_FT
                } else {
                    WEIGHT_EXTRA_DAY_PT
                };
                for threshold in u16::from(cap) + 1..=days.len() as u16 {
                    let over = backend.new_bool(&format!("over_days_{}_{}", emp.id, threshold));
                    backend.add_reified_linear(over, &day_terms, Cmp::Ge, i64::from(threshold));
                    let extra = i64::from(threshold) - i64::from(cap);
                    objective.push((-extra * weight, over));
                }
            }
        }
    }

    // ========================================================================
    // Soft terms
    // ========================================================================

    // Preference bonus per hour worked in a preferred slot.
    for (ei, emp) in employees.iter().enumerate() {
        for (di, &day) in days.iter().enumerate() {
            for (hi, &hour) in hours.iter().enumerate() {
                if emp.prefers(day, hour) {
                    for &var in &role_vars[ei][di][hi] {
                        objective.push((WEIGHT_PREFERENCE, var));
                    }
                }
            }
        }
    }

    // Weekend fairness: employees above the historical weekend mean pay a
    // penalty for each weekend day assigned.
    let weekend_indices: Vec<usize> = days
        .iter()
        .enumerate()
        .filter(|(_, &d)| d >= 5)
        .map(|(i, _)| i)
        .collect();
    if !weekend_indices.is_empty() && !employees.is_empty() {
        let mean = employees
            .iter()
            .map(|e| f64::from(e.weekend_shifts_worked))
            .sum::<f64>()
            / employees.len() as f64;
        for (ei, emp) in employees.iter().enumerate() {
            let history = f64::from(emp.weekend_shifts_worked);
            if history > mean {
                let penalty = ((history - mean) * WEIGHT_FAIRNESS as f64) as i64;
                for &di in &weekend_indices {
                    objective.push((-penalty, works_day_vars[ei][di]));
                }
            }
        }
    }

    // Overtime ladder: one indicator per hour beyond 40.
    for (ei, emp) in employees.iter().enumerate() {
        if !emp.overtime_allowed || emp.max_hours <= 40 {
            continue;
        }
        for threshold in 41..=emp.max_hours {
            let over = backend.new_bool(&format!("ot_{}_{}", emp.id, threshold));
            backend.add_reified_linear(over, &weekly_terms[ei], Cmp::Ge, i64::from(threshold));
            objective.push((-WEIGHT_OVERTIME, over));
        }
    }

    // Strategy tilt.
    match policy.strategy {
        SchedulingStrategy::Balanced => {}
        SchedulingStrategy::Minimize => {
            for &var in shift.values() {
                objective.push((-WEIGHT_STRATEGY_HOURS, var));
            }
        }
        SchedulingStrategy::Maximize => {
            for &var in shift.values() {
                objective.push((WEIGHT_STRATEGY_HOURS, var));
            }
        }
    }

    // ========================================================================
    // Exclude previous solutions
    // ========================================================================

    for prev in excluded {
        let mut lits = Vec::with_capacity(prev.len());
        for (key, &value) in prev {
            if let Some(&var) = shift.get(key) {
                lits.push(if value { var.negated() } else { var.lit() });
            }
        }
        if !lits.is_empty() {
            backend.add_bool_or(&lits);
        }
    }

    backend.maximize(&objective);

    debug!(
        shift_vars = shift.len(),
        objective_terms = objective.len(),
        excluded = excluded.len(),
        unstaffable = unstaffable.len(),
        "built scheduling model"
    );

    ModelVars {
        shift,
        works_day,
        unstaffable,
    }
}
