//! Schedule quality metrics: coverage gaps, labor cost, fairness and
//! preference tracking.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::{BusinessScenario, CoverageRequirement, Day, Hour};
use crate::schedule::{Schedule, ScheduleMetrics, UnfilledSlot};

fn in_window(scenario: &BusinessScenario, req: &CoverageRequirement) -> bool {
    scenario.days_open.contains(&req.day)
        && req.hour >= scenario.start_hour
        && req.hour < scenario.end_hour
}

/// Computes metrics for an assembled schedule.
pub fn compute_metrics(
    scenario: &BusinessScenario,
    requirements: &[CoverageRequirement],
    schedule: &Schedule,
) -> ScheduleMetrics {
    let mut metrics = ScheduleMetrics::default();
    for &day in &scenario.days_open {
        metrics.unfilled_by_day.insert(day, 0);
    }

    // Who is working each slot, and on which days.
    let mut working: BTreeSet<(&str, Day, Hour)> = BTreeSet::new();
    let mut worked_days: BTreeMap<&str, BTreeSet<Day>> = BTreeMap::new();
    for (&(day, hour), entries) in &schedule.slot_assignments {
        for (employee_id, _) in entries {
            working.insert((employee_id.as_str(), day, hour));
            worked_days.entry(employee_id.as_str()).or_default().insert(day);
        }
    }

    // Coverage: filled vs required per requirement.
    for req in requirements {
        if !in_window(scenario, req) {
            continue;
        }
        metrics.total_slots_required += req.min_staff;

        let filled = schedule
            .slot_assignments
            .get(&(req.day, req.hour))
            .map(|entries| entries.iter().filter(|(_, role)| *role == req.role_id).count() as u32)
            .unwrap_or(0);

        metrics.total_slots_filled += filled.min(req.min_staff);

        if filled < req.min_staff {
            let needed = req.min_staff - filled;
            metrics.unfilled_slots.push(UnfilledSlot {
                day: req.day,
                hour: req.hour,
                role_id: req.role_id.clone(),
                role_name: scenario
                    .role(&req.role_id)
                    .map(|r| r.name.clone())
                    .unwrap_or_else(|| req.role_id.clone()),
                needed,
                filled,
                required: req.min_staff,
            });
            *metrics.unfilled_by_role.entry(req.role_id.clone()).or_insert(0) += needed;
            *metrics.unfilled_by_day.entry(req.day).or_insert(0) += needed;
            metrics.total_hours_still_needed += needed;
        }
    }

    // Labor cost: regular pay plus time-and-a-half overtime.
    let mut total_cost = Decimal::ZERO;
    for emp in &scenario.employees {
        let hours = schedule.employee_hours.get(&emp.id).copied().unwrap_or(0);
        let ot_hours = schedule.employee_overtime.get(&emp.id).copied().unwrap_or(0);
        let regular = hours.saturating_sub(ot_hours);

        metrics.total_regular_hours += regular;
        metrics.total_overtime_hours += ot_hours;
        total_cost += Decimal::from(regular) * emp.hourly_rate
            + Decimal::from(ot_hours) * emp.hourly_rate * dec!(1.5);
    }
    metrics.estimated_labor_cost = total_cost;

    // Weekend distribution: weekend days worked this solve.
    for emp in &scenario.employees {
        let count = scenario
            .weekend_days()
            .filter(|day| {
                worked_days
                    .get(emp.id.as_str())
                    .is_some_and(|days| days.contains(day))
            })
            .count() as u32;
        metrics.weekend_distribution.insert(emp.id.clone(), count);
    }

    // Preference hits and misses over the schedule window.
    for emp in &scenario.employees {
        for &day in &scenario.days_open {
            for hour in scenario.operating_hours() {
                if !emp.prefers(day, hour) {
                    continue;
                }
                if working.contains(&(emp.id.as_str(), day, hour)) {
                    metrics.preference_matches += 1;
                } else {
                    metrics.preference_misses += 1;
                }
            }
        }
    }

    // Consecutive-day pressure beyond the classification preference.
    for emp in &scenario.employees {
        let consecutive = schedule.consecutive_days.get(&emp.id).copied().unwrap_or(0);
        let preferred = emp.preferred_max_consecutive_days();
        if consecutive > preferred {
            metrics.consecutive_day_violations += u32::from(consecutive - preferred);
        }
    }

    metrics
}

/// Metrics for a solve with no solution: every in-window requirement is
/// reported as entirely unfilled.
pub fn infeasible_metrics(
    scenario: &BusinessScenario,
    requirements: &[CoverageRequirement],
) -> ScheduleMetrics {
    let mut metrics = ScheduleMetrics::default();
    for &day in &scenario.days_open {
        metrics.unfilled_by_day.insert(day, 0);
    }

    for req in requirements {
        if !in_window(scenario, req) {
            continue;
        }
        metrics.total_slots_required += req.min_staff;
        if req.min_staff == 0 {
            continue;
        }
        metrics.unfilled_slots.push(UnfilledSlot {
            day: req.day,
            hour: req.hour,
            role_id: req.role_id.clone(),
            role_name: scenario
                .role(&req.role_id)
                .map(|r| r.name.clone())
                .unwrap_or_else(|| req.role_id.clone()),
            needed: req.min_staff,
            filled: 0,
            required: req.min_staff,
        });
        *metrics.unfilled_by_role.entry(req.role_id.clone()).or_insert(0) += req.min_staff;
        *metrics.unfilled_by_day.entry(req.day).or_insert(0) += req.min_staff;
        metrics.total_hours_still_needed += req.min_staff;
    }

    metrics
}
