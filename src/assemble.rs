//! Schedule assembler: turns the raw hourly variable values into consolidated
//! shift assignments and per-employee rollups.

use std::collections::{BTreeMap, BTreeSet};

use crate::constraints::RawAssignment;
use crate::domain::{BusinessScenario, Day, Hour};
use crate::schedule::{Schedule, ShiftAssignment};

/// Builds the user-facing schedule skeleton from one raw solution.
///
/// Metrics, feasibility and timing are filled in by the solver driver.
pub fn assemble(scenario: &BusinessScenario, raw: &RawAssignment) -> Schedule {
    let mut hours_by_run: BTreeMap<(&str, Day, &str), Vec<Hour>> = BTreeMap::new();
    let mut slot_assignments: BTreeMap<(Day, Hour), Vec<(String, String)>> = BTreeMap::new();
    let mut coverage_matrix: BTreeMap<(Day, Hour, String), String> = BTreeMap::new();
    let mut employee_hours: BTreeMap<String, u32> = scenario
        .employees
        .iter()
        .map(|e| (e.id.clone(), 0))
        .collect();
    let mut worked_days: BTreeMap<&str, BTreeSet<Day>> = BTreeMap::new();

    // Raw iteration is sorted by (employee, day, hour, role), so hours arrive
    // ascending within each run group and slot lists stay employee-ordered.
    for (key, &value) in raw {
        if !value {
            continue;
        }
        hours_by_run
            .entry((key.employee_id.as_str(), key.day, key.role_id.as_str()))
            .or_default()
            .push(key.hour);
        slot_assignments
            .entry((key.day, key.hour))
            .or_default()
            .push((key.employee_id.clone(), key.role_id.clone()));
        coverage_matrix.insert(
            (key.day, key.hour, key.role_id.clone()),
            key.employee_id.clone(),
        );
        *employee_hours.entry(key.employee_id.clone()).or_insert(0) += 1;
        worked_days
            .entry(key.employee_id.as_str())
            .or_default()
            .insert(key.day);
    }

    let mut assignments = Vec::new();
    for ((employee_id, day, role_id), hours) in &hours_by_run {
        let employee = scenario.employee(employee_id);
        let employee_name = employee.map(|e| e.name.clone()).unwrap_or_default();
        let color = scenario
            .role(role_id)
            .map(|r| r.color.clone())
            .or_else(|| employee.map(|e| e.color.clone()))
            .unwrap_or_default();

        for (start_hour, end_hour) in contiguous_runs(hours) {
            assignments.push(ShiftAssignment {
                employee_id: (*employee_id).to_string(),
                employee_name: employee_name.clone(),
                day: *day,
                start_hour,
                end_hour,
                role_id: (*role_id).to_string(),
                color: color.clone(),
            });
        }
    }

    let mut employee_overtime = BTreeMap::new();
    for (id, &hours) in &employee_hours {
        employee_overtime.insert(id.clone(), hours.saturating_sub(40));
    }

    let mut consecutive_days = BTreeMap::new();
    for employee in &scenario.employees {
        let days = worked_days.get(employee.id.as_str());
        let mut longest: u8 = 0;
        let mut current: u8 = 0;
        for day in &scenario.days_open {
            if days.is_some_and(|d| d.contains(day)) {
                current += 1;
                longest = longest.max(current);
            } else {
                current = 0;
            }
        }
        consecutive_days.insert(employee.id.clone(), longest);
    }

    Schedule {
        assignments,
        coverage_matrix,
        slot_assignments,
        employee_hours,
        employee_overtime,
        consecutive_days,
        ..Schedule::default()
    }
}

/// Splits a sorted hour list into maximal `[start, end)` runs.
fn contiguous_runs(hours: &[Hour]) -> Vec<(Hour, Hour)> {
    let mut runs = Vec::new();
    let mut iter = hours.iter().copied();
    let Some(first) = iter.next() else {
        return runs;
    };
    let mut start = first;
    let mut end = first + 1;
    for hour in iter {
        if hour == end {
            end += 1;
        } else {
            runs.push((start, end));
            start = hour;
            end = hour + 1;
        }
    }
    runs.push((start, end));
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::ShiftKey;
    use crate::domain::{Employee, Role};

    fn scenario() -> BusinessScenario {
        let mut scenario = BusinessScenario::new("biz", "Test").with_window(9, 17);
        scenario.roles.push(Role::new("r", "Role", "#aa0000"));
        scenario.roles.push(Role::new("s", "Second", "#00bb00"));
        let mut amy = Employee::new("amy", "Amy Cole").with_role("r").with_role("s");
        amy.add_availability(0, 9, 17);
        scenario.employees.push(amy);
        scenario
            .employees
            .push(Employee::new("beth", "Beth Fox").with_role("r"));
        scenario
    }

    fn raw_from(slots: &[(&str, Day, Hour, &str)]) -> RawAssignment {
        slots
            .iter()
            .map(|&(employee_id, day, hour, role_id)| {
                (
                    ShiftKey {
                        employee_id: employee_id.to_string(),
                        day,
                        hour,
                        role_id: role_id.to_string(),
                    },
                    true,
                )
            })
            .collect()
    }

    #[test]
    fn test_gap_splits_runs() {
        let raw = raw_from(&[
            ("amy", 0, 9, "r"),
            ("amy", 0, 10, "r"),
            ("amy", 0, 13, "r"),
            ("amy", 0, 14, "r"),
        ]);
        let schedule = assemble(&scenario(), &raw);
        assert_eq!(schedule.assignments.len(), 2);
        assert_eq!(schedule.assignments[0].start_hour, 9);
        assert_eq!(schedule.assignments[0].end_hour, 11);
        assert_eq!(schedule.assignments[1].start_hour, 13);
        assert_eq!(schedule.assignments[1].end_hour, 15);
        assert_eq!(schedule.employee_hours["amy"], 4);
    }

    #[test]
    fn test_role_change_splits_assignment() {
        let raw = raw_from(&[("amy", 0, 9, "r"), ("amy", 0, 10, "s")]);
        let schedule = assemble(&scenario(), &raw);
        assert_eq!(schedule.assignments.len(), 2);
        let roles: Vec<&str> = schedule
            .assignments
            .iter()
            .map(|a| a.role_id.as_str())
            .collect();
        assert_eq!(roles, vec!["r", "s"]);
        // Color follows the role.
        assert_eq!(schedule.assignments[0].color, "#aa0000");
    }

    #[test]
    fn test_idle_employee_has_zero_hours() {
        let raw = raw_from(&[("amy", 0, 9, "r")]);
        let schedule = assemble(&scenario(), &raw);
        assert_eq!(schedule.employee_hours["beth"], 0);
        assert_eq!(schedule.employee_overtime["beth"], 0);
        assert_eq!(schedule.consecutive_days["beth"], 0);
    }

    #[test]
    fn test_consecutive_days_longest_run() {
        let raw = raw_from(&[
            ("amy", 0, 9, "r"),
            ("amy", 1, 9, "r"),
            ("amy", 3, 9, "r"),
            ("amy", 4, 9, "r"),
            ("amy", 5, 9, "r"),
        ]);
        let schedule = assemble(&scenario(), &raw);
        assert_eq!(schedule.consecutive_days["amy"], 3);
    }

    #[test]
    fn test_consecutive_days_ignore_closed_days() {
        // Open Mon/Wed/Fri only: working all three is a run of three.
        let mut scenario = scenario();
        scenario.days_open = [0, 2, 4].into_iter().collect();
        let raw = raw_from(&[("amy", 0, 9, "r"), ("amy", 2, 9, "r"), ("amy", 4, 9, "r")]);
        let schedule = assemble(&scenario, &raw);
        assert_eq!(schedule.consecutive_days["amy"], 3);
    }

    #[test]
    fn test_slot_assignments_and_coverage_matrix() {
        let raw = raw_from(&[("amy", 0, 9, "r"), ("beth", 0, 9, "r")]);
        let schedule = assemble(&scenario(), &raw);
        let slot = &schedule.slot_assignments[&(0, 9)];
        assert_eq!(slot.len(), 2);
        assert_eq!(slot[0].0, "amy");
        assert_eq!(slot[1].0, "beth");
        assert!(schedule.coverage_matrix.contains_key(&(0, 9, "r".to_string())));
    }

    #[test]
    fn test_contiguous_runs() {
        assert_eq!(contiguous_runs(&[]), Vec::<(Hour, Hour)>::new());
        assert_eq!(contiguous_runs(&[9]), vec![(9, 10)]);
        assert_eq!(contiguous_runs(&[9, 10, 11]), vec![(9, 12)]);
        assert_eq!(contiguous_runs(&[9, 11, 12]), vec![(9, 10), (11, 13)]);
    }
}
