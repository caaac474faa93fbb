//! Applies externally approved time off to a scenario before a solve.
//!
//! Callers hold time-off requests as date ranges; the roster grid is a single
//! week of weekday indices. This module maps each approved grant onto the
//! scheduled week and blocks the affected slots on the employee.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{BusinessScenario, Day, Hour};
use crate::error::ScheduleError;

/// An approved absence. Without hours, whole days are blocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOffGrant {
    pub employee_id: String,
    pub start_date: NaiveDate,
    /// Inclusive.
    pub end_date: NaiveDate,
    #[serde(default)]
    pub start_hour: Option<Hour>,
    #[serde(default)]
    pub end_hour: Option<Hour>,
}

/// Blocks every granted slot that falls inside the week starting at
/// `week_start` (the Monday of the roster week). Dates outside the week are
/// ignored. Returns the number of employee-days blocked.
pub fn apply_time_off(
    scenario: &mut BusinessScenario,
    week_start: NaiveDate,
    grants: &[TimeOffGrant],
) -> Result<u32, ScheduleError> {
    let week_end = week_start + Days::new(6);
    let mut blocked = 0;

    for grant in grants {
        let employee = scenario
            .employee_mut(&grant.employee_id)
            .ok_or_else(|| ScheduleError::UnknownEmployee(grant.employee_id.clone()))?;

        let hours = match (grant.start_hour, grant.end_hour) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        };

        let mut date = grant.start_date.max(week_start);
        let last = grant.end_date.min(week_end);
        while date <= last {
            let day = (date - week_start).num_days() as Day;
            employee.add_time_off(day, hours);
            blocked += 1;
            date = date + Days::new(1);
        }
    }

    debug!(grants = grants.len(), blocked, "applied approved time off");
    Ok(blocked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Employee, Role};

    fn scenario() -> BusinessScenario {
        let mut scenario = BusinessScenario::new("biz", "Test").with_window(9, 17);
        scenario.roles.push(Role::new("r", "Role", "#123456"));
        let mut emp = Employee::new("amy", "Amy Cole").with_role("r");
        for day in 0..7 {
            emp.add_availability(day, 9, 17);
        }
        scenario.employees.push(emp);
        scenario
    }

    fn monday() -> NaiveDate {
        // 2024-01-01 is a Monday.
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn grant(start: NaiveDate, end: NaiveDate) -> TimeOffGrant {
        TimeOffGrant {
            employee_id: "amy".to_string(),
            start_date: start,
            end_date: end,
            start_hour: None,
            end_hour: None,
        }
    }

    #[test]
    fn test_full_day_block_maps_to_weekday() {
        let mut scenario = scenario();
        let wednesday = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let blocked = apply_time_off(&mut scenario, monday(), &[grant(wednesday, wednesday)]).unwrap();
        assert_eq!(blocked, 1);

        let emp = scenario.employee("amy").unwrap();
        assert!(!emp.is_available(2, 9));
        assert!(!emp.is_available(2, 16));
        assert!(emp.is_available(1, 9));
        assert!(emp.is_available(3, 9));
    }

    #[test]
    fn test_partial_hours_block() {
        let mut scenario = scenario();
        let tuesday = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let grant = TimeOffGrant {
            start_hour: Some(9),
            end_hour: Some(12),
            ..grant(tuesday, tuesday)
        };
        apply_time_off(&mut scenario, monday(), &[grant]).unwrap();

        let emp = scenario.employee("amy").unwrap();
        assert!(!emp.is_available(1, 9));
        assert!(!emp.is_available(1, 11));
        assert!(emp.is_available(1, 12));
    }

    #[test]
    fn test_range_clamped_to_week() {
        let mut scenario = scenario();
        let before = NaiveDate::from_ymd_opt(2023, 12, 29).unwrap();
        let after = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
        let blocked = apply_time_off(&mut scenario, monday(), &[grant(before, after)]).unwrap();
        // All 7 days of the roster week, nothing outside it.
        assert_eq!(blocked, 7);
        let emp = scenario.employee("amy").unwrap();
        for day in 0..7 {
            assert!(!emp.is_available(day, 9));
        }
    }

    #[test]
    fn test_grant_outside_week_is_ignored() {
        let mut scenario = scenario();
        let far = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let blocked = apply_time_off(&mut scenario, monday(), &[grant(far, far)]).unwrap();
        assert_eq!(blocked, 0);
        assert!(scenario.employee("amy").unwrap().is_available(0, 9));
    }

    #[test]
    fn test_unknown_employee_rejected() {
        let mut scenario = scenario();
        let g = TimeOffGrant {
            employee_id: "ghost".to_string(),
            ..grant(monday(), monday())
        };
        let err = apply_time_off(&mut scenario, monday(), &[g]).unwrap_err();
        assert!(matches!(err, ScheduleError::UnknownEmployee(_)));
        assert!(err.is_invalid_input());
    }
}
