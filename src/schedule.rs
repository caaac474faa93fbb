//! Output side of a solve: consolidated assignments, rollups and metrics.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{Day, Hour};

/// One contiguous stretch of hours worked by one employee in one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftAssignment {
    pub employee_id: String,
    pub employee_name: String,
    pub day: Day,
    pub start_hour: Hour,
    /// Exclusive end.
    pub end_hour: Hour,
    pub role_id: String,
    pub color: String,
}

impl ShiftAssignment {
    pub fn duration(&self) -> u8 {
        self.end_hour.saturating_sub(self.start_hour)
    }
}

/// A coverage requirement the solve left short.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnfilledSlot {
    pub day: Day,
    pub hour: Hour,
    pub role_id: String,
    pub role_name: String,
    /// `required - filled`.
    pub needed: u32,
    pub filled: u32,
    pub required: u32,
}

/// Quality metrics for one schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleMetrics {
    pub total_slots_required: u32,
    pub total_slots_filled: u32,
    pub unfilled_slots: Vec<UnfilledSlot>,
    pub unfilled_by_role: BTreeMap<String, u32>,
    pub unfilled_by_day: BTreeMap<Day, u32>,
    pub total_hours_still_needed: u32,
    pub total_regular_hours: u32,
    pub total_overtime_hours: u32,
    pub estimated_labor_cost: Decimal,
    /// Weekend days worked per employee in this solve.
    pub weekend_distribution: BTreeMap<String, u32>,
    pub preference_matches: u32,
    pub preference_misses: u32,
    pub consecutive_day_violations: u32,
}

impl ScheduleMetrics {
    pub fn coverage_percentage(&self) -> f64 {
        if self.total_slots_required == 0 {
            return 0.0;
        }
        f64::from(self.total_slots_filled) / f64::from(self.total_slots_required) * 100.0
    }
}

/// A complete weekly schedule solution. Immutable once returned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub assignments: Vec<ShiftAssignment>,
    /// `(day, hour, role_id)` -> any one employee covering that cell.
    pub coverage_matrix: BTreeMap<(Day, Hour, String), String>,
    /// `(day, hour)` -> everyone working that slot, as `(employee_id, role_id)`.
    pub slot_assignments: BTreeMap<(Day, Hour), Vec<(String, String)>>,
    pub total_hours_needed: u32,
    pub total_hours_filled: u32,
    pub employee_hours: BTreeMap<String, u32>,
    pub employee_overtime: BTreeMap<String, u32>,
    /// Longest run of consecutive open days worked, per employee.
    pub consecutive_days: BTreeMap<String, u8>,
    pub metrics: ScheduleMetrics,
    pub is_feasible: bool,
    pub solve_time_ms: f64,
    /// 1-based index of this solution among those returned for the scenario.
    pub solution_index: u32,
    pub objective_value: i64,
}

impl Schedule {
    pub fn coverage_percentage(&self) -> f64 {
        if self.total_hours_needed == 0 {
            return 0.0;
        }
        f64::from(self.total_hours_filled) / f64::from(self.total_hours_needed) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_duration() {
        let a = ShiftAssignment {
            employee_id: "e1".to_string(),
            employee_name: "Amy Cole".to_string(),
            day: 0,
            start_hour: 9,
            end_hour: 13,
            role_id: "r".to_string(),
            color: "#fff".to_string(),
        };
        assert_eq!(a.duration(), 4);
    }

    #[test]
    fn test_coverage_percentage_empty() {
        let schedule = Schedule::default();
        assert_eq!(schedule.coverage_percentage(), 0.0);

        let metrics = ScheduleMetrics::default();
        assert_eq!(metrics.coverage_percentage(), 0.0);
    }

    #[test]
    fn test_coverage_percentage() {
        let metrics = ScheduleMetrics {
            total_slots_required: 8,
            total_slots_filled: 6,
            ..ScheduleMetrics::default()
        };
        assert!((metrics.coverage_percentage() - 75.0).abs() < f64::EPSILON);
    }
}
