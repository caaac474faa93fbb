//! Portable record form of a solved schedule.
//!
//! The in-memory [`Schedule`] keys its matrices by tuples; the interchange
//! form flattens those to `"day,hour"` / `"day,hour,role_id"` string keys so
//! any JSON-shaped consumer can read it. Scenario input already serializes
//! directly from the domain types.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::Day;
use crate::schedule::{Schedule, ScheduleMetrics, UnfilledSlot};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftAssignmentDto {
    pub employee_id: String,
    pub employee_name: String,
    pub day: Day,
    pub start_hour: u8,
    pub end_hour: u8,
    pub duration: u8,
    pub role_id: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotAssignmentDto {
    pub employee_id: String,
    pub role_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsDto {
    pub total_slots_required: u32,
    pub total_slots_filled: u32,
    pub coverage_percentage: f64,
    pub unfilled_slots: Vec<UnfilledSlot>,
    pub unfilled_by_role: BTreeMap<String, u32>,
    pub unfilled_by_day: BTreeMap<Day, u32>,
    pub total_hours_still_needed: u32,
    pub total_regular_hours: u32,
    pub total_overtime_hours: u32,
    pub estimated_labor_cost: Decimal,
    pub weekend_distribution: BTreeMap<String, u32>,
    pub preference_matches: u32,
    pub preference_misses: u32,
    pub consecutive_day_violations: u32,
}

impl From<&ScheduleMetrics> for MetricsDto {
    fn from(m: &ScheduleMetrics) -> Self {
        Self {
            total_slots_required: m.total_slots_required,
            total_slots_filled: m.total_slots_filled,
            coverage_percentage: m.coverage_percentage(),
            unfilled_slots: m.unfilled_slots.clone(),
            unfilled_by_role: m.unfilled_by_role.clone(),
            unfilled_by_day: m.unfilled_by_day.clone(),
            total_hours_still_needed: m.total_hours_still_needed,
            total_regular_hours: m.total_regular_hours,
            total_overtime_hours: m.total_overtime_hours,
            estimated_labor_cost: m.estimated_labor_cost,
            weekend_distribution: m.weekend_distribution.clone(),
            preference_matches: m.preference_matches,
            preference_misses: m.preference_misses,
            consecutive_day_violations: m.consecutive_day_violations,
        }
    }
}

/// The outward schedule record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleDto {
    pub assignments: Vec<ShiftAssignmentDto>,
    /// `"day,hour,role_id"` -> employee id.
    pub coverage_matrix: BTreeMap<String, String>,
    /// `"day,hour"` -> everyone working that slot.
    pub slot_assignments: BTreeMap<String, Vec<SlotAssignmentDto>>,
    pub total_hours_needed: u32,
    pub total_hours_filled: u32,
    pub coverage_percentage: f64,
    pub employee_hours: BTreeMap<String, u32>,
    pub employee_overtime: BTreeMap<String, u32>,
    pub consecutive_days: BTreeMap<String, u8>,
    pub metrics: MetricsDto,
    pub is_feasible: bool,
    pub solve_time_ms: f64,
    pub solution_index: u32,
    pub objective_value: i64,
}

impl ScheduleDto {
    pub fn from_schedule(schedule: &Schedule) -> Self {
        let assignments = schedule
            .assignments
            .iter()
            .map(|a| ShiftAssignmentDto {
                employee_id: a.employee_id.clone(),
                employee_name: a.employee_name.clone(),
                day: a.day,
                start_hour: a.start_hour,
                end_hour: a.end_hour,
                duration: a.duration(),
                role_id: a.role_id.clone(),
                color: a.color.clone(),
            })
            .collect();

        let coverage_matrix = schedule
            .coverage_matrix
            .iter()
            .map(|((day, hour, role_id), employee_id)| {
                (format!("{day},{hour},{role_id}"), employee_id.clone())
            })
            .collect();

        let slot_assignments = schedule
            .slot_assignments
            .iter()
            .map(|((day, hour), entries)| {
                let slots = entries
                    .iter()
                    .map(|(employee_id, role_id)| SlotAssignmentDto {
                        employee_id: employee_id.clone(),
                        role_id: role_id.clone(),
                    })
                    .collect();
                (format!("{day},{hour}"), slots)
            })
            .collect();

        Self {
            assignments,
            coverage_matrix,
            slot_assignments,
            total_hours_needed: schedule.total_hours_needed,
            total_hours_filled: schedule.total_hours_filled,
            coverage_percentage: schedule.coverage_percentage(),
            employee_hours: schedule.employee_hours.clone(),
            employee_overtime: schedule.employee_overtime.clone(),
            consecutive_days: schedule.consecutive_days.clone(),
            metrics: MetricsDto::from(&schedule.metrics),
            is_feasible: schedule.is_feasible,
            solve_time_ms: schedule.solve_time_ms,
            solution_index: schedule.solution_index,
            objective_value: schedule.objective_value,
        }
    }
}
