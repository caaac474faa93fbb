//! Domain model for constraint-based staff rostering.
//!
//! A [`BusinessScenario`] owns the roles, employees and coverage definitions for
//! one business; a [`SchedulingPolicy`] carries the caller-tunable solve knobs.
//! All entities are plain data with predicate helpers and serde support for the
//! portable record form.

use std::collections::BTreeSet;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// Day of week: 0 = Monday .. 6 = Sunday.
pub type Day = u8;
/// Hour of day on the 24-hour clock.
pub type Hour = u8;

/// One hour of one day — the atom of the scheduling grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub day: Day,
    pub hour: Hour,
}

impl Slot {
    pub fn new(day: Day, hour: Hour) -> Self {
        Self { day, hour }
    }
}

/// Employee work classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    FullTime,
    PartTime,
}

/// How coverage requirements are defined for a business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageMode {
    /// Named shift templates; overlapping templates sum per slot.
    Shifts,
    /// Per-role hour-by-hour configuration.
    Detailed,
}

/// A job role employees can fill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
    pub color: String,
}

impl Role {
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
        }
    }
}

/// Staffing demand for one `(day, hour, role)` cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageRequirement {
    pub day: Day,
    pub hour: Hour,
    pub role_id: String,
    pub min_staff: u32,
    pub max_staff: u32,
    #[serde(default)]
    pub is_peak: bool,
}

/// A named peak period (morning rush, lunch, ...) boosting detailed coverage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakPeriod {
    pub name: String,
    pub start_hour: Hour,
    pub end_hour: Hour,
    pub days: BTreeSet<Day>,
}

impl PeakPeriod {
    pub fn includes(&self, day: Day, hour: Hour) -> bool {
        self.days.contains(&day) && self.start_hour <= hour && hour < self.end_hour
    }
}

/// Role demand inside a shift template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRoleRequirement {
    pub role_id: String,
    /// Minimum staff of this role for every hour of the shift.
    pub count: u32,
    /// Staffing cap; 0 means "same as `count`".
    #[serde(default)]
    pub max_count: u32,
}

impl ShiftRoleRequirement {
    pub fn new(role_id: impl Into<String>, count: u32) -> Self {
        Self {
            role_id: role_id.into(),
            count,
            max_count: 0,
        }
    }

    pub fn with_max(mut self, max_count: u32) -> Self {
        self.max_count = max_count;
        self
    }

    pub fn effective_max(&self) -> u32 {
        if self.max_count > 0 {
            self.max_count
        } else {
            self.count
        }
    }
}

/// A named rectangle over the week: hour range × day set, with role counts.
///
/// Example: "Morning Rush" 6-11 on weekdays needs 1 shift lead + 2 baristas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftTemplate {
    pub id: String,
    pub name: String,
    pub start_hour: Hour,
    pub end_hour: Hour,
    pub roles: Vec<ShiftRoleRequirement>,
    pub days: BTreeSet<Day>,
    #[serde(default = "default_shift_color")]
    pub color: String,
}

fn default_shift_color() -> String {
    "#6366f1".to_string()
}

impl ShiftTemplate {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        start_hour: Hour,
        end_hour: Hour,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            start_hour,
            end_hour,
            roles: Vec::new(),
            days: BTreeSet::new(),
            color: default_shift_color(),
        }
    }

    pub fn with_role(mut self, role: ShiftRoleRequirement) -> Self {
        self.roles.push(role);
        self
    }

    pub fn with_days(mut self, days: impl IntoIterator<Item = Day>) -> Self {
        self.days.extend(days);
        self
    }

    pub fn duration(&self) -> u8 {
        self.end_hour.saturating_sub(self.start_hour)
    }

    pub fn applies_to_day(&self, day: Day) -> bool {
        self.days.contains(&day)
    }
}

/// An inclusive-start, exclusive-end hour range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourRange {
    pub start_hour: Hour,
    pub end_hour: Hour,
}

impl HourRange {
    pub fn contains(&self, hour: Hour) -> bool {
        self.start_hour <= hour && hour < self.end_hour
    }
}

/// Per-role coverage configuration for [`CoverageMode::Detailed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCoverageConfig {
    pub role_id: String,
    pub default_min_staff: u32,
    pub default_max_staff: u32,
    /// Added to both min and max during peak periods.
    #[serde(default)]
    pub peak_boost: u32,
    /// When empty, the role is required during all operating hours.
    #[serde(default)]
    pub required_hours: Vec<HourRange>,
    /// When empty, the role is required on all open days.
    #[serde(default)]
    pub required_days: BTreeSet<Day>,
}

impl RoleCoverageConfig {
    pub fn new(role_id: impl Into<String>, default_min_staff: u32, default_max_staff: u32) -> Self {
        Self {
            role_id: role_id.into(),
            default_min_staff,
            default_max_staff,
            peak_boost: 0,
            required_hours: Vec::new(),
            required_days: BTreeSet::new(),
        }
    }

    pub fn with_peak_boost(mut self, boost: u32) -> Self {
        self.peak_boost = boost;
        self
    }

    pub fn with_required_hours(mut self, start_hour: Hour, end_hour: Hour) -> Self {
        self.required_hours.push(HourRange {
            start_hour,
            end_hour,
        });
        self
    }

    pub fn with_required_days(mut self, days: impl IntoIterator<Item = Day>) -> Self {
        self.required_days.extend(days);
        self
    }

    /// Whether this role is required at `(day, hour)` given the business window.
    pub fn is_required_at(
        &self,
        day: Day,
        hour: Hour,
        days_open: &BTreeSet<Day>,
        start_hour: Hour,
        end_hour: Hour,
    ) -> bool {
        if self.required_days.is_empty() {
            if !days_open.contains(&day) {
                return false;
            }
        } else if !self.required_days.contains(&day) {
            return false;
        }

        if !self.required_hours.is_empty() {
            return self.required_hours.iter().any(|r| r.contains(hour));
        }
        start_hour <= hour && hour < end_hour
    }

    /// `(min, max)` staffing for this role, with the peak boost applied.
    pub fn staff_count(&self, is_peak: bool) -> (u32, u32) {
        if is_peak {
            (
                self.default_min_staff + self.peak_boost,
                self.default_max_staff + self.peak_boost,
            )
        } else {
            (self.default_min_staff, self.default_max_staff)
        }
    }
}

/// An employee with all scheduling attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub classification: Classification,
    /// Weekly hour bounds. `max_hours` is soft-capped at 40 unless overtime is allowed.
    pub min_hours: u32,
    pub max_hours: u32,
    /// Roles this employee may fill. Must be non-empty to be schedulable.
    pub roles: BTreeSet<String>,
    /// Slots the employee *may* work.
    pub availability: BTreeSet<Slot>,
    /// Slots the employee *wants* to work. Expected to be a subset of availability.
    pub preferences: BTreeSet<Slot>,
    /// Hard block; wins over availability.
    pub time_off: BTreeSet<Slot>,
    pub needs_supervision: bool,
    pub can_supervise: bool,
    pub overtime_allowed: bool,
    pub hourly_rate: Decimal,
    /// Historical counter maintained by the caller; read for weekend fairness.
    #[serde(default)]
    pub weekend_shifts_worked: u32,
    #[serde(default = "default_employee_color")]
    pub color: String,
}

fn default_employee_color() -> String {
    "#4CAF50".to_string()
}

impl Employee {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            classification: Classification::PartTime,
            min_hours: 15,
            max_hours: 25,
            roles: BTreeSet::new(),
            availability: BTreeSet::new(),
            preferences: BTreeSet::new(),
            time_off: BTreeSet::new(),
            needs_supervision: false,
            can_supervise: false,
            overtime_allowed: false,
            hourly_rate: Decimal::from(15),
            weekend_shifts_worked: 0,
            color: default_employee_color(),
        }
    }

    pub fn with_classification(mut self, classification: Classification) -> Self {
        self.classification = classification;
        self
    }

    pub fn with_hours(mut self, min_hours: u32, max_hours: u32) -> Self {
        self.min_hours = min_hours;
        self.max_hours = max_hours;
        self
    }

    pub fn with_role(mut self, role_id: impl Into<String>) -> Self {
        self.roles.insert(role_id.into());
        self
    }

    pub fn with_rate(mut self, hourly_rate: Decimal) -> Self {
        self.hourly_rate = hourly_rate;
        self
    }

    pub fn with_supervision(mut self, needs_supervision: bool, can_supervise: bool) -> Self {
        self.needs_supervision = needs_supervision;
        self.can_supervise = can_supervise;
        self
    }

    pub fn with_overtime(mut self, overtime_allowed: bool) -> Self {
        self.overtime_allowed = overtime_allowed;
        self
    }

    /// Available and not blocked by time off.
    pub fn is_available(&self, day: Day, hour: Hour) -> bool {
        let slot = Slot::new(day, hour);
        self.availability.contains(&slot) && !self.time_off.contains(&slot)
    }

    pub fn prefers(&self, day: Day, hour: Hour) -> bool {
        self.preferences.contains(&Slot::new(day, hour))
    }

    pub fn is_blocked(&self, day: Day, hour: Hour) -> bool {
        self.time_off.contains(&Slot::new(day, hour))
    }

    pub fn has_role(&self, role_id: &str) -> bool {
        self.roles.contains(role_id)
    }

    /// Marks `[start_hour, end_hour)` on `day` as workable.
    pub fn add_availability(&mut self, day: Day, start_hour: Hour, end_hour: Hour) {
        for hour in start_hour..end_hour {
            self.availability.insert(Slot::new(day, hour));
        }
    }

    pub fn add_preference(&mut self, day: Day, start_hour: Hour, end_hour: Hour) {
        for hour in start_hour..end_hour {
            self.preferences.insert(Slot::new(day, hour));
        }
    }

    /// Blocks time off; `None` blocks the entire day.
    pub fn add_time_off(&mut self, day: Day, hours: Option<(Hour, Hour)>) {
        let (start, end) = hours.unwrap_or((0, 24));
        for hour in start..end {
            self.time_off.insert(Slot::new(day, hour));
        }
    }

    pub fn is_full_time(&self) -> bool {
        self.classification == Classification::FullTime
    }

    /// Weekly cap actually enforced: 40 bounds `max_hours` unless overtime is allowed.
    pub fn effective_max_hours(&self) -> u32 {
        if self.overtime_allowed {
            self.max_hours
        } else {
            self.max_hours.min(40)
        }
    }

    /// Soft preference for consecutive days worked: 5 for FT, 3 for PT.
    pub fn preferred_max_consecutive_days(&self) -> u8 {
        if self.is_full_time() {
            5
        } else {
            3
        }
    }
}

/// Objective tilt: fewer, neutral, or more staffed hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulingStrategy {
    Minimize,
    Balanced,
    Maximize,
}

impl FromStr for SchedulingStrategy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "minimize" => Ok(SchedulingStrategy::Minimize),
            "balanced" => Ok(SchedulingStrategy::Balanced),
            "maximize" => Ok(SchedulingStrategy::Maximize),
            _ => Err(()),
        }
    }
}

/// How a days-per-week cap is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayCapMode {
    Off,
    /// Soft: escalating penalty per day over the cap.
    Preferred,
    /// Hard: the cap cannot be exceeded.
    Required,
}

impl FromStr for DayCapMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "off" => Ok(DayCapMode::Off),
            "preferred" => Ok(DayCapMode::Preferred),
            "required" => Ok(DayCapMode::Required),
            _ => Err(()),
        }
    }
}

/// Caller-supplied solve knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingPolicy {
    /// Minimum length of any contiguous worked stretch per employee per day.
    pub min_shift_hours: u8,
    pub max_hours_per_day: u8,
    /// Maximum shift starts per employee per day.
    pub max_splits_per_day: u8,
    /// Maximum days per week with two or more shift starts.
    pub max_split_shifts_per_week: u8,
    pub strategy: SchedulingStrategy,
    pub max_days_ft: u8,
    pub max_days_ft_mode: DayCapMode,
    pub max_days_pt: u8,
    pub max_days_pt_mode: DayCapMode,
    /// When true, coverage minimums are hard constraints in addition to the
    /// weighted coverage reward; when false, only the reward applies and
    /// staffing gaps surface through the unfilled-slot metrics.
    pub hard_coverage_minimums: bool,
}

impl Default for SchedulingPolicy {
    fn default() -> Self {
        Self {
            min_shift_hours: 2,
            max_hours_per_day: 8,
            max_splits_per_day: 2,
            max_split_shifts_per_week: 2,
            strategy: SchedulingStrategy::Balanced,
            max_days_ft: 5,
            max_days_ft_mode: DayCapMode::Required,
            max_days_pt: 3,
            max_days_pt_mode: DayCapMode::Required,
            hard_coverage_minimums: true,
        }
    }
}

impl SchedulingPolicy {
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.min_shift_hours == 0 {
            return Err(ScheduleError::InvalidPolicy(
                "min_shift_hours must be at least 1".to_string(),
            ));
        }
        if self.max_hours_per_day == 0 {
            return Err(ScheduleError::InvalidPolicy(
                "max_hours_per_day must be at least 1".to_string(),
            ));
        }
        if self.max_splits_per_day == 0 {
            return Err(ScheduleError::InvalidPolicy(
                "max_splits_per_day must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// `(cap, mode)` for the employee's classification.
    pub fn day_cap_for(&self, employee: &Employee) -> (u8, DayCapMode) {
        if employee.is_full_time() {
            (self.max_days_ft, self.max_days_ft_mode)
        } else {
            (self.max_days_pt, self.max_days_pt_mode)
        }
    }
}

/// A complete business configuration: window, roles, employees and coverage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessScenario {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub start_hour: Hour,
    pub end_hour: Hour,
    pub days_open: BTreeSet<Day>,
    pub roles: Vec<Role>,
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub peak_periods: Vec<PeakPeriod>,
    #[serde(default)]
    pub role_coverage_configs: Vec<RoleCoverageConfig>,
    pub coverage_mode: CoverageMode,
    #[serde(default)]
    pub shift_templates: Vec<ShiftTemplate>,
}

impl BusinessScenario {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            start_hour: 9,
            end_hour: 17,
            days_open: (0..7).collect(),
            roles: Vec::new(),
            employees: Vec::new(),
            peak_periods: Vec::new(),
            role_coverage_configs: Vec::new(),
            coverage_mode: CoverageMode::Shifts,
            shift_templates: Vec::new(),
        }
    }

    pub fn with_window(mut self, start_hour: Hour, end_hour: Hour) -> Self {
        self.start_hour = start_hour;
        self.end_hour = end_hour;
        self
    }

    pub fn with_days_open(mut self, days: impl IntoIterator<Item = Day>) -> Self {
        self.days_open = days.into_iter().collect();
        self
    }

    pub fn operating_hours(&self) -> std::ops::Range<Hour> {
        self.start_hour..self.end_hour
    }

    pub fn role(&self, role_id: &str) -> Option<&Role> {
        self.roles.iter().find(|r| r.id == role_id)
    }

    pub fn role_config(&self, role_id: &str) -> Option<&RoleCoverageConfig> {
        self.role_coverage_configs
            .iter()
            .find(|c| c.role_id == role_id)
    }

    pub fn employee(&self, employee_id: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == employee_id)
    }

    pub fn employee_mut(&mut self, employee_id: &str) -> Option<&mut Employee> {
        self.employees.iter_mut().find(|e| e.id == employee_id)
    }

    /// Whether `(day, hour)` falls inside any peak period.
    pub fn is_peak_hour(&self, day: Day, hour: Hour) -> bool {
        self.peak_periods.iter().any(|p| p.includes(day, hour))
    }

    /// Open weekend days (Saturday = 5, Sunday = 6).
    pub fn weekend_days(&self) -> impl Iterator<Item = Day> + '_ {
        self.days_open.iter().copied().filter(|&d| d >= 5)
    }

    /// Checks the invariants the model builder relies on.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.start_hour >= self.end_hour {
            return Err(ScheduleError::EmptyOperatingWindow {
                start: self.start_hour,
                end: self.end_hour,
            });
        }

        let role_ids: BTreeSet<&str> = self.roles.iter().map(|r| r.id.as_str()).collect();
        for emp in &self.employees {
            if emp.roles.is_empty() {
                return Err(ScheduleError::NoRoles {
                    employee: emp.id.clone(),
                });
            }
            for role in &emp.roles {
                if !role_ids.contains(role.as_str()) {
                    return Err(ScheduleError::UnknownRole {
                        employee: emp.id.clone(),
                        role: role.clone(),
                    });
                }
            }
            if emp.min_hours > emp.max_hours {
                return Err(ScheduleError::HourBoundsReversed {
                    employee: emp.id.clone(),
                    min: emp.min_hours,
                    max: emp.max_hours,
                });
            }
        }

        for template in &self.shift_templates {
            for role_req in &template.roles {
                if !role_ids.contains(role_req.role_id.as_str()) {
                    return Err(ScheduleError::UnknownCoverageRole {
                        owner: format!("shift template {}", template.id),
                        role: role_req.role_id.clone(),
                    });
                }
            }
        }
        for config in &self.role_coverage_configs {
            if !role_ids.contains(config.role_id.as_str()) {
                return Err(ScheduleError::UnknownCoverageRole {
                    owner: "role coverage config".to_string(),
                    role: config.role_id.clone(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_with_employee(emp: Employee) -> BusinessScenario {
        let mut scenario = BusinessScenario::new("biz", "Test Business").with_window(9, 17);
        scenario.roles.push(Role::new("r", "Role", "#123456"));
        scenario.employees.push(emp);
        scenario
    }

    #[test]
    fn test_time_off_overrides_availability() {
        let mut emp = Employee::new("e1", "Amy Cole").with_role("r");
        emp.add_availability(0, 9, 17);
        assert!(emp.is_available(0, 9));

        emp.add_time_off(0, Some((9, 12)));
        assert!(!emp.is_available(0, 9));
        assert!(!emp.is_available(0, 11));
        assert!(emp.is_available(0, 12));
        assert!(emp.is_blocked(0, 10));
    }

    #[test]
    fn test_full_day_time_off() {
        let mut emp = Employee::new("e1", "Amy Cole").with_role("r");
        emp.add_availability(2, 6, 22);
        emp.add_time_off(2, None);
        for hour in 6..22 {
            assert!(!emp.is_available(2, hour));
        }
    }

    #[test]
    fn test_effective_max_hours() {
        let emp = Employee::new("e1", "Amy Cole").with_hours(20, 50);
        assert_eq!(emp.effective_max_hours(), 40);
        let emp = emp.with_overtime(true);
        assert_eq!(emp.effective_max_hours(), 50);
        let emp = Employee::new("e2", "Beth Fox").with_hours(10, 30);
        assert_eq!(emp.effective_max_hours(), 30);
    }

    #[test]
    fn test_preferred_consecutive_days_by_classification() {
        let ft = Employee::new("e1", "Amy").with_classification(Classification::FullTime);
        let pt = Employee::new("e2", "Beth").with_classification(Classification::PartTime);
        assert_eq!(ft.preferred_max_consecutive_days(), 5);
        assert_eq!(pt.preferred_max_consecutive_days(), 3);
    }

    #[test]
    fn test_peak_period_includes() {
        let peak = PeakPeriod {
            name: "Lunch".to_string(),
            start_hour: 12,
            end_hour: 14,
            days: (0..5).collect(),
        };
        assert!(peak.includes(0, 12));
        assert!(peak.includes(4, 13));
        assert!(!peak.includes(0, 14));
        assert!(!peak.includes(5, 12));
    }

    #[test]
    fn test_shift_role_effective_max() {
        let req = ShiftRoleRequirement::new("r", 2);
        assert_eq!(req.effective_max(), 2);
        let req = req.with_max(4);
        assert_eq!(req.effective_max(), 4);
    }

    #[test]
    fn test_role_config_required_at() {
        let days_open: BTreeSet<Day> = (0..7).collect();
        let config = RoleCoverageConfig::new("r", 1, 2).with_required_hours(11, 14);
        assert!(config.is_required_at(0, 11, &days_open, 9, 17));
        assert!(!config.is_required_at(0, 14, &days_open, 9, 17));
        assert!(!config.is_required_at(0, 9, &days_open, 9, 17));

        let config = RoleCoverageConfig::new("r", 1, 2).with_required_days([5, 6]);
        assert!(config.is_required_at(5, 10, &days_open, 9, 17));
        assert!(!config.is_required_at(2, 10, &days_open, 9, 17));
    }

    #[test]
    fn test_validate_rejects_empty_window() {
        let scenario = BusinessScenario::new("biz", "Test").with_window(17, 9);
        assert!(matches!(
            scenario.validate(),
            Err(ScheduleError::EmptyOperatingWindow { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_roleless_employee() {
        let scenario = scenario_with_employee(Employee::new("e1", "Amy Cole"));
        assert!(matches!(
            scenario.validate(),
            Err(ScheduleError::NoRoles { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_role() {
        let scenario = scenario_with_employee(Employee::new("e1", "Amy Cole").with_role("ghost"));
        assert!(matches!(
            scenario.validate(),
            Err(ScheduleError::UnknownRole { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_reversed_hours() {
        let scenario = scenario_with_employee(
            Employee::new("e1", "Amy Cole").with_role("r").with_hours(30, 20),
        );
        assert!(matches!(
            scenario.validate(),
            Err(ScheduleError::HourBoundsReversed { .. })
        ));
    }

    #[test]
    fn test_policy_validation() {
        let policy = SchedulingPolicy::default();
        assert!(policy.validate().is_ok());

        let bad = SchedulingPolicy {
            min_shift_hours: 0,
            ..SchedulingPolicy::default()
        };
        assert!(matches!(bad.validate(), Err(ScheduleError::InvalidPolicy(_))));
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!(
            "minimize".parse::<SchedulingStrategy>(),
            Ok(SchedulingStrategy::Minimize)
        );
        assert_eq!(
            "BALANCED".parse::<SchedulingStrategy>(),
            Ok(SchedulingStrategy::Balanced)
        );
        assert!("other".parse::<SchedulingStrategy>().is_err());
        assert_eq!("preferred".parse::<DayCapMode>(), Ok(DayCapMode::Preferred));
    }
}
