//! Coverage compiler: expands shift templates or detailed role configs into
//! per-`(day, hour, role)` staffing requirements.
//!
//! Pure function of the scenario; the engine recompiles on every solve.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::{BusinessScenario, CoverageMode, CoverageRequirement, Day, Hour};

/// Derives the hourly coverage requirements for the scenario's mode.
pub fn compile_coverage(scenario: &BusinessScenario) -> Vec<CoverageRequirement> {
    let requirements = match scenario.coverage_mode {
        CoverageMode::Shifts => compile_from_shifts(scenario),
        CoverageMode::Detailed => compile_from_detailed(scenario),
    };
    debug!(
        mode = ?scenario.coverage_mode,
        count = requirements.len(),
        "compiled coverage requirements"
    );
    requirements
}

/// Shifts mode: overlapping templates sum their counts per `(day, hour, role)`.
fn compile_from_shifts(scenario: &BusinessScenario) -> Vec<CoverageRequirement> {
    let mut demand: BTreeMap<(Day, Hour, &str), (u32, u32)> = BTreeMap::new();

    for template in &scenario.shift_templates {
        for &day in &template.days {
            if !scenario.days_open.contains(&day) {
                continue;
            }
            for hour in template.start_hour..template.end_hour {
                // Clip hours spilling outside the operating window.
                if hour < scenario.start_hour || hour >= scenario.end_hour {
                    continue;
                }
                for role_req in &template.roles {
                    let entry = demand
                        .entry((day, hour, role_req.role_id.as_str()))
                        .or_insert((0, 0));
                    entry.0 += role_req.count;
                    entry.1 += role_req.effective_max();
                }
            }
        }
    }

    demand
        .into_iter()
        .map(|((day, hour, role_id), (min_staff, max_staff))| CoverageRequirement {
            day,
            hour,
            role_id: role_id.to_string(),
            min_staff,
            max_staff,
            is_peak: scenario.is_peak_hour(day, hour),
        })
        .collect()
}

/// Detailed mode: each role config emits a requirement wherever it is required,
/// boosted during peak periods.
fn compile_from_detailed(scenario: &BusinessScenario) -> Vec<CoverageRequirement> {
    let mut requirements = Vec::new();

    for &day in &scenario.days_open {
        for hour in scenario.operating_hours() {
            let is_peak = scenario.is_peak_hour(day, hour);
            for config in &scenario.role_coverage_configs {
                if !config.is_required_at(
                    day,
                    hour,
                    &scenario.days_open,
                    scenario.start_hour,
                    scenario.end_hour,
                ) {
                    continue;
                }
                let (min_staff, max_staff) = config.staff_count(is_peak);
                requirements.push(CoverageRequirement {
                    day,
                    hour,
                    role_id: config.role_id.clone(),
                    min_staff,
                    max_staff,
                    is_peak,
                });
            }
        }
    }

    requirements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PeakPeriod, Role, RoleCoverageConfig, ShiftRoleRequirement, ShiftTemplate};

    fn base_scenario() -> BusinessScenario {
        let mut scenario = BusinessScenario::new("biz", "Test").with_window(9, 17);
        scenario.roles.push(Role::new("r", "Role", "#123456"));
        scenario
    }

    fn requirement_at<'a>(
        reqs: &'a [CoverageRequirement],
        day: Day,
        hour: Hour,
        role: &str,
    ) -> Option<&'a CoverageRequirement> {
        reqs.iter()
            .find(|r| r.day == day && r.hour == hour && r.role_id == role)
    }

    #[test]
    fn test_overlapping_templates_sum() {
        let mut scenario = base_scenario();
        scenario.shift_templates.push(
            ShiftTemplate::new("t1", "Morning", 9, 13)
                .with_role(ShiftRoleRequirement::new("r", 1))
                .with_days([0]),
        );
        scenario.shift_templates.push(
            ShiftTemplate::new("t2", "Midday", 12, 15)
                .with_role(ShiftRoleRequirement::new("r", 1))
                .with_days([0]),
        );

        let reqs = compile_coverage(&scenario);
        for hour in [9, 10, 11] {
            assert_eq!(requirement_at(&reqs, 0, hour, "r").unwrap().min_staff, 1);
        }
        assert_eq!(requirement_at(&reqs, 0, 12, "r").unwrap().min_staff, 2);
        assert_eq!(requirement_at(&reqs, 0, 12, "r").unwrap().max_staff, 2);
        for hour in [13, 14] {
            assert_eq!(requirement_at(&reqs, 0, hour, "r").unwrap().min_staff, 1);
        }
        assert!(requirement_at(&reqs, 0, 15, "r").is_none());
    }

    #[test]
    fn test_template_hours_clipped_to_window() {
        let mut scenario = base_scenario();
        scenario.shift_templates.push(
            ShiftTemplate::new("t1", "Early", 6, 11)
                .with_role(ShiftRoleRequirement::new("r", 1))
                .with_days([0]),
        );

        let reqs = compile_coverage(&scenario);
        assert!(requirement_at(&reqs, 0, 8, "r").is_none());
        assert!(requirement_at(&reqs, 0, 9, "r").is_some());
        assert!(requirement_at(&reqs, 0, 10, "r").is_some());
        assert_eq!(reqs.len(), 2);
    }

    #[test]
    fn test_template_closed_days_skipped() {
        let mut scenario = base_scenario().with_days_open([0, 1, 2, 3, 4]);
        scenario.shift_templates.push(
            ShiftTemplate::new("t1", "Weekend", 9, 11)
                .with_role(ShiftRoleRequirement::new("r", 1))
                .with_days([5, 6]),
        );
        assert!(compile_coverage(&scenario).is_empty());
    }

    #[test]
    fn test_empty_template_contributes_nothing() {
        let mut scenario = base_scenario();
        scenario
            .shift_templates
            .push(ShiftTemplate::new("t1", "No days", 9, 12).with_role(ShiftRoleRequirement::new("r", 1)));
        scenario
            .shift_templates
            .push(ShiftTemplate::new("t2", "No roles", 9, 12).with_days([0]));
        assert!(compile_coverage(&scenario).is_empty());
    }

    #[test]
    fn test_max_count_accumulates() {
        let mut scenario = base_scenario();
        scenario.shift_templates.push(
            ShiftTemplate::new("t1", "Morning", 9, 10)
                .with_role(ShiftRoleRequirement::new("r", 1).with_max(3))
                .with_days([0]),
        );
        scenario.shift_templates.push(
            ShiftTemplate::new("t2", "Morning too", 9, 10)
                .with_role(ShiftRoleRequirement::new("r", 2))
                .with_days([0]),
        );

        let reqs = compile_coverage(&scenario);
        let req = requirement_at(&reqs, 0, 9, "r").unwrap();
        assert_eq!(req.min_staff, 3);
        assert_eq!(req.max_staff, 5);
    }

    #[test]
    fn test_detailed_mode_with_peak_boost() {
        let mut scenario = base_scenario().with_days_open([0]);
        scenario.coverage_mode = CoverageMode::Detailed;
        scenario.peak_periods.push(PeakPeriod {
            name: "Lunch".to_string(),
            start_hour: 12,
            end_hour: 14,
            days: [0].into_iter().collect(),
        });
        scenario
            .role_coverage_configs
            .push(RoleCoverageConfig::new("r", 1, 2).with_peak_boost(1));

        let reqs = compile_coverage(&scenario);
        let off_peak = requirement_at(&reqs, 0, 9, "r").unwrap();
        assert_eq!((off_peak.min_staff, off_peak.max_staff), (1, 2));
        assert!(!off_peak.is_peak);

        let peak = requirement_at(&reqs, 0, 12, "r").unwrap();
        assert_eq!((peak.min_staff, peak.max_staff), (2, 3));
        assert!(peak.is_peak);
    }

    #[test]
    fn test_detailed_mode_required_hours_only() {
        let mut scenario = base_scenario().with_days_open([0, 1]);
        scenario.coverage_mode = CoverageMode::Detailed;
        scenario
            .role_coverage_configs
            .push(RoleCoverageConfig::new("r", 1, 1).with_required_hours(10, 12));

        let reqs = compile_coverage(&scenario);
        assert_eq!(reqs.len(), 4);
        assert!(requirement_at(&reqs, 0, 9, "r").is_none());
        assert!(requirement_at(&reqs, 1, 11, "r").is_some());
    }

    #[test]
    fn test_compile_is_idempotent() {
        let mut scenario = base_scenario();
        scenario.shift_templates.push(
            ShiftTemplate::new("t1", "Morning", 9, 13)
                .with_role(ShiftRoleRequirement::new("r", 1))
                .with_days([0, 2, 4]),
        );
        assert_eq!(compile_coverage(&scenario), compile_coverage(&scenario));
    }
}
