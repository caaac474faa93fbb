//! Demo business scenarios with seeded, semi-random availability patterns.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_decimal::Decimal;

use crate::domain::{
    BusinessScenario, Classification, CoverageMode, Day, Employee, Hour, PeakPeriod, Role,
    RoleCoverageConfig, ShiftRoleRequirement, ShiftTemplate, Slot,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoScenario {
    /// Small shop, shift-template coverage.
    CoffeeShop,
    /// Larger store, detailed per-role coverage with peak boosts.
    RetailStore,
}

impl std::str::FromStr for DemoScenario {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "COFFEE_SHOP" => Ok(DemoScenario::CoffeeShop),
            "RETAIL_STORE" => Ok(DemoScenario::RetailStore),
            _ => Err(()),
        }
    }
}

impl DemoScenario {
    pub fn as_str(&self) -> &'static str {
        match self {
            DemoScenario::CoffeeShop => "COFFEE_SHOP",
            DemoScenario::RetailStore => "RETAIL_STORE",
        }
    }
}

/// List of available demo scenarios.
pub fn list_demo_scenarios() -> Vec<&'static str> {
    vec!["COFFEE_SHOP", "RETAIL_STORE"]
}

/// Generates a complete, valid business scenario.
pub fn generate(demo: DemoScenario) -> BusinessScenario {
    match demo {
        DemoScenario::CoffeeShop => create_coffee_shop(),
        DemoScenario::RetailStore => create_retail_store(),
    }
}

fn create_coffee_shop() -> BusinessScenario {
    let mut scenario = BusinessScenario::new("coffee-shop", "Corner Coffee Shop")
        .with_window(6, 18)
        .with_days_open(0..7);
    scenario.description = "Neighborhood cafe with a morning rush".to_string();
    scenario.coverage_mode = CoverageMode::Shifts;

    scenario.roles.push(Role::new("barista", "Barista", "#8D6E63"));
    scenario
        .roles
        .push(Role::new("shift_lead", "Shift Lead", "#5D4037"));

    scenario.peak_periods.push(PeakPeriod {
        name: "Morning Rush".to_string(),
        start_hour: 7,
        end_hour: 9,
        days: (0..5).collect(),
    });

    scenario.shift_templates.push(
        ShiftTemplate::new("open", "Opening", 6, 11)
            .with_role(ShiftRoleRequirement::new("shift_lead", 1))
            .with_role(ShiftRoleRequirement::new("barista", 1).with_max(2))
            .with_days(0..7),
    );
    scenario.shift_templates.push(
        ShiftTemplate::new("midday", "Midday", 11, 15)
            .with_role(ShiftRoleRequirement::new("barista", 1).with_max(2))
            .with_days(0..7),
    );
    scenario.shift_templates.push(
        ShiftTemplate::new("close", "Closing", 15, 18)
            .with_role(ShiftRoleRequirement::new("barista", 1).with_max(2))
            .with_days(0..7),
    );

    let mut names = name_permutations(&mut StdRng::seed_from_u64(0));
    let specs: [(&[&str], Classification, (u32, u32), bool, bool); 6] = [
        (&["shift_lead", "barista"], Classification::FullTime, (32, 40), false, true),
        (&["shift_lead", "barista"], Classification::FullTime, (32, 40), false, true),
        (&["barista"], Classification::PartTime, (8, 24), false, false),
        (&["barista"], Classification::PartTime, (8, 24), false, false),
        (&["barista"], Classification::PartTime, (8, 20), true, false),
        (&["barista"], Classification::PartTime, (8, 24), false, false),
    ];

    for (i, (roles, classification, (min_hours, max_hours), needs_supervision, can_supervise)) in
        specs.into_iter().enumerate()
    {
        let name = names.pop().unwrap_or_else(|| format!("Employee {i}"));
        let mut emp = Employee::new(format!("emp-{:02}", i + 1), name)
            .with_classification(classification)
            .with_hours(min_hours, max_hours)
            .with_supervision(needs_supervision, can_supervise);
        for role in roles {
            emp = emp.with_role(*role);
        }

        let mut rng = StdRng::seed_from_u64(i as u64 * 42);
        emp.hourly_rate = Decimal::from(if emp.is_full_time() {
            rng.gen_range(18..=22)
        } else {
            rng.gen_range(15..=17)
        });
        emp.weekend_shifts_worked = rng.gen_range(0..4);
        fill_availability(&mut emp, &scenario, i, &mut rng);
        scenario.employees.push(emp);
    }

    scenario
}

fn create_retail_store() -> BusinessScenario {
    let mut scenario = BusinessScenario::new("retail-store", "Main Street Retail")
        .with_window(9, 21)
        .with_days_open(0..7);
    scenario.description = "Retail store with lunch and evening peaks".to_string();
    scenario.coverage_mode = CoverageMode::Detailed;

    scenario.roles.push(Role::new("cashier", "Cashier", "#1E88E5"));
    scenario
        .roles
        .push(Role::new("floor", "Floor Associate", "#43A047"));
    scenario.roles.push(Role::new("manager", "Manager", "#8E24AA"));

    scenario.peak_periods.push(PeakPeriod {
        name: "Lunch".to_string(),
        start_hour: 12,
        end_hour: 14,
        days: (0..7).collect(),
    });
    scenario.peak_periods.push(PeakPeriod {
        name: "After Work".to_string(),
        start_hour: 17,
        end_hour: 19,
        days: (0..5).collect(),
    });

    scenario
        .role_coverage_configs
        .push(RoleCoverageConfig::new("cashier", 1, 3).with_peak_boost(1));
    scenario
        .role_coverage_configs
        .push(RoleCoverageConfig::new("floor", 1, 2).with_required_hours(11, 19));
    scenario
        .role_coverage_configs
        .push(RoleCoverageConfig::new("manager", 1, 1).with_required_hours(10, 18));

    let mut names = name_permutations(&mut StdRng::seed_from_u64(1));
    let specs: [(&[&str], Classification, (u32, u32), bool, bool); 10] = [
        (&["manager", "floor"], Classification::FullTime, (32, 40), false, true),
        (&["manager", "cashier"], Classification::FullTime, (32, 40), false, true),
        (&["floor", "cashier"], Classification::FullTime, (32, 45), false, true),
        (&["cashier"], Classification::PartTime, (12, 24), false, false),
        (&["cashier"], Classification::PartTime, (12, 24), false, false),
        (&["cashier"], Classification::PartTime, (8, 16), true, false),
        (&["floor"], Classification::PartTime, (12, 24), false, false),
        (&["floor"], Classification::PartTime, (12, 24), false, false),
        (&["floor", "cashier"], Classification::PartTime, (12, 28), false, false),
        (&["cashier"], Classification::PartTime, (8, 20), true, false),
    ];

    for (i, (roles, classification, (min_hours, max_hours), needs_supervision, can_supervise)) in
        specs.into_iter().enumerate()
    {
        let name = names.pop().unwrap_or_else(|| format!("Employee {i}"));
        let mut emp = Employee::new(format!("emp-{:02}", i + 1), name)
            .with_classification(classification)
            .with_hours(min_hours, max_hours)
            .with_supervision(needs_supervision, can_supervise);
        for role in roles {
            emp = emp.with_role(*role);
        }
        if max_hours > 40 {
            emp.overtime_allowed = true;
        }

        let mut rng = StdRng::seed_from_u64(1000 + i as u64 * 42);
        emp.hourly_rate = Decimal::from(if emp.is_full_time() {
            rng.gen_range(19..=24)
        } else {
            rng.gen_range(15..=18)
        });
        emp.weekend_shifts_worked = rng.gen_range(0..5);
        fill_availability(&mut emp, &scenario, i, &mut rng);
        scenario.employees.push(emp);
    }

    scenario
}

/// Semi-random but realistic availability: full-timers cover most days with a
/// morning-or-evening preference split; part-timers pick one of three
/// day-part patterns.
fn fill_availability(
    emp: &mut Employee,
    scenario: &BusinessScenario,
    employee_index: usize,
    rng: &mut StdRng,
) {
    let days: Vec<Day> = scenario.days_open.iter().copied().collect();
    let start = scenario.start_hour;
    let end = scenario.end_hour;
    let hours_in_day = end - start;

    if emp.is_full_time() {
        let count = rng.gen_range(5..=days.len().max(5));
        let available: Vec<Day> = days
            .choose_multiple(rng, count.min(days.len()))
            .copied()
            .collect();
        for &day in &available {
            emp.add_availability(day, start, end);
            if employee_index % 2 == 0 {
                emp.add_preference(day, start, (start + 5).min(end));
            } else {
                emp.add_preference(day, end.saturating_sub(5).max(start), end);
            }
        }
    } else {
        let count = rng.gen_range(4..=days.len().min(6).max(4));
        let available: Vec<Day> = days
            .choose_multiple(rng, count.min(days.len()))
            .copied()
            .collect();
        for &day in &available {
            let (shift_start, shift_end): (Hour, Hour) = match employee_index % 3 {
                0 => (start, start + hours_in_day.min(8)),
                1 => {
                    let s = start + hours_in_day / 3;
                    (s, (s + 6).min(end))
                }
                _ => (end.saturating_sub(7).max(start), end),
            };
            emp.add_availability(day, shift_start, shift_end);
            for hour in shift_start + 1..shift_end.saturating_sub(1) {
                emp.preferences.insert(Slot::new(day, hour));
            }
        }
    }
}

const FIRST_NAMES: &[&str] = &[
    "Amy", "Beth", "Carl", "Dan", "Elsa", "Flo", "Gus", "Hugo", "Ivy", "Jay",
];
const LAST_NAMES: &[&str] = &[
    "Cole", "Fox", "Green", "Jones", "King", "Li", "Poe", "Rye", "Smith", "Watt",
];

fn name_permutations(rng: &mut StdRng) -> Vec<String> {
    let mut names = Vec::with_capacity(FIRST_NAMES.len() * LAST_NAMES.len());
    for first in FIRST_NAMES {
        for last in LAST_NAMES {
            names.push(format!("{} {}", first, last));
        }
    }
    names.shuffle(rng);
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::compile_coverage;

    #[test]
    fn test_coffee_shop_is_valid() {
        let scenario = generate(DemoScenario::CoffeeShop);
        scenario.validate().unwrap();
        assert_eq!(scenario.employees.len(), 6);
        assert!(scenario.employees.iter().any(|e| e.can_supervise));
        assert!(!compile_coverage(&scenario).is_empty());
    }

    #[test]
    fn test_retail_store_is_valid() {
        let scenario = generate(DemoScenario::RetailStore);
        scenario.validate().unwrap();
        assert_eq!(scenario.employees.len(), 10);
        assert_eq!(scenario.coverage_mode, CoverageMode::Detailed);
        let requirements = compile_coverage(&scenario);
        assert!(requirements.iter().any(|r| r.is_peak));
    }

    #[test]
    fn test_generation_is_deterministic() {
        assert_eq!(
            generate(DemoScenario::CoffeeShop),
            generate(DemoScenario::CoffeeShop)
        );
        assert_eq!(
            generate(DemoScenario::RetailStore),
            generate(DemoScenario::RetailStore)
        );
    }

    #[test]
    fn test_all_employees_have_availability() {
        for demo in [DemoScenario::CoffeeShop, DemoScenario::RetailStore] {
            let scenario = generate(demo);
            for emp in &scenario.employees {
                assert!(
                    !emp.availability.is_empty(),
                    "employee {} has no availability",
                    emp.id
                );
            }
        }
    }

    #[test]
    fn test_demo_scenario_from_str() {
        assert_eq!(
            "coffee_shop".parse::<DemoScenario>(),
            Ok(DemoScenario::CoffeeShop)
        );
        assert_eq!(
            "RETAIL_STORE".parse::<DemoScenario>(),
            Ok(DemoScenario::RetailStore)
        );
        assert!("bakery".parse::<DemoScenario>().is_err());
        assert_eq!(list_demo_scenarios().len(), 2);
    }
}
