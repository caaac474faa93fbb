//! Console driver: solve a demo scenario and print the roster.
//!
//! Run with: cargo run --release --bin bench [COFFEE_SHOP|RETAIL_STORE]

use std::time::{Duration, Instant};

use staff_scheduling::demo_data::{self, DemoScenario};
use staff_scheduling::solver::{format_schedule, ScheduleSolver};
use staff_scheduling::SchedulingPolicy;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let demo = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<DemoScenario>().ok())
        .unwrap_or(DemoScenario::CoffeeShop);

    let scenario = demo_data::generate(demo);
    println!("Scenario: {} ({})", scenario.name, demo.as_str());
    println!("  Employees: {}", scenario.employees.len());
    println!("  Roles: {}", scenario.roles.len());
    println!();

    let mut solver = match ScheduleSolver::new(scenario) {
        Ok(solver) => solver,
        Err(err) => {
            eprintln!("invalid scenario: {err}");
            std::process::exit(1);
        }
    };

    let policy = SchedulingPolicy::default();
    let started = Instant::now();
    match solver.solve(&policy, Duration::from_secs(60), false) {
        Ok(schedule) if schedule.is_feasible => {
            println!("{}", format_schedule(&schedule, solver.scenario()));
            println!();
            println!(
                "Cost estimate: ${} | Preferences: {} met / {} missed | Wall: {:.2?}",
                schedule.metrics.estimated_labor_cost,
                schedule.metrics.preference_matches,
                schedule.metrics.preference_misses,
                started.elapsed()
            );
        }
        Ok(schedule) => {
            println!("No feasible schedule found.");
            println!(
                "  {} requirement(s) unfilled, {} staff-hours short",
                schedule.metrics.unfilled_slots.len(),
                schedule.metrics.total_hours_still_needed
            );
        }
        Err(err) => {
            eprintln!("solve failed: {err}");
            std::process::exit(1);
        }
    }
}
