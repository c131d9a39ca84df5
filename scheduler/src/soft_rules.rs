//! Soft-rule module (spec model §4.3, S1–S6): penalty terms with fixed
//! weights, summed into a single objective the search driver minimizes.

use chrono::NaiveDate;
use shared::Constraint;

use crate::model::{Model, Schedule};

pub const WEIGHT_HOUR_BALANCE: i64 = 10;
pub const WEIGHT_WEEKEND_FAIRNESS: i64 = 5;
pub const WEIGHT_PREFERENCE: i64 = 3;
pub const WEIGHT_FREE_TIME: i64 = 20;
pub const WEIGHT_OVERTIME_PER_HOUR: i64 = 50;
pub const WEIGHT_NIGHT_RECOVERY: i64 = 100;

/// The objective value: the weighted sum of every soft-rule penalty over a
/// complete schedule. Lower is better.
pub fn objective(model: &Model, schedule: &Schedule) -> i64 {
    WEIGHT_HOUR_BALANCE * hour_balance_penalty(model, schedule)
        + WEIGHT_WEEKEND_FAIRNESS * weekend_fairness_penalty(model, schedule)
        + WEIGHT_PREFERENCE * preference_penalty(model)
        + WEIGHT_FREE_TIME * free_time_penalty(model, schedule)
        + WEIGHT_OVERTIME_PER_HOUR * overtime_penalty(model, schedule)
        + WEIGHT_NIGHT_RECOVERY * night_recovery_penalty(model, schedule)
}

fn total_hours(schedule: &Schedule, employee_idx: usize) -> u32 {
    schedule
        .get(&employee_idx)
        .map(|days| days.values().map(|s| s.hours).sum())
        .unwrap_or(0)
}

/// S1 — hour balancing: spread between the most- and least-worked employee,
/// counting only employees who have at least one allowed shift.
fn hour_balance_penalty(model: &Model, schedule: &Schedule) -> i64 {
    let totals: Vec<u32> = model
        .employees
        .iter()
        .enumerate()
        .filter(|(_, e)| !e.allowed.is_empty())
        .map(|(idx, _)| total_hours(schedule, idx))
        .collect();
    spread(&totals)
}

/// S2 — weekend fairness: spread between most- and least-weekend-days worked.
fn weekend_fairness_penalty(model: &Model, schedule: &Schedule) -> i64 {
    let counts: Vec<u32> = model
        .employees
        .iter()
        .enumerate()
        .filter(|(_, e)| !e.allowed.is_empty())
        .map(|(idx, _)| {
            schedule
                .get(&idx)
                .map(|days| days.keys().filter(|&&d| shared::is_weekend(d)).count() as u32)
                .unwrap_or(0)
        })
        .collect();
    spread(&counts)
}

fn spread(values: &[u32]) -> i64 {
    match (values.iter().max(), values.iter().min()) {
        (Some(&max), Some(&min)) => (max - min) as i64,
        _ => 0,
    }
}

/// S3 — preferences: a no-op hook. The soft `PREFERENCE` constraints are
/// walked (so a future extension has somewhere to attach a real term) but
/// contribute zero, per spec.md §4.3/§9.
fn preference_penalty(model: &Model) -> i64 {
    let count = model
        .constraints
        .iter()
        .filter(|c| matches!(c, Constraint::Preference(p) if !p.hard))
        .count();
    if count > 0 {
        tracing::debug!(count, "soft preference constraints present, contributing zero penalty");
    }
    0
}

/// S4 — soft `FREE_TIME`: for every such constraint, count the in-range days
/// the employee ends up working.
fn free_time_penalty(model: &Model, schedule: &Schedule) -> i64 {
    let mut penalty = 0i64;
    for constraint in &model.constraints {
        let Constraint::FreeTime(f) = constraint else { continue };
        let Some(idx) = model.employee_index(&f.employee_id) else { continue };
        let (start, end) = f.date_range;
        let worked = shared::date_range_inclusive(start, end)
            .into_iter()
            .filter(|d| model.dates.contains(d))
            .filter(|d| schedule.get(&idx).is_some_and(|days| days.contains_key(d)))
            .count();
        penalty += worked as i64;
    }
    penalty
}

/// S5 (soft half) — hours over 40 per (employee, ISO week), summed.
fn overtime_penalty(model: &Model, schedule: &Schedule) -> i64 {
    let mut penalty = 0i64;
    for idx in 0..model.employees.len() {
        for week in shared::group_by_iso_week(&model.dates) {
            let hours: u32 = week
                .iter()
                .filter_map(|d| schedule.get(&idx).and_then(|days| days.get(d)))
                .map(|s| s.hours)
                .sum();
            penalty += hours.saturating_sub(40) as i64;
        }
    }
    penalty
}

/// S6 — night recovery: over every sliding 4-day window, an occurrence is
/// charged when an employee works two consecutive nights (`d1`, `d2`) and
/// is then also scheduled on `d3`. The symmetric day-4 term is intentionally
/// omitted, per spec.md §9.
fn night_recovery_penalty(model: &Model, schedule: &Schedule) -> i64 {
    let mut penalty = 0i64;
    for idx in 0..model.employees.len() {
        let Some(days) = schedule.get(&idx) else { continue };
        for window in model.dates.windows(4) {
            let [d1, d2, d3, _d4]: [NaiveDate; 4] = window.try_into().unwrap();
            let nights = [d1, d2]
                .into_iter()
                .filter(|d| days.get(d).is_some_and(|s| s.night))
                .count();
            let works_d3 = days.contains_key(&d3);
            if nights == 2 && works_d3 {
                penalty += 1;
            }
        }
    }
    penalty
}
