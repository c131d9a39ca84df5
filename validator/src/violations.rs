//! The rule walker (spec.md §4.5): checks an already-assigned schedule
//! against H2, H8, H4, H10 and H11 and reports every violation found. Does
//! not attempt repair.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use shared::{covers_zone, rest_gap, CoverageZone, ShiftType, ROLE_LEADER, ROLE_SUPPORT};

use crate::model::ValidatorModel;

#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    pub rule: String,
    pub employee: Option<String>,
    pub date: Option<String>,
    pub message: String,
}

fn violation(rule: &str, employee: Option<&str>, date: Option<NaiveDate>, message: String) -> Violation {
    Violation {
        rule: rule.to_string(),
        employee: employee.map(str::to_string),
        date: date.map(|d| d.format("%Y-%m-%d").to_string()),
        message,
    }
}

/// Runs every check in spec order and returns every violation found.
pub fn check(model: &ValidatorModel) -> Vec<Violation> {
    let mut violations = Vec::new();
    violations.extend(check_rest(model));
    violations.extend(check_coverage(model));
    violations.extend(check_max_consecutive_days(model));
    violations.extend(check_leader_restrictions(model));
    violations.extend(check_leader_support(model));
    violations
}

/// H2 — 11h rest, pairwise consecutive calendar days only. The validator
/// receives no carry-over history, so the horizon's first day is never
/// checked against anything before it.
fn check_rest(model: &ValidatorModel) -> Vec<Violation> {
    let mut violations = Vec::new();
    for employee in &model.employees {
        let Some(days) = model.schedule.get(&employee.id) else { continue };
        for &date in &model.dates {
            let next = date + Duration::days(1);
            let (Some(today), Some(tomorrow)) = (days.get(&date), days.get(&next)) else {
                continue;
            };
            if rest_gap(today, tomorrow) < 11 {
                violations.push(violation(
                    "11h Rest",
                    Some(&employee.id),
                    Some(next),
                    format!(
                        "only {}h rest between {} on {} and {} on {}",
                        rest_gap(today, tomorrow),
                        today.id,
                        date,
                        tomorrow.id,
                        next
                    ),
                ));
            }
        }
    }
    violations
}

/// H8 — every day must have at least one employee covering each zone.
fn check_coverage(model: &ValidatorModel) -> Vec<Violation> {
    let mut violations = Vec::new();
    for &date in &model.dates {
        let shifts_today: Vec<&ShiftType> = model
            .schedule
            .values()
            .filter_map(|days| days.get(&date))
            .collect();
        for zone in [CoverageZone::Morning, CoverageZone::Afternoon, CoverageZone::Night] {
            if !shifts_today.iter().any(|s| covers_zone(s, zone)) {
                violations.push(violation(
                    "Coverage",
                    None,
                    Some(date),
                    format!("no employee covers the {zone:?} zone"),
                ));
            }
        }
    }
    violations
}

/// H4 — at most 5 consecutive working days. The counter resets after it
/// reports, so a 7-, 8-, 9-day streak only ever reports once per excess
/// day rather than once per day from the 6th onward.
fn check_max_consecutive_days(model: &ValidatorModel) -> Vec<Violation> {
    let mut violations = Vec::new();
    for employee in &model.employees {
        let Some(days) = model.schedule.get(&employee.id) else { continue };
        let mut streak = 0u32;
        for &date in &model.dates {
            if days.contains_key(&date) {
                streak += 1;
                if streak > 5 {
                    violations.push(violation(
                        "Max Consecutive Days",
                        Some(&employee.id),
                        Some(date),
                        format!("{streak} consecutive working days ending {date}"),
                    ));
                    streak = 0;
                }
            } else {
                streak = 0;
            }
        }
    }
    violations
}

/// H10 — leader role restrictions: no weekends, no shift starting before
/// 08:00, no shift ending after 20:00 or classified as night.
fn check_leader_restrictions(model: &ValidatorModel) -> Vec<Violation> {
    let mut violations = Vec::new();
    for employee in &model.employees {
        if !employee.is_leader() {
            continue;
        }
        let Some(days) = model.schedule.get(&employee.id) else { continue };
        for (&date, shift) in days {
            let mut reasons = Vec::new();
            if date.weekday().num_days_from_monday() >= 5 {
                reasons.push("weekend shift");
            }
            if shift.start_hour < 8 {
                reasons.push("starts before 08:00");
            }
            if shift.end_hour > 20 {
                reasons.push("ends after 20:00");
            }
            if shift.night {
                reasons.push("classified as a night shift");
            }
            if !reasons.is_empty() {
                violations.push(violation(
                    "Leader Rules",
                    Some(&employee.id),
                    Some(date),
                    format!("leader shift {} on {date}: {}", shift.id, reasons.join(", ")),
                ));
            }
        }
    }
    violations
}

/// H11 — leader not alone. Weakened relative to the scheduler's own hard
/// rule: any other employee working that day counts as support, regardless
/// of role or shift timing (spec.md §4.5).
fn check_leader_support(model: &ValidatorModel) -> Vec<Violation> {
    let mut violations = Vec::new();
    for &date in &model.dates {
        let leader_working_day_shift = model.employees.iter().any(|e| {
            e.is_leader()
                && model
                    .schedule
                    .get(&e.id)
                    .and_then(|days| days.get(&date))
                    .is_some_and(|s| s.start_hour < 20)
        });
        if !leader_working_day_shift {
            continue;
        }
        let anyone_else_working = model.employees.iter().any(|e| {
            !e.is_leader()
                && model
                    .schedule
                    .get(&e.id)
                    .is_some_and(|days| days.contains_key(&date))
        });
        if !anyone_else_working {
            violations.push(violation(
                "Leader Alone",
                None,
                Some(date),
                format!("{ROLE_LEADER} works {date} with no {ROLE_SUPPORT} or other staff present"),
            ));
        }
    }
    violations
}
