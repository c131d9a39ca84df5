use std::collections::HashMap;

use chrono::NaiveDate;
use shared::{DateRange, Employee, ExistingSchedule, RawConstraint, SolverInput};
use validator::model::ValidatorModel;
use validator::violations::check;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn employee(id: &str, roles: &[&str]) -> Employee {
    Employee {
        id: id.to_string(),
        name: id.to_string(),
        roles: roles.iter().map(|r| r.to_string()).collect(),
        allowed_shifts: vec![],
        preferences: HashMap::new(),
        special_rules: HashMap::new(),
    }
}

fn shift_constraint(employee_id: &str, date: NaiveDate, shift_id: &str) -> RawConstraint {
    RawConstraint {
        kind: "SHIFT".to_string(),
        employee_id: Some(employee_id.to_string()),
        date: Some(date),
        date_range: None,
        value: Some(serde_json::Value::String(shift_id.to_string())),
        description: String::new(),
        is_hard: Some(true),
    }
}

/// "Given a schedule where employee X works "20-8" on day N and "8-16" on
/// day N+1, output contains exactly one violation with rule "11h Rest" for
/// day N+1."
#[test]
fn exactly_one_rest_violation_on_day_n_plus_one() {
    let input = SolverInput {
        employees: vec![employee("X", &[])],
        constraints: vec![
            shift_constraint("X", date(2025, 3, 10), "20-8"),
            shift_constraint("X", date(2025, 3, 11), "8-16"),
        ],
        date_range: DateRange {
            start: date(2025, 3, 10),
            end: date(2025, 3, 11),
        },
        demand: HashMap::new(),
        existing_schedule: ExistingSchedule::default(),
    };
    let model = ValidatorModel::build(&input).unwrap();
    let violations = check(&model);
    let rest_violations: Vec<_> = violations.iter().filter(|v| v.rule == "11h Rest").collect();
    assert_eq!(rest_violations.len(), 1);
    assert_eq!(rest_violations[0].date.as_deref(), Some("2025-03-11"));
}

/// "Given a day with no night assignee, output contains a coverage
/// violation for that day."
#[test]
fn day_with_no_night_assignee_reports_coverage_violation() {
    let input = SolverInput {
        employees: vec![employee("A", &[])],
        constraints: vec![shift_constraint("A", date(2025, 3, 10), "8-16")],
        date_range: DateRange {
            start: date(2025, 3, 10),
            end: date(2025, 3, 10),
        },
        demand: HashMap::new(),
        existing_schedule: ExistingSchedule::default(),
    };
    let model = ValidatorModel::build(&input).unwrap();
    let violations = check(&model);
    assert!(violations
        .iter()
        .any(|v| v.rule == "Coverage" && v.date.as_deref() == Some("2025-03-10")));
}
