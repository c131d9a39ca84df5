//! The constraint wire format and its construction-time validation.
//!
//! Constraints arrive as a loosely-typed tagged union. A malformed
//! constraint (missing the field its kind requires) is not a hard parse
//! failure for the whole input: it is logged as a warning by the caller and
//! dropped, per the model-build diagnostics in spec.md §7.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use crate::shift::ShiftId;

/// The constraint exactly as it appears on the wire, before kind-specific
/// validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConstraint {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "employeeId")]
    pub employee_id: Option<String>,
    pub date: Option<NaiveDate>,
    #[serde(rename = "dateRange")]
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub value: Option<Value>,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "isHard")]
    pub is_hard: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct AbsenceConstraint {
    pub employee_id: String,
    pub date: Option<NaiveDate>,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
}

#[derive(Debug, Clone)]
pub struct PreferenceConstraint {
    pub employee_id: String,
    pub value: Option<Value>,
    pub hard: bool,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct ShiftConstraint {
    pub employee_id: String,
    pub date: NaiveDate,
    pub shift_id: ShiftId,
    pub hard: bool,
}

#[derive(Debug, Clone)]
pub struct FreeTimeConstraint {
    pub employee_id: String,
    pub date_range: (NaiveDate, NaiveDate),
}

#[derive(Debug, Clone)]
pub struct DemandConstraint {
    pub employee_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct CustomConstraint {
    pub employee_id: Option<String>,
    pub description: String,
    pub hard: bool,
}

/// A constraint once its kind-specific fields have been checked.
#[derive(Debug, Clone)]
pub enum Constraint {
    Absence(AbsenceConstraint),
    Preference(PreferenceConstraint),
    Shift(ShiftConstraint),
    FreeTime(FreeTimeConstraint),
    Demand(DemandConstraint),
    Custom(CustomConstraint),
}

impl Constraint {
    /// Validates and converts a raw wire constraint. ABSENCE constraints are
    /// always hard regardless of `isHard`, since an employee's recorded
    /// absence cannot be negotiated away as a soft preference. FREE_TIME
    /// constraints must carry a date range and must not be marked hard.
    pub fn from_raw(raw: RawConstraint) -> Result<Constraint, String> {
        let hard = raw.is_hard.unwrap_or(true);
        match raw.kind.as_str() {
            "ABSENCE" => {
                let employee_id = raw
                    .employee_id
                    .ok_or_else(|| "ABSENCE constraint missing employeeId".to_string())?;
                if raw.date.is_none() && raw.date_range.is_none() {
                    return Err("ABSENCE constraint missing date or dateRange".to_string());
                }
                Ok(Constraint::Absence(AbsenceConstraint {
                    employee_id,
                    date: raw.date,
                    date_range: raw.date_range,
                }))
            }
            "PREFERENCE" => {
                let employee_id = raw
                    .employee_id
                    .ok_or_else(|| "PREFERENCE constraint missing employeeId".to_string())?;
                Ok(Constraint::Preference(PreferenceConstraint {
                    employee_id,
                    value: raw.value,
                    hard,
                    description: raw.description,
                }))
            }
            "SHIFT" | "FIXED" | "FIXED_SHIFT" => {
                let employee_id = raw
                    .employee_id
                    .ok_or_else(|| "SHIFT constraint missing employeeId".to_string())?;
                let date = raw
                    .date
                    .ok_or_else(|| "SHIFT constraint missing date".to_string())?;
                let shift_id = match raw.value {
                    Some(Value::String(s)) => s,
                    _ => return Err("SHIFT constraint missing string value".to_string()),
                };
                Ok(Constraint::Shift(ShiftConstraint {
                    employee_id,
                    date,
                    shift_id,
                    hard,
                }))
            }
            "FREE_TIME" => {
                let employee_id = raw
                    .employee_id
                    .ok_or_else(|| "FREE_TIME constraint missing employeeId".to_string())?;
                let date_range = raw
                    .date_range
                    .ok_or_else(|| "FREE_TIME constraint missing dateRange".to_string())?;
                if hard {
                    return Err("FREE_TIME constraint must be soft".to_string());
                }
                Ok(Constraint::FreeTime(FreeTimeConstraint {
                    employee_id,
                    date_range,
                }))
            }
            "DEMAND" => Ok(Constraint::Demand(DemandConstraint {
                employee_id: raw.employee_id,
                date: raw.date,
                date_range: raw.date_range,
                description: raw.description,
            })),
            "CUSTOM" => Ok(Constraint::Custom(CustomConstraint {
                employee_id: raw.employee_id,
                description: raw.description,
                hard,
            })),
            other => Err(format!("unknown constraint type: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(kind: &str) -> RawConstraint {
        RawConstraint {
            kind: kind.to_string(),
            employee_id: Some("e1".to_string()),
            date: NaiveDate::from_ymd_opt(2026, 1, 5),
            date_range: None,
            value: Some(Value::String("8-16".to_string())),
            description: String::new(),
            is_hard: None,
        }
    }

    #[test]
    fn absence_is_hard_even_when_marked_soft() {
        let mut r = raw("ABSENCE");
        r.is_hard = Some(false);
        let c = Constraint::from_raw(r).unwrap();
        assert!(matches!(c, Constraint::Absence(_)));
    }

    #[test]
    fn free_time_requires_a_range() {
        let r = raw("FREE_TIME");
        assert!(Constraint::from_raw(r).is_err());
    }

    #[test]
    fn free_time_cannot_be_hard() {
        let mut r = raw("FREE_TIME");
        r.date_range = Some((
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 6).unwrap(),
        ));
        r.is_hard = Some(true);
        assert!(Constraint::from_raw(r).is_err());
    }

    #[test]
    fn shift_constraint_requires_string_value() {
        let mut r = raw("SHIFT");
        r.value = Some(Value::Bool(true));
        assert!(Constraint::from_raw(r).is_err());
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(Constraint::from_raw(raw("BOGUS")).is_err());
    }
}
