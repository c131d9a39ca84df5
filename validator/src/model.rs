//! Builds the validator's view of a proposed schedule: the same domain
//! model the scheduler uses, but with the schedule itself folded out of the
//! hard `SHIFT` constraints rather than built by a search (spec.md §4.5).

use std::collections::HashMap;

use chrono::NaiveDate;
use shared::{Constraint, DomainError, DomainResult, Employee, ShiftType, SolverInput};

pub struct ValidatorModel {
    pub employees: Vec<Employee>,
    pub dates: Vec<NaiveDate>,
    /// employee id -> date -> shift actually worked, read off the input's
    /// hard `SHIFT` constraints.
    pub schedule: HashMap<String, HashMap<NaiveDate, ShiftType>>,
}

impl ValidatorModel {
    pub fn build(input: &SolverInput) -> DomainResult<Self> {
        if input.date_range.start > input.date_range.end {
            return Err(DomainError::Validation(format!(
                "date range inverted: {} > {}",
                input.date_range.start, input.date_range.end
            )));
        }

        let dates = input.get_date_list();

        let mut schedule: HashMap<String, HashMap<NaiveDate, ShiftType>> = HashMap::new();
        for raw in input.constraints.clone() {
            let constraint = match Constraint::from_raw(raw) {
                Ok(c) => c,
                Err(reason) => {
                    tracing::warn!(%reason, "dropping malformed constraint");
                    continue;
                }
            };
            let Constraint::Shift(shift_constraint) = constraint else {
                continue;
            };
            if !shift_constraint.hard {
                continue;
            }
            match ShiftType::parse(&shift_constraint.shift_id) {
                Ok(shift) => {
                    schedule
                        .entry(shift_constraint.employee_id.clone())
                        .or_default()
                        .insert(shift_constraint.date, shift);
                }
                Err(err) => tracing::warn!(
                    employee = %shift_constraint.employee_id,
                    shift = %shift_constraint.shift_id,
                    %err,
                    "unparseable shift in proposed schedule, ignored"
                ),
            }
        }

        Ok(Self {
            employees: input.employees.clone(),
            dates,
            schedule,
        })
    }

}
