//! Variable builder (spec model §4.1): turns a [`SolverInput`] into the
//! fixed set of legal `(employee, shift)` pairs the search driver is allowed
//! to assign, plus the parsed constraints and history it must honor.

use std::collections::HashMap;

use chrono::NaiveDate;
use shared::{Constraint, DomainError, DomainResult, Employee, ShiftId, ShiftType, SolverInput};

/// A complete (or partial) assignment: employee index -> date -> shift.
pub type Schedule = HashMap<usize, HashMap<NaiveDate, ShiftType>>;

/// One employee's allowed shifts, parsed once up front. A shift string that
/// fails to parse is dropped with a warning rather than failing the whole
/// model build (spec.md §7, model-build warnings).
pub struct EmployeeShifts {
    pub employee: Employee,
    pub allowed: Vec<ShiftType>,
}

impl EmployeeShifts {
    pub fn shift(&self, id: &str) -> Option<&ShiftType> {
        self.allowed.iter().find(|s| s.id == id)
    }
}

/// The materialized model the search driver operates over: every `x[e,d,s]`
/// variable is implicitly "exists" for `s` in `employees[e].allowed`, for
/// every `d` in `dates`. There is no separate sparse table — absence from
/// `allowed` already means "not modellable", matching spec.md §4.1.
pub struct Model {
    pub employees: Vec<EmployeeShifts>,
    pub dates: Vec<NaiveDate>,
    pub demand: HashMap<NaiveDate, u32>,
    pub history: HashMap<String, ShiftType>,
    pub constraints: Vec<Constraint>,
}

impl Model {
    pub fn build(input: &SolverInput) -> DomainResult<Model> {
        if input.date_range.start > input.date_range.end {
            return Err(DomainError::Validation(format!(
                "date range inverted: {} > {}",
                input.date_range.start, input.date_range.end
            )));
        }

        let dates = input.get_date_list();
        let history = input.get_history_shifts();

        let employees = input
            .employees
            .iter()
            .map(|employee| {
                let allowed = employee
                    .allowed_shifts
                    .iter()
                    .filter_map(|id| match ShiftType::parse(id) {
                        Ok(shift) => Some(shift),
                        Err(err) => {
                            tracing::warn!(
                                employee = %employee.id,
                                shift = %id,
                                %err,
                                "dropping unparseable allowed shift"
                            );
                            None
                        }
                    })
                    .collect();
                EmployeeShifts {
                    employee: employee.clone(),
                    allowed,
                }
            })
            .collect();

        let mut constraints = Vec::new();
        for raw in input.constraints.clone() {
            match Constraint::from_raw(raw) {
                Ok(c) => constraints.push(c),
                Err(reason) => tracing::warn!(%reason, "dropping malformed constraint"),
            }
        }

        let demand = input
            .demand
            .iter()
            .filter(|(date, _)| {
                let in_range = dates.contains(date);
                if !in_range {
                    tracing::warn!(%date, "dropping demand entry outside the horizon");
                }
                in_range
            })
            .map(|(date, count)| (*date, *count))
            .collect();

        Ok(Model {
            employees,
            dates,
            demand,
            history,
            constraints,
        })
    }

    pub fn employee_index(&self, employee_id: &str) -> Option<usize> {
        self.employees.iter().position(|e| e.employee.id == employee_id)
    }

    /// Every forced `ABSENCE` date for an employee (H6): the single date, or
    /// every date of the range, intersected with the horizon.
    pub fn absence_dates(&self, employee_idx: usize) -> Vec<NaiveDate> {
        let employee_id = &self.employees[employee_idx].employee.id;
        let mut dates = Vec::new();
        for constraint in &self.constraints {
            if let Constraint::Absence(a) = constraint {
                if &a.employee_id != employee_id {
                    continue;
                }
                if let Some(d) = a.date {
                    dates.push(d);
                }
                if let Some((start, end)) = a.date_range {
                    dates.extend(shared::date_range_inclusive(start, end));
                }
            }
        }
        dates
    }

    /// Hard `SHIFT`/`FIXED`/`FIXED_SHIFT` pins for an employee (H5):
    /// `date -> shift id`. Constraints pointing at an unmodellable shift are
    /// surfaced separately by the caller rather than silently honored.
    pub fn fixed_shifts(&self, employee_idx: usize) -> HashMap<NaiveDate, ShiftId> {
        let employee_id = &self.employees[employee_idx].employee.id;
        let mut fixed = HashMap::new();
        for constraint in &self.constraints {
            if let Constraint::Shift(s) = constraint {
                if s.hard && &s.employee_id == employee_id {
                    fixed.insert(s.date, s.shift_id.clone());
                }
            }
        }
        fixed
    }
}
