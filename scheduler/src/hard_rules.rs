//! Hard-rule module (spec model §4.2, H1–H11). Two shapes of check:
//! per-assignment rules are folded into [`can_assign`] so the search driver
//! never proposes an illegal single shift; day-level rules (coverage,
//! demand, leader support) can only be judged once every employee's shift
//! for that date is known, so they live in [`check_day`].

use std::collections::HashMap;

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use shared::{covers_zone, group_by_iso_week, is_weekend, iso_week_key, rest_gap, CoverageZone, ShiftType};

use crate::model::{Model, Schedule};

/// Tracks, per employee, the shifts assigned so far in chronological order,
/// plus the H3 rest day reserved for each (employee, ISO week). This is the
/// only state `can_assign` and `check_day` need to evaluate the rest,
/// consecutive-day, weekly-rest and weekly-hour rules.
#[derive(Default)]
pub struct ScheduleState {
    assignments: Schedule,
    reserved_days_off: HashMap<(usize, (i32, u32)), NaiveDate>,
}

impl ScheduleState {
    pub fn new() -> Self {
        Self::default()
    }

    /// H3 — at least one day off per ISO week. The ground truth
    /// (`original_source/python/constraints.py`'s `add_35h_weekly_rest`)
    /// adds `sum(days_off) >= 1` to the CP-SAT model and lets the solver
    /// choose freely which day each employee rests, so different employees
    /// can stagger their day off and coverage never drops to zero. This
    /// greedy search has no joint solver to make that choice for it, so it
    /// makes the same choice up front: for every employee and every ISO
    /// week with more than one horizon date, it reserves one randomly
    /// chosen date (excluding any date already pinned by a hard fixed-shift
    /// constraint) as that employee's day off, and `can_assign`/
    /// `day_off_is_forced` enforce it from then on. Picking independently
    /// per employee is what staggers the rest day across the team instead
    /// of pinning the whole team to the same date.
    ///
    /// A week with only a single horizon date is left unconstrained: H3
    /// cannot carve out a day off without emptying that date's coverage
    /// entirely, and for a single-day horizon doing so would violate
    /// coverage outright, so the rule is skipped in that boundary case.
    pub fn reserve_days_off(&mut self, model: &Model, rng: &mut impl rand::Rng) {
        for (idx, employee) in model.employees.iter().enumerate() {
            if employee.allowed.is_empty() {
                continue;
            }
            let fixed = model.fixed_shifts(idx);
            for week in group_by_iso_week(&model.dates) {
                if week.len() < 2 {
                    continue;
                }
                let mut candidates: Vec<NaiveDate> =
                    week.iter().copied().filter(|d| !fixed.contains_key(d)).collect();
                if candidates.is_empty() {
                    continue;
                }
                candidates.shuffle(rng);
                self.reserved_days_off
                    .insert((idx, iso_week_key(week[0])), candidates[0]);
            }
        }
    }

    fn is_reserved_day_off(&self, employee_idx: usize, date: NaiveDate) -> bool {
        self.reserved_days_off.get(&(employee_idx, iso_week_key(date))) == Some(&date)
    }

    pub fn record(&mut self, employee_idx: usize, date: NaiveDate, shift: ShiftType) {
        self.assignments.entry(employee_idx).or_default().insert(date, shift);
    }

    pub fn shift_on(&self, employee_idx: usize, date: NaiveDate) -> Option<&ShiftType> {
        self.assignments.get(&employee_idx)?.get(&date)
    }

    pub fn into_schedule(self) -> Schedule {
        self.assignments
    }

    fn previous_shift<'a>(
        &'a self,
        model: &'a Model,
        employee_idx: usize,
        date: NaiveDate,
    ) -> Option<&'a ShiftType> {
        let previous_day = date - chrono::Duration::days(1);
        if let Some(shift) = self.shift_on(employee_idx, previous_day) {
            return Some(shift);
        }
        if model.dates.first() == Some(&date) {
            let employee_id = &model.employees[employee_idx].employee.id;
            return model.history.get(employee_id);
        }
        None
    }

    fn consecutive_days_ending_before(&self, employee_idx: usize, date: NaiveDate) -> u32 {
        let mut count = 0;
        let mut cursor = date - chrono::Duration::days(1);
        while self.shift_on(employee_idx, cursor).is_some() {
            count += 1;
            cursor -= chrono::Duration::days(1);
        }
        count
    }

    fn hours_in_week_before(&self, model: &Model, employee_idx: usize, date: NaiveDate) -> u32 {
        let week = iso_week_key(date);
        model
            .dates
            .iter()
            .filter(|&&d| d < date && iso_week_key(d) == week)
            .filter_map(|&d| self.shift_on(employee_idx, d))
            .map(|s| s.hours)
            .sum()
    }
}

/// H6 + H10 + H2 + H3 + H4 + the hard half of S5 (48h weekly cap). Returns
/// `false` when assigning `shift` to `employee_idx` on `date` would violate
/// any per-assignment hard rule given what has already been assigned.
pub fn can_assign(
    model: &Model,
    state: &ScheduleState,
    employee_idx: usize,
    date: NaiveDate,
    shift: &ShiftType,
) -> bool {
    let employee = &model.employees[employee_idx].employee;

    // H6 — absence.
    if model.absence_dates(employee_idx).contains(&date) {
        return false;
    }

    // H10 — leader role restrictions.
    if employee.is_leader() {
        if is_weekend(date) {
            return false;
        }
        if shift.start_hour < 8 {
            return false;
        }
        if shift.end_hour > 20 || shift.night {
            return false;
        }
    }

    // H2 — 11h rest, including the history shift on the horizon's first day.
    if let Some(prev) = state.previous_shift(model, employee_idx, date) {
        if rest_gap(prev, shift) < 11 {
            if model.dates.first() == Some(&date) {
                tracing::debug!(
                    employee = %employee.id,
                    shift = %shift.id,
                    date = %date,
                    "blocking shift due to history rest gap"
                );
            }
            return false;
        }
    }

    // H4 — at most 5 consecutive working days.
    if state.consecutive_days_ending_before(employee_idx, date) >= 5 {
        return false;
    }

    // Hard half of S5 — 48h weekly cap.
    if state.hours_in_week_before(model, employee_idx, date) + shift.hours > 48 {
        return false;
    }

    // H3 — at least one day off per ISO week, staggered per employee via
    // the reservation `reserve_days_off` computed up front.
    if state.is_reserved_day_off(employee_idx, date) {
        return false;
    }

    true
}

/// Whether a day off is forced for `employee_idx` on `date`: H6's absence
/// or H3's reserved rest day, used by the search driver to skip attempting
/// any shift rather than looping through rejections.
pub fn day_off_is_forced(model: &Model, state: &ScheduleState, employee_idx: usize, date: NaiveDate) -> bool {
    if model.absence_dates(employee_idx).contains(&date) {
        return true;
    }
    state.is_reserved_day_off(employee_idx, date)
}

/// The outcome of checking day-level hard rules once every employee's shift
/// (or day off) for `date` is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayViolation {
    Demand { required: u32, actual: u32 },
    MissingZone(CoverageZone),
    NoNightShift,
    LeaderUnsupported,
}

/// H7 + H8 + H9 + H11, evaluated over the day's full set of assignments.
pub fn check_day(
    model: &Model,
    date: NaiveDate,
    assignments: &HashMap<usize, &ShiftType>,
) -> Vec<DayViolation> {
    let mut violations = Vec::new();

    // H7 — minimum daily demand.
    if let Some(&required) = model.demand.get(&date) {
        let actual = assignments.len() as u32;
        if actual < required {
            violations.push(DayViolation::Demand { required, actual });
        }
    }

    // H8 — 24/7 coverage zones.
    for zone in [CoverageZone::Morning, CoverageZone::Afternoon, CoverageZone::Night] {
        if !assignments.values().any(|s| covers_zone(s, zone)) {
            violations.push(DayViolation::MissingZone(zone));
        }
    }

    // H9 — at least one night shift (subsumed by H8's night zone, kept explicit).
    if !assignments.values().any(|s| s.night || s.start_hour >= 19) {
        violations.push(DayViolation::NoNightShift);
    }

    // H11 — leader support.
    let leader_working_day_shift = assignments.iter().any(|(&idx, shift)| {
        model.employees[idx].employee.is_leader() && shift.start_hour < 20
    });
    if leader_working_day_shift {
        let has_support = assignments.iter().any(|(&idx, shift)| {
            model.employees[idx].employee.has_role(shared::ROLE_SUPPORT)
                && shift.start_hour < 20
                && shift.end_hour >= 14
        });
        if !has_support {
            violations.push(DayViolation::LeaderUnsupported);
        }
    }

    violations
}
