//! The wire format exchanged with the search engine: [`SolverInput`] on
//! stdin, [`SolverOutput`] on stdout.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::constraint::RawConstraint;
use crate::employee::Employee;
use crate::shift::ShiftType;
use crate::week::date_range_inclusive;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn dates(&self) -> Vec<NaiveDate> {
        date_range_inclusive(self.start, self.end)
    }
}

/// A single day's shift record in an existing schedule, as it appears on the
/// wire: either a bare shift-id string, or a `{type, startHour, endHour}`
/// object for an ad-hoc `WORK` entry that has no fixed shift-id.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ShiftRecord {
    Id(String),
    Detailed {
        #[serde(rename = "type")]
        kind: String,
        #[serde(rename = "startHour")]
        start_hour: Option<u32>,
        #[serde(rename = "endHour")]
        end_hour: Option<u32>,
    },
}

impl ShiftRecord {
    /// Resolves the record to a shift-id string, if it represents one.
    /// A detailed record only resolves when it is a `WORK` entry carrying
    /// both hours; any other kind (absence, incomplete) resolves to `None`.
    pub fn as_shift_id(&self) -> Option<String> {
        match self {
            ShiftRecord::Id(s) => Some(s.clone()),
            ShiftRecord::Detailed {
                kind,
                start_hour: Some(start),
                end_hour: Some(end),
            } if kind.eq_ignore_ascii_case("WORK") => Some(format!("{start}-{end}")),
            ShiftRecord::Detailed { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExistingEmployeeSchedule {
    pub id: String,
    #[serde(default)]
    pub shifts: HashMap<NaiveDate, ShiftRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExistingSchedule {
    #[serde(default)]
    pub employees: Vec<ExistingEmployeeSchedule>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolverInput {
    pub employees: Vec<Employee>,
    #[serde(default)]
    pub constraints: Vec<RawConstraint>,
    #[serde(rename = "dateRange")]
    pub date_range: DateRange,
    #[serde(default)]
    pub demand: HashMap<NaiveDate, u32>,
    #[serde(rename = "existingSchedule", default)]
    pub existing_schedule: ExistingSchedule,
}

impl SolverInput {
    pub fn get_date_list(&self) -> Vec<NaiveDate> {
        self.date_range.dates()
    }

    /// The last worked shift each employee held the day before the horizon
    /// starts, used to seed cross-horizon rest and consecutive-day checks.
    /// Non-working records (absence codes, incomplete detailed entries) are
    /// ignored, matching the history used for the hard rules (spec.md H2/H4).
    pub fn get_history_shifts(&self) -> HashMap<String, ShiftType> {
        let previous_day = self.date_range.start - Duration::days(1);
        let mut history = HashMap::new();
        for employee in &self.existing_schedule.employees {
            let Some(record) = employee.shifts.get(&previous_day) else {
                continue;
            };
            let Some(shift_id) = record.as_shift_id() else {
                continue;
            };
            match ShiftType::parse(&shift_id) {
                Ok(shift) if shift.working => {
                    history.insert(employee.id.clone(), shift);
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::debug!(employee = %employee.id, %err, "history shift unparseable, ignored");
                }
            }
        }
        history
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolverStatus {
    Success,
    Failed,
    Timeout,
}

/// Solver statistics reported on every output, win or lose. `num_conflicts`
/// and `num_branches` name the CP-SAT backend's own search counters; this
/// search driver has no direct equivalent (it restarts whole greedy builds
/// rather than branching a single search tree), so it reports 0 for both
/// and adds `solutions_explored` — the count of complete, hard-rule-feasible
/// restarts found — as a supplemental field the original contract omits.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SolverStats {
    pub solve_time: f64,
    pub status: String,
    pub objective_value: i64,
    pub num_conflicts: i64,
    pub num_branches: i64,
    #[serde(rename = "solutionsExplored")]
    pub solutions_explored: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SolverOutput {
    pub status: SolverStatus,
    /// employeeId -> (date string "YYYY-MM-DD" -> shiftId)
    pub schedule: HashMap<String, HashMap<String, String>>,
    pub stats: SolverStats,
    pub violations: Vec<String>,
    pub error: Option<String>,
}

impl SolverOutput {
    pub fn success(
        schedule: HashMap<String, HashMap<String, String>>,
        stats: SolverStats,
    ) -> Self {
        Self {
            status: SolverStatus::Success,
            schedule,
            stats,
            violations: Vec::new(),
            error: None,
        }
    }

    pub fn failed(reason: impl Into<String>, stats: SolverStats) -> Self {
        Self {
            status: SolverStatus::Failed,
            schedule: HashMap::new(),
            stats,
            violations: Vec::new(),
            error: Some(reason.into()),
        }
    }

    pub fn timeout(
        schedule: HashMap<String, HashMap<String, String>>,
        stats: SolverStats,
    ) -> Self {
        Self {
            status: SolverStatus::Timeout,
            schedule,
            stats,
            violations: Vec::new(),
            error: None,
        }
    }
}
