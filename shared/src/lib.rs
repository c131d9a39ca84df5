pub mod constraint;
pub mod employee;
pub mod error;
pub mod shift;
pub mod solver_io;
pub mod week;

pub use constraint::{
    AbsenceConstraint, Constraint, CustomConstraint, DemandConstraint, FreeTimeConstraint,
    PreferenceConstraint, RawConstraint, ShiftConstraint,
};
pub use employee::{Employee, ROLE_LEADER, ROLE_SUPPORT};
pub use error::{DomainError, DomainResult};
pub use shift::{rest_gap, ShiftId, ShiftType, NON_WORK_CODES};
pub use solver_io::{
    DateRange, ExistingEmployeeSchedule, ExistingSchedule, ShiftRecord, SolverInput, SolverOutput,
    SolverStats, SolverStatus,
};
pub use week::{
    covers_zone, date_range_inclusive, group_by_iso_week, is_weekend, iso_week_key, CoverageZone,
};
