//! Shift-id parsing, duration, and night classification.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Codes that denote an absence or a day off rather than a worked shift.
/// Carry no hours and are never counted toward coverage or rest.
pub const NON_WORK_CODES: &[&str] = &[
    "W", "L4", "UW", "UZ", "UM", "UB", "OP", "NN", "WYCH",
];

/// A shift identifier as it appears on the wire: `"START-END"` in 24h clock
/// hours, or one of [`NON_WORK_CODES`].
pub type ShiftId = String;

/// A parsed shift. `working` is false for absence/day-off codes, in which
/// case the hour fields are meaningless zeros.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftType {
    pub id: ShiftId,
    pub start_hour: u32,
    pub end_hour: u32,
    pub hours: u32,
    pub night: bool,
    pub working: bool,
}

impl ShiftType {
    /// Parses a shift-id string. `"START-END"` with `start < end` is a
    /// same-day shift; `start >= end` crosses midnight. Either way, a shift
    /// is also classified as night when it starts at or after 19:00 or ends
    /// at or before 08:00, even if it does not cross midnight.
    pub fn parse(id: &str) -> DomainResult<Self> {
        let upper = id.trim().to_ascii_uppercase();
        if NON_WORK_CODES.contains(&upper.as_str()) {
            return Ok(Self {
                id: id.trim().to_string(),
                start_hour: 0,
                end_hour: 0,
                hours: 0,
                night: false,
                working: false,
            });
        }

        let (start_str, end_str) = id
            .split_once('-')
            .ok_or_else(|| DomainError::Parse(format!("unrecognized shift id: {id}")))?;
        let start_hour: u32 = start_str
            .trim()
            .parse()
            .map_err(|_| DomainError::Parse(format!("unrecognized shift id: {id}")))?;
        let end_hour: u32 = end_str
            .trim()
            .parse()
            .map_err(|_| DomainError::Parse(format!("unrecognized shift id: {id}")))?;
        if start_hour > 24 || end_hour > 24 {
            return Err(DomainError::Parse(format!("hour out of range in shift id: {id}")));
        }

        let (hours, crosses_midnight) = if start_hour < end_hour {
            (end_hour - start_hour, false)
        } else {
            (24 - start_hour + end_hour, true)
        };

        let night = crosses_midnight || start_hour >= 19 || end_hour <= 8;

        Ok(Self {
            id: id.trim().to_string(),
            start_hour,
            end_hour,
            hours,
            night,
            working: true,
        })
    }

    pub fn from_hours(start_hour: u32, end_hour: u32) -> DomainResult<Self> {
        Self::parse(&format!("{start_hour}-{end_hour}"))
    }

    pub fn is_non_work(id: &str) -> bool {
        NON_WORK_CODES.contains(&id.trim().to_ascii_uppercase().as_str())
    }
}

impl fmt::Display for ShiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Hours of rest between the end of `first` and the start of `second`,
/// treating them as consecutive shifts on a day boundary (spec.md H2).
pub fn rest_gap(first: &ShiftType, second: &ShiftType) -> i64 {
    if first.start_hour > first.end_hour {
        second.start_hour as i64 - first.end_hour as i64
    } else {
        (24 - first.end_hour as i64) + second.start_hour as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_shift_parses_duration_and_is_not_night() {
        let s = ShiftType::parse("8-16").unwrap();
        assert_eq!(s.hours, 8);
        assert!(!s.night);
        assert!(s.working);
    }

    #[test]
    fn shift_starting_at_or_after_19_is_night_even_same_day() {
        let s = ShiftType::parse("19-23").unwrap();
        assert_eq!(s.hours, 4);
        assert!(s.night);
    }

    #[test]
    fn shift_ending_at_or_before_8_is_night() {
        let s = ShiftType::parse("1-7").unwrap();
        assert_eq!(s.hours, 6);
        assert!(s.night);
    }

    #[test]
    fn midnight_crossing_shift_is_night_and_duration_wraps() {
        let s = ShiftType::parse("22-6").unwrap();
        assert_eq!(s.hours, 8);
        assert!(s.night);
    }

    #[test]
    fn non_work_codes_carry_no_hours() {
        for code in NON_WORK_CODES {
            let s = ShiftType::parse(code).unwrap();
            assert!(!s.working);
            assert_eq!(s.hours, 0);
        }
    }

    #[test]
    fn garbage_shift_id_is_a_parse_error() {
        assert!(ShiftType::parse("not-a-shift").is_err());
    }

    #[test]
    fn rest_gap_across_midnight() {
        let evening = ShiftType::parse("14-22").unwrap();
        let morning = ShiftType::parse("6-14").unwrap();
        assert_eq!(rest_gap(&evening, &morning), 8);
    }
}
