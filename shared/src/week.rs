//! ISO week grouping and the three round-the-clock coverage zones.

use chrono::{Datelike, Duration, NaiveDate};

use crate::shift::ShiftType;

pub fn iso_week_key(date: NaiveDate) -> (i32, u32) {
    let w = date.iso_week();
    (w.year(), w.week())
}

/// Groups a chronologically sorted list of dates into contiguous ISO weeks,
/// preserving the order weeks first appear in.
pub fn group_by_iso_week(dates: &[NaiveDate]) -> Vec<Vec<NaiveDate>> {
    let mut weeks: Vec<((i32, u32), Vec<NaiveDate>)> = Vec::new();
    for &date in dates {
        let key = iso_week_key(date);
        match weeks.last_mut() {
            Some((k, group)) if *k == key => group.push(date),
            _ => weeks.push((key, vec![date])),
        }
    }
    weeks.into_iter().map(|(_, group)| group).collect()
}

pub fn date_range_inclusive(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = start;
    while current <= end {
        dates.push(current);
        current += Duration::days(1);
    }
    dates
}

pub fn is_weekend(date: NaiveDate) -> bool {
    date.weekday().num_days_from_monday() >= 5
}

/// The three shifts of round-the-clock coverage a facility must maintain
/// every day (spec.md H7 / §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverageZone {
    Morning,
    Afternoon,
    Night,
}

/// Whether a worked shift satisfies coverage for the given zone. Morning and
/// afternoon are defined by start hour; afternoon also admits any shift that
/// starts before 14:00 but runs past 16:00. Night coverage piggybacks on the
/// shift's own night classification.
pub fn covers_zone(shift: &ShiftType, zone: CoverageZone) -> bool {
    if !shift.working {
        return false;
    }
    match zone {
        CoverageZone::Morning => (6..14).contains(&shift.start_hour),
        CoverageZone::Afternoon => {
            (12..20).contains(&shift.start_hour) || (shift.start_hour < 14 && shift.end_hour > 16)
        }
        CoverageZone::Night => shift.night || shift.start_hour >= 19,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_seven_consecutive_days_into_a_single_week() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(); // Monday
        let dates = date_range_inclusive(start, start + Duration::days(6));
        let weeks = group_by_iso_week(&dates);
        assert_eq!(weeks.len(), 1);
        assert_eq!(weeks[0].len(), 7);
    }

    #[test]
    fn splits_at_iso_week_boundary() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 4).unwrap(); // Sunday, week 1
        let dates = date_range_inclusive(start, start + Duration::days(1)); // Sun, Mon
        let weeks = group_by_iso_week(&dates);
        assert_eq!(weeks.len(), 2);
    }

    #[test]
    fn night_zone_follows_night_classification() {
        let s = ShiftType::parse("20-6").unwrap();
        assert!(covers_zone(&s, CoverageZone::Night));
        assert!(!covers_zone(&s, CoverageZone::Morning));
    }
}
