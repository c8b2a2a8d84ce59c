use chrono::{Datelike, NaiveDate, Weekday};

/// Tuesday within the first seven days of its month.
pub fn is_first_tuesday(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Tue && date.day() <= 7
}

/// Tuesday with no further Tuesday in its month.
pub fn is_last_tuesday(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Tue && date.day() + 7 > days_in_month(date)
}

pub fn is_first_or_last_tuesday(date: NaiveDate) -> bool {
    is_first_tuesday(date) || is_last_tuesday(date)
}

pub fn days_in_month(date: NaiveDate) -> u32 {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|next| next.pred_opt())
        .map_or(31, |last| last.day())
}

/// When a scheduled job is allowed to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    FirstTuesday,
    FirstOrLastTuesday,
}

impl Schedule {
    pub fn is_due(self, date: NaiveDate) -> bool {
        match self {
            Self::FirstTuesday => is_first_tuesday(date),
            Self::FirstOrLastTuesday => is_first_or_last_tuesday(date),
        }
    }

    pub const fn describe(self) -> &'static str {
        match self {
            Self::FirstTuesday => "the first Tuesday of the month",
            Self::FirstOrLastTuesday => "the first or last Tuesday of the month",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn first_tuesday_falls_in_first_week() {
        assert!(is_first_tuesday(day(2026, 3, 3)));
        assert!(!is_first_tuesday(day(2026, 3, 10)));
        assert!(!is_first_tuesday(day(2026, 3, 2)));
    }

    #[test]
    fn last_tuesday_has_no_successor_in_month() {
        assert!(is_last_tuesday(day(2026, 3, 31)));
        assert!(!is_last_tuesday(day(2026, 3, 24)));
        // February 2026 has 28 days
        assert!(is_last_tuesday(day(2026, 2, 24)));
        assert!(!is_last_tuesday(day(2026, 2, 17)));
    }

    #[test]
    fn december_rolls_over_year() {
        assert_eq!(days_in_month(day(2025, 12, 30)), 31);
        assert!(is_last_tuesday(day(2025, 12, 30)));
    }

    #[test]
    fn leap_february() {
        assert_eq!(days_in_month(day(2028, 2, 1)), 29);
        assert_eq!(days_in_month(day(2026, 2, 1)), 28);
    }

    #[test]
    fn schedules_gate_on_their_predicate() {
        let last_tuesday = day(2026, 3, 31);
        assert!(Schedule::FirstOrLastTuesday.is_due(last_tuesday));
        assert!(!Schedule::FirstTuesday.is_due(last_tuesday));
        assert!(Schedule::FirstTuesday.is_due(day(2026, 3, 3)));
        assert!(!Schedule::FirstOrLastTuesday.is_due(day(2026, 3, 18)));
    }
}
