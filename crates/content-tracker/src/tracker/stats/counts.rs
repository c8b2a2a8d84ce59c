use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::super::domain::{Contribution, MonthKey};

/// Calendar window a count is taken over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Year(i32),
    Month(MonthKey),
}

impl Period {
    pub fn contains(self, date: NaiveDate) -> bool {
        match self {
            Self::Year(year) => date.year() == year,
            Self::Month(month) => MonthKey::from_date(date) == month,
        }
    }

    /// Leading part of a `YYYY-MM-DD` date shared by every day in the period.
    pub fn prefix(self) -> String {
        match self {
            Self::Year(year) => format!("{year:04}"),
            Self::Month(month) => month.to_string(),
        }
    }
}

/// Published contributions dated inside `period`.
pub fn published_count<'a, I>(contributions: I, period: Period) -> usize
where
    I: IntoIterator<Item = &'a Contribution>,
{
    contributions
        .into_iter()
        .filter(|c| c.is_published() && period.contains(c.date))
        .count()
}

/// Published or in-review contributions dated inside `month`.
pub fn delivered_count<'a, I>(contributions: I, month: MonthKey) -> usize
where
    I: IntoIterator<Item = &'a Contribution>,
{
    contributions
        .into_iter()
        .filter(|c| c.status.is_delivered() && c.month() == month)
        .count()
}

/// Published count measured against a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GoalProgress {
    pub published: usize,
    pub goal: usize,
    pub percent: u32,
}

impl GoalProgress {
    pub fn new(published: usize, goal: usize) -> Self {
        let percent = if goal == 0 {
            0
        } else {
            (published as f64 / goal as f64 * 100.0).round() as u32
        };
        Self {
            published,
            goal,
            percent,
        }
    }
}

/// Year-to-date progress: one contribution per employee for every month
/// elapsed so far, the current month included.
pub fn year_to_date<'a, I>(contributions: I, team_size: usize, today: NaiveDate) -> GoalProgress
where
    I: IntoIterator<Item = &'a Contribution>,
{
    let published = published_count(contributions, Period::Year(today.year()));
    GoalProgress::new(published, team_size * today.month() as usize)
}

pub fn month_progress<'a, I>(contributions: I, team_size: usize, month: MonthKey) -> GoalProgress
where
    I: IntoIterator<Item = &'a Contribution>,
{
    GoalProgress::new(published_count(contributions, Period::Month(month)), team_size)
}
