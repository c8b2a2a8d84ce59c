use std::collections::BTreeSet;

use super::super::domain::{Contribution, MonthKey};

/// Distinct months containing at least one published contribution.
pub fn published_months<'a, I>(contributions: I) -> BTreeSet<MonthKey>
where
    I: IntoIterator<Item = &'a Contribution>,
{
    contributions
        .into_iter()
        .filter(|c| c.is_published())
        .map(Contribution::month)
        .collect()
}

/// Consecutive publishing months counted back from the most recent one.
///
/// Pass the contributions of a single employee. Several contributions in the
/// same month count once; the walk stops at the first missing month.
pub fn publishing_streak<'a, I>(contributions: I) -> u32
where
    I: IntoIterator<Item = &'a Contribution>,
{
    let months = published_months(contributions);
    let mut iter = months.iter().rev();
    let Some(mut current) = iter.next().copied() else {
        return 0;
    };

    let mut streak = 1;
    for &month in iter {
        if current.months_since(month) != 1 {
            break;
        }
        streak += 1;
        current = month;
    }
    streak
}
