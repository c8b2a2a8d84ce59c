use serde::Serialize;

use super::super::domain::{Contribution, EmployeeId, MonthKey};
use super::super::roster::Roster;
use super::streak::published_months;

/// Publishing again after more than this many months counts as a comeback.
pub const COMEBACK_GAP_MONTHS: i64 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comeback {
    pub employee_id: EmployeeId,
    pub name: String,
    pub months_away: i64,
    pub previous_month: MonthKey,
}

/// Months between `current` and the latest earlier published month.
///
/// `None` unless the employee published in `current` and has published
/// before it.
pub fn months_since_previous<'a, I>(contributions: I, current: MonthKey) -> Option<(i64, MonthKey)>
where
    I: IntoIterator<Item = &'a Contribution>,
{
    let months = published_months(contributions);
    if !months.contains(&current) {
        return None;
    }
    let previous = months.range(..current).next_back().copied()?;
    Some((current.months_since(previous), previous))
}

pub fn is_comeback<'a, I>(contributions: I, current: MonthKey) -> bool
where
    I: IntoIterator<Item = &'a Contribution>,
{
    months_since_previous(contributions, current)
        .is_some_and(|(gap, _)| gap > COMEBACK_GAP_MONTHS)
}

/// Honorable mentions for `current`, in roster order.
pub fn find_comebacks(roster: &Roster, contributions: &[Contribution], current: MonthKey) -> Vec<Comeback> {
    roster
        .employees()
        .iter()
        .filter_map(|employee| {
            let own = contributions
                .iter()
                .filter(|c| c.employee_id == employee.id);
            let (gap, previous) = months_since_previous(own, current)?;
            (gap > COMEBACK_GAP_MONTHS).then(|| Comeback {
                employee_id: employee.id,
                name: employee.name.clone(),
                months_away: gap,
                previous_month: previous,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::domain::{ContributionId, ContributionKind, ContributionStatus};
    use chrono::NaiveDate;

    fn entry(employee: u32, date: &str, status: ContributionStatus) -> Contribution {
        Contribution {
            id: ContributionId(format!("{employee}-{date}")),
            employee_id: EmployeeId(employee),
            title: "Article".to_string(),
            kind: ContributionKind::Insight,
            status,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("valid date"),
        }
    }

    fn published(employee: u32, date: &str) -> Contribution {
        entry(employee, date, ContributionStatus::Published)
    }

    fn may_2026() -> MonthKey {
        MonthKey::new(2026, 5).expect("valid")
    }

    #[test]
    fn first_contribution_ever_is_not_a_comeback() {
        assert!(!is_comeback(&[published(1, "2026-05-04")], may_2026()));
    }

    #[test]
    fn gap_of_exactly_three_months_is_not_a_comeback() {
        let list = vec![published(1, "2026-02-10"), published(1, "2026-05-04")];
        assert_eq!(
            months_since_previous(&list, may_2026()).map(|(gap, _)| gap),
            Some(3)
        );
        assert!(!is_comeback(&list, may_2026()));
    }

    #[test]
    fn gap_over_three_months_is_a_comeback() {
        let list = vec![published(1, "2026-01-31"), published(1, "2026-05-04")];
        assert!(is_comeback(&list, may_2026()));
    }

    #[test]
    fn requires_publication_in_current_month() {
        let list = vec![
            published(1, "2025-10-10"),
            entry(1, "2026-05-04", ContributionStatus::Draft),
        ];
        assert!(!is_comeback(&list, may_2026()));
    }

    #[test]
    fn only_published_history_counts() {
        let list = vec![
            entry(1, "2025-10-10", ContributionStatus::Draft),
            published(1, "2026-05-04"),
        ];
        assert!(!is_comeback(&list, may_2026()));
    }

    #[test]
    fn uses_most_recent_prior_month() {
        let list = vec![
            published(1, "2025-01-10"),
            published(1, "2026-04-10"),
            published(1, "2026-05-04"),
        ];
        assert!(!is_comeback(&list, may_2026()));
    }

    #[test]
    fn find_comebacks_reports_each_returning_employee() {
        let roster = Roster::team();
        let list = vec![
            published(1, "2025-11-03"),
            published(1, "2026-05-04"),
            published(4, "2026-04-03"),
            published(4, "2026-05-05"),
            published(6, "2026-05-06"),
        ];
        let mentions = find_comebacks(&roster, &list, may_2026());
        assert_eq!(mentions.len(), 1);
        assert_eq!(mentions[0].employee_id, EmployeeId(1));
        assert_eq!(mentions[0].months_away, 6);
        assert_eq!(mentions[0].previous_month.to_string(), "2025-11");
    }
}
