use chrono::NaiveDate;
use serde::Serialize;

use super::super::domain::{Contribution, EmployeeId, MonthKey};
use super::super::roster::Roster;
use super::counts::{delivered_count, month_progress, published_count, GoalProgress, Period};
use super::streak::publishing_streak;

/// Contributions expected from each employee per month.
pub const MONTHLY_TARGET: usize = 1;

#[derive(Debug, Clone, Serialize)]
pub struct EmployeeCard {
    pub employee_id: EmployeeId,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub role: String,
    pub delivered: usize,
    pub target: usize,
    pub published: usize,
    pub streak: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamProgress {
    pub month: MonthKey,
    pub month_label: &'static str,
    #[serde(flatten)]
    pub progress: GoalProgress,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub month: MonthKey,
    pub team: TeamProgress,
    pub employees: Vec<EmployeeCard>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthHistoryEntry {
    pub month: MonthKey,
    pub month_label: &'static str,
    pub published: usize,
    pub goal: usize,
    pub is_future: bool,
}

/// Per-employee cards and team totals for `month`.
///
/// Cards are ordered by published count for the month's year, highest
/// first; equal counts keep roster order.
pub fn build_dashboard(roster: &Roster, contributions: &[Contribution], month: MonthKey) -> DashboardView {
    let mut employees: Vec<EmployeeCard> = roster
        .employees()
        .iter()
        .map(|employee| {
            let own: Vec<&Contribution> = contributions
                .iter()
                .filter(|c| c.employee_id == employee.id)
                .collect();
            EmployeeCard {
                employee_id: employee.id,
                name: employee.name.clone(),
                role: employee.role.clone(),
                delivered: delivered_count(own.iter().copied(), month),
                target: MONTHLY_TARGET,
                published: published_count(own.iter().copied(), Period::Year(month.year())),
                streak: publishing_streak(own.iter().copied()),
            }
        })
        .collect();
    employees.sort_by(|a, b| b.published.cmp(&a.published));

    DashboardView {
        month,
        team: TeamProgress {
            month,
            month_label: month.name(),
            progress: month_progress(contributions, roster.len() * MONTHLY_TARGET, month),
        },
        employees,
    }
}

/// Published totals for every month of `year`. Months starting after `today`
/// are flagged as future.
pub fn build_history(
    roster: &Roster,
    contributions: &[Contribution],
    year: i32,
    today: NaiveDate,
) -> Vec<MonthHistoryEntry> {
    (1..=12)
        .filter_map(|m| MonthKey::new(year, m))
        .map(|month| MonthHistoryEntry {
            month,
            month_label: month.name(),
            published: published_count(contributions, Period::Month(month)),
            goal: roster.len() * MONTHLY_TARGET,
            is_future: month.first_day() > today,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::domain::{ContributionId, ContributionKind, ContributionStatus};

    fn entry(employee: u32, date: &str, status: ContributionStatus) -> Contribution {
        Contribution {
            id: ContributionId(format!("{employee}-{date}")),
            employee_id: EmployeeId(employee),
            title: "Story".to_string(),
            kind: ContributionKind::CustomerStory,
            status,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("valid date"),
        }
    }

    fn sample() -> Vec<Contribution> {
        vec![
            entry(6, "2026-01-15", ContributionStatus::Published),
            entry(6, "2026-01-20", ContributionStatus::Published),
            entry(6, "2025-12-03", ContributionStatus::Published),
            entry(1, "2026-01-05", ContributionStatus::Published),
            entry(4, "2026-01-12", ContributionStatus::InReview),
            entry(3, "2026-01-25", ContributionStatus::Draft),
        ]
    }

    #[test]
    fn dashboard_orders_cards_by_yearly_published() {
        let january = MonthKey::new(2026, 1).expect("valid");
        let view = build_dashboard(&Roster::team(), &sample(), january);

        assert_eq!(view.employees[0].employee_id, EmployeeId(6));
        assert_eq!(view.employees[0].published, 2);
        assert_eq!(view.employees[0].streak, 2);
        assert_eq!(view.employees[1].employee_id, EmployeeId(1));

        let elisabeth = view
            .employees
            .iter()
            .find(|card| card.employee_id == EmployeeId(4))
            .expect("card present");
        assert_eq!(elisabeth.delivered, 1);
        assert_eq!(elisabeth.published, 0);

        assert_eq!(view.team.progress.published, 3);
        assert_eq!(view.team.progress.goal, 7);
        assert_eq!(view.team.month_label, "January");
    }

    #[test]
    fn history_marks_future_months() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 14).expect("valid");
        let history = build_history(&Roster::team(), &sample(), 2026, today);

        assert_eq!(history.len(), 12);
        assert_eq!(history[0].published, 3);
        assert!(!history[0].is_future);
        assert!(!history[1].is_future);
        assert!(history[2].is_future);
        assert!(history.iter().all(|entry| entry.goal == 7));
    }
}
