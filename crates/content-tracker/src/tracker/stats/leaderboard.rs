use serde::Serialize;

use super::super::domain::{Contribution, EmployeeId};
use super::super::roster::Roster;
use super::counts::{published_count, Period};

const PODIUM_SIZE: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub employee_id: EmployeeId,
    pub name: String,
    pub published: usize,
}

/// Yearly published counts for the whole roster, best first.
#[derive(Debug, Clone, Serialize)]
pub struct Leaderboard {
    pub year: i32,
    pub entries: Vec<LeaderboardEntry>,
}

/// How the top of the leaderboard should be announced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Standings {
    /// Nobody has published this year.
    NoPublications,
    /// Several employees share the top count.
    Tied {
        published: usize,
        leaders: Vec<LeaderboardEntry>,
    },
    /// A single leader followed by up to two runners-up.
    Podium { entries: Vec<LeaderboardEntry> },
}

impl Leaderboard {
    pub fn build(roster: &Roster, contributions: &[Contribution], year: i32) -> Self {
        let mut counted: Vec<(EmployeeId, String, usize)> = roster
            .employees()
            .iter()
            .map(|employee| {
                let own = contributions
                    .iter()
                    .filter(|c| c.employee_id == employee.id);
                (
                    employee.id,
                    employee.name.clone(),
                    published_count(own, Period::Year(year)),
                )
            })
            .collect();

        // stable: equal counts keep roster order
        counted.sort_by(|a, b| b.2.cmp(&a.2));

        let mut entries = Vec::with_capacity(counted.len());
        let mut previous: Option<(usize, usize)> = None;
        for (index, (employee_id, name, published)) in counted.into_iter().enumerate() {
            let rank = match previous {
                Some((count, rank)) if count == published => rank,
                _ => index + 1,
            };
            previous = Some((published, rank));
            entries.push(LeaderboardEntry {
                rank,
                employee_id,
                name,
                published,
            });
        }

        Self { year, entries }
    }

    pub fn top_count(&self) -> usize {
        self.entries.first().map_or(0, |entry| entry.published)
    }

    pub fn standings(&self) -> Standings {
        let top = self.top_count();
        if top == 0 {
            return Standings::NoPublications;
        }

        let leaders: Vec<LeaderboardEntry> = self
            .entries
            .iter()
            .filter(|entry| entry.published == top)
            .cloned()
            .collect();

        if leaders.len() > 1 {
            return Standings::Tied {
                published: top,
                leaders,
            };
        }

        let entries = self
            .entries
            .iter()
            .filter(|entry| entry.published > 0)
            .take(PODIUM_SIZE)
            .cloned()
            .collect();
        Standings::Podium { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::domain::{ContributionId, ContributionKind, ContributionStatus};
    use crate::tracker::roster::Employee;
    use chrono::NaiveDate;

    fn roster(size: u32) -> Roster {
        Roster::new(
            (1..=size)
                .map(|id| Employee {
                    id: EmployeeId(id),
                    name: format!("Employee {id}"),
                    role: String::new(),
                    email: format!("e{id}@example.com"),
                })
                .collect(),
        )
    }

    fn published_by(counts: &[usize]) -> Vec<Contribution> {
        let mut list = Vec::new();
        for (index, count) in counts.iter().enumerate() {
            for n in 0..*count {
                list.push(Contribution {
                    id: ContributionId(format!("{index}-{n}")),
                    employee_id: EmployeeId(index as u32 + 1),
                    title: "Story".to_string(),
                    kind: ContributionKind::Insight,
                    status: ContributionStatus::Published,
                    date: NaiveDate::from_ymd_opt(2026, (n % 12) as u32 + 1, 10)
                        .expect("valid date"),
                });
            }
        }
        list
    }

    #[test]
    fn shared_maximum_is_a_tie() {
        let board = Leaderboard::build(&roster(3), &published_by(&[5, 5, 3]), 2026);
        match board.standings() {
            Standings::Tied { published, leaders } => {
                assert_eq!(published, 5);
                let ids: Vec<_> = leaders.iter().map(|l| l.employee_id).collect();
                assert_eq!(ids, vec![EmployeeId(1), EmployeeId(2)]);
                assert!(leaders.iter().all(|l| l.rank == 1));
            }
            other => panic!("expected tie, got {other:?}"),
        }
    }

    #[test]
    fn single_leader_gets_ranked_podium() {
        let board = Leaderboard::build(&roster(4), &published_by(&[3, 5, 3, 1]), 2026);
        match board.standings() {
            Standings::Podium { entries } => {
                let summary: Vec<_> = entries
                    .iter()
                    .map(|e| (e.employee_id.0, e.published, e.rank))
                    .collect();
                assert_eq!(summary, vec![(2, 5, 1), (1, 3, 2), (3, 3, 2)]);
            }
            other => panic!("expected podium, got {other:?}"),
        }
    }

    #[test]
    fn podium_skips_employees_without_publications() {
        let board = Leaderboard::build(&roster(3), &published_by(&[0, 2, 0]), 2026);
        match board.standings() {
            Standings::Podium { entries } => {
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].employee_id, EmployeeId(2));
            }
            other => panic!("expected podium, got {other:?}"),
        }
    }

    #[test]
    fn zero_counts_are_not_a_tie() {
        let board = Leaderboard::build(&roster(3), &[], 2026);
        assert_eq!(board.standings(), Standings::NoPublications);
        assert_eq!(board.entries.len(), 3);
    }

    #[test]
    fn other_years_are_ignored() {
        let board = Leaderboard::build(&roster(2), &published_by(&[2, 1]), 2025);
        assert_eq!(board.top_count(), 0);
    }
}
