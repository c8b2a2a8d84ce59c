use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::super::contributions::{ContributionRepository, RepositoryError};
use super::super::domain::MonthKey;
use super::super::roster::Roster;
use super::comeback::{find_comebacks, Comeback};
use super::counts::{year_to_date, GoalProgress};
use super::dashboard::{build_dashboard, build_history, DashboardView, MonthHistoryEntry};
use super::leaderboard::{Leaderboard, LeaderboardEntry, Standings};

#[derive(Debug, Clone, Serialize)]
pub struct HistoryView {
    pub year: i32,
    /// Only present for the current year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_to_date: Option<GoalProgress>,
    pub months: Vec<MonthHistoryEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardView {
    pub year: i32,
    pub entries: Vec<LeaderboardEntry>,
    pub standings: Standings,
    pub comebacks: Vec<Comeback>,
}

/// Read-only views over a fresh snapshot of the store.
pub struct StatsService<R> {
    repository: Arc<R>,
    roster: Arc<Roster>,
}

impl<R> StatsService<R>
where
    R: ContributionRepository + 'static,
{
    pub fn new(repository: Arc<R>, roster: Arc<Roster>) -> Self {
        Self { repository, roster }
    }

    pub fn dashboard(&self, month: MonthKey) -> Result<DashboardView, RepositoryError> {
        let contributions = self.repository.list()?;
        Ok(build_dashboard(&self.roster, &contributions, month))
    }

    pub fn history(&self, year: i32, today: NaiveDate) -> Result<HistoryView, RepositoryError> {
        let contributions = self.repository.list()?;
        let year_to_date = (year == today.year())
            .then(|| year_to_date(&contributions, self.roster.len(), today));
        Ok(HistoryView {
            year,
            year_to_date,
            months: build_history(&self.roster, &contributions, year, today),
        })
    }

    /// Ranking for `year`; comebacks are reported for the month of `today`
    /// when it falls in that year.
    pub fn leaderboard(&self, year: i32, today: NaiveDate) -> Result<LeaderboardView, RepositoryError> {
        let contributions = self.repository.list()?;
        let board = Leaderboard::build(&self.roster, &contributions, year);
        let comebacks = if today.year() == year {
            find_comebacks(&self.roster, &contributions, MonthKey::from_date(today))
        } else {
            Vec::new()
        };

        Ok(LeaderboardView {
            year,
            standings: board.standings(),
            entries: board.entries,
            comebacks,
        })
    }
}
