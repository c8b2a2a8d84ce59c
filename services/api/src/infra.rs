use chrono::NaiveDate;
use content_tracker::tracker::contributions::{
    ContributionRepository, InMemoryContributionRepository, RepositoryError,
    SqliteContributionRepository,
};
use content_tracker::tracker::{
    Contribution, ContributionId, ContributionKind, ContributionStatus, EmployeeId, MonthKey,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Backing store picked at startup.
pub(crate) enum ContributionStore {
    Sqlite(SqliteContributionRepository),
    Memory(InMemoryContributionRepository),
}

impl ContributionStore {
    /// Open the SQLite file when a path is given, otherwise fall back to a
    /// seeded in-memory store.
    pub(crate) fn open(path: Option<&Path>) -> Result<Self, RepositoryError> {
        match path {
            Some(path) => Ok(Self::Sqlite(SqliteContributionRepository::open(path)?)),
            None => {
                info!("no database configured; using seeded in-memory store");
                Ok(Self::Memory(InMemoryContributionRepository::with_records(
                    seed_contributions(),
                )))
            }
        }
    }

    pub(crate) fn is_persistent(&self) -> bool {
        matches!(self, Self::Sqlite(_))
    }
}

impl ContributionRepository for ContributionStore {
    fn list(&self) -> Result<Vec<Contribution>, RepositoryError> {
        match self {
            Self::Sqlite(store) => store.list(),
            Self::Memory(store) => store.list(),
        }
    }

    fn insert(&self, contribution: Contribution) -> Result<Contribution, RepositoryError> {
        match self {
            Self::Sqlite(store) => store.insert(contribution),
            Self::Memory(store) => store.insert(contribution),
        }
    }

    fn insert_all(&self, contributions: Vec<Contribution>) -> Result<usize, RepositoryError> {
        match self {
            Self::Sqlite(store) => store.insert_all(contributions),
            Self::Memory(store) => store.insert_all(contributions),
        }
    }

    fn delete(&self, id: &ContributionId) -> Result<(), RepositoryError> {
        match self {
            Self::Sqlite(store) => store.delete(id),
            Self::Memory(store) => store.delete(id),
        }
    }
}

/// Sample contributions for the in-memory store.
pub(crate) fn seed_contributions() -> Vec<Contribution> {
    [
        ("1", 6, "Q4 Roadmap", ContributionKind::Insight, ContributionStatus::Published, (2026, 1, 15)),
        ("2", 6, "Tech Radar 2026", ContributionKind::Insight, ContributionStatus::Published, (2026, 1, 20)),
        ("3", 1, "Next.js 15 Migration Guide", ContributionKind::Insight, ContributionStatus::Published, (2026, 1, 5)),
        ("4", 4, "Design System Updates", ContributionKind::Insight, ContributionStatus::Published, (2026, 1, 12)),
        ("5", 3, "User Research Q1", ContributionKind::Other, ContributionStatus::Draft, (2026, 1, 25)),
    ]
    .into_iter()
    .filter_map(|(id, employee, title, kind, status, (y, m, d))| {
        Some(Contribution {
            id: ContributionId(id.to_string()),
            employee_id: EmployeeId(employee),
            title: title.to_string(),
            kind,
            status,
            date: NaiveDate::from_ymd_opt(y, m, d)?,
        })
    })
    .collect()
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_month(raw: &str) -> Result<MonthKey, String> {
    raw.trim().parse::<MonthKey>().map_err(|err| err.to_string())
}

pub(crate) fn parse_kind(raw: &str) -> Result<ContributionKind, String> {
    raw.parse::<ContributionKind>().map_err(|err| err.to_string())
}

pub(crate) fn parse_status(raw: &str) -> Result<ContributionStatus, String> {
    raw.parse::<ContributionStatus>().map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_store_is_not_persistent() {
        let store = ContributionStore::open(None).expect("memory store");
        assert!(!store.is_persistent());
        assert_eq!(store.list().expect("list").len(), seed_contributions().len());
    }

    #[test]
    fn sqlite_store_opens_at_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = ContributionStore::open(Some(&dir.path().join("store.db"))).expect("sqlite");
        assert!(store.is_persistent());
        assert!(store.list().expect("list").is_empty());
    }

    #[test]
    fn cli_parsers_reject_garbage() {
        assert!(parse_date("2026-02-30").is_err());
        assert!(parse_month("2026-00").is_err());
        assert_eq!(parse_kind("Kundehistorie"), Ok(ContributionKind::CustomerStory));
        assert_eq!(parse_status("In Review"), Ok(ContributionStatus::InReview));
    }
}
