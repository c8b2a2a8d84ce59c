use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;

use super::super::domain::{Contribution, ContributionId, EmployeeId};

/// Storage abstraction so services and routes can be exercised in isolation.
pub trait ContributionRepository: Send + Sync {
    /// All contributions, newest date first.
    fn list(&self) -> Result<Vec<Contribution>, RepositoryError>;
    fn insert(&self, contribution: Contribution) -> Result<Contribution, RepositoryError>;
    fn delete(&self, id: &ContributionId) -> Result<(), RepositoryError>;

    fn list_for_employee(&self, employee_id: EmployeeId) -> Result<Vec<Contribution>, RepositoryError> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|c| c.employee_id == employee_id)
            .collect())
    }

    /// Insert a batch atomically: a conflicting id anywhere in the batch
    /// leaves the store untouched.
    fn insert_all(&self, contributions: Vec<Contribution>) -> Result<usize, RepositoryError> {
        let existing: HashSet<ContributionId> = self.list()?.into_iter().map(|c| c.id).collect();
        ensure_unique(&existing, &contributions)?;
        let total = contributions.len();
        for contribution in contributions {
            self.insert(contribution)?;
        }
        Ok(total)
    }
}

/// Rejects a batch that repeats an id or reuses one already stored.
pub(crate) fn ensure_unique(
    existing: &HashSet<ContributionId>,
    batch: &[Contribution],
) -> Result<(), RepositoryError> {
    let mut seen = HashSet::with_capacity(batch.len());
    for contribution in batch {
        if existing.contains(&contribution.id) || !seen.insert(&contribution.id) {
            return Err(RepositoryError::Conflict);
        }
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("contribution already exists")]
    Conflict,
    #[error("contribution not found")]
    NotFound,
    #[error("invalid stored contribution: {0}")]
    InvalidData(String),
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

impl RepositoryError {
    /// HTTP status used by every router that surfaces store failures.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RepositoryError::Conflict => StatusCode::CONFLICT,
            RepositoryError::NotFound => StatusCode::NOT_FOUND,
            RepositoryError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            RepositoryError::InvalidData(_) | RepositoryError::Sqlite(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Process-local store; contents are lost on restart.
#[derive(Debug, Default, Clone)]
pub struct InMemoryContributionRepository {
    records: Arc<Mutex<Vec<Contribution>>>,
}

impl InMemoryContributionRepository {
    pub fn with_records(records: Vec<Contribution>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }
}

impl ContributionRepository for InMemoryContributionRepository {
    fn list(&self) -> Result<Vec<Contribution>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records = guard.clone();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(records)
    }

    fn insert(&self, contribution: Contribution) -> Result<Contribution, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.iter().any(|c| c.id == contribution.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(contribution.clone());
        Ok(contribution)
    }

    fn insert_all(&self, contributions: Vec<Contribution>) -> Result<usize, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let existing: HashSet<ContributionId> = guard.iter().map(|c| c.id.clone()).collect();
        ensure_unique(&existing, &contributions)?;
        let total = contributions.len();
        guard.extend(contributions);
        Ok(total)
    }

    fn delete(&self, id: &ContributionId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let before = guard.len();
        guard.retain(|c| &c.id != id);
        if guard.len() == before {
            Err(RepositoryError::NotFound)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::domain::{ContributionKind, ContributionStatus};
    use chrono::NaiveDate;

    fn contribution(id: &str) -> Contribution {
        Contribution {
            id: ContributionId(id.to_string()),
            employee_id: EmployeeId(4),
            title: format!("Title {id}"),
            kind: ContributionKind::Other,
            status: ContributionStatus::Draft,
            date: NaiveDate::from_ymd_opt(2026, 2, 14).expect("valid date"),
        }
    }

    #[test]
    fn batch_insert_is_all_or_nothing() {
        let repo = InMemoryContributionRepository::with_records(vec![contribution("a")]);

        assert!(matches!(
            repo.insert_all(vec![contribution("b"), contribution("a")]),
            Err(RepositoryError::Conflict)
        ));
        assert!(matches!(
            repo.insert_all(vec![contribution("c"), contribution("c")]),
            Err(RepositoryError::Conflict)
        ));
        assert_eq!(repo.list().expect("list").len(), 1);

        assert_eq!(
            repo.insert_all(vec![contribution("b"), contribution("c")])
                .expect("fresh ids"),
            2
        );
        assert_eq!(repo.list().expect("list").len(), 3);
    }

    #[test]
    fn unavailable_store_maps_to_service_unavailable() {
        assert_eq!(
            RepositoryError::Unavailable("offline".to_string()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(RepositoryError::Conflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            RepositoryError::InvalidData("row".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
