use std::sync::Arc;

use chrono::NaiveDate;
use tracing::warn;

use super::super::domain::{Contribution, ContributionError, ContributionId, NewContribution};
use super::super::roster::Roster;
use super::repository::{ContributionRepository, RepositoryError};

/// Client-side mirror of the contribution store.
///
/// Adds and deletes are applied locally before the backend call and undone
/// if the call fails. There is no locking or conflict detection: the last
/// write wins.
pub struct ContributionLedger<R> {
    backend: Arc<R>,
    entries: Vec<Contribution>,
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error(transparent)]
    Invalid(#[from] ContributionError),
    #[error("backend rejected the change: {0}")]
    Backend(#[from] RepositoryError),
}

impl<R> ContributionLedger<R>
where
    R: ContributionRepository,
{
    pub fn load(backend: Arc<R>) -> Result<Self, LedgerError> {
        let entries = backend.list()?;
        Ok(Self { backend, entries })
    }

    pub fn entries(&self) -> &[Contribution] {
        &self.entries
    }

    pub fn refresh(&mut self) -> Result<(), LedgerError> {
        self.entries = self.backend.list()?;
        Ok(())
    }

    /// Optimistically add a contribution, returning the stored record.
    pub fn add(
        &mut self,
        submission: NewContribution,
        roster: &Roster,
        today: NaiveDate,
    ) -> Result<Contribution, LedgerError> {
        let contribution = submission.validate(roster, today)?;
        let temp_id = ContributionId(format!("pending-{}", ContributionId::generate()));
        let optimistic = Contribution {
            id: temp_id.clone(),
            ..contribution.clone()
        };
        self.entries.insert(0, optimistic);

        match self.backend.insert(contribution) {
            Ok(saved) => {
                if let Some(slot) = self.entries.iter_mut().find(|c| c.id == temp_id) {
                    *slot = saved.clone();
                }
                Ok(saved)
            }
            Err(err) => {
                warn!(error = %err, "rolling back optimistic add");
                self.entries.retain(|c| c.id != temp_id);
                Err(err.into())
            }
        }
    }

    /// Optimistically remove a contribution, restoring the list on failure.
    pub fn remove(&mut self, id: &ContributionId) -> Result<(), LedgerError> {
        let previous = self.entries.clone();
        self.entries.retain(|c| &c.id != id);

        if let Err(err) = self.backend.delete(id) {
            warn!(%id, error = %err, "rolling back optimistic delete");
            self.entries = previous;
            return Err(err.into());
        }
        Ok(())
    }
}
