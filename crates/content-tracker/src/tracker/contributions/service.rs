use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use super::super::domain::{Contribution, ContributionError, ContributionId, NewContribution};
use super::super::roster::Roster;
use super::repository::{ContributionRepository, RepositoryError};
use crate::config::MailConfig;
use crate::notifications::{templates, Mailer, OutgoingEmail};

/// Service composing roster validation, storage, and the publication notice.
pub struct ContributionService<R, M> {
    repository: Arc<R>,
    mailer: Arc<M>,
    roster: Arc<Roster>,
    mail: MailConfig,
}

impl<R, M> ContributionService<R, M>
where
    R: ContributionRepository + 'static,
    M: Mailer + 'static,
{
    pub fn new(repository: Arc<R>, mailer: Arc<M>, roster: Arc<Roster>, mail: MailConfig) -> Self {
        Self {
            repository,
            mailer,
            roster,
            mail,
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn list(&self) -> Result<Vec<Contribution>, ContributionServiceError> {
        Ok(self.repository.list()?)
    }

    /// Validate and store a new contribution.
    ///
    /// A contribution created as published also notifies the team lead; a
    /// failed notice is logged and does not fail the create.
    pub fn create(
        &self,
        submission: NewContribution,
        today: NaiveDate,
    ) -> Result<Contribution, ContributionServiceError> {
        let contribution = submission.validate(&self.roster, today)?;
        let stored = self.repository.insert(contribution)?;

        info!(
            id = %stored.id,
            employee_id = %stored.employee_id,
            status = stored.status.label(),
            "contribution recorded"
        );

        if stored.is_published() {
            self.announce_publication(&stored);
        }

        Ok(stored)
    }

    pub fn delete(&self, id: &ContributionId) -> Result<(), ContributionServiceError> {
        self.repository.delete(id)?;
        info!(%id, "contribution deleted");
        Ok(())
    }

    fn announce_publication(&self, contribution: &Contribution) {
        if !self.mail.enabled {
            return;
        }

        let author = self.roster.get(contribution.employee_id).map(|e| e.name.as_str());
        let rendered =
            templates::publication_notice(Some(contribution.title.as_str()), author, &self.mail);
        let email = OutgoingEmail::compose(&self.mail, &self.mail.team_lead, rendered);

        if let Err(err) = self.mailer.deliver(&email) {
            warn!(id = %contribution.id, error = %err, "publication notice not delivered");
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ContributionServiceError {
    #[error(transparent)]
    Invalid(#[from] ContributionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
