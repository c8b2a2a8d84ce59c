use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::config::MailConfig;
use crate::notifications::{DeliveryReceipt, MailError, Mailer, OutgoingEmail};
use crate::tracker::contributions::repository::{ContributionRepository, RepositoryError};
use crate::tracker::contributions::{contribution_router, ContributionService};
use crate::tracker::domain::{
    Contribution, ContributionId, ContributionKind, ContributionStatus, EmployeeId,
    NewContribution,
};
use crate::tracker::roster::Roster;

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 12).expect("valid date")
}

pub(super) fn submission(status: ContributionStatus) -> NewContribution {
    NewContribution {
        id: None,
        employee_id: EmployeeId(2),
        title: "Observability on a budget".to_string(),
        kind: ContributionKind::Insight,
        status,
        date: Some(NaiveDate::from_ymd_opt(2026, 3, 10).expect("valid date")),
    }
}

pub(super) fn stored(id: &str, date: &str) -> Contribution {
    Contribution {
        id: ContributionId(id.to_string()),
        employee_id: EmployeeId(1),
        title: format!("Entry {id}"),
        kind: ContributionKind::CustomerStory,
        status: ContributionStatus::Published,
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("valid date"),
    }
}

pub(super) fn build_service() -> (
    ContributionService<MemoryRepository, MemoryMailer>,
    Arc<MemoryRepository>,
    Arc<MemoryMailer>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let mailer = Arc::new(MemoryMailer::default());
    let service = ContributionService::new(
        repository.clone(),
        mailer.clone(),
        Arc::new(Roster::team()),
        MailConfig::default(),
    );
    (service, repository, mailer)
}

pub(super) fn service_with<R, M>(repository: R, mailer: M) -> ContributionService<R, M>
where
    R: ContributionRepository + 'static,
    M: Mailer + 'static,
{
    ContributionService::new(
        Arc::new(repository),
        Arc::new(mailer),
        Arc::new(Roster::team()),
        MailConfig::default(),
    )
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<Vec<Contribution>>>,
}

impl MemoryRepository {
    pub(super) fn seeded(records: Vec<Contribution>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }

    pub(super) fn ids(&self) -> Vec<String> {
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .iter()
            .map(|c| c.id.0.clone())
            .collect()
    }
}

impl ContributionRepository for MemoryRepository {
    fn list(&self) -> Result<Vec<Contribution>, RepositoryError> {
        let mut records = self
            .records
            .lock()
            .expect("repository mutex poisoned")
            .clone();
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

    fn delete(&self, id: &ContributionId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let before = guard.len();
        guard.retain(|c| &c.id != id);
        if guard.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

/// Lists fine but refuses every write.
pub(super) struct ReadOnlyRepository {
    pub(super) records: Vec<Contribution>,
}

impl ContributionRepository for ReadOnlyRepository {
    fn list(&self) -> Result<Vec<Contribution>, RepositoryError> {
        Ok(self.records.clone())
    }

    fn insert(&self, _contribution: Contribution) -> Result<Contribution, RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn delete(&self, _id: &ContributionId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }
}

pub(super) struct UnavailableRepository;

impl ContributionRepository for UnavailableRepository {
    fn list(&self) -> Result<Vec<Contribution>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert(&self, _contribution: Contribution) -> Result<Contribution, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &ContributionId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryMailer {
    sent: Arc<Mutex<Vec<OutgoingEmail>>>,
}

impl MemoryMailer {
    pub(super) fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().expect("mailer mutex poisoned").clone()
    }
}

impl Mailer for MemoryMailer {
    fn deliver(&self, email: &OutgoingEmail) -> Result<DeliveryReceipt, MailError> {
        self.sent
            .lock()
            .expect("mailer mutex poisoned")
            .push(email.clone());
        Ok(DeliveryReceipt {
            message_id: "test".to_string(),
        })
    }
}

pub(super) struct RejectingMailer;

impl Mailer for RejectingMailer {
    fn deliver(&self, email: &OutgoingEmail) -> Result<DeliveryReceipt, MailError> {
        Err(MailError::Rejected {
            recipient: email.to.clone(),
            reason: "mailbox full".to_string(),
        })
    }
}

pub(super) fn router_with_service(
    service: ContributionService<MemoryRepository, MemoryMailer>,
) -> axum::Router {
    contribution_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
