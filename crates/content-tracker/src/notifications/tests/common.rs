use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::config::MailConfig;
use crate::notifications::jobs::{NotificationJobs, ScheduledRun};
use crate::notifications::mailer::{DeliveryReceipt, MailError, Mailer, OutgoingEmail};
use crate::tracker::contributions::{
    ContributionRepository, InMemoryContributionRepository, RepositoryError,
};
use crate::tracker::domain::{
    Contribution, ContributionId, ContributionKind, ContributionStatus, EmployeeId,
};
use crate::tracker::roster::Roster;

pub(super) fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// First Tuesday of March 2026.
pub(super) fn first_tuesday() -> NaiveDate {
    day(2026, 3, 3)
}

/// Last Tuesday of March 2026.
pub(super) fn last_tuesday() -> NaiveDate {
    day(2026, 3, 31)
}

pub(super) fn off_schedule() -> NaiveDate {
    day(2026, 3, 18)
}

pub(super) fn run(today: NaiveDate) -> ScheduledRun {
    ScheduledRun::new(today)
}

pub(super) fn published(employee: u32, date: NaiveDate) -> Contribution {
    Contribution {
        id: ContributionId(format!("{employee}-{date}")),
        employee_id: EmployeeId(employee),
        title: "Why we test".to_string(),
        kind: ContributionKind::Insight,
        status: ContributionStatus::Published,
        date,
    }
}

pub(super) fn history() -> Vec<Contribution> {
    vec![
        published(6, day(2026, 1, 12)),
        published(6, day(2026, 2, 9)),
        published(6, day(2026, 3, 2)),
        published(1, day(2025, 10, 20)),
        published(1, day(2026, 3, 2)),
    ]
}

pub(super) fn build_jobs(
    records: Vec<Contribution>,
) -> (
    NotificationJobs<InMemoryContributionRepository, MemoryMailer>,
    Arc<MemoryMailer>,
) {
    let repository = Arc::new(InMemoryContributionRepository::with_records(records));
    let mailer = Arc::new(MemoryMailer::default());
    let jobs = NotificationJobs::new(
        repository,
        mailer.clone(),
        Arc::new(Roster::team()),
        MailConfig::default(),
    );
    (jobs, mailer)
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
        let mut guard = self.sent.lock().expect("mailer mutex poisoned");
        guard.push(email.clone());
        Ok(DeliveryReceipt {
            message_id: format!("msg-{}", guard.len()),
        })
    }
}

pub(super) struct OfflineMailer;

impl Mailer for OfflineMailer {
    fn deliver(&self, _email: &OutgoingEmail) -> Result<DeliveryReceipt, MailError> {
        Err(MailError::Transport("smtp relay offline".to_string()))
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

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
