use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use super::mailer::{Mailer, OutgoingEmail};
use super::schedule::Schedule;
use super::templates::{self, RenderedEmail};
use crate::config::MailConfig;
use crate::tracker::contributions::{ContributionRepository, RepositoryError};
use crate::tracker::domain::{Contribution, MonthKey};
use crate::tracker::roster::{Employee, Roster};
use crate::tracker::stats::{
    find_comebacks, month_progress, published_count, publishing_streak, year_to_date,
    Leaderboard, Period,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    Reminder,
    TeamStatus,
    PublicationNotice,
    LaunchAnnouncement,
    GentleNudge,
}

impl JobKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Reminder => "reminder",
            Self::TeamStatus => "team status",
            Self::PublicationNotice => "publication notice",
            Self::LaunchAnnouncement => "launch announcement",
            Self::GentleNudge => "gentle nudge",
        }
    }
}

/// Parameters shared by the scheduled jobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledRun {
    /// Run even when `today` is outside the job's schedule.
    pub force: bool,
    /// Send only to this address instead of the usual recipients.
    pub email: Option<String>,
    pub today: NaiveDate,
}

impl ScheduledRun {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            force: false,
            email: None,
            today,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryResult {
    pub email: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum JobOutcome {
    Skipped { reason: String },
    Dispatched {
        job: JobKind,
        deliveries: Vec<DeliveryResult>,
    },
}

impl JobOutcome {
    fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }

    /// True when a dispatched job reached nobody.
    pub fn all_failed(&self) -> bool {
        match self {
            Self::Skipped { .. } => false,
            Self::Dispatched { deliveries, .. } => {
                !deliveries.is_empty() && deliveries.iter().all(|d| !d.success)
            }
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Skipped { reason } => format!("Skipped: {reason}"),
            Self::Dispatched { job, deliveries } => {
                let sent = deliveries.iter().filter(|d| d.success).count();
                format!("{} sent to {sent} of {} recipients", job.label(), deliveries.len())
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("{0} is not on the team roster")]
    UnknownRecipient(String),
    #[error("an email address is required")]
    MissingRecipient,
}

/// Builds and sends the reminder, report, and announcement e-mails.
pub struct NotificationJobs<R, M> {
    repository: Arc<R>,
    mailer: Arc<M>,
    roster: Arc<Roster>,
    mail: MailConfig,
}

impl<R, M> NotificationJobs<R, M>
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

    /// Personal reminder with each employee's yearly count and streak.
    ///
    /// Runs on the first and last Tuesday of the month. With `run.email` set
    /// only that roster member is reminded.
    pub fn send_reminders(&self, run: &ScheduledRun) -> Result<JobOutcome, JobError> {
        if let Some(skip) = self.gate(Schedule::FirstOrLastTuesday, run) {
            return Ok(skip);
        }

        let recipients: Vec<&Employee> = match run.email.as_deref() {
            Some(email) => vec![self
                .roster
                .by_email(email)
                .ok_or_else(|| JobError::UnknownRecipient(email.to_string()))?],
            None => self.roster.employees().iter().collect(),
        };

        let contributions = self.repository.list()?;
        let month = MonthKey::from_date(run.today);
        let deliveries = recipients
            .into_iter()
            .map(|employee| {
                let own: Vec<&Contribution> = contributions
                    .iter()
                    .filter(|c| c.employee_id == employee.id)
                    .collect();
                let yearly = published_count(own.iter().copied(), Period::Year(month.year()));
                let streak = publishing_streak(own.iter().copied());
                let rendered = templates::reminder(&employee.name, month, yearly, streak, &self.mail);
                self.send(&employee.email, rendered)
            })
            .collect();

        Ok(self.dispatched(JobKind::Reminder, deliveries))
    }

    /// Team progress report, sent to the team lead on the first Tuesday.
    /// An explicit recipient must be on the roster.
    pub fn send_team_status(&self, run: &ScheduledRun) -> Result<JobOutcome, JobError> {
        if let Some(skip) = self.gate(Schedule::FirstTuesday, run) {
            return Ok(skip);
        }
        let recipient = match run.email.as_deref() {
            Some(email) => self
                .roster
                .by_email(email)
                .map(|employee| employee.email.clone())
                .ok_or_else(|| JobError::UnknownRecipient(email.to_string()))?,
            None => self.mail.team_lead.clone(),
        };

        let contributions = self.repository.list()?;
        let month = MonthKey::from_date(run.today);
        let team_size = self.roster.len();
        let standings = Leaderboard::build(&self.roster, &contributions, month.year()).standings();
        let comebacks = find_comebacks(&self.roster, &contributions, month);

        let rendered = templates::team_status(
            month,
            year_to_date(&contributions, team_size, run.today),
            month_progress(&contributions, team_size, month),
            &standings,
            &comebacks,
            Schedule::FirstTuesday.is_due(run.today),
            &self.mail,
        );
        let delivery = self.send(&recipient, rendered);

        Ok(self.dispatched(JobKind::TeamStatus, vec![delivery]))
    }

    /// Tell the team lead that something was just published.
    pub fn notify_publication(&self, title: Option<&str>) -> JobOutcome {
        if !self.mail.enabled {
            return JobOutcome::skipped("mail delivery disabled");
        }
        let title = title.map(str::trim).filter(|t| !t.is_empty());
        let rendered = templates::publication_notice(title, None, &self.mail);
        let delivery = self.send(&self.mail.team_lead, rendered);
        self.dispatched(JobKind::PublicationNotice, vec![delivery])
    }

    /// One-off announcement to a single address. Sending to the whole team
    /// from this endpoint is refused.
    pub fn send_launch(&self, email: Option<&str>, send_to_all: bool) -> Result<JobOutcome, JobError> {
        if send_to_all {
            return Ok(JobOutcome::skipped("bulk send disabled"));
        }
        let email = email
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or(JobError::MissingRecipient)?;
        if !self.mail.enabled {
            return Ok(JobOutcome::skipped("mail delivery disabled"));
        }

        let delivery = self.send(email, templates::launch_announcement(&self.mail));
        Ok(self.dispatched(JobKind::LaunchAnnouncement, vec![delivery]))
    }

    /// Test message for the gentle nudge. Defaults to the team lead.
    pub fn send_nudge(&self, email: Option<&str>, today: NaiveDate) -> Result<JobOutcome, JobError> {
        if !self.mail.enabled {
            return Ok(JobOutcome::skipped("mail delivery disabled"));
        }
        let email = email
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .unwrap_or(&self.mail.team_lead);

        let employee = self.roster.by_email(email);
        let (yearly, streak) = match employee {
            Some(employee) => {
                let own = self.repository.list_for_employee(employee.id)?;
                (
                    published_count(&own, Period::Year(MonthKey::from_date(today).year())),
                    publishing_streak(&own),
                )
            }
            None => (0, 0),
        };

        let rendered = templates::gentle_nudge(
            employee.map(|e| e.name.as_str()),
            yearly,
            streak,
            &self.mail,
        );
        let delivery = self.send(email, rendered);
        Ok(self.dispatched(JobKind::GentleNudge, vec![delivery]))
    }

    fn gate(&self, schedule: Schedule, run: &ScheduledRun) -> Option<JobOutcome> {
        if !run.force && !schedule.is_due(run.today) {
            return Some(JobOutcome::skipped(format!(
                "only runs on {}",
                schedule.describe()
            )));
        }
        if !self.mail.enabled {
            return Some(JobOutcome::skipped("mail delivery disabled"));
        }
        None
    }

    fn send(&self, to: &str, rendered: RenderedEmail) -> DeliveryResult {
        let email = OutgoingEmail::compose(&self.mail, to, rendered);
        match self.mailer.deliver(&email) {
            Ok(receipt) => DeliveryResult {
                email: email.to,
                success: true,
                message_id: Some(receipt.message_id),
                error: None,
            },
            Err(err) => {
                warn!(to = %email.to, error = %err, "email delivery failed");
                DeliveryResult {
                    email: email.to,
                    success: false,
                    message_id: None,
                    error: Some(err.to_string()),
                }
            }
        }
    }

    fn dispatched(&self, job: JobKind, deliveries: Vec<DeliveryResult>) -> JobOutcome {
        let sent = deliveries.iter().filter(|d| d.success).count();
        info!(
            job = job.label(),
            sent,
            failed = deliveries.len() - sent,
            "notification job finished"
        );
        JobOutcome::Dispatched { job, deliveries }
    }
}
