//! Outbound e-mail: templates, the transport hook, the schedule, and the jobs
//! that tie them to the contribution statistics.

pub mod jobs;
pub mod mailer;
pub mod router;
pub mod schedule;
pub mod templates;

#[cfg(test)]
mod tests;

pub use jobs::{DeliveryResult, JobError, JobKind, JobOutcome, NotificationJobs, ScheduledRun};
pub use mailer::{DeliveryReceipt, MailError, Mailer, OutgoingEmail, TracingMailer};
pub use router::notification_router;
pub use schedule::Schedule;
pub use templates::RenderedEmail;
