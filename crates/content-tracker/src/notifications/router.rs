use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::jobs::{JobError, JobOutcome, NotificationJobs, ScheduledRun};
use super::mailer::Mailer;
use crate::tracker::contributions::ContributionRepository;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ScheduledQuery {
    #[serde(default)]
    pub(crate) force: Option<String>,
    #[serde(default)]
    pub(crate) email: Option<String>,
    #[serde(default)]
    pub(crate) today: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LaunchQuery {
    #[serde(default)]
    pub(crate) email: Option<String>,
    #[serde(default, rename = "sendToAll")]
    pub(crate) send_to_all: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PublicationRequest {
    #[serde(default)]
    pub(crate) title: Option<String>,
}

/// Router for the scheduled jobs and the one-off e-mails.
pub fn notification_router<R, M>(jobs: Arc<NotificationJobs<R, M>>) -> Router
where
    R: ContributionRepository + 'static,
    M: Mailer + 'static,
{
    Router::new()
        .route("/api/send-reminder", get(reminder_handler::<R, M>))
        .route("/api/send-team-status", get(team_status_handler::<R, M>))
        .route("/api/notify-publication", post(publication_handler::<R, M>))
        .route("/api/send-launch-email", get(launch_handler::<R, M>))
        .route("/api/send-kind-test", get(nudge_handler::<R, M>))
        .with_state(jobs)
}

pub(crate) async fn reminder_handler<R, M>(
    State(jobs): State<Arc<NotificationJobs<R, M>>>,
    Query(query): Query<ScheduledQuery>,
) -> Response
where
    R: ContributionRepository + 'static,
    M: Mailer + 'static,
{
    match scheduled_run(query) {
        Ok(run) => respond(jobs.send_reminders(&run)),
        Err(response) => response,
    }
}

pub(crate) async fn team_status_handler<R, M>(
    State(jobs): State<Arc<NotificationJobs<R, M>>>,
    Query(query): Query<ScheduledQuery>,
) -> Response
where
    R: ContributionRepository + 'static,
    M: Mailer + 'static,
{
    match scheduled_run(query) {
        Ok(run) => respond(jobs.send_team_status(&run)),
        Err(response) => response,
    }
}

pub(crate) async fn publication_handler<R, M>(
    State(jobs): State<Arc<NotificationJobs<R, M>>>,
    request: Option<Json<PublicationRequest>>,
) -> Response
where
    R: ContributionRepository + 'static,
    M: Mailer + 'static,
{
    let title = request.and_then(|Json(body)| body.title);
    respond(Ok(jobs.notify_publication(title.as_deref())))
}

pub(crate) async fn launch_handler<R, M>(
    State(jobs): State<Arc<NotificationJobs<R, M>>>,
    Query(query): Query<LaunchQuery>,
) -> Response
where
    R: ContributionRepository + 'static,
    M: Mailer + 'static,
{
    let send_to_all = is_true(query.send_to_all.as_deref());
    respond(jobs.send_launch(query.email.as_deref(), send_to_all))
}

pub(crate) async fn nudge_handler<R, M>(
    State(jobs): State<Arc<NotificationJobs<R, M>>>,
    Query(query): Query<ScheduledQuery>,
) -> Response
where
    R: ContributionRepository + 'static,
    M: Mailer + 'static,
{
    let today = match parse_today(query.today.as_deref()) {
        Ok(today) => today,
        Err(response) => return response,
    };
    respond(jobs.send_nudge(query.email.as_deref(), today))
}

fn scheduled_run(query: ScheduledQuery) -> Result<ScheduledRun, Response> {
    Ok(ScheduledRun {
        force: is_true(query.force.as_deref()),
        email: query
            .email
            .map(|email| email.trim().to_string())
            .filter(|email| !email.is_empty()),
        today: parse_today(query.today.as_deref())?,
    })
}

fn is_true(flag: Option<&str>) -> bool {
    flag.is_some_and(|value| value.trim().eq_ignore_ascii_case("true"))
}

fn parse_today(raw: Option<&str>) -> Result<NaiveDate, Response> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("today must be YYYY-MM-DD, got '{value}'") })),
            )
                .into_response()
        }),
        None => Ok(Local::now().date_naive()),
    }
}

fn respond(result: Result<JobOutcome, JobError>) -> Response {
    match result {
        Ok(outcome @ JobOutcome::Skipped { .. }) => (
            StatusCode::OK,
            Json(json!({ "message": outcome.message() })),
        )
            .into_response(),
        Ok(outcome) => {
            let status = if outcome.all_failed() {
                StatusCode::BAD_GATEWAY
            } else {
                StatusCode::OK
            };
            let results = match &outcome {
                JobOutcome::Dispatched { deliveries, .. } => json!(deliveries),
                JobOutcome::Skipped { .. } => json!([]),
            };
            (
                status,
                Json(json!({ "message": outcome.message(), "results": results })),
            )
                .into_response()
        }
        Err(err) => {
            let status = match &err {
                JobError::UnknownRecipient(_) | JobError::MissingRecipient => {
                    StatusCode::BAD_REQUEST
                }
                JobError::Repository(err) => err.status_code(),
            };
            if status.is_server_error() {
                tracing::error!(error = %err, "notification job failed");
            }
            (status, Json(json!({ "error": err.to_string() }))).into_response()
        }
    }
}
