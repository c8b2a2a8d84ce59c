use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;

use super::super::domain::{ContributionId, NewContribution};
use super::service::{ContributionService, ContributionServiceError};
use super::ContributionRepository;
use crate::notifications::Mailer;

#[derive(Debug, Deserialize)]
pub(crate) struct DeleteRequest {
    #[serde(default)]
    pub(crate) id: Option<String>,
}

/// Router exposing list/create/delete over the contribution store.
pub fn contribution_router<R, M>(service: Arc<ContributionService<R, M>>) -> Router
where
    R: ContributionRepository + 'static,
    M: Mailer + 'static,
{
    Router::new()
        .route(
            "/api/contributions",
            get(list_handler::<R, M>)
                .post(create_handler::<R, M>)
                .delete(delete_body_handler::<R, M>),
        )
        .route(
            "/api/contributions/:contribution_id",
            delete(delete_path_handler::<R, M>),
        )
        .route("/api/debug-data", get(debug_handler::<R, M>))
        .with_state(service)
}

pub(crate) async fn list_handler<R, M>(
    State(service): State<Arc<ContributionService<R, M>>>,
) -> Response
where
    R: ContributionRepository + 'static,
    M: Mailer + 'static,
{
    match service.list() {
        Ok(contributions) => (StatusCode::OK, Json(contributions)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn create_handler<R, M>(
    State(service): State<Arc<ContributionService<R, M>>>,
    payload: Result<Json<NewContribution>, JsonRejection>,
) -> Response
where
    R: ContributionRepository + 'static,
    M: Mailer + 'static,
{
    let Json(submission) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };
    let today = Local::now().date_naive();
    match service.create(submission, today) {
        Ok(stored) => (StatusCode::CREATED, Json(stored)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_body_handler<R, M>(
    State(service): State<Arc<ContributionService<R, M>>>,
    payload: Result<Json<DeleteRequest>, JsonRejection>,
) -> Response
where
    R: ContributionRepository + 'static,
    M: Mailer + 'static,
{
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };
    match request.id.filter(|id| !id.trim().is_empty()) {
        Some(id) => delete_by_id(&service, ContributionId(id)),
        None => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "missing id" })),
        )
            .into_response(),
    }
}

pub(crate) async fn delete_path_handler<R, M>(
    State(service): State<Arc<ContributionService<R, M>>>,
    Path(contribution_id): Path<String>,
) -> Response
where
    R: ContributionRepository + 'static,
    M: Mailer + 'static,
{
    delete_by_id(&service, ContributionId(contribution_id))
}

pub(crate) async fn debug_handler<R, M>(
    State(service): State<Arc<ContributionService<R, M>>>,
) -> Response
where
    R: ContributionRepository + 'static,
    M: Mailer + 'static,
{
    match service.list() {
        Ok(rows) => {
            let payload = json!({ "count": rows.len(), "rows": rows });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

fn delete_by_id<R, M>(service: &ContributionService<R, M>, id: ContributionId) -> Response
where
    R: ContributionRepository + 'static,
    M: Mailer + 'static,
{
    match service.delete(&id) {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "message": "deleted", "id": id })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// Malformed or incomplete bodies answer 400 with the usual error shape.
fn rejection_response(rejection: JsonRejection) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": rejection.body_text() })),
    )
        .into_response()
}

fn error_response(err: ContributionServiceError) -> Response {
    let status = match &err {
        ContributionServiceError::Invalid(_) => StatusCode::BAD_REQUEST,
        ContributionServiceError::Repository(err) => err.status_code(),
    };
    if status.is_server_error() {
        tracing::error!(error = %err, "contribution store failure");
    }
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}
