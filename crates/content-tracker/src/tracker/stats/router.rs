use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{Datelike, Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::super::contributions::{ContributionRepository, RepositoryError};
use super::super::domain::MonthKey;
use super::service::StatsService;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MonthQuery {
    #[serde(default)]
    pub(crate) month: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct YearQuery {
    #[serde(default)]
    pub(crate) year: Option<i32>,
}

/// Router exposing the dashboard, history, and leaderboard views.
pub fn stats_router<R>(service: Arc<StatsService<R>>) -> Router
where
    R: ContributionRepository + 'static,
{
    Router::new()
        .route("/api/dashboard", get(dashboard_handler::<R>))
        .route("/api/history", get(history_handler::<R>))
        .route("/api/leaderboard", get(leaderboard_handler::<R>))
        .with_state(service)
}

pub(crate) async fn dashboard_handler<R>(
    State(service): State<Arc<StatsService<R>>>,
    Query(query): Query<MonthQuery>,
) -> Response
where
    R: ContributionRepository + 'static,
{
    let month = match query.month.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
        Some(raw) => match raw.parse::<MonthKey>() {
            Ok(month) => month,
            Err(err) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": err.to_string() })),
                )
                    .into_response()
            }
        },
        None => MonthKey::from_date(today()),
    };

    match service.dashboard(month) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn history_handler<R>(
    State(service): State<Arc<StatsService<R>>>,
    Query(query): Query<YearQuery>,
) -> Response
where
    R: ContributionRepository + 'static,
{
    let today = today();
    match service.history(query.year.unwrap_or(today.year()), today) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn leaderboard_handler<R>(
    State(service): State<Arc<StatsService<R>>>,
    Query(query): Query<YearQuery>,
) -> Response
where
    R: ContributionRepository + 'static,
{
    let today = today();
    match service.leaderboard(query.year.unwrap_or(today.year()), today) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn error_response(err: RepositoryError) -> Response {
    tracing::error!(error = %err, "stats snapshot failed");
    (err.status_code(), Json(json!({ "error": err.to_string() }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::domain::{Contribution, ContributionId};
    use crate::tracker::roster::Roster;

    struct OfflineStore;

    impl ContributionRepository for OfflineStore {
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

    fn offline_service() -> Arc<StatsService<OfflineStore>> {
        Arc::new(StatsService::new(Arc::new(OfflineStore), Arc::new(Roster::team())))
    }

    #[tokio::test]
    async fn offline_store_answers_service_unavailable() {
        let response = dashboard_handler::<OfflineStore>(
            State(offline_service()),
            Query(MonthQuery {
                month: Some("2026-03".to_string()),
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response =
            leaderboard_handler::<OfflineStore>(State(offline_service()), Query(YearQuery::default()))
                .await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn malformed_month_is_bad_request() {
        let response = dashboard_handler::<OfflineStore>(
            State(offline_service()),
            Query(MonthQuery {
                month: Some("2026-13".to_string()),
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
