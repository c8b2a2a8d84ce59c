use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{middleware, Extension, Json, Router};
use content_tracker::auth::{auth_router, require_session, PasswordGate};
use content_tracker::config::AppConfig;
use content_tracker::notifications::{notification_router, Mailer, NotificationJobs};
use content_tracker::tracker::contributions::{
    contribution_router, ContributionRepository, ContributionService,
};
use content_tracker::tracker::stats::{stats_router, StatsService};
use content_tracker::tracker::Roster;
use serde_json::json;
use std::sync::Arc;

/// Every API route behind the session gate, plus the public probes.
pub(crate) fn app_router<R, M>(repository: Arc<R>, mailer: Arc<M>, config: &AppConfig) -> Router
where
    R: ContributionRepository + 'static,
    M: Mailer + 'static,
{
    let roster = Arc::new(Roster::team());
    let contributions = Arc::new(ContributionService::new(
        repository.clone(),
        mailer.clone(),
        roster.clone(),
        config.mail.clone(),
    ));
    let stats = Arc::new(StatsService::new(repository.clone(), roster.clone()));
    let jobs = Arc::new(NotificationJobs::new(
        repository,
        mailer,
        roster,
        config.mail.clone(),
    ));
    let gate = Arc::new(PasswordGate::new(&config.auth));

    contribution_router(contributions)
        .merge(stats_router(stats))
        .merge(notification_router(jobs))
        .merge(auth_router(gate))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .layer(middleware::from_fn(require_session))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{seed_contributions, AppState};
    use axum::body::Body;
    use axum::http::Request;
    use content_tracker::config::{
        AppEnvironment, AuthConfig, MailConfig, ServerConfig, StorageConfig, TelemetryConfig,
    };
    use content_tracker::notifications::TracingMailer;
    use content_tracker::tracker::contributions::InMemoryContributionRepository;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn config() -> AppConfig {
        AppConfig {
            environment: AppEnvironment::Test,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            telemetry: TelemetryConfig {
                log_level: "info".to_string(),
            },
            storage: StorageConfig::default(),
            auth: AuthConfig {
                team_password: "letmein".to_string(),
                secure_cookie: false,
            },
            mail: MailConfig::default(),
        }
    }

    fn app(ready: bool) -> Router {
        let repository = Arc::new(InMemoryContributionRepository::with_records(
            seed_contributions(),
        ));
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        app_router(repository, Arc::new(TracingMailer), &config()).layer(Extension(state))
    }

    async fn call(router: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = router.oneshot(request).await.expect("route executes");
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
            .await
            .expect("read body");
        let payload = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
        (status, payload)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).expect("request")
    }

    fn authed_get(uri: &str) -> Request<Body> {
        Request::get(uri)
            .header(header::COOKIE, "auth_token=authenticated")
            .body(Body::empty())
            .expect("request")
    }

    #[tokio::test]
    async fn probes_are_public() {
        let (status, payload) = call(app(true), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["status"], "ok");

        let (status, payload) = call(app(false), get("/ready")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload["status"], "initializing");

        let (status, _) = call(app(true), get("/ready")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn api_requires_session() {
        let (status, payload) = call(app(true), get("/api/contributions")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(payload["error"].is_string());

        let (status, payload) = call(app(true), authed_get("/api/contributions")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            payload.as_array().map(Vec::len),
            Some(seed_contributions().len())
        );
    }

    #[tokio::test]
    async fn login_uses_configured_password() {
        let login = Request::post("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"password":"letmein"}"#))
            .expect("request");
        let response = app(true).oneshot(login).await.expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(header::SET_COOKIE));
    }

    #[tokio::test]
    async fn cron_endpoints_skip_without_session() {
        let (status, payload) =
            call(app(true), get("/api/send-team-status?today=2026-01-20")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(payload["message"]
            .as_str()
            .is_some_and(|m| m.starts_with("Skipped: ")));

        let (status, _) = call(app(true), get("/api/send-launch-email?email=a@m51.no")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn seeded_dashboard_is_served() {
        let (status, payload) = call(app(true), authed_get("/api/dashboard?month=2026-01")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["team"]["published"], 4);
        assert_eq!(payload["employees"][0]["name"], "Emma");
    }
}
