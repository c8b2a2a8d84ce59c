use crate::cli::ServeArgs;
use crate::infra::{AppState, ContributionStore};
use crate::routes::app_router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use content_tracker::config::AppConfig;
use content_tracker::error::AppError;
use content_tracker::notifications::TracingMailer;
use content_tracker::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(ContributionStore::open(
        config.storage.database_path.as_deref(),
    )?);
    let persistent = store.is_persistent();

    let app = app_router(store, Arc::new(TracingMailer), &config)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        persistent,
        mail_enabled = config.mail.enabled,
        "content tracker ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
