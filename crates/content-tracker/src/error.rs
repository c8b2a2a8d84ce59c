use crate::config::ConfigError;
use crate::notifications::JobError;
use crate::telemetry::TelemetryError;
use crate::tracker::contributions::{
    ContributionServiceError, LedgerError, RepositoryError, TransferError,
};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Storage(RepositoryError),
    Transfer(TransferError),
    Contribution(ContributionServiceError),
    Ledger(LedgerError),
    Notification(JobError),
    InvalidInput(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Storage(err) => write!(f, "storage error: {}", err),
            AppError::Transfer(err) => write!(f, "transfer error: {}", err),
            AppError::Contribution(err) => write!(f, "contribution error: {}", err),
            AppError::Ledger(err) => write!(f, "ledger error: {}", err),
            AppError::Notification(err) => write!(f, "notification error: {}", err),
            AppError::InvalidInput(message) => write!(f, "invalid input: {}", message),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Storage(err) => Some(err),
            AppError::Transfer(err) => Some(err),
            AppError::Contribution(err) => Some(err),
            AppError::Ledger(err) => Some(err),
            AppError::Notification(err) => Some(err),
            AppError::InvalidInput(_) => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Transfer(_) | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Contribution(ContributionServiceError::Invalid(_))
            | AppError::Ledger(LedgerError::Invalid(_))
            | AppError::Notification(JobError::UnknownRecipient(_))
            | AppError::Notification(JobError::MissingRecipient) => StatusCode::BAD_REQUEST,
            AppError::Storage(err)
            | AppError::Contribution(ContributionServiceError::Repository(err))
            | AppError::Ledger(LedgerError::Backend(err))
            | AppError::Notification(JobError::Repository(err)) => err.status_code(),
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<RepositoryError> for AppError {
    fn from(value: RepositoryError) -> Self {
        Self::Storage(value)
    }
}

impl From<TransferError> for AppError {
    fn from(value: TransferError) -> Self {
        Self::Transfer(value)
    }
}

impl From<ContributionServiceError> for AppError {
    fn from(value: ContributionServiceError) -> Self {
        Self::Contribution(value)
    }
}

impl From<LedgerError> for AppError {
    fn from(value: LedgerError) -> Self {
        Self::Ledger(value)
    }
}

impl From<JobError> for AppError {
    fn from(value: JobError) -> Self {
        Self::Notification(value)
    }
}
