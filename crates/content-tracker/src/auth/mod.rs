//! Shared-password gate for the dashboard.
//!
//! A correct password sets a long-lived `auth_token` cookie; every other API
//! path requires that cookie. The token is a fixed marker, not a signed
//! session.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::config::AuthConfig;

pub const AUTH_COOKIE: &str = "auth_token";
const AUTH_MARKER: &str = "authenticated";
const COOKIE_MAX_AGE_SECS: u64 = 60 * 60 * 24 * 30;

/// Paths reachable without a session. Cron jobs hit the scheduled e-mail
/// endpoints directly.
const PUBLIC_PATHS: &[&str] = &[
    "/health",
    "/ready",
    "/metrics",
    "/api/send-reminder",
    "/api/send-team-status",
];
const PUBLIC_PREFIXES: &[&str] = &["/api/auth/"];

#[derive(Debug, Clone)]
pub struct PasswordGate {
    password: String,
    secure_cookie: bool,
}

impl PasswordGate {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            password: config.team_password.clone(),
            secure_cookie: config.secure_cookie,
        }
    }

    pub fn verify(&self, candidate: &str) -> bool {
        !self.password.is_empty() && candidate == self.password
    }

    pub fn session_cookie(&self) -> String {
        let mut cookie = format!(
            "{AUTH_COOKIE}={AUTH_MARKER}; HttpOnly; SameSite=Strict; Max-Age={COOKIE_MAX_AGE_SECS}; Path=/"
        );
        if self.secure_cookie {
            cookie.push_str("; Secure");
        }
        cookie
    }

    pub fn cleared_cookie(&self) -> String {
        let mut cookie = format!("{AUTH_COOKIE}=; HttpOnly; SameSite=Strict; Max-Age=0; Path=/");
        if self.secure_cookie {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

pub fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path) || PUBLIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// True when the request carries the session cookie.
pub fn has_session(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .any(|(name, value)| name == AUTH_COOKIE && value == AUTH_MARKER)
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    #[serde(default)]
    pub(crate) password: String,
}

pub fn auth_router(gate: Arc<PasswordGate>) -> Router {
    Router::new()
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/logout", post(logout_handler))
        .with_state(gate)
}

pub(crate) async fn login_handler(
    State(gate): State<Arc<PasswordGate>>,
    Json(request): Json<LoginRequest>,
) -> Response {
    if !gate.verify(&request.password) {
        warn!("login rejected");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "error": "invalid password" })),
        )
            .into_response();
    }

    info!("login accepted");
    with_cookie(
        gate.session_cookie(),
        (StatusCode::OK, Json(json!({ "success": true }))).into_response(),
    )
}

pub(crate) async fn logout_handler(State(gate): State<Arc<PasswordGate>>) -> Response {
    with_cookie(
        gate.cleared_cookie(),
        (StatusCode::OK, Json(json!({ "success": true }))).into_response(),
    )
}

fn with_cookie(cookie: String, mut response: Response) -> Response {
    match HeaderValue::from_str(&cookie) {
        Ok(value) => {
            response.headers_mut().insert(header::SET_COOKIE, value);
            response
        }
        Err(err) => {
            tracing::error!(error = %err, "session cookie is not a valid header");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Middleware rejecting API requests without a session.
pub async fn require_session(request: Request<Body>, next: Next) -> Response {
    if is_public_path(request.uri().path()) || has_session(request.headers()) {
        return next.run(request).await;
    }

    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "authentication required" })),
    )
        .into_response()
}
