use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

const DEFAULT_TEAM_PASSWORD: &str = "changeme";

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub mail: MailConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let database_path = non_empty_var("TRACKER_DATABASE_PATH").map(PathBuf::from);

        let team_password = match non_empty_var("TEAM_PASSWORD") {
            Some(password) => password,
            None if environment == AppEnvironment::Production => {
                return Err(ConfigError::MissingTeamPassword)
            }
            None => DEFAULT_TEAM_PASSWORD.to_string(),
        };

        let enabled = match non_empty_var("MAIL_ENABLED") {
            Some(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidMailFlag)?,
            None => true,
        };
        let defaults = MailConfig::default();
        let mail = MailConfig {
            enabled,
            sender: non_empty_var("MAIL_SENDER").unwrap_or(defaults.sender),
            team_lead: non_empty_var("MAIL_TEAM_LEAD").unwrap_or(defaults.team_lead),
            dashboard_url: non_empty_var("DASHBOARD_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.dashboard_url),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            storage: StorageConfig { database_path },
            auth: AuthConfig {
                team_password,
                secure_cookie: environment == AppEnvironment::Production,
            },
            mail,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where contributions are persisted. Without a path the service runs on a
/// seeded in-memory store.
#[derive(Debug, Clone, Default)]
pub struct StorageConfig {
    pub database_path: Option<PathBuf>,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub team_password: String,
    pub secure_cookie: bool,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("team_password", &"<redacted>")
            .field("secure_cookie", &self.secure_cookie)
            .finish()
    }
}

/// Outbound e-mail settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailConfig {
    pub enabled: bool,
    pub sender: String,
    /// Receives team reports and publication notices; CC'd on other mail.
    pub team_lead: String,
    pub dashboard_url: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sender: "Content Dashboard <content-dashboard@m51.no>".to_string(),
            team_lead: "emma@m51.no".to_string(),
            dashboard_url: "http://localhost:3000".to_string(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    MissingTeamPassword,
    InvalidMailFlag,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::MissingTeamPassword => {
                write!(f, "TEAM_PASSWORD must be set in production")
            }
            ConfigError::InvalidMailFlag => write!(f, "MAIL_ENABLED must be true or false"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::MissingTeamPassword
            | ConfigError::InvalidMailFlag => None,
        }
    }
}
