use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::platform::{ProjectScope, TalentConfig};

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
    pub provider: ProviderConfig,
    pub platform: PlatformConfig,
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

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            provider: ProviderConfig::from_env()?,
            platform: PlatformConfig::from_env(),
        })
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Which job-search backend to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Memory,
    Talent,
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub project_id: String,
    pub endpoint: String,
    pub access_token: Option<String>,
    pub timeout: Duration,
}

impl ProviderConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let kind = match env::var("JOBS_PROVIDER")
            .unwrap_or_else(|_| "memory".to_string())
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "memory" | "in-memory" => ProviderKind::Memory,
            "talent" | "cts" => ProviderKind::Talent,
            other => return Err(ConfigError::UnknownProvider(other.to_string())),
        };

        let project_id = match env::var("JOBS_PROJECT_ID") {
            Ok(value) if !value.trim().is_empty() => value.trim().to_string(),
            _ if kind == ProviderKind::Talent => return Err(ConfigError::MissingProjectId),
            _ => "local-project".to_string(),
        };

        let endpoint = env::var("JOBS_API_ENDPOINT")
            .unwrap_or_else(|_| "https://jobs.googleapis.com/v4".to_string());
        let access_token = env::var("JOBS_ACCESS_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());
        let timeout_secs = env::var("JOBS_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(ConfigError::InvalidTimeout)?;

        Ok(Self {
            kind,
            project_id,
            endpoint,
            access_token,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn project(&self) -> ProjectScope {
        ProjectScope::new(self.project_id.clone())
    }

    pub fn talent(&self) -> TalentConfig {
        TalentConfig {
            endpoint: self.endpoint.clone(),
            access_token: self.access_token.clone(),
            timeout: self.timeout,
            request_domain: "job-platform".to_string(),
        }
    }
}

/// Identities registered with the provider at startup.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    pub tenant_external_id: String,
    pub company_name: String,
    pub company_external_id: String,
}

impl PlatformConfig {
    fn from_env() -> Self {
        Self {
            tenant_external_id: env::var("JOBS_TENANT_EXTERNAL_ID")
                .unwrap_or_else(|_| "indigenous-job-platform".to_string()),
            company_name: env::var("JOBS_COMPANY_NAME")
                .unwrap_or_else(|_| "Indigenous Development Corp".to_string()),
            company_external_id: env::var("JOBS_COMPANY_EXTERNAL_ID")
                .unwrap_or_else(|_| "idc-001".to_string()),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidTimeout,
    UnknownProvider(String),
    MissingProjectId,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTimeout => {
                write!(f, "JOBS_TIMEOUT_SECS must be a positive number of seconds")
            }
            ConfigError::UnknownProvider(value) => {
                write!(f, "JOBS_PROVIDER must be 'memory' or 'talent' (found '{value}')")
            }
            ConfigError::MissingProjectId => {
                write!(f, "JOBS_PROJECT_ID is required for the talent provider")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidTimeout
            | ConfigError::UnknownProvider(_)
            | ConfigError::MissingProjectId => None,
        }
    }
}
