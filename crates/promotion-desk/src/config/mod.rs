use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

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
    pub workflow: WorkflowConfig,
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

        let workflow = WorkflowConfig {
            session_ttl_minutes: read_number("APP_SESSION_TTL_MINUTES", 480)?,
            max_jury_per_application: read_number("APP_MAX_JURY", 5)?,
            min_jury_reports: read_number("APP_MIN_JURY_REPORTS", 3)?,
            bootstrap_admin: BootstrapAdmin::from_env(),
        };

        if workflow.session_ttl_minutes <= 0 {
            return Err(ConfigError::InvalidNumber {
                key: "APP_SESSION_TTL_MINUTES",
            });
        }
        if workflow.min_jury_reports == 0
            || workflow.min_jury_reports > workflow.max_jury_per_application
        {
            return Err(ConfigError::InvalidJuryBounds {
                min_reports: workflow.min_jury_reports,
                max_jury: workflow.max_jury_per_application,
            });
        }

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            workflow,
        })
    }
}

fn read_number<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { key }),
        Err(_) => Ok(default),
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

/// Knobs for sessions and the jury review process.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    pub session_ttl_minutes: i64,
    pub max_jury_per_application: usize,
    pub min_jury_reports: usize,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            session_ttl_minutes: 480,
            max_jury_per_application: 5,
            min_jury_reports: 3,
            bootstrap_admin: None,
        }
    }
}

/// Administrator account seeded at startup so the first admin can log in.
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl BootstrapAdmin {
    fn from_env() -> Option<Self> {
        let email = env::var("APP_ADMIN_EMAIL").ok()?;
        let password = env::var("APP_ADMIN_PASSWORD").ok()?;
        let name = env::var("APP_ADMIN_NAME").unwrap_or_else(|_| "Administrator".to_string());
        Some(Self {
            name,
            email,
            password,
        })
    }
}

impl fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str },
    InvalidJuryBounds { min_reports: usize, max_jury: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key } => {
                write!(f, "{key} must be a positive number")
            }
            ConfigError::InvalidJuryBounds {
                min_reports,
                max_jury,
            } => write!(
                f,
                "APP_MIN_JURY_REPORTS ({min_reports}) must be between 1 and APP_MAX_JURY ({max_jury})"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::InvalidJuryBounds { .. } => None,
        }
    }
}
