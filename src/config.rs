//! Configuration loading and constants.
//!
//! Loads application configuration from a TOML file and defines constants for
//! HTTP cache headers, process limits, database defaults, logging and default
//! paths. `AppConfig` is the root configuration struct containing all settings.
//! Every field is optional in the file and falls back to the literals below.

use const_format::formatcp;
use serde::Deserialize;
use std::path::Path;

// =============================================================================
// HTTP Response Cache Control
// =============================================================================

/// Student listing reflects live table contents and must never be reused
pub const CACHE_CONTROL_STUDENTS: &str = "no-store";

/// Greeting and health responses are never cached
pub const CACHE_CONTROL_NO_CACHE: &str = "no-cache";

// =============================================================================
// HTTP Server Defaults
// =============================================================================

pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";
pub const DEFAULT_HTTP_PORT: u16 = 5000;

/// Pending connections queued by the kernel before new ones are refused
pub const DEFAULT_BACKLOG: u32 = 20480;

/// Requests still running after this many seconds are answered with 504
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 500;

/// Upper bound on runtime worker threads when `http.workers` is unset
pub const MAX_DEFAULT_WORKERS: usize = 6;

// =============================================================================
// Database Defaults
// =============================================================================

pub const DEFAULT_DB_HOST: &str = "172.16.238.3";
pub const DEFAULT_DB_PORT: u16 = 3306;
pub const DEFAULT_DB_USER: &str = "root";
pub const DEFAULT_DB_PASSWORD: &str = "1234";
pub const DEFAULT_DB_NAME: &str = "flask_app";
pub const DEFAULT_DB_CHARSET: &str = "utf8";

/// Seconds allowed for establishing a database connection
pub const DEFAULT_DB_CONNECT_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Default error log path (warnings and errors)
pub const DEFAULT_ERROR_LOG: &str = "./log/gunicorn_error.log";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = formatcp!("{}=info,tower_http=info", CRATE_TARGET);

/// Log filter used when `logging.debug` is enabled
pub const DEBUG_LOG_FILTER: &str = formatcp!("{}=debug,tower_http=debug", CRATE_TARGET);

const CRATE_TARGET: &str = "roster";

/// Worker count for a machine with `cpus` logical CPUs: `min(2 * cpus + 1, 6)`.
pub fn default_worker_count(cpus: usize) -> usize {
    (cpus * 2 + 1).min(MAX_DEFAULT_WORKERS)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server configuration
    pub http: HttpServerConfig,
    /// MySQL connection settings
    pub database: DatabaseConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
    /// Listen backlog passed to the kernel
    pub backlog: u32,
    /// Whole-request timeout in seconds
    pub request_timeout_seconds: u64,
    /// Runtime worker threads (default: min(2 * cpus + 1, 6))
    pub workers: Option<usize>,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HTTP_HOST.to_string(),
            port: DEFAULT_HTTP_PORT,
            backlog: DEFAULT_BACKLOG,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECS,
            workers: None,
        }
    }
}

impl HttpServerConfig {
    /// Get worker count (configured, or derived from the CPU count)
    pub fn worker_count(&self) -> usize {
        self.workers
            .unwrap_or_else(|| default_worker_count(num_cpus::get()))
    }

    /// Address string to bind, e.g. `0.0.0.0:5000`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// MySQL connection settings
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Schema (database) name
    pub name: String,
    pub charset: String,
    pub connect_timeout_seconds: u64,
    /// 0 opens a fresh connection per request; N > 0 pools up to N connections
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_DB_HOST.to_string(),
            port: DEFAULT_DB_PORT,
            user: DEFAULT_DB_USER.to_string(),
            password: DEFAULT_DB_PASSWORD.to_string(),
            name: DEFAULT_DB_NAME.to_string(),
            charset: DEFAULT_DB_CHARSET.to_string(),
            connect_timeout_seconds: DEFAULT_DB_CONNECT_TIMEOUT_SECS,
            pool_size: 0,
        }
    }
}

impl DatabaseConfig {
    /// Whether connections are pooled rather than opened per request
    pub fn is_pooled(&self) -> bool {
        self.pool_size > 0
    }
}

// Hand-written so the password never reaches the logs.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("name", &self.name)
            .field("charset", &self.charset)
            .field("connect_timeout_seconds", &self.connect_timeout_seconds)
            .field("pool_size", &self.pool_size)
            .finish()
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per event
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Raise the default log filter to debug
    pub debug: bool,
    /// File receiving warnings and errors
    pub error_log: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            debug: false,
            error_log: DEFAULT_ERROR_LOG.to_string(),
        }
    }
}

impl LoggingConfig {
    /// Filter used when neither the CLI nor RUST_LOG supplies one
    pub fn default_filter(&self) -> &'static str {
        if self.debug {
            DEBUG_LOG_FILTER
        } else {
            DEFAULT_LOG_FILTER
        }
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.http.port == 0 {
            return Err(invalid("http.port must be non-zero"));
        }
        if self.http.backlog == 0 {
            return Err(invalid("http.backlog must be non-zero"));
        }
        if self.http.request_timeout_seconds == 0 {
            return Err(invalid("http.request_timeout_seconds must be non-zero"));
        }
        if self.http.workers == Some(0) {
            return Err(invalid("http.workers must be at least 1"));
        }

        let db = &self.database;
        for (field, value) in [
            ("database.host", &db.host),
            ("database.user", &db.user),
            ("database.name", &db.name),
            ("database.charset", &db.charset),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{field} must not be empty")));
            }
        }
        if db.connect_timeout_seconds == 0 {
            return Err(invalid("database.connect_timeout_seconds must be non-zero"));
        }

        Ok(())
    }
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::Validation(message.to_string())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}
