//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    /// Absent when no `DATABASE_URL` is set; the in-memory store is used then
    pub database: Option<DatabaseConfig>,
    pub cors: CorsConfig,
    pub feed: FeedConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            other => Err(other.to_string()),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Live feed tuning: presence expiry, sweep cadence, and bus buffering
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_presence_expiry_ms")]
    pub presence_expiry_ms: u64,
    #[serde(default = "default_presence_sweep_interval_ms")]
    pub presence_sweep_interval_ms: u64,
    #[serde(default = "default_bus_subscriber_buffer")]
    pub bus_subscriber_buffer: usize,
}

impl FeedConfig {
    /// Age after which a presence entry is considered stale
    #[must_use]
    pub fn presence_expiry(&self) -> Duration {
        Duration::from_millis(self.presence_expiry_ms)
    }

    /// Period between two presence sweeps
    #[must_use]
    pub fn presence_sweep_interval(&self) -> Duration {
        Duration::from_millis(self.presence_sweep_interval_ms)
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            presence_expiry_ms: default_presence_expiry_ms(),
            presence_sweep_interval_ms: default_presence_sweep_interval_ms(),
            bus_subscriber_buffer: default_bus_subscriber_buffer(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "postfeed".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_presence_expiry_ms() -> u64 {
    3000
}

fn default_presence_sweep_interval_ms() -> u64 {
    3000
}

fn default_bus_subscriber_buffer() -> usize {
    1024
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a variable is set to a malformed or zero value
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// `from_env` delegates here; tests pass a map instead of touching the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = match lookup("APP_ENV") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidValue("APP_ENV", raw))?,
            None => Environment::default(),
        };

        let database = match lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()) {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: parse_var(
                    &lookup,
                    "DATABASE_MAX_CONNECTIONS",
                    default_max_connections(),
                )?,
                min_connections: parse_var(
                    &lookup,
                    "DATABASE_MIN_CONNECTIONS",
                    default_min_connections(),
                )?,
            }),
            None => None,
        };

        let feed = FeedConfig {
            presence_expiry_ms: non_zero(
                "FEED_PRESENCE_EXPIRY_MS",
                parse_var(&lookup, "FEED_PRESENCE_EXPIRY_MS", default_presence_expiry_ms())?,
            )?,
            presence_sweep_interval_ms: non_zero(
                "FEED_PRESENCE_SWEEP_INTERVAL_MS",
                parse_var(
                    &lookup,
                    "FEED_PRESENCE_SWEEP_INTERVAL_MS",
                    default_presence_sweep_interval_ms(),
                )?,
            )?,
            bus_subscriber_buffer: non_zero(
                "FEED_BUS_SUBSCRIBER_BUFFER",
                parse_var(
                    &lookup,
                    "FEED_BUS_SUBSCRIBER_BUFFER",
                    default_bus_subscriber_buffer(),
                )?,
            )?,
        };

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env,
            },
            api: ServerConfig {
                host: lookup("API_HOST").unwrap_or_else(default_host),
                port: parse_var(&lookup, "API_PORT", default_port())?,
            },
            database,
            cors: CorsConfig {
                allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            feed,
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(default),
    }
}

fn non_zero<T>(key: &'static str, value: T) -> Result<T, ConfigError>
where
    T: PartialEq + Default + ToString,
{
    if value == T::default() {
        Err(ConfigError::InvalidValue(key, value.to_string()))
    } else {
        Ok(value)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
