// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration schema definitions for Tessera.
//!
//! # Schema Structure
//!
//! ```text
//! TesseraConfig
//! ├── app: AppConfig
//! ├── server: ServerConfig
//! │   └── cors: CorsConfig
//! ├── database: DatabaseConfig
//! ├── session: SessionSettings
//! ├── security: SecurityConfig
//! └── logging: LoggingConfig
//! ```

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

// =============================================================================
// Constants
// =============================================================================

/// Default HTTP port.
pub const DEFAULT_SERVER_PORT: u16 = 3000;

/// Default request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default maximum request body size (1MB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// Default token lifetime (30 days).
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Default session store TTL (31 days).
pub const DEFAULT_STORE_TTL: Duration = Duration::from_secs(31 * 24 * 60 * 60);

/// Upper bound for token lifetime and store TTL (10 years).
pub const MAX_SESSION_DURATION: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);

/// Default PostgreSQL pool size.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Minimum recommended token secret length in bytes.
pub const MIN_SECRET_LENGTH: usize = 32;

// =============================================================================
// Top-Level Configuration
// =============================================================================

/// The root configuration structure for Tessera.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TesseraConfig {
    /// Application metadata.
    #[serde(default)]
    pub app: AppConfig,

    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// User record store.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Session token store and lifetimes.
    #[serde(default)]
    pub session: SessionSettings,

    /// Secrets.
    #[serde(default)]
    pub security: SecurityConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TesseraConfig {
    /// Validates the entire configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.app.validate()?;
        self.server.validate()?;
        self.database.validate()?;
        self.session.validate()?;
        self.security.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

// =============================================================================
// App Configuration
// =============================================================================

/// Application metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Service name, used as the token issuer.
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Deployment environment label.
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_app_name() -> String {
    "tessera".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

impl AppConfig {
    /// Validates the app configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::validation("app.name", "cannot be empty"));
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            environment: default_environment(),
        }
    }
}

// =============================================================================
// Server Configuration
// =============================================================================

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_bind_address")]
    pub bind_address: IpAddr,

    /// Listen port.
    #[serde(default = "default_server_port")]
    pub port: u16,

    /// Per-request timeout.
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Maximum request body size in bytes.
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,

    /// Whether to gzip responses.
    #[serde(default)]
    pub compression: bool,

    /// CORS configuration.
    #[serde(default)]
    pub cors: CorsConfig,
}

fn default_bind_address() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0))
}

fn default_server_port() -> u16 {
    DEFAULT_SERVER_PORT
}

fn default_request_timeout() -> Duration {
    DEFAULT_REQUEST_TIMEOUT
}

fn default_max_body_size() -> usize {
    DEFAULT_MAX_BODY_SIZE
}

impl ServerConfig {
    /// Validates the server configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.port == 0 {
            return Err(ConfigError::validation("server.port", "cannot be zero"));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::validation(
                "server.request_timeout",
                "cannot be zero",
            ));
        }
        if self.max_body_size == 0 {
            return Err(ConfigError::validation(
                "server.max_body_size",
                "cannot be zero",
            ));
        }
        self.cors.validate()?;
        Ok(())
    }

    /// Returns the socket address.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: DEFAULT_SERVER_PORT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            compression: false,
            cors: CorsConfig::default(),
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
    /// Whether to install the CORS layer at all.
    #[serde(default)]
    pub enabled: bool,

    /// Allowed origins (use "*" for all).
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Allowed methods.
    #[serde(default = "default_methods")]
    pub allowed_methods: Vec<String>,

    /// Allowed headers.
    #[serde(default = "default_headers")]
    pub allowed_headers: Vec<String>,

    /// Max age in seconds.
    #[serde(default = "default_max_age")]
    pub max_age_secs: u64,
}

fn default_methods() -> Vec<String> {
    ["GET", "POST", "PATCH", "DELETE"]
        .iter()
        .map(|m| m.to_string())
        .collect()
}

fn default_headers() -> Vec<String> {
    vec!["Content-Type".to_string(), "Authorization".to_string()]
}

fn default_max_age() -> u64 {
    3600
}

impl CorsConfig {
    /// Validates the CORS configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.enabled && self.allowed_origins.is_empty() {
            return Err(ConfigError::validation(
                "server.cors.allowed_origins",
                "must list at least one origin when CORS is enabled",
            ));
        }
        Ok(())
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            allowed_origins: Vec::new(),
            allowed_methods: default_methods(),
            allowed_headers: default_headers(),
            max_age_secs: default_max_age(),
        }
    }
}

// =============================================================================
// Database Configuration
// =============================================================================

/// User record store backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserBackend {
    /// Process-local map.
    #[default]
    Memory,
    /// PostgreSQL.
    Postgres,
}

impl UserBackend {
    /// Returns the backend name.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserBackend::Memory => "memory",
            UserBackend::Postgres => "postgres",
        }
    }
}

/// User record store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Backend to use.
    #[serde(default)]
    pub backend: UserBackend,

    /// Connection URL (required for `postgres`).
    #[serde(default)]
    pub url: Option<SecretValue>,

    /// Pool size.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Create the `users` table on startup.
    #[serde(default = "default_true")]
    pub migrate: bool,
}

fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

fn default_true() -> bool {
    true
}

impl DatabaseConfig {
    /// Validates the database configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.backend == UserBackend::Postgres && !has_value(&self.url) {
            return Err(ConfigError::missing_field("database.url"));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::validation(
                "database.max_connections",
                "cannot be zero",
            ));
        }
        Ok(())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: UserBackend::Memory,
            url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            migrate: true,
        }
    }
}

// =============================================================================
// Session Configuration
// =============================================================================

/// Session token store backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    /// Process-local map with lazy expiry.
    #[default]
    Memory,
    /// Redis with native key expiry.
    Redis,
}

impl SessionBackend {
    /// Returns the backend name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionBackend::Memory => "memory",
            SessionBackend::Redis => "redis",
        }
    }
}

/// Session token store and lifetime configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionSettings {
    /// Backend to use.
    #[serde(default)]
    pub backend: SessionBackend,

    /// Redis URL (required for `redis`).
    #[serde(default)]
    pub redis_url: Option<SecretValue>,

    /// Prefix for every Redis key.
    #[serde(default)]
    pub key_prefix: String,

    /// Expiry embedded in each token.
    #[serde(default = "default_token_lifetime", with = "humantime_serde")]
    pub token_lifetime: Duration,

    /// TTL of each store entry. Must not be shorter than `token_lifetime`.
    #[serde(default = "default_store_ttl", with = "humantime_serde")]
    pub store_ttl: Duration,
}

fn default_token_lifetime() -> Duration {
    DEFAULT_TOKEN_LIFETIME
}

fn default_store_ttl() -> Duration {
    DEFAULT_STORE_TTL
}

impl SessionSettings {
    /// Validates the session configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.backend == SessionBackend::Redis && !has_value(&self.redis_url) {
            return Err(ConfigError::missing_field("session.redis_url"));
        }
        if self.token_lifetime.is_zero() {
            return Err(ConfigError::validation(
                "session.token_lifetime",
                "cannot be zero",
            ));
        }
        if self.token_lifetime > MAX_SESSION_DURATION {
            return Err(ConfigError::validation(
                "session.token_lifetime",
                "cannot exceed 10 years",
            ));
        }
        if self.store_ttl < self.token_lifetime {
            return Err(ConfigError::validation(
                "session.store_ttl",
                "must not be shorter than session.token_lifetime",
            ));
        }
        if self.store_ttl > MAX_SESSION_DURATION {
            return Err(ConfigError::validation(
                "session.store_ttl",
                "cannot exceed 10 years",
            ));
        }
        Ok(())
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            backend: SessionBackend::Memory,
            redis_url: None,
            key_prefix: String::new(),
            token_lifetime: DEFAULT_TOKEN_LIFETIME,
            store_ttl: DEFAULT_STORE_TTL,
        }
    }
}

// =============================================================================
// Security Configuration
// =============================================================================

/// Secrets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecurityConfig {
    /// HMAC secret for signing session tokens.
    #[serde(default)]
    pub token_secret: Option<SecretValue>,
}

impl SecurityConfig {
    /// Validates the security configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        match &self.token_secret {
            Some(secret) if !secret.is_empty() => {
                if secret.len() < MIN_SECRET_LENGTH {
                    tracing::warn!(
                        "security.token_secret is shorter than {} bytes",
                        MIN_SECRET_LENGTH
                    );
                }
                Ok(())
            }
            _ => Err(ConfigError::missing_field("security.token_secret")),
        }
    }
}

// =============================================================================
// Logging Configuration
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Log format.
    #[serde(default)]
    pub format: LogFormat,
}

impl LoggingConfig {
    /// Validates the logging configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        Ok(())
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Returns the level as a filter directive.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Parses a level name, accepting `warning` as `warn`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Single-line compact text.
    Compact,
    /// JSON for log aggregation.
    Json,
}

impl LogFormat {
    /// Returns the format name.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Text => "text",
            LogFormat::Compact => "compact",
            LogFormat::Json => "json",
        }
    }

    /// Parses a format name.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "text" | "pretty" => Some(LogFormat::Text),
            "compact" => Some(LogFormat::Compact),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

// =============================================================================
// Secret Value
// =============================================================================

/// A secret string that never appears in `Debug` or `Display` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretValue(String);

impl SecretValue {
    /// Creates a new secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the plain value.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the value is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl std::fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretValue(***)")
    }
}

impl std::fmt::Display for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "***")
    }
}

fn has_value(secret: &Option<SecretValue>) -> bool {
    secret.as_ref().is_some_and(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> TesseraConfig {
        let mut config = TesseraConfig::default();
        config.security.token_secret =
            Some(SecretValue::new("a-very-long-secret-value-for-testing-only"));
        config
    }

    #[test]
    fn test_default_config() {
        let config = TesseraConfig::default();
        assert_eq!(config.app.name, "tessera");
        assert_eq!(config.server.port, DEFAULT_SERVER_PORT);
        assert_eq!(config.database.backend, UserBackend::Memory);
        assert_eq!(config.session.backend, SessionBackend::Memory);
        assert_eq!(config.session.token_lifetime, DEFAULT_TOKEN_LIFETIME);
        assert!(config.session.store_ttl >= config.session.token_lifetime);
    }

    #[test]
    fn test_default_requires_secret() {
        let err = TesseraConfig::default().validate().unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { ref field } if field == "security.token_secret"));
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_store_ttl_must_cover_lifetime() {
        let mut config = valid_config();
        config.session.store_ttl = Duration::from_secs(60);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "session.store_ttl"));
    }

    #[test]
    fn test_session_durations_are_bounded() {
        let mut config = valid_config();
        config.session.token_lifetime = Duration::from_secs(u64::MAX);
        config.session.store_ttl = Duration::from_secs(u64::MAX);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "session.token_lifetime"));

        let mut config = valid_config();
        config.session.store_ttl = MAX_SESSION_DURATION + Duration::from_secs(1);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "session.store_ttl"));

        let mut config = valid_config();
        config.session.token_lifetime = MAX_SESSION_DURATION;
        config.session.store_ttl = MAX_SESSION_DURATION;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_backend_urls_required() {
        let mut config = valid_config();
        config.database.backend = UserBackend::Postgres;
        assert!(config.validate().is_err());
        config.database.url = Some(SecretValue::new("postgres://localhost/tessera"));
        assert!(config.validate().is_ok());

        config.session.backend = SessionBackend::Redis;
        assert!(config.validate().is_err());
        config.session.redis_url = Some(SecretValue::new("redis://localhost"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cors_requires_origins_when_enabled() {
        let mut config = valid_config();
        config.server.cors.enabled = true;
        assert!(config.validate().is_err());
        config.server.cors.allowed_origins = vec!["*".to_string()];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_secret_value_redacted() {
        let secret = SecretValue::new("super-secret");
        assert_eq!(format!("{}", secret), "***");
        assert!(!format!("{:?}", secret).contains("super-secret"));
        assert_eq!(secret.expose(), "super-secret");

        let config = valid_config();
        assert!(!format!("{:?}", config).contains("a-very-long-secret"));
    }

    #[test]
    fn test_humantime_durations() {
        let json = r#"{"token_lifetime":"1h","store_ttl":"2h"}"#;
        let session: SessionSettings = serde_json::from_str(json).unwrap();
        assert_eq!(session.token_lifetime, Duration::from_secs(3600));
        assert_eq!(session.store_ttl, Duration::from_secs(7200));
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!(LogLevel::parse("WARNING"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("debug"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("verbose"), None);
        assert_eq!(LogLevel::Info.as_str(), "info");
        assert_eq!(LogFormat::parse("json"), Some(LogFormat::Json));
    }
}
