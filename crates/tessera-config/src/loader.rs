// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration loading for Tessera.
//!
//! # Loading Pipeline
//!
//! 1. Read the file and pick the format from its extension
//! 2. Resolve `${VAR}` / `${VAR:default}` placeholders in the raw text
//! 3. Deserialize into [`TesseraConfig`]
//! 4. Apply `TESSERA_*` environment overrides
//! 5. Validate
//!
//! # Environment Variable Override
//!
//! ```text
//! TESSERA_SERVER_PORT=8080
//! TESSERA_TOKEN_SECRET=...
//! TESSERA_DATABASE_URL=postgres://...
//! TESSERA_REDIS_URL=redis://...
//! TESSERA_LOG_LEVEL=debug
//! ```

use crate::error::{ConfigError, ConfigResult};
use crate::schema::{
    LogFormat, LogLevel, SecretValue, SessionBackend, TesseraConfig, UserBackend,
};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

// =============================================================================
// ConfigLoader
// =============================================================================

/// Configuration loader for Tessera.
///
/// # Examples
///
/// ```no_run
/// use tessera_config::loader::ConfigLoader;
///
/// let loader = ConfigLoader::new();
/// let config = loader.load("tessera.yaml").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Environment variable prefix.
    env_prefix: String,

    /// Whether to resolve placeholders and apply overrides.
    resolve_env_vars: bool,

    /// Fixed variable set used instead of the process environment.
    env_snapshot: Option<HashMap<String, String>>,
}

impl ConfigLoader {
    /// Creates a new configuration loader with default settings.
    pub fn new() -> Self {
        Self {
            env_prefix: "TESSERA".to_string(),
            resolve_env_vars: true,
            env_snapshot: None,
        }
    }

    /// Sets the environment variable prefix.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Enables or disables environment variable resolution.
    pub fn with_env_vars(mut self, enabled: bool) -> Self {
        self.resolve_env_vars = enabled;
        self
    }

    /// Reads variables from `vars` instead of the process environment.
    pub fn with_env_snapshot<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env_snapshot = Some(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Loads configuration from a file.
    ///
    /// The file format is determined by the file extension:
    /// - `.yaml` or `.yml` - YAML format
    /// - `.toml` - TOML format
    /// - `.json` - JSON format
    pub fn load(&self, path: impl AsRef<Path>) -> ConfigResult<TesseraConfig> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        let content = self.read_file(path)?;
        let format = ConfigFormat::from_path(path)?;

        let content = self.preprocess(&content);
        let mut config = parse_str(&content, format).map_err(|e| match e {
            ConfigError::Serialization { message } => ConfigError::parse(path, message),
            other => other,
        })?;

        self.finish(&mut config)?;

        debug!(
            users = config.database.backend.as_str(),
            sessions = config.session.backend.as_str(),
            port = config.server.port,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Loads configuration from a string.
    pub fn load_from_str(&self, content: &str, format: ConfigFormat) -> ConfigResult<TesseraConfig> {
        let content = self.preprocess(content);
        let mut config = parse_str(&content, format)?;
        self.finish(&mut config)?;
        Ok(config)
    }

    /// Builds a configuration from defaults plus environment overrides.
    ///
    /// Used when no configuration file is given.
    pub fn load_from_env(&self) -> ConfigResult<TesseraConfig> {
        let mut config = TesseraConfig::default();
        self.finish(&mut config)?;
        Ok(config)
    }

    fn preprocess(&self, content: &str) -> String {
        if self.resolve_env_vars {
            self.resolve_env_placeholders(content)
        } else {
            content.to_string()
        }
    }

    fn finish(&self, config: &mut TesseraConfig) -> ConfigResult<()> {
        if self.resolve_env_vars {
            self.apply_env_overrides(config)?;
        }
        config.validate()
    }

    /// Reads file content.
    fn read_file(&self, path: &Path) -> ConfigResult<String> {
        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))
    }

    fn var(&self, name: &str) -> Option<String> {
        match &self.env_snapshot {
            Some(vars) => vars.get(name).cloned(),
            None => env::var(name).ok(),
        }
    }

    fn prefixed(&self, suffix: &str) -> (String, Option<String>) {
        let name = format!("{}_{}", self.env_prefix, suffix);
        let value = self.var(&name);
        (name, value)
    }

    /// Resolves environment variable placeholders in content.
    ///
    /// Supports the format: `${VAR_NAME}` or `${VAR_NAME:default}`. An unset
    /// variable without a default is left in place.
    fn resolve_env_placeholders(&self, content: &str) -> String {
        let mut result = String::with_capacity(content.len());
        let mut chars = content.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '$' || chars.peek() != Some(&'{') {
                result.push(c);
                continue;
            }
            chars.next();

            let mut var_content = String::new();
            let mut found_close = false;
            for c in chars.by_ref() {
                if c == '}' {
                    found_close = true;
                    break;
                }
                var_content.push(c);
            }

            if !found_close {
                result.push_str("${");
                result.push_str(&var_content);
                continue;
            }

            let (var_name, default_value) = match var_content.split_once(':') {
                Some((name, default)) => (name, Some(default)),
                None => (var_content.as_str(), None),
            };

            match (self.var(var_name), default_value) {
                (Some(value), _) => result.push_str(&value),
                (None, Some(default)) => result.push_str(default),
                (None, None) => {
                    warn!("Environment variable '{}' not found", var_name);
                    result.push_str(&format!("${{{}}}", var_name));
                }
            }
        }

        result
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&self, config: &mut TesseraConfig) -> ConfigResult<()> {
        if let (name, Some(value)) = self.prefixed("SERVER_PORT") {
            config.server.port = value
                .parse()
                .map_err(|_| ConfigError::invalid_env_var(name, "expected valid port number"))?;
        }
        if let (name, Some(value)) = self.prefixed("SERVER_BIND_ADDRESS") {
            config.server.bind_address = value
                .parse()
                .map_err(|_| ConfigError::invalid_env_var(name, "expected IP address"))?;
        }

        if let (_, Some(value)) = self.prefixed("TOKEN_SECRET") {
            config.security.token_secret = Some(SecretValue::new(value));
        }

        if let (name, Some(value)) = self.prefixed("DATABASE_BACKEND") {
            config.database.backend = match value.to_lowercase().as_str() {
                "memory" => UserBackend::Memory,
                "postgres" | "postgresql" => UserBackend::Postgres,
                _ => return Err(ConfigError::invalid_env_var(name, "expected memory or postgres")),
            };
        }
        if let (_, Some(value)) = self.prefixed("DATABASE_URL") {
            config.database.url = Some(SecretValue::new(value));
        }

        if let (name, Some(value)) = self.prefixed("SESSION_BACKEND") {
            config.session.backend = match value.to_lowercase().as_str() {
                "memory" => SessionBackend::Memory,
                "redis" => SessionBackend::Redis,
                _ => return Err(ConfigError::invalid_env_var(name, "expected memory or redis")),
            };
        }
        if let (_, Some(value)) = self.prefixed("REDIS_URL") {
            config.session.redis_url = Some(SecretValue::new(value));
        }

        if let (name, Some(value)) = self.prefixed("LOG_LEVEL") {
            config.logging.level = LogLevel::parse(&value)
                .ok_or_else(|| ConfigError::invalid_env_var(name, "expected trace|debug|info|warn|error"))?;
        }
        if let (name, Some(value)) = self.prefixed("LOG_FORMAT") {
            config.logging.format = LogFormat::parse(&value)
                .ok_or_else(|| ConfigError::invalid_env_var(name, "expected text|compact|json"))?;
        }

        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// ConfigFormat
// =============================================================================

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format.
    Yaml,
    /// TOML format.
    Toml,
    /// JSON format.
    Json,
}

impl ConfigFormat {
    /// Determines the format from a file path.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            Some(other) => Err(ConfigError::unsupported_format(other)),
            None => Err(ConfigError::unsupported_format("(no extension)")),
        }
    }

    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Yaml => "yaml",
            ConfigFormat::Toml => "toml",
            ConfigFormat::Json => "json",
        }
    }
}

/// Parses a string based on format.
fn parse_str(content: &str, format: ConfigFormat) -> ConfigResult<TesseraConfig> {
    match format {
        ConfigFormat::Yaml => {
            serde_yaml::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
    }
}

// =============================================================================
// Convenience Functions
// =============================================================================

/// Loads configuration from a file with default settings.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<TesseraConfig> {
    ConfigLoader::new().load(path)
}

/// Loads configuration from a string with the specified format.
pub fn load_config_str(content: &str, format: ConfigFormat) -> ConfigResult<TesseraConfig> {
    ConfigLoader::new().load_from_str(content, format)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    const SECRET: &str = "a-very-long-secret-value-for-testing-only";

    fn test_yaml() -> String {
        format!(
            r#"
app:
  name: tessera-test

server:
  port: 8080
  request_timeout: 10s

session:
  token_lifetime: 30days
  store_ttl: 31days

security:
  token_secret: "{}"

logging:
  level: debug
"#,
            SECRET
        )
    }

    fn isolated() -> ConfigLoader {
        ConfigLoader::new().with_env_snapshot(Vec::<(String, String)>::new())
    }

    #[test]
    fn test_load_yaml() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        file.write_all(test_yaml().as_bytes()).unwrap();

        let config = isolated().load(file.path()).unwrap();

        assert_eq!(config.app.name, "tessera-test");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.request_timeout, Duration::from_secs(10));
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.security.token_secret.unwrap().expose(), SECRET);
    }

    #[test]
    fn test_load_toml() {
        let toml = format!(
            r#"
[server]
port = 9000

[security]
token_secret = "{}"
"#,
            SECRET
        );
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        file.write_all(toml.as_bytes()).unwrap();

        let config = isolated().load(file.path()).unwrap();
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_load_json() {
        let json = format!(r#"{{"security":{{"token_secret":"{}"}}}}"#, SECRET);
        let config = isolated().load_from_str(&json, ConfigFormat::Json).unwrap();
        assert_eq!(config.server.port, crate::schema::DEFAULT_SERVER_PORT);
    }

    #[test]
    fn test_config_format_from_path() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.yaml")).unwrap(),
            ConfigFormat::Yaml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.yml")).unwrap(),
            ConfigFormat::Yaml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.toml")).unwrap(),
            ConfigFormat::Toml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("config.json")).unwrap(),
            ConfigFormat::Json
        );
        assert!(ConfigFormat::from_path(Path::new("config.txt")).is_err());
    }

    #[test]
    fn test_env_placeholder_with_default() {
        let loader = isolated();
        let result = loader.resolve_env_placeholders("value: ${NONEXISTENT_VAR:default}");
        assert_eq!(result, "value: default");
    }

    #[test]
    fn test_env_placeholder_from_snapshot() {
        let loader = ConfigLoader::new().with_env_snapshot([("JWT_KEY", "from-env")]);
        assert_eq!(
            loader.resolve_env_placeholders("secret: ${JWT_KEY:fallback}"),
            "secret: from-env"
        );
        assert_eq!(
            loader.resolve_env_placeholders("missing: ${OTHER}"),
            "missing: ${OTHER}"
        );
        assert_eq!(loader.resolve_env_placeholders("open: ${BROKEN"), "open: ${BROKEN");
    }

    #[test]
    fn test_env_overrides() {
        let loader = ConfigLoader::new().with_env_snapshot([
            ("TESSERA_SERVER_PORT", "9090"),
            ("TESSERA_TOKEN_SECRET", SECRET),
            ("TESSERA_SESSION_BACKEND", "redis"),
            ("TESSERA_REDIS_URL", "redis://cache:6379"),
            ("TESSERA_LOG_LEVEL", "warn"),
        ]);

        let config = loader.load_from_env().unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.session.backend, SessionBackend::Redis);
        assert_eq!(config.session.redis_url.unwrap().expose(), "redis://cache:6379");
        assert_eq!(config.logging.level, LogLevel::Warn);
    }

    #[test]
    fn test_invalid_env_override() {
        let loader = ConfigLoader::new().with_env_snapshot([
            ("TESSERA_SERVER_PORT", "not-a-port"),
            ("TESSERA_TOKEN_SECRET", SECRET),
        ]);

        let err = loader.load_from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar { ref name, .. } if name == "TESSERA_SERVER_PORT"));
    }

    #[test]
    fn test_env_vars_disabled() {
        let loader = ConfigLoader::new()
            .with_env_vars(false)
            .with_env_snapshot([("TESSERA_SERVER_PORT", "9090")]);
        let json = format!(r#"{{"security":{{"token_secret":"{}"}}}}"#, SECRET);

        let config = loader.load_from_str(&json, ConfigFormat::Json).unwrap();
        assert_eq!(config.server.port, crate::schema::DEFAULT_SERVER_PORT);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = format!("security:\n  token_secret: \"{}\"\nbogus: 1\n", SECRET);
        let err = isolated().load_from_str(&yaml, ConfigFormat::Yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Serialization { .. }));
    }

    #[test]
    fn test_file_not_found() {
        let result = isolated().load("/nonexistent/path/config.yaml");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_validation_runs_after_overrides() {
        let yaml = "server:\n  port: 8080\n";
        let err = isolated().load_from_str(yaml, ConfigFormat::Yaml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { .. }));
    }
}
