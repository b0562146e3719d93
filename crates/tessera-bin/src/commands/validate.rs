// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `validate` command.

use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tessera_config::schema::MIN_SECRET_LENGTH;
use tessera_config::{SessionBackend, TesseraConfig, UserBackend, load_config};

use crate::cli::{Cli, OutputFormat, ValidateArgs};
use crate::error::{BinError, BinResult};

/// Paths of secret-bearing fields, masked in printed output.
const SECRET_FIELDS: &[(&str, &str)] = &[
    ("security", "token_secret"),
    ("database", "url"),
    ("session", "redis_url"),
];

/// A validated configuration plus advisory warnings.
#[derive(Debug)]
pub struct ValidationReport {
    /// Where the configuration was read from.
    pub config_path: PathBuf,
    /// The parsed configuration.
    pub config: TesseraConfig,
    /// Issues that do not stop the service from starting.
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Collects warnings for an already validated configuration.
    pub fn inspect(config_path: impl AsRef<Path>, config: TesseraConfig) -> Self {
        let mut warnings = Vec::new();

        if let Some(secret) = &config.security.token_secret {
            if secret.len() < MIN_SECRET_LENGTH {
                warnings.push(format!(
                    "security.token_secret is shorter than {} bytes",
                    MIN_SECRET_LENGTH
                ));
            }
        }

        match config.database.backend {
            UserBackend::Memory => {
                warnings.push("User records are kept in memory and lost on restart".to_string())
            }
            UserBackend::Postgres if !cfg!(feature = "postgres") => warnings.push(
                "database.backend is 'postgres' but this build lacks the `postgres` feature"
                    .to_string(),
            ),
            UserBackend::Postgres => {}
        }

        match config.session.backend {
            SessionBackend::Memory => warnings
                .push("Session tokens are kept in memory and lost on restart".to_string()),
            SessionBackend::Redis if !cfg!(feature = "redis") => warnings.push(
                "session.backend is 'redis' but this build lacks the `redis` feature".to_string(),
            ),
            SessionBackend::Redis => {}
        }

        if config.server.cors.enabled
            && config.server.cors.allowed_origins.iter().any(|o| o == "*")
        {
            warnings.push("CORS allows any origin".to_string());
        }

        Self {
            config_path: config_path.as_ref().to_path_buf(),
            config,
            warnings,
        }
    }

    /// Renders the report as JSON. Secrets are masked.
    pub fn to_json(&self, show_config: bool) -> Value {
        let config = if show_config {
            Some(redacted_config(&self.config))
        } else {
            None
        };

        json!({
            "valid": true,
            "config_path": self.config_path.display().to_string(),
            "summary": {
                "app_name": self.config.app.name,
                "environment": self.config.app.environment,
                "listen": self.config.server.socket_addr().to_string(),
                "user_backend": self.config.database.backend.as_str(),
                "session_backend": self.config.session.backend.as_str(),
                "token_lifetime_secs": self.config.session.token_lifetime.as_secs(),
                "store_ttl_secs": self.config.session.store_ttl.as_secs(),
            },
            "warnings": self.warnings,
            "config": config,
        })
    }

    fn print_text(&self, show_config: bool) {
        let config = &self.config;

        println!("✓ Configuration is valid: {}", self.config_path.display());
        println!();
        println!("Summary:");
        println!("  App: {} ({})", config.app.name, config.app.environment);
        println!("  Listen: {}", config.server.socket_addr());
        println!("  User store: {}", config.database.backend.as_str());
        println!("  Session store: {}", config.session.backend.as_str());
        println!(
            "  Token lifetime: {}s (store TTL {}s)",
            config.session.token_lifetime.as_secs(),
            config.session.store_ttl.as_secs()
        );

        if !self.warnings.is_empty() {
            println!();
            println!("Warnings:");
            for warning in &self.warnings {
                println!("  ⚠ {}", warning);
            }
        }

        if show_config {
            println!();
            println!("Parsed configuration:");
            println!("{:#?}", config);
        }
    }
}

fn redacted_config(config: &TesseraConfig) -> Value {
    let mut value = serde_json::to_value(config).unwrap_or(Value::Null);

    for (section, field) in SECRET_FIELDS {
        if let Some(slot) = value.get_mut(*section).and_then(|s| s.get_mut(*field)) {
            if !slot.is_null() {
                *slot = Value::String("***".to_string());
            }
        }
    }
    value
}

/// Loads the configuration file and reports on it.
pub fn validate(cli: &Cli, args: ValidateArgs) -> BinResult<()> {
    let config_path = &cli.config;

    if !config_path.exists() {
        return Err(BinError::config(format!(
            "Configuration file not found: {}",
            config_path.display()
        )));
    }

    let config = load_config(config_path).map_err(|e| {
        if e.is_source_error() {
            BinError::config(format!("Could not read configuration: {}", e))
        } else {
            BinError::config(format!("Configuration validation failed: {}", e))
        }
    })?;

    let report = ValidationReport::inspect(config_path, config);

    match args.format {
        OutputFormat::Text => report.print_text(args.show_config),
        OutputFormat::Json => {
            let output = serde_json::to_string_pretty(&report.to_json(args.show_config))
                .map_err(|e| BinError::runtime(format!("Failed to render report: {}", e)))?;
            println!("{}", output);
        }
    }

    if args.strict && !report.warnings.is_empty() {
        return Err(BinError::config(format!(
            "Strict mode: {} warning(s) found",
            report.warnings.len()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tessera_config::SecretValue;

    fn secret(value: &str) -> Option<SecretValue> {
        Some(SecretValue::new(value))
    }

    fn cli_for(path: &Path, extra: &[&str]) -> (Cli, ValidateArgs) {
        let mut argv = vec!["tessera", "-c", path.to_str().unwrap(), "validate"];
        argv.extend_from_slice(extra);
        let cli = Cli::parse_from(argv);
        let args = match cli.effective_command() {
            crate::cli::Commands::Validate(args) => args,
            other => panic!("expected Validate command, got {:?}", other),
        };
        (cli, args)
    }

    #[test]
    fn test_warnings_for_memory_backends_and_short_secret() {
        let mut config = TesseraConfig::default();
        config.security.token_secret = secret("short");

        let report = ValidationReport::inspect("tessera.yaml", config);

        assert_eq!(report.warnings.len(), 3);
        assert!(report.warnings[0].contains("token_secret"));
    }

    #[test]
    fn test_json_report_masks_secrets() {
        let mut config = TesseraConfig::default();
        config.security.token_secret = secret("a-long-enough-secret-for-the-report-test");
        config.session.redis_url = secret("redis://:hunter2@cache:6379");

        let report = ValidationReport::inspect("tessera.yaml", config);
        let json = report.to_json(true);

        assert_eq!(json["valid"], true);
        assert_eq!(json["summary"]["session_backend"], "memory");
        assert_eq!(json["config"]["security"]["token_secret"], "***");
        assert_eq!(json["config"]["session"]["redis_url"], "***");
        assert!(json["config"]["database"]["url"].is_null());
        assert!(!json.to_string().contains("hunter2"));

        assert!(report.to_json(false)["config"].is_null());
    }

    #[test]
    fn test_validate_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "security:\n  token_secret: \"validate-command-secret-0123456789abcdef\""
        )
        .unwrap();

        let (cli, args) = cli_for(file.path(), &["-f", "json"]);
        assert!(validate(&cli, args).is_ok());

        let (cli, args) = cli_for(file.path(), &["--strict"]);
        let err = validate(&cli, args).unwrap_err();
        assert!(err.to_string().contains("Strict mode"));
    }

    #[test]
    fn test_validate_missing_file() {
        let (cli, args) = cli_for(Path::new("/nonexistent/tessera.yaml"), &[]);
        let err = validate(&cli, args).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_validate_rejects_invalid_config() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "server:\n  port: 8080").unwrap();

        let (cli, args) = cli_for(file.path(), &[]);
        let err = validate(&cli, args).unwrap_err();
        assert!(err.to_string().contains("validation failed"));
    }

    #[test]
    fn test_validate_reports_unreadable_format() {
        let mut file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        writeln!(file, "port=8080").unwrap();

        let (cli, args) = cli_for(file.path(), &[]);
        let err = validate(&cli, args).unwrap_err();
        assert!(err.to_string().contains("Could not read configuration"));
    }
}
