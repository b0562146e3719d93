// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Errors raised while reading, parsing and validating a Tessera config.

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong between a config path and a validated
/// [`TesseraConfig`](crate::TesseraConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file is not valid YAML/TOML/JSON for the schema.
    #[error("Failed to parse config file '{path}': {message}")]
    Parse {
        /// Offending file.
        path: PathBuf,
        /// Deserializer message.
        message: String,
    },

    /// A value parsed but is out of range or inconsistent.
    #[error("Validation failed for '{field}': {message}")]
    Validation {
        /// Dotted path of the field, e.g. `session.store_ttl`.
        field: String,
        /// Error message.
        message: String,
    },

    /// A setting the service cannot start without is absent.
    #[error("Missing required field: {field}")]
    MissingField {
        /// Dotted path of the field.
        field: String,
    },

    /// The file exists but could not be read.
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A `TESSERA_*` override could not be parsed.
    #[error("Invalid environment variable value for '{name}': {message}")]
    InvalidEnvVar {
        /// Variable name.
        name: String,
        /// Error message.
        message: String,
    },

    /// No file at the given path.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Requested path.
        path: PathBuf,
    },

    /// The extension is not one of yaml, yml, toml or json.
    #[error("Unsupported configuration format: {format}")]
    UnsupportedFormat {
        /// Extension as given.
        format: String,
    },

    /// Parsing an in-memory string failed.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message.
        message: String,
    },
}

impl ConfigError {
    /// Creates a parse error.
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField { field: field.into() }
    }

    /// Creates an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid environment variable error.
    pub fn invalid_env_var(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEnvVar {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a file not found error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Creates an unsupported format error.
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// Creates a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Returns `true` if the error came from reading or parsing the file
    /// rather than from its contents.
    pub fn is_source_error(&self) -> bool {
        matches!(
            self,
            ConfigError::Io { .. }
                | ConfigError::FileNotFound { .. }
                | ConfigError::UnsupportedFormat { .. }
                | ConfigError::Parse { .. }
        )
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::validation("server.port", "cannot be zero");
        assert_eq!(err.to_string(), "Validation failed for 'server.port': cannot be zero");

        let err = ConfigError::missing_field("security.token_secret");
        assert_eq!(err.to_string(), "Missing required field: security.token_secret");
    }

    #[test]
    fn test_is_source_error() {
        assert!(ConfigError::file_not_found("/tmp/x.yaml").is_source_error());
        assert!(ConfigError::unsupported_format("ini").is_source_error());
        assert!(!ConfigError::validation("a", "b").is_source_error());
    }
}
