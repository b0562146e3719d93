// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # tessera-config
//!
//! Configuration management for the Tessera account service.
//!
//! ## Features
//!
//! - **Schema Definition**: typed sections with per-section validation
//! - **Multi-Format Support**: YAML, TOML, and JSON configuration files
//! - **Environment Overrides**: `TESSERA_*` variables win over file values
//! - **Placeholders**: `${VAR}` and `${VAR:default}` inside the file
//!
//! ## Quick Start
//!
//! ```no_run
//! use tessera_config::loader::load_config;
//!
//! let config = load_config("tessera.yaml").unwrap();
//! println!("Listening on {}", config.server.socket_addr());
//! ```
//!
//! ## Configuration Schema
//!
//! - `app` - Service name and environment label
//! - `server` - HTTP bind address, timeouts, CORS
//! - `database` - User record store (`memory` or `postgres`)
//! - `session` - Token store (`memory` or `redis`), token lifetime, store TTL
//! - `security` - Token signing secret
//! - `logging` - Level and format
//!
//! ```yaml
//! security:
//!   token_secret: "${TESSERA_SECRET}"
//! session:
//!   backend: redis
//!   redis_url: "${REDIS_URL:redis://127.0.0.1:6379}"
//!   token_lifetime: 30days
//!   store_ttl: 31days
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod error;
pub mod loader;
pub mod schema;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigFormat, ConfigLoader, load_config, load_config_str};
pub use schema::{
    AppConfig, CorsConfig, DatabaseConfig, LogFormat, LogLevel, LoggingConfig, SecretValue,
    SecurityConfig, ServerConfig, SessionBackend, SessionSettings, TesseraConfig, UserBackend,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
