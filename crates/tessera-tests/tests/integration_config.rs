// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Config Integration Tests
//!
//! Configuration files on disk through to the components they configure.
//!
//! - `test_config_*`: Parsing each supported format
//! - `test_env_*`: Placeholders and overrides
//! - `test_wiring_*`: Loaded configuration driving the API and sessions

use std::fs;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::time::Duration;

use tessera_api::ApiConfig;
use tessera_config::{
    ConfigError, ConfigLoader, LogFormat, LogLevel, SessionBackend, UserBackend, load_config,
};
use tessera_core::SessionConfig;
use tessera_tests::common::temp_test_dir;
use tessera_tests::prelude::*;

fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

/// A loader isolated from the process environment.
fn isolated_loader() -> ConfigLoader {
    ConfigLoader::new().with_env_snapshot(Vec::<(String, String)>::new())
}

// =============================================================================
// Formats
// =============================================================================

#[test]
fn test_config_yaml_file() {
    let dir = temp_test_dir("tessera-config");
    let path = write(&dir, "tessera.yaml", &ConfigFixtures::yaml());

    let config = isolated_loader().load(&path).unwrap();

    assert_eq!(config.app.environment, "test");
    assert_eq!(config.server.bind_address, IpAddr::V4(Ipv4Addr::LOCALHOST));
    assert_eq!(config.server.port, 3100);
    assert_eq!(config.server.request_timeout, Duration::from_secs(10));
    assert_eq!(config.server.max_body_size, 65536);
    assert!(config.server.cors.enabled);
    assert_eq!(config.database.backend, UserBackend::Memory);
    assert_eq!(config.session.backend, SessionBackend::Memory);
    assert_eq!(config.session.token_lifetime, Duration::from_secs(3600));
    assert_eq!(config.session.store_ttl, Duration::from_secs(7200));
    assert_eq!(config.logging.level, LogLevel::Debug);
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(
        config.security.token_secret.as_ref().unwrap().expose(),
        TEST_SECRET
    );
}

#[test]
fn test_config_toml_file() {
    let dir = temp_test_dir("tessera-config");
    let path = write(&dir, "tessera.toml", &ConfigFixtures::toml());

    let config = isolated_loader().load(&path).unwrap();

    assert_eq!(config.server.port, 3200);
    assert_eq!(config.session.token_lifetime, Duration::from_secs(15 * 60));
    assert_eq!(config.session.store_ttl, Duration::from_secs(30 * 60));
}

#[test]
fn test_config_json_file() {
    let dir = temp_test_dir("tessera-config");
    let path = write(&dir, "tessera.json", &ConfigFixtures::json());

    let config = isolated_loader().load(&path).unwrap();

    assert_eq!(config.server.port, 3300);
    assert_eq!(config.database.backend, UserBackend::Memory);
}

#[test]
fn test_config_unknown_extension() {
    let dir = temp_test_dir("tessera-config");
    let path = write(&dir, "tessera.ini", "port=1");

    let err = load_config(&path).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
}

#[test]
fn test_config_missing_secret_is_rejected() {
    let dir = temp_test_dir("tessera-config");
    let path = write(&dir, "tessera.yaml", "server:\n  port: 3000\n");

    let err = isolated_loader().load(&path).unwrap_err();
    assert!(err.to_string().contains("security.token_secret"));
}

#[test]
fn test_config_store_ttl_shorter_than_lifetime_is_rejected() {
    let dir = temp_test_dir("tessera-config");
    let content = format!(
        "session:\n  token_lifetime: 2h\n  store_ttl: 1h\nsecurity:\n  token_secret: \"{}\"\n",
        TEST_SECRET
    );
    let path = write(&dir, "tessera.yaml", &content);

    let err = isolated_loader().load(&path).unwrap_err();
    assert!(err.to_string().contains("store_ttl"));
}

#[test]
fn test_config_postgres_requires_url() {
    let dir = temp_test_dir("tessera-config");
    let content = format!(
        "database:\n  backend: postgres\nsecurity:\n  token_secret: \"{}\"\n",
        TEST_SECRET
    );
    let path = write(&dir, "tessera.yaml", &content);

    let err = isolated_loader().load(&path).unwrap_err();
    assert!(err.to_string().contains("database.url"));
}

// =============================================================================
// Environment
// =============================================================================

#[test]
fn test_env_placeholder_resolution() {
    let dir = temp_test_dir("tessera-config");
    let path = write(
        &dir,
        "tessera.yaml",
        &ConfigFixtures::yaml_with_placeholder("APP_TOKEN_SECRET"),
    );

    let config = ConfigLoader::new()
        .with_env_snapshot([("APP_TOKEN_SECRET", TEST_SECRET)])
        .load(&path)
        .unwrap();

    assert_eq!(
        config.security.token_secret.as_ref().unwrap().expose(),
        TEST_SECRET
    );
}

#[test]
fn test_env_overrides_win_over_file() {
    let dir = temp_test_dir("tessera-config");
    let path = write(&dir, "tessera.yaml", &ConfigFixtures::yaml());

    let config = ConfigLoader::new()
        .with_env_snapshot([
            ("TESSERA_SERVER_PORT", "4400"),
            ("TESSERA_LOG_LEVEL", "warn"),
            ("TESSERA_TOKEN_SECRET", "override-secret-0123456789abcdefghij"),
        ])
        .load(&path)
        .unwrap();

    assert_eq!(config.server.port, 4400);
    assert_eq!(config.logging.level, LogLevel::Warn);
    assert_eq!(
        config.security.token_secret.as_ref().unwrap().expose(),
        "override-secret-0123456789abcdefghij"
    );
}

#[test]
fn test_env_only_configuration() {
    let config = ConfigLoader::new()
        .with_env_snapshot([("TESSERA_TOKEN_SECRET", TEST_SECRET)])
        .load_from_env()
        .unwrap();

    assert_eq!(config.server.port, 3000);
    assert_eq!(config.database.backend, UserBackend::Memory);
}

// =============================================================================
// Wiring
// =============================================================================

#[test]
fn test_wiring_server_section_to_api_config() {
    let dir = temp_test_dir("tessera-config");
    let path = write(&dir, "tessera.yaml", &ConfigFixtures::yaml());
    let config = isolated_loader().load(&path).unwrap();

    let api = ApiConfig::from(&config.server);

    assert_eq!(api.socket_addr(), config.server.socket_addr());
    assert_eq!(api.request_timeout, Duration::from_secs(10));
    assert_eq!(api.max_body_size, 65536);
    assert!(api.cors.enabled);
    assert_eq!(api.cors.allowed_origins, vec!["https://app.example.com"]);
}

#[tokio::test]
async fn test_wiring_session_lifetimes_from_file() {
    let dir = temp_test_dir("tessera-config");
    let path = write(&dir, "tessera.toml", &ConfigFixtures::toml());
    let config = isolated_loader().load(&path).unwrap();

    let secret = config.security.token_secret.as_ref().unwrap();
    let session_config = SessionConfig::new(secret.expose())
        .with_token_lifetime(config.session.token_lifetime)
        .with_store_ttl(config.session.store_ttl);

    let app = TestApp::with_session_config(session_config);
    assert_eq!(app.sessions.token_lifetime(), Duration::from_secs(15 * 60));
    assert_eq!(app.sessions.store_ttl(), Duration::from_secs(30 * 60));

    let token = app.register_and_login(&UserFixtures::unique()).await;
    assert_data(&app.get("/api/users/_current", Some(&token)).await);
}
