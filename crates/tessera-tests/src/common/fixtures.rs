// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Pre-built test data.

use serde_json::{Value, json};
use tessera_core::{LoginUserRequest, RegisterUserRequest, SessionConfig};

/// Signing secret shared by every fixture.
pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

// =============================================================================
// Users
// =============================================================================

/// A registrant with credentials.
#[derive(Debug, Clone)]
pub struct UserFixture {
    /// User ID.
    pub id: String,
    /// Plaintext password.
    pub password: String,
    /// Display name.
    pub name: String,
}

impl UserFixture {
    /// Creates a fixture.
    pub fn new(id: impl Into<String>, password: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            password: password.into(),
            name: name.into(),
        }
    }

    /// Registration request body.
    pub fn register_body(&self) -> Value {
        json!({ "id": self.id, "password": self.password, "name": self.name })
    }

    /// Login request body.
    pub fn login_body(&self) -> Value {
        json!({ "id": self.id, "password": self.password })
    }

    /// Login body with a wrong password.
    pub fn wrong_password_body(&self) -> Value {
        json!({ "id": self.id, "password": format!("{}-wrong", self.password) })
    }

    /// Typed registration request.
    pub fn register_request(&self) -> RegisterUserRequest {
        RegisterUserRequest {
            id: self.id.clone(),
            password: self.password.clone(),
            name: self.name.clone(),
        }
    }

    /// Typed login request.
    pub fn login_request(&self) -> LoginUserRequest {
        LoginUserRequest {
            id: self.id.clone(),
            password: self.password.clone(),
        }
    }
}

/// Canonical users.
pub struct UserFixtures;

impl UserFixtures {
    /// The user walked through the end-to-end flow.
    pub fn mousetri() -> UserFixture {
        UserFixture::new("Mousetri", "hayolo", "Mousetri janedy")
    }

    /// A second, unrelated user.
    pub fn kerbin() -> UserFixture {
        UserFixture::new("kerbin", "munar-orbit", "Kerbin Kerman")
    }

    /// A user whose ID no other call returns.
    pub fn unique() -> UserFixture {
        let id = super::unique_test_id("user");
        UserFixture::new(id.clone(), "secret-pass", format!("Name of {}", id))
    }
}

// =============================================================================
// Session configuration
// =============================================================================

/// Session settings used by the harness.
pub fn test_session_config() -> SessionConfig {
    SessionConfig::new(TEST_SECRET)
}

// =============================================================================
// Configuration documents
// =============================================================================

/// Configuration documents in every supported format.
pub struct ConfigFixtures;

impl ConfigFixtures {
    /// A complete YAML document.
    pub fn yaml() -> String {
        format!(
            r#"
app:
  name: tessera
  environment: test

server:
  bind_address: "127.0.0.1"
  port: 3100
  request_timeout: 10s
  max_body_size: 65536
  cors:
    enabled: true
    allowed_origins:
      - "https://app.example.com"

database:
  backend: memory

session:
  backend: memory
  token_lifetime: 1h
  store_ttl: 2h

security:
  token_secret: "{}"

logging:
  level: debug
  format: json
"#,
            TEST_SECRET
        )
    }

    /// A minimal TOML document.
    pub fn toml() -> String {
        format!(
            r#"
[server]
port = 3200

[session]
token_lifetime = "15m"
store_ttl = "30m"

[security]
token_secret = "{}"
"#,
            TEST_SECRET
        )
    }

    /// A minimal JSON document.
    pub fn json() -> String {
        json!({
            "server": { "port": 3300 },
            "security": { "token_secret": TEST_SECRET }
        })
        .to_string()
    }

    /// YAML whose secret comes from a placeholder.
    pub fn yaml_with_placeholder(var: &str) -> String {
        format!("security:\n  token_secret: \"${{{}}}\"\n", var)
    }
}
