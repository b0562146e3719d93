// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API server configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use serde::{Deserialize, Serialize};

// =============================================================================
// ApiConfig
// =============================================================================

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Bind address.
    pub host: IpAddr,
    /// Listen port.
    pub port: u16,
    /// CORS settings.
    pub cors: CorsConfig,
    /// Per-request timeout; a request running longer gets 408.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
    /// Whether to gzip responses.
    pub compression: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 3000,
            cors: CorsConfig::default(),
            request_timeout: Duration::from_secs(30),
            max_body_size: 1024 * 1024, // 1MB
            compression: false,
        }
    }
}

impl ApiConfig {
    /// Creates a default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the socket address.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Sets the bind address.
    pub fn with_host(mut self, host: IpAddr) -> Self {
        self.host = host;
        self
    }

    /// Sets the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl From<&tessera_config::ServerConfig> for ApiConfig {
    fn from(server: &tessera_config::ServerConfig) -> Self {
        Self {
            host: server.bind_address,
            port: server.port,
            cors: CorsConfig {
                enabled: server.cors.enabled,
                allowed_origins: server.cors.allowed_origins.clone(),
                allowed_methods: server.cors.allowed_methods.clone(),
                allowed_headers: server.cors.allowed_headers.clone(),
                max_age: server.cors.max_age_secs,
            },
            request_timeout: server.request_timeout,
            max_body_size: server.max_body_size,
            compression: server.compression,
        }
    }
}

// =============================================================================
// CorsConfig
// =============================================================================

/// CORS settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Whether to install the CORS layer.
    pub enabled: bool,
    /// Allowed origins; `*` allows any.
    pub allowed_origins: Vec<String>,
    /// Allowed methods.
    pub allowed_methods: Vec<String>,
    /// Allowed headers; `*` allows any.
    pub allowed_headers: Vec<String>,
    /// Preflight cache lifetime in seconds.
    pub max_age: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            allowed_origins: vec!["*".to_string()],
            allowed_methods: vec![
                "GET".to_string(),
                "POST".to_string(),
                "PATCH".to_string(),
                "DELETE".to_string(),
            ],
            allowed_headers: vec!["Content-Type".to_string(), "Authorization".to_string()],
            max_age: 3600,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_socket_addr() {
        let config = ApiConfig::default().with_port(8081);
        assert_eq!(config.socket_addr().port(), 8081);
    }

    #[test]
    fn test_from_server_config() {
        let mut server = tessera_config::ServerConfig::default();
        server.port = 9443;
        server.request_timeout = Duration::from_secs(5);
        server.cors.enabled = true;
        server.cors.allowed_origins = vec!["https://app.example.com".to_string()];

        let config = ApiConfig::from(&server);
        assert_eq!(config.port, 9443);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert!(config.cors.enabled);
        assert_eq!(config.cors.allowed_origins, vec!["https://app.example.com"]);
    }
}
