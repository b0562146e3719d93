// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Service runtime orchestration.
//!
//! - Configuration loading
//! - User and session store selection
//! - Session manager and user service wiring
//! - API server with graceful shutdown

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use tessera_api::{ApiConfig, ApiServer};
use tessera_config::{
    ConfigError, DatabaseConfig, SessionBackend, SessionSettings, TesseraConfig, UserBackend,
    load_config,
};
use tessera_core::{
    MemorySessionStore, MemoryUserRepository, SessionConfig, SessionManager, SessionStore,
    UserRepository, UserService,
};

use crate::error::{BinError, BinResult};
use crate::shutdown::ShutdownCoordinator;

// =============================================================================
// ServiceComponents
// =============================================================================

/// Everything the HTTP layer needs, wired from configuration.
#[derive(Clone)]
pub struct ServiceComponents {
    /// User use cases.
    pub users: UserService,
    /// Session token lifecycle.
    pub sessions: Arc<SessionManager>,
}

impl ServiceComponents {
    /// Connects the configured stores and builds the service layer.
    pub async fn from_config(config: &TesseraConfig) -> BinResult<Self> {
        let users = user_repository(&config.database)
            .await
            .map_err(|e| e.with_context("user store"))?;

        let store = session_store(&config.session)
            .await
            .map_err(|e| e.with_context("session store"))?;

        let secret = config
            .security
            .token_secret
            .as_ref()
            .ok_or_else(|| ConfigError::missing_field("security.token_secret"))?;

        let session_config = SessionConfig::new(secret.expose())
            .with_token_lifetime(config.session.token_lifetime)
            .with_store_ttl(config.session.store_ttl);

        let sessions = Arc::new(SessionManager::new(session_config, store)?);

        info!(
            users = users.name(),
            sessions = sessions.store().name(),
            "Stores ready"
        );

        Ok(Self {
            users: UserService::new(users, sessions.clone()),
            sessions,
        })
    }
}

async fn user_repository(config: &DatabaseConfig) -> BinResult<Arc<dyn UserRepository>> {
    match config.backend {
        UserBackend::Memory => Ok(Arc::new(MemoryUserRepository::new())),
        UserBackend::Postgres => postgres_repository(config).await,
    }
}

#[cfg(feature = "postgres")]
async fn postgres_repository(config: &DatabaseConfig) -> BinResult<Arc<dyn UserRepository>> {
    let url = config
        .url
        .as_ref()
        .ok_or_else(|| ConfigError::missing_field("database.url"))?;

    let repository =
        tessera_core::PostgresUserRepository::connect(url.expose(), config.max_connections)
            .await?;

    if config.migrate {
        repository.migrate().await?;
    }

    Ok(Arc::new(repository))
}

#[cfg(not(feature = "postgres"))]
async fn postgres_repository(_config: &DatabaseConfig) -> BinResult<Arc<dyn UserRepository>> {
    Err(BinError::config(
        "database.backend is 'postgres' but this build lacks the `postgres` feature",
    ))
}

async fn session_store(config: &SessionSettings) -> BinResult<Arc<dyn SessionStore>> {
    match config.backend {
        SessionBackend::Memory => Ok(Arc::new(MemorySessionStore::new())),
        SessionBackend::Redis => redis_store(config).await,
    }
}

#[cfg(feature = "redis")]
async fn redis_store(config: &SessionSettings) -> BinResult<Arc<dyn SessionStore>> {
    let url = config
        .redis_url
        .as_ref()
        .ok_or_else(|| ConfigError::missing_field("session.redis_url"))?;

    let store = tessera_core::RedisSessionStore::connect(url.expose())
        .await?
        .with_key_prefix(config.key_prefix.clone());

    Ok(Arc::new(store))
}

#[cfg(not(feature = "redis"))]
async fn redis_store(_config: &SessionSettings) -> BinResult<Arc<dyn SessionStore>> {
    Err(BinError::config(
        "session.backend is 'redis' but this build lacks the `redis` feature",
    ))
}

// =============================================================================
// TesseraRuntime
// =============================================================================

/// Runs the service until shutdown.
pub struct TesseraRuntime {
    config: Arc<TesseraConfig>,
    shutdown: ShutdownCoordinator,
}

impl TesseraRuntime {
    /// Creates a runtime over a loaded configuration.
    pub fn new(config: TesseraConfig) -> Self {
        Self {
            config: Arc::new(config),
            shutdown: ShutdownCoordinator::new(),
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &TesseraConfig {
        &self.config
    }

    /// Returns the shutdown coordinator.
    pub fn shutdown(&self) -> &ShutdownCoordinator {
        &self.shutdown
    }

    /// Binds the configured address and serves until SIGINT or SIGTERM.
    pub async fn run(self) -> BinResult<()> {
        let addr = self.config.server.socket_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| BinError::init(format!("Failed to bind {}: {}", addr, e)))?;

        let signals = self.shutdown.clone();
        tokio::spawn(async move { signals.wait_for_shutdown().await });

        self.serve(listener).await
    }

    /// Serves on `listener` until shutdown is initiated.
    pub async fn serve(self, listener: TcpListener) -> BinResult<()> {
        info!(
            "Starting {} v{} ({})",
            self.config.app.name,
            tessera_core::VERSION,
            self.config.app.environment
        );

        let components = ServiceComponents::from_config(&self.config).await?;

        let server = ApiServer::builder()
            .config(ApiConfig::from(&self.config.server))
            .users(components.users)
            .build()?;

        let result = server
            .serve(listener, self.shutdown.shutdown_signal().wait())
            .await;

        self.shutdown.initiate_shutdown();

        info!("Tessera shutdown complete");
        result.map_err(BinError::from)
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for [`TesseraRuntime`].
#[derive(Default)]
pub struct RuntimeBuilder {
    config_path: Option<PathBuf>,
    config: Option<TesseraConfig>,
    port: Option<u16>,
}

impl RuntimeBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from `path`.
    pub fn config_path(mut self, path: impl AsRef<Path>) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Uses an already loaded configuration.
    pub fn config(mut self, config: TesseraConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Overrides the listen port.
    pub fn port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    /// Builds the runtime.
    pub fn build(self) -> BinResult<TesseraRuntime> {
        let mut config = match self.config {
            Some(cfg) => cfg,
            None => {
                let path = self
                    .config_path
                    .ok_or_else(|| BinError::config("No configuration provided"))?;

                load_config(&path).map_err(|e| {
                    BinError::from(e).with_context(format!("Failed to load {}", path.display()))
                })?
            }
        };

        if let Some(port) = self.port {
            config.server.port = port;
        }

        Ok(TesseraRuntime::new(config))
    }
}
