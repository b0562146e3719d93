// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Application state shared across handlers.

use std::sync::Arc;

use tessera_core::{SessionManager, UserService};

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};

// =============================================================================
// AppState
// =============================================================================

/// Shared application state.
///
/// Cloned into every handler; all fields are cheap handles.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: Arc<ApiConfig>,
    /// User use cases.
    pub users: UserService,
    /// Session manager used by the auth gate.
    pub sessions: Arc<SessionManager>,
}

impl AppState {
    /// Creates a new state builder.
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }

    /// Returns the user service.
    pub fn users(&self) -> &UserService {
        &self.users
    }

    /// Returns the session manager.
    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }
}

// =============================================================================
// AppStateBuilder
// =============================================================================

/// Builder for [`AppState`].
pub struct AppStateBuilder {
    config: Option<ApiConfig>,
    users: Option<UserService>,
}

impl AppStateBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            config: None,
            users: None,
        }
    }

    /// Sets the API configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the user service. Its session manager also backs the auth gate.
    pub fn users(mut self, users: UserService) -> Self {
        self.users = Some(users);
        self
    }

    /// Builds the state.
    pub fn build(self) -> ApiResult<AppState> {
        let config = self.config.unwrap_or_default();
        let users = self
            .users
            .ok_or_else(|| ApiError::internal("user service is not configured"))?;
        let sessions = users.sessions().clone();

        Ok(AppState {
            config: Arc::new(config),
            users,
            sessions,
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// FromRef implementations for extracting parts of state
// =============================================================================

impl axum::extract::FromRef<AppState> for Arc<SessionManager> {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

impl axum::extract::FromRef<AppState> for UserService {
    fn from_ref(state: &AppState) -> Self {
        state.users.clone()
    }
}

// =============================================================================
// Tests
// =============================================================================
