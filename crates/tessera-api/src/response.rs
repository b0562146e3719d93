// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API response types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

// =============================================================================
// WebResponse
// =============================================================================

/// Envelope for every response body.
///
/// Exactly one of `data` and `errors` is non-null; both keys are always
/// serialized.
#[derive(Debug, Serialize, Deserialize)]
pub struct WebResponse<T> {
    /// Payload on success.
    pub data: Option<T>,
    /// Error message on failure.
    pub errors: Option<String>,
}

impl<T> WebResponse<T> {
    /// Creates a successful response with data.
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            errors: None,
        }
    }

    /// Creates an error response.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            data: None,
            errors: Some(message.into()),
        }
    }
}

impl<T: Serialize> IntoResponse for WebResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

// =============================================================================
// Health Response
// =============================================================================

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` when every component answered, `degraded` otherwise.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Per-store status.
    pub components: Vec<ComponentStatus>,
}

impl HealthResponse {
    /// Builds a response from component checks.
    pub fn from_components(components: Vec<ComponentStatus>) -> Self {
        let healthy = components.iter().all(|c| c.healthy);
        Self {
            status: if healthy { "ok" } else { "degraded" }.to_string(),
            version: crate::VERSION.to_string(),
            components,
        }
    }

    /// Returns `true` if every component is healthy.
    pub fn is_healthy(&self) -> bool {
        self.status == "ok"
    }
}

/// Status of a single backing store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentStatus {
    /// Component name (`users` or `sessions`).
    pub name: String,
    /// Backend name.
    pub backend: String,
    /// Whether the component answered a ping.
    pub healthy: bool,
    /// `unavailable` when the ping failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
