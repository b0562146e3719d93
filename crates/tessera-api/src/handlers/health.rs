// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Health check handler.

use axum::{Json, extract::State};

use crate::response::{ComponentStatus, HealthResponse};
use crate::state::AppState;

/// GET /health
///
/// Always 200 while the process is serving; `status` drops to `degraded`
/// when a store does not answer a ping.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let repository = state.users().repository();
    let store = state.sessions().store();

    let (users, sessions) = tokio::join!(repository.ping(), store.ping());

    let components = vec![
        component("users", repository.name(), users),
        component("sessions", store.name(), sessions),
    ];

    let response = HealthResponse::from_components(components);
    if !response.is_healthy() {
        tracing::warn!("Health check degraded");
    }
    Json(response)
}

/// Reported for a failing component; the cause is logged only.
const UNAVAILABLE: &str = "unavailable";

fn component(
    name: &str,
    backend: &str,
    result: tessera_core::CoreResult<()>,
) -> ComponentStatus {
    let message = result.as_ref().err().map(|e| {
        tracing::warn!(component = name, backend, error = %e, "Health ping failed");
        UNAVAILABLE.to_string()
    });

    ComponentStatus {
        name: name.to_string(),
        backend: backend.to_string(),
        healthy: result.is_ok(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::CoreError;

    #[test]
    fn test_component_hides_error_detail() {
        let status = component(
            "users",
            "postgres",
            Err(CoreError::store("postgres: connection refused (db.internal:5432)")),
        );

        assert!(!status.healthy);
        assert_eq!(status.message.as_deref(), Some(UNAVAILABLE));
    }

    #[test]
    fn test_component_healthy_has_no_message() {
        let status = component("sessions", "memory", Ok(()));
        assert!(status.healthy);
        assert!(status.message.is_none());
    }
}
