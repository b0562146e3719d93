// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session token authentication middleware.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::{Request, header},
    response::{IntoResponse, Response},
};
use tessera_core::SessionManager;
use tower::{Layer, Service};
use uuid::Uuid;

use crate::context::AuthContext;
use crate::error::ApiError;

// =============================================================================
// AuthLayer
// =============================================================================

/// Layer that gates a route behind a live session token.
///
/// Apply it with `route_layer` on the protected method routers only; every
/// request reaching the wrapped service is authenticated.
#[derive(Clone)]
pub struct AuthLayer {
    sessions: Arc<SessionManager>,
}

impl AuthLayer {
    /// Creates a new auth layer.
    pub fn new(sessions: Arc<SessionManager>) -> Self {
        Self { sessions }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            sessions: self.sessions.clone(),
        }
    }
}

// =============================================================================
// AuthMiddleware
// =============================================================================

/// Middleware for session token authentication.
#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    sessions: Arc<SessionManager>,
}

impl<S> Service<Request<Body>> for AuthMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let sessions = self.sessions.clone();
        // Swap in the clone so the instance that was polled ready handles this call.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let request_id = Uuid::now_v7();

            let Some(token) = extract_token(&req) else {
                tracing::debug!(%request_id, "No authorization token provided");
                return Ok(ApiError::unauthorized("missing authorization header").into_response());
            };

            let user_id = match sessions.validate_token(&token).await {
                Ok(user_id) => user_id,
                Err(e) => {
                    tracing::debug!(%request_id, error = %e, "Token validation failed");
                    return Ok(ApiError::from(e).into_response());
                }
            };

            tracing::trace!(%request_id, user_id = %user_id, "Request authenticated");
            req.extensions_mut()
                .insert(AuthContext::new(user_id, token).with_request_id(request_id));

            inner.call(req).await
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Extracts the session token from the `Authorization` header.
///
/// Accepts a raw token or one prefixed with `Bearer `. Returns `None` if the
/// header is absent, not valid UTF-8, or empty.
pub fn extract_token<B>(req: &Request<B>) -> Option<String> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .trim();

    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    (!token.is_empty()).then(|| token.to_string())
}

// =============================================================================
// Tests
// =============================================================================
