// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication context.

use uuid::Uuid;

/// Identity resolved by the auth gate for a single request.
///
/// Inserted into request extensions after the session token validates and
/// dropped with the request. Never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Authenticated user ID.
    pub user_id: String,
    /// The session token the request presented.
    pub token: String,
    /// Request ID for tracing.
    pub request_id: Uuid,
}

impl AuthContext {
    /// Creates a context for `user_id` authenticated by `token`, with a fresh
    /// request ID.
    pub fn new(user_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            token: token.into(),
            request_id: Uuid::now_v7(),
        }
    }

    /// Sets the request ID.
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("user_id", &self.user_id)
            .field("token", &"<redacted>")
            .field("request_id", &self.request_id)
            .finish()
    }
}
