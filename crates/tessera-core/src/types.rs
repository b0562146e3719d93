// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Persisted domain types.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Returns the current time as Unix epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

// =============================================================================
// User
// =============================================================================

/// A registered identity as stored in the relational store.
///
/// `id` is chosen by the registrant and never changes. `token` mirrors the
/// most recently issued session token and is `None` while logged out.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct User {
    /// Unique user ID (the username).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Argon2 PHC hash of the password.
    pub password: String,
    /// Current session token.
    pub token: Option<String>,
    /// Creation time (epoch milliseconds).
    pub created_at: i64,
    /// Last update time (epoch milliseconds).
    pub updated_at: i64,
}

impl User {
    /// Creates a new user record stamped with the current time.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = now_millis();
        Self {
            id: id.into(),
            name: name.into(),
            password: password_hash.into(),
            token: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Bumps `updated_at` to now.
    ///
    /// The timestamp never moves backwards, so two updates inside the same
    /// millisecond still leave `updated_at >= created_at`.
    pub fn touch(&mut self) {
        self.updated_at = now_millis().max(self.updated_at);
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}
