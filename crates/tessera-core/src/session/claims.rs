// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session token claims.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims embedded in a session token.
///
/// Decoded exactly once by the session manager; a token whose payload does
/// not match this shape is rejected as malformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: the owning user ID.
    pub sub: String,

    /// Expiration time (Unix timestamp, seconds).
    pub exp: i64,

    /// Issued at time (Unix timestamp, seconds).
    pub iat: i64,

    /// Issuer.
    pub iss: String,

    /// Token ID. Keeps two tokens issued in the same second distinct.
    pub jti: String,
}

impl SessionClaims {
    /// Creates claims for `user_id` expiring `expires_in_secs` from now.
    pub fn new(user_id: impl Into<String>, issuer: impl Into<String>, expires_in_secs: i64) -> Self {
        let now = Utc::now().timestamp();

        Self {
            sub: user_id.into(),
            exp: now + expires_in_secs,
            iat: now,
            iss: issuer.into(),
            jti: Uuid::now_v7().to_string(),
        }
    }
}
