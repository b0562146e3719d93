// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session token lifecycle.
//!
//! - [`SessionClaims`]: the typed payload of a signed token
//! - [`SessionConfig`]: secret, lifetime and store TTL
//! - [`SessionManager`]: issue, validate and revoke tokens

mod claims;
mod manager;

pub use claims::SessionClaims;
pub use manager::{
    DEFAULT_STORE_TTL, DEFAULT_TOKEN_LIFETIME, MAX_SESSION_DURATION, SessionConfig, SessionManager,
};
