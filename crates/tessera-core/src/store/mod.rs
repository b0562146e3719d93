// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Storage abstractions.
//!
//! Two seams, each with an in-memory backend and a feature-gated network
//! backend:
//!
//! | Trait              | Memory                    | Network                                |
//! |--------------------|---------------------------|----------------------------------------|
//! | [`UserRepository`] | [`MemoryUserRepository`]  | `PostgresUserRepository` (`postgres`)  |
//! | [`SessionStore`]   | [`MemorySessionStore`]    | `RedisSessionStore` (`redis`)          |

use std::time::Duration;

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::User;

mod memory;
#[cfg(feature = "postgres")]
mod postgres;
#[cfg(feature = "redis")]
mod redis;

pub use memory::{MemorySessionStore, MemoryUserRepository};
#[cfg(feature = "postgres")]
pub use postgres::PostgresUserRepository;
#[cfg(feature = "redis")]
pub use redis::RedisSessionStore;

// =============================================================================
// UserRepository
// =============================================================================

/// Relational store of user records.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a new user. Fails with `Conflict` if the ID is taken.
    async fn insert(&self, user: &User) -> CoreResult<()>;

    /// Looks up a user by ID.
    async fn find_by_id(&self, id: &str) -> CoreResult<Option<User>>;

    /// Overwrites an existing user. Fails with `NotFound` if the ID is unknown.
    async fn update(&self, user: &User) -> CoreResult<()>;

    /// Returns the number of stored users.
    async fn count(&self) -> CoreResult<u64>;

    /// Checks connectivity.
    async fn ping(&self) -> CoreResult<()> {
        Ok(())
    }

    /// Backend name for logs and health output.
    fn name(&self) -> &'static str;
}

// =============================================================================
// SessionStore
// =============================================================================

/// Key-value store of live session tokens.
///
/// Keys are token strings, values are the owning user ID. An entry that has
/// outlived its TTL must behave exactly like a missing one.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Stores `token -> user_id` with the given TTL, replacing any entry.
    async fn put(&self, token: &str, user_id: &str, ttl: Duration) -> CoreResult<()>;

    /// Returns the owner of a live token.
    async fn lookup(&self, token: &str) -> CoreResult<Option<String>>;

    /// Returns `true` if the token is live.
    async fn exists(&self, token: &str) -> CoreResult<bool> {
        Ok(self.lookup(token).await?.is_some())
    }

    /// Deletes a token. Returns `true` if a live entry was removed.
    async fn remove(&self, token: &str) -> CoreResult<bool>;

    /// Checks connectivity.
    async fn ping(&self) -> CoreResult<()> {
        Ok(())
    }

    /// Backend name for logs and health output.
    fn name(&self) -> &'static str;
}
