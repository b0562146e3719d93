// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! In-memory store backends.
//!
//! Used by tests and by the `memory` backend setting. Nothing survives a
//! restart.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use tokio::time::Instant;
use tracing::trace;

use super::{SessionStore, UserRepository};
use crate::error::{CoreError, CoreResult};
use crate::types::User;

// =============================================================================
// MemoryUserRepository
// =============================================================================

/// User records in a locked `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(&self, user: &User) -> CoreResult<()> {
        let mut users = self.users.write();
        if users.contains_key(&user.id) {
            return Err(CoreError::conflict(format!("user '{}' already exists", user.id)));
        }
        users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> CoreResult<Option<User>> {
        Ok(self.users.read().get(id).cloned())
    }

    async fn update(&self, user: &User) -> CoreResult<()> {
        match self.users.write().get_mut(&user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(CoreError::not_found(format!("user '{}'", user.id))),
        }
    }

    async fn count(&self) -> CoreResult<u64> {
        Ok(self.users.read().len() as u64)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

// =============================================================================
// MemorySessionStore
// =============================================================================

#[derive(Debug, Clone)]
struct SessionEntry {
    user_id: String,
    expires_at: Instant,
}

impl SessionEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Session tokens in a concurrent map with per-entry deadlines.
///
/// Expired entries are dropped lazily on read, or in bulk by
/// [`purge_expired`](Self::purge_expired). Deadlines use the tokio clock so
/// tests can pause and advance time.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: DashMap<String, SessionEntry>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every expired entry and returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        let purged = before.saturating_sub(self.entries.len());
        if purged > 0 {
            trace!(purged, "Purged expired session entries");
        }
        purged
    }

    /// Returns the number of entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn put(&self, token: &str, user_id: &str, ttl: Duration) -> CoreResult<()> {
        let expires_at = Instant::now()
            .checked_add(ttl)
            .ok_or_else(|| CoreError::configuration("session TTL out of range"))?;

        self.entries.insert(
            token.to_string(),
            SessionEntry {
                user_id: user_id.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn lookup(&self, token: &str) -> CoreResult<Option<String>> {
        let now = Instant::now();
        // Clone out before any removal; holding a shard guard across
        // `remove_if` on the same key would deadlock.
        let entry = self.entries.get(token).map(|e| e.value().clone());

        match entry {
            Some(entry) if !entry.is_expired(now) => Ok(Some(entry.user_id)),
            Some(_) => {
                self.entries.remove_if(token, |_, e| e.is_expired(now));
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn remove(&self, token: &str) -> CoreResult<bool> {
        let now = Instant::now();
        Ok(self
            .entries
            .remove(token)
            .is_some_and(|(_, entry)| !entry.is_expired(now)))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_user_insert_and_find() {
        let repo = MemoryUserRepository::new();
        let user = User::new("Mousetri", "Mousetri janedy", "hash");

        repo.insert(&user).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);

        let found = repo.find_by_id("Mousetri").await.unwrap().unwrap();
        assert_eq!(found, user);
        assert!(repo.find_by_id("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_user_duplicate_insert() {
        let repo = MemoryUserRepository::new();
        let user = User::new("Mousetri", "Mousetri janedy", "hash");

        repo.insert(&user).await.unwrap();
        let err = repo.insert(&user).await.unwrap_err();
        assert!(matches!(err, CoreError::Conflict { .. }));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_user_update() {
        let repo = MemoryUserRepository::new();
        let mut user = User::new("Mousetri", "Mousetri janedy", "hash");

        let err = repo.update(&user).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));

        repo.insert(&user).await.unwrap();
        user.name = "Mouse".to_string();
        repo.update(&user).await.unwrap();

        let found = repo.find_by_id("Mousetri").await.unwrap().unwrap();
        assert_eq!(found.name, "Mouse");
    }

    #[tokio::test]
    async fn test_session_put_lookup_remove() {
        let store = MemorySessionStore::new();

        store.put("tok", "Mousetri", Duration::from_secs(60)).await.unwrap();
        assert_eq!(store.lookup("tok").await.unwrap().as_deref(), Some("Mousetri"));
        assert!(store.exists("tok").await.unwrap());

        assert!(store.remove("tok").await.unwrap());
        assert!(!store.remove("tok").await.unwrap());
        assert!(!store.exists("tok").await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_ttl_expiry() {
        let store = MemorySessionStore::new();
        store.put("tok", "Mousetri", Duration::from_secs(10)).await.unwrap();

        tokio::time::advance(Duration::from_secs(9)).await;
        assert!(store.exists("tok").await.unwrap());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(!store.exists("tok").await.unwrap());
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_purge_expired() {
        let store = MemorySessionStore::new();
        store.put("short", "a", Duration::from_secs(5)).await.unwrap();
        store.put("long", "b", Duration::from_secs(500)).await.unwrap();

        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.exists("long").await.unwrap());
    }

    #[tokio::test]
    async fn test_session_put_rejects_unrepresentable_ttl() {
        let store = MemorySessionStore::new();

        let err = store
            .put("tok", "a", Duration::from_secs(u64::MAX))
            .await
            .unwrap_err();
        assert!(err.is_internal());
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_put_replaces_ttl() {
        let store = MemorySessionStore::new();
        store.put("tok", "a", Duration::from_secs(5)).await.unwrap();
        store.put("tok", "a", Duration::from_secs(50)).await.unwrap();

        tokio::time::advance(Duration::from_secs(10)).await;
        assert!(store.exists("tok").await.unwrap());
    }
}
