// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Stores that fail on demand.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tessera_core::{CoreError, CoreResult, MemorySessionStore, SessionStore};

/// A session store that forwards to memory until told to fail.
///
/// While failing, every operation returns a store error.
#[derive(Debug, Default)]
pub struct FlakySessionStore {
    inner: MemorySessionStore,
    failing: AtomicBool,
}

impl FlakySessionStore {
    /// Creates a healthy store.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Makes every subsequent call fail or succeed.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of live entries in the backing store.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the backing store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    fn check(&self) -> CoreResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CoreError::store("session store unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStore for FlakySessionStore {
    async fn put(&self, token: &str, user_id: &str, ttl: Duration) -> CoreResult<()> {
        self.check()?;
        self.inner.put(token, user_id, ttl).await
    }

    async fn lookup(&self, token: &str) -> CoreResult<Option<String>> {
        self.check()?;
        self.inner.lookup(token).await
    }

    async fn remove(&self, token: &str) -> CoreResult<bool> {
        self.check()?;
        self.inner.remove(token).await
    }

    async fn ping(&self) -> CoreResult<()> {
        self.check()
    }

    fn name(&self) -> &'static str {
        "flaky"
    }
}
