// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Session Integration Tests
//!
//! Token lifecycle across the session manager, the key-value store and the
//! user record.
//!
//! - `test_token_*`: Issue, validate and revoke
//! - `test_store_*`: Store TTL and eviction
//! - `test_service_*`: Session state as seen through the user service

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use tessera_core::{
    MemorySessionStore, MemoryUserRepository, SessionConfig, SessionManager, SessionStore,
    UpdateUserRequest, UserRepository, UserService,
};
use tessera_tests::prelude::*;

fn manager_with(config: SessionConfig) -> (SessionManager, Arc<MemorySessionStore>) {
    let store = Arc::new(MemorySessionStore::new());
    let manager = SessionManager::new(config, store.clone()).unwrap();
    (manager, store)
}

// =============================================================================
// Tokens
// =============================================================================

#[tokio::test]
async fn test_token_round_trip_and_revoke() {
    let (manager, store) = manager_with(test_session_config());

    let token = manager.issue_token("Mousetri").await.unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(manager.validate_token(&token).await.unwrap(), "Mousetri");

    manager.revoke_token(&token).await.unwrap();
    assert!(store.is_empty());

    let err = manager.validate_token(&token).await.unwrap_err();
    assert!(err.is_unauthorized());

    // Revoking again is not an error.
    manager.revoke_token(&token).await.unwrap();
}

#[tokio::test]
async fn test_token_tokens_for_same_user_are_independent() {
    let (manager, _store) = manager_with(test_session_config());

    let a = manager.issue_token("Mousetri").await.unwrap();
    let b = manager.issue_token("Mousetri").await.unwrap();
    assert_ne!(a, b);

    manager.revoke_token(&a).await.unwrap();
    assert!(manager.validate_token(&a).await.is_err());
    assert_eq!(manager.validate_token(&b).await.unwrap(), "Mousetri");
}

#[tokio::test]
async fn test_token_signed_elsewhere_is_rejected_even_if_stored() {
    let (manager, store) = manager_with(test_session_config());
    let (other, _) = manager_with(SessionConfig::new("another-secret-that-is-long-enough!!"));

    let foreign = other.issue_token("Mousetri").await.unwrap();
    store
        .put(&foreign, "Mousetri", Duration::from_secs(60))
        .await
        .unwrap();

    assert!(manager.validate_token(&foreign).await.unwrap_err().is_unauthorized());
}

#[tokio::test]
async fn test_token_with_past_expiry_is_rejected() {
    let (manager, _store) = manager_with(
        test_session_config()
            .with_token_lifetime(Duration::from_secs(1))
            .with_store_ttl(Duration::from_secs(3600)),
    );

    let token = manager.issue_token("Mousetri").await.unwrap();
    assert!(manager.validate_token(&token).await.is_ok());

    // Expiry is checked against wall-clock seconds with no leeway.
    tokio::time::sleep(Duration::from_millis(2100)).await;
    assert!(manager.validate_token(&token).await.unwrap_err().is_unauthorized());
}

// =============================================================================
// Store
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_store_eviction_invalidates_token() {
    let (manager, store) = manager_with(
        test_session_config()
            .with_token_lifetime(Duration::from_secs(60))
            .with_store_ttl(Duration::from_secs(60)),
    );

    let token = manager.issue_token("Mousetri").await.unwrap();
    assert!(manager.validate_token(&token).await.is_ok());

    tokio::time::advance(Duration::from_secs(61)).await;

    assert!(manager.validate_token(&token).await.unwrap_err().is_unauthorized());
    assert!(!store.exists(&token).await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_store_purge_drops_only_expired_entries() {
    let store = MemorySessionStore::new();
    store.put("short", "a", Duration::from_secs(5)).await.unwrap();
    store.put("long", "b", Duration::from_secs(500)).await.unwrap();

    tokio::time::advance(Duration::from_secs(10)).await;

    assert_eq!(store.purge_expired(), 1);
    assert_eq!(store.len(), 1);
    assert_eq!(store.lookup("long").await.unwrap().as_deref(), Some("b"));
}

// =============================================================================
// Service
// =============================================================================

#[tokio::test]
async fn test_service_logout_clears_record_and_store() {
    let app = TestApp::new();
    let user = UserFixtures::mousetri();
    let token = app.register_and_login(&user).await;

    let stored = app.repository.find_by_id("Mousetri").await.unwrap().unwrap();
    assert_eq!(stored.token.as_deref(), Some(token.as_str()));

    assert!(app.users.logout("Mousetri", &token).await.unwrap());

    let stored = app.repository.find_by_id("Mousetri").await.unwrap().unwrap();
    assert!(stored.token.is_none());
    assert!(app.sessions.validate_token(&token).await.is_err());
}

#[tokio::test]
async fn test_service_update_keeps_session() {
    let app = TestApp::new();
    let token = app.register_and_login(&UserFixtures::mousetri()).await;

    app.users
        .update(
            "Mousetri",
            UpdateUserRequest {
                name: Some("Mouse".into()),
                password: Some("rahasia".into()),
            },
        )
        .await
        .unwrap();

    let stored = app.repository.find_by_id("Mousetri").await.unwrap().unwrap();
    assert_eq!(stored.token.as_deref(), Some(token.as_str()));
    assert_eq!(app.sessions.validate_token(&token).await.unwrap(), "Mousetri");
}

#[tokio::test]
async fn test_service_concurrent_logins_leave_one_live_token() {
    let app = Arc::new(TestApp::new());
    let user = UserFixtures::mousetri();
    assert_eq!(app.register(&user).await.status, StatusCode::OK);

    let mut handles = Vec::new();
    for _ in 0..4 {
        let users = app.users.clone();
        let request = user.login_request();
        handles.push(tokio::spawn(async move { users.login(request).await }));
    }

    let mut tokens = Vec::new();
    for handle in handles {
        tokens.push(handle.await.unwrap().unwrap().token.unwrap());
    }

    let stored = app.repository.find_by_id("Mousetri").await.unwrap().unwrap();
    let current = stored.token.expect("a token should be recorded");
    assert!(tokens.contains(&current));
    assert_eq!(app.sessions.validate_token(&current).await.unwrap(), "Mousetri");

    // Logging out with any one of them ends the recorded session too.
    let presented = tokens
        .iter()
        .find(|t| **t != current)
        .cloned()
        .unwrap_or_else(|| current.clone());
    app.users.logout("Mousetri", &presented).await.unwrap();
    assert!(app.sessions.validate_token(&presented).await.is_err());
    assert!(app.sessions.validate_token(&current).await.is_err());
}

#[tokio::test]
async fn test_service_with_repository_and_store_shared() {
    let repository: Arc<dyn UserRepository> = Arc::new(MemoryUserRepository::new());
    let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
    let sessions = Arc::new(SessionManager::new(test_session_config(), store).unwrap());

    let first = UserService::new(repository.clone(), sessions.clone());
    let second = UserService::new(repository.clone(), sessions);

    let user = UserFixtures::kerbin();
    first.register(user.register_request()).await.unwrap();

    let response = second.login(user.login_request()).await.unwrap();
    assert!(response.token.is_some());
    assert_eq!(repository.count().await.unwrap(), 1);
}
