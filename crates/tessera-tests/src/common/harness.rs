// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Harness
//!
//! [`TestApp`] wires the full router over in-memory stores and drives it
//! in-process with `tower::ServiceExt::oneshot`. The stores stay reachable
//! so tests can inspect state the HTTP surface does not expose.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use tessera_api::{ApiConfig, ApiServer};
use tessera_core::{
    MemorySessionStore, MemoryUserRepository, SessionConfig, SessionManager, SessionStore,
    UserRepository, UserService,
};

use super::fixtures::{UserFixture, test_session_config};

// =============================================================================
// TestResponse
// =============================================================================

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    /// Status code.
    pub status: StatusCode,
    /// Body parsed as JSON, `Value::Null` when it is not JSON.
    pub body: Value,
}

impl TestResponse {
    /// The `data` member of the envelope.
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// The `errors` member of the envelope.
    pub fn errors(&self) -> &Value {
        &self.body["errors"]
    }
}

// =============================================================================
// TestApp
// =============================================================================

/// The account API over in-memory stores.
pub struct TestApp {
    router: Router,
    /// User use cases behind the router.
    pub users: UserService,
    /// Session manager behind the router.
    pub sessions: Arc<SessionManager>,
    /// The user repository.
    pub repository: Arc<MemoryUserRepository>,
}

impl TestApp {
    /// Creates an app with in-memory stores and default settings.
    pub fn new() -> Self {
        Self::with_session_config(test_session_config())
    }

    /// Creates an app whose session manager uses `config`.
    pub fn with_session_config(config: SessionConfig) -> Self {
        Self::with_stores(config, Arc::new(MemorySessionStore::new()))
    }

    /// Creates an app over a specific session store.
    pub fn with_stores(config: SessionConfig, store: Arc<dyn SessionStore>) -> Self {
        super::init_test_logging();

        let repository = Arc::new(MemoryUserRepository::new());
        let sessions = Arc::new(
            SessionManager::new(config, store).expect("session configuration should be valid"),
        );
        let users = UserService::new(
            repository.clone() as Arc<dyn UserRepository>,
            sessions.clone(),
        );

        let server = ApiServer::builder()
            .config(ApiConfig::default())
            .users(users.clone())
            .build()
            .expect("server should build");

        Self {
            router: server.router(),
            users,
            sessions,
            repository,
        }
    }

    /// Sends a request and buffers the response.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, token);
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request should build");

        self.send(request).await
    }

    /// Sends a prepared request.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body should be readable")
            .to_bytes();

        TestResponse {
            status,
            body: serde_json::from_slice(&bytes).unwrap_or(Value::Null),
        }
    }

    /// `GET uri`.
    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, token, None).await
    }

    /// `POST uri` with a JSON body.
    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, None, Some(body)).await
    }

    /// `PATCH uri` with a JSON body.
    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::PATCH, uri, token, Some(body)).await
    }

    /// `DELETE uri`.
    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::DELETE, uri, token, None).await
    }

    /// Registers `user` through the API.
    pub async fn register(&self, user: &UserFixture) -> TestResponse {
        self.post("/api/users", user.register_body()).await
    }

    /// Logs `user` in through the API.
    pub async fn login(&self, user: &UserFixture) -> TestResponse {
        self.post("/api/users/_login", user.login_body()).await
    }

    /// Registers and logs in `user`, returning the token.
    pub async fn register_and_login(&self, user: &UserFixture) -> String {
        let registered = self.register(user).await;
        assert_eq!(registered.status, StatusCode::OK, "register: {:?}", registered.body);

        let logged_in = self.login(user).await;
        assert_eq!(logged_in.status, StatusCode::OK, "login: {:?}", logged_in.body);

        logged_in.data()["token"]
            .as_str()
            .expect("login should return a token")
            .to_string()
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
