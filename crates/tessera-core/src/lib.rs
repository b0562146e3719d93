// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # tessera-core
//!
//! Core domain for the Tessera account and session service.
//!
//! This crate owns everything that is not HTTP plumbing:
//!
//! - **Types**: the persisted [`User`] record
//! - **Model**: request/response DTOs and their validation rules
//! - **Error**: the [`CoreError`] hierarchy shared by every layer
//! - **Password**: Argon2id hashing and verification
//! - **Session**: signed session tokens and the [`SessionManager`]
//! - **Store**: [`UserRepository`] / [`SessionStore`] traits and backends
//! - **Service**: the [`UserService`] use cases (register, login, ...)
//!
//! ## Feature Flags
//!
//! - `postgres`: `sqlx`-backed [`UserRepository`]
//! - `redis`: Redis-backed [`SessionStore`]
//! - `full`: all backends
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tessera_core::{
//!     MemorySessionStore, MemoryUserRepository, SessionConfig, SessionManager, UserService,
//! };
//!
//! let sessions = Arc::new(SessionManager::new(
//!     SessionConfig::new("a-long-enough-signing-secret-for-hs256"),
//!     Arc::new(MemorySessionStore::new()),
//! )?);
//! let users = UserService::new(Arc::new(MemoryUserRepository::new()), sessions.clone());
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod model;
pub mod password;
pub mod service;
pub mod session;
pub mod store;
pub mod types;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{CoreError, CoreResult};
pub use model::{LoginUserRequest, RegisterUserRequest, UpdateUserRequest, UserResponse};
pub use password::{hash_password, verify_password};
pub use service::UserService;
pub use session::{SessionClaims, SessionConfig, SessionManager};
pub use store::{MemorySessionStore, MemoryUserRepository, SessionStore, UserRepository};
pub use types::User;

#[cfg(feature = "postgres")]
pub use store::PostgresUserRepository;

#[cfg(feature = "redis")]
pub use store::RedisSessionStore;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
