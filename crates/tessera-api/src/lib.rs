// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # tessera-api
//!
//! HTTP surface of the Tessera account service.
//!
//! | Method | Path                  | Gate |
//! |--------|-----------------------|------|
//! | POST   | `/api/users`          | no   |
//! | POST   | `/api/users/_login`   | no   |
//! | GET    | `/api/users/_current` | yes  |
//! | PATCH  | `/api/users/_current` | yes  |
//! | DELETE | `/api/users`          | yes  |
//! | GET    | `/health`             | no   |
//!
//! Gated routes run behind [`AuthLayer`], which resolves the `Authorization`
//! header to an [`AuthContext`] before the handler is called. Every response
//! body is a [`WebResponse`] envelope.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod context;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod server;
pub mod state;

pub use config::{ApiConfig, CorsConfig};
pub use context::AuthContext;
pub use error::{ApiError, ApiResult};
pub use extractors::{Auth, ValidatedJson};
pub use middleware::{AuthLayer, AuthMiddleware};
pub use response::{HealthResponse, WebResponse};
pub use server::{ApiServer, ApiServerBuilder};
pub use state::{AppState, AppStateBuilder};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
