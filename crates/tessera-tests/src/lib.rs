// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Tessera Integration Tests
//!
//! Shared fixtures and an in-process HTTP harness for the integration
//! suites under `tests/`.
//!
//! ## Module Structure
//!
//! - [`common`]: Shared test utilities
//!   - `fixtures`: Canonical users, secrets and configuration documents
//!   - `harness`: A wired router over in-memory stores
//!   - `mocks`: Stores that fail on demand
//!   - `assertions`: Envelope and status assertions
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p tessera-tests
//! cargo test -p tessera-tests --test integration_api
//! cargo test -p tessera-tests --test integration_session
//! cargo test -p tessera-tests --test integration_config
//! ```
//!
//! ## Using the Harness
//!
//! ```rust,ignore
//! use tessera_tests::prelude::*;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let app = TestApp::new();
//!     let token = app.register_and_login(&UserFixtures::mousetri()).await;
//!     let response = app.get("/api/users/_current", Some(&token)).await;
//!     assert_data(&response);
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::assertions::*;
    pub use crate::common::fixtures::*;
    pub use crate::common::harness::*;
    pub use crate::common::mocks::*;
}
