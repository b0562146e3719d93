// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API handlers.
//!
//! - [`health`]: liveness and store status
//! - [`users`]: account and session endpoints

mod health;
mod users;

pub use health::*;
pub use users::*;
