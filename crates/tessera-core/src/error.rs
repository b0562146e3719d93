// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Core error types.
//!
//! Every failure the session mechanism and the user use cases can produce is
//! one of these variants. The HTTP layer maps them onto status codes; nothing
//! here knows about HTTP.

use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// CoreError
// =============================================================================

/// Errors raised by the credential, session and user layers.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A request field failed validation.
    #[error("Validation failed for '{field}': {message}")]
    Validation {
        /// The offending field.
        field: String,
        /// What was wrong with it.
        message: String,
    },

    /// The resource already exists.
    #[error("Conflict: {message}")]
    Conflict {
        /// Error message.
        message: String,
    },

    /// Credentials or token rejected.
    ///
    /// `reason` is for logs only and must never reach a client.
    #[error("Unauthorized: {reason}")]
    Unauthorized {
        /// Internal reason for the rejection.
        reason: String,
    },

    /// A record that should exist does not.
    #[error("Not found: {resource}")]
    NotFound {
        /// The missing resource.
        resource: String,
    },

    /// The relational or key-value store failed.
    #[error("Store error: {message}")]
    Store {
        /// Error message.
        message: String,
    },

    /// Token signing failed.
    #[error("Signing error: {message}")]
    Signing {
        /// Error message.
        message: String,
    },

    /// Password hashing failed.
    #[error("Password hashing error: {message}")]
    PasswordHash {
        /// Error message.
        message: String,
    },

    /// Invalid component configuration.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message.
        message: String,
    },
}

impl CoreError {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Creates a validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Creates an unauthorized error.
    pub fn unauthorized(reason: impl Into<String>) -> Self {
        Self::Unauthorized {
            reason: reason.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Creates a store error.
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Creates a signing error.
    pub fn signing(message: impl Into<String>) -> Self {
        Self::Signing {
            message: message.into(),
        }
    }

    /// Creates a password hashing error.
    pub fn password_hash(message: impl Into<String>) -> Self {
        Self::PasswordHash {
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Returns `true` for failures caused by the server rather than the caller.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            CoreError::Store { .. }
                | CoreError::Signing { .. }
                | CoreError::PasswordHash { .. }
                | CoreError::Configuration { .. }
        )
    }

    /// Returns `true` if this is an unauthorized error.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, CoreError::Unauthorized { .. })
    }
}
