// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Request and response models for the user use cases.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::User;

/// Maximum length, in characters, of any user-supplied field.
pub const MAX_FIELD_LEN: usize = 100;

fn require(field: &str, value: &str) -> CoreResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::validation(field, "is required"));
    }
    max_len(field, value)
}

fn max_len(field: &str, value: &str) -> CoreResult<()> {
    if value.chars().count() > MAX_FIELD_LEN {
        return Err(CoreError::validation(
            field,
            format!("must be at most {} characters", MAX_FIELD_LEN),
        ));
    }
    Ok(())
}

// =============================================================================
// Requests
// =============================================================================

/// Body of `POST /api/users`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    /// Requested user ID.
    #[serde(default)]
    pub id: String,
    /// Plaintext password.
    #[serde(default)]
    pub password: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
}

impl RegisterUserRequest {
    /// Checks that every field is present and within bounds.
    pub fn validate(&self) -> CoreResult<()> {
        require("id", &self.id)?;
        require("password", &self.password)?;
        require("name", &self.name)
    }
}

/// Body of `POST /api/users/_login`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginUserRequest {
    /// User ID.
    #[serde(default)]
    pub id: String,
    /// Plaintext password.
    #[serde(default)]
    pub password: String,
}

impl LoginUserRequest {
    /// Checks that both fields are present and within bounds.
    pub fn validate(&self) -> CoreResult<()> {
        require("id", &self.id)?;
        require("password", &self.password)
    }
}

/// Body of `PATCH /api/users/_current`.
///
/// Absent and empty fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    /// New display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New plaintext password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl UpdateUserRequest {
    /// Returns the new name, if one was supplied.
    pub fn new_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|s| !s.is_empty())
    }

    /// Returns the new password, if one was supplied.
    pub fn new_password(&self) -> Option<&str> {
        self.password.as_deref().filter(|s| !s.is_empty())
    }

    /// Checks the supplied fields are within bounds.
    pub fn validate(&self) -> CoreResult<()> {
        if let Some(name) = self.new_name() {
            max_len("name", name)?;
        }
        if let Some(password) = self.new_password() {
            max_len("password", password)?;
        }
        Ok(())
    }
}

// =============================================================================
// Responses
// =============================================================================

/// Public representation of a user.
///
/// The password hash is never exposed; `token` is only present right after a
/// successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Session token (login only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Creation time (epoch milliseconds).
    pub created_at: i64,
    /// Last update time (epoch milliseconds).
    pub updated_at: i64,
}

impl UserResponse {
    /// Builds the representation without the session token.
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            token: None,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }

    /// Builds the representation including the session token.
    pub fn with_token(user: &User) -> Self {
        Self {
            token: user.token.clone(),
            ..Self::from_user(user)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_validation() {
        let valid = RegisterUserRequest {
            id: "Mousetri".into(),
            password: "hayolo".into(),
            name: "Mousetri janedy".into(),
        };
        assert!(valid.validate().is_ok());

        let empty = RegisterUserRequest::default();
        match empty.validate() {
            Err(CoreError::Validation { field, .. }) => assert_eq!(field, "id"),
            other => panic!("expected validation error, got {:?}", other),
        }

        let long = RegisterUserRequest {
            name: "x".repeat(MAX_FIELD_LEN + 1),
            ..valid
        };
        assert!(long.validate().is_err());
    }

    #[test]
    fn test_login_validation() {
        let missing_password = LoginUserRequest {
            id: "Mousetri".into(),
            password: String::new(),
        };
        assert!(missing_password.validate().is_err());
    }

    #[test]
    fn test_update_treats_empty_as_absent() {
        let request = UpdateUserRequest {
            name: Some(String::new()),
            password: Some("rahasia".into()),
        };
        assert!(request.new_name().is_none());
        assert_eq!(request.new_password(), Some("rahasia"));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_update_deserializes_partial_body() {
        let request: UpdateUserRequest = serde_json::from_str(r#"{"name":"Mouse"}"#).unwrap();
        assert_eq!(request.new_name(), Some("Mouse"));
        assert!(request.new_password().is_none());
    }

    #[test]
    fn test_user_response_hides_token_by_default() {
        let mut user = User::new("u", "n", "h");
        user.token = Some("t".into());

        let plain = serde_json::to_value(UserResponse::from_user(&user)).unwrap();
        assert!(plain.get("token").is_none());
        assert!(plain.get("password").is_none());

        let with_token = UserResponse::with_token(&user);
        assert_eq!(with_token.token.as_deref(), Some("t"));
    }
}
