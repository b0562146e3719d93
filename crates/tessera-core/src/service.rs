// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! User account use cases.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{CoreError, CoreResult};
use crate::model::{LoginUserRequest, RegisterUserRequest, UpdateUserRequest, UserResponse};
use crate::password::{hash_password, verify_password};
use crate::session::SessionManager;
use crate::store::UserRepository;
use crate::types::User;

/// Registration, login, profile and logout over a user repository and a
/// session manager.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<SessionManager>,
}

impl UserService {
    /// Creates a new service.
    pub fn new(users: Arc<dyn UserRepository>, sessions: Arc<SessionManager>) -> Self {
        Self { users, sessions }
    }

    /// Returns the user repository.
    pub fn repository(&self) -> &Arc<dyn UserRepository> {
        &self.users
    }

    /// Returns the session manager.
    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    /// Creates a new account.
    pub async fn register(&self, request: RegisterUserRequest) -> CoreResult<UserResponse> {
        request.validate()?;

        if self.users.find_by_id(&request.id).await?.is_some() {
            return Err(CoreError::conflict(format!("user '{}' already exists", request.id)));
        }

        let hash = hash_password(&request.password)?;
        let user = User::new(request.id, request.name, hash);

        // The repository rejects a duplicate that raced past the check above.
        self.users.insert(&user).await?;

        info!(user_id = %user.id, "User registered");
        Ok(UserResponse::from_user(&user))
    }

    /// Verifies credentials and starts a new session.
    ///
    /// Any token previously recorded for the user is revoked, so at most one
    /// token per user is live after a login completes.
    pub async fn login(&self, request: LoginUserRequest) -> CoreResult<UserResponse> {
        request.validate()?;

        let mut user = self
            .users
            .find_by_id(&request.id)
            .await?
            .ok_or_else(|| CoreError::unauthorized("unknown user"))?;

        verify_password(&request.password, &user.password)?;

        let token = self.sessions.issue_token(&user.id).await?;

        if let Some(previous) = user.token.take() {
            if let Err(e) = self.sessions.revoke_token(&previous).await {
                self.discard_token(&token).await;
                return Err(e);
            }
        }

        user.token = Some(token.clone());
        user.touch();

        if let Err(e) = self.users.update(&user).await {
            self.discard_token(&token).await;
            return Err(e);
        }

        info!(user_id = %user.id, "User logged in");
        Ok(UserResponse::with_token(&user))
    }

    /// Returns the profile of an authenticated user.
    pub async fn current(&self, user_id: &str) -> CoreResult<UserResponse> {
        let user = self.find(user_id).await?;
        Ok(UserResponse::from_user(&user))
    }

    /// Updates the name and/or password of an authenticated user.
    pub async fn update(
        &self,
        user_id: &str,
        request: UpdateUserRequest,
    ) -> CoreResult<UserResponse> {
        request.validate()?;

        let mut user = self.find(user_id).await?;

        if let Some(name) = request.new_name() {
            user.name = name.to_string();
        }
        if let Some(password) = request.new_password() {
            user.password = hash_password(password)?;
        }

        user.touch();
        self.users.update(&user).await?;

        debug!(
            user_id = %user.id,
            name_changed = request.new_name().is_some(),
            password_changed = request.new_password().is_some(),
            "User updated"
        );
        Ok(UserResponse::from_user(&user))
    }

    /// Ends the session that `token` belongs to.
    ///
    /// The presented token is always revoked. A different token recorded on
    /// the user is revoked too, so no session of this user outlives the call.
    pub async fn logout(&self, user_id: &str, token: &str) -> CoreResult<bool> {
        let mut user = self.find(user_id).await?;

        self.sessions.revoke_token(token).await?;

        if let Some(recorded) = user.token.take() {
            if recorded != token {
                self.sessions.revoke_token(&recorded).await?;
            }
        }

        user.touch();
        self.users.update(&user).await?;

        info!(user_id = %user.id, "User logged out");
        Ok(true)
    }

    async fn find(&self, user_id: &str) -> CoreResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| CoreError::not_found(format!("user '{}'", user_id)))
    }

    async fn discard_token(&self, token: &str) {
        if let Err(e) = self.sessions.revoke_token(token).await {
            warn!(error = %e, "Failed to revoke token after aborted login");
        }
    }
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService")
            .field("users", &self.users.name())
            .field("sessions", &self.sessions)
            .finish()
    }
}
