// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Session token management.

use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::{debug, warn};

use super::SessionClaims;
use crate::error::{CoreError, CoreResult};
use crate::store::SessionStore;

/// Default lifetime embedded in a token (30 days).
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Default TTL of the key-value entry (31 days).
///
/// Longer than the token lifetime so a signature-valid token is never
/// evicted from the store before it expires on its own.
pub const DEFAULT_STORE_TTL: Duration = Duration::from_secs(31 * 24 * 60 * 60);

/// Upper bound for both the token lifetime and the store TTL (10 years).
pub const MAX_SESSION_DURATION: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);

// =============================================================================
// SessionConfig
// =============================================================================

/// Session token configuration.
#[derive(Clone)]
pub struct SessionConfig {
    /// Shared HMAC secret.
    pub secret: String,
    /// Token issuer.
    pub issuer: String,
    /// Expiry embedded in each token, counted from issuance.
    pub token_lifetime: Duration,
    /// TTL of the key-value entry backing each token.
    pub store_ttl: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            issuer: "tessera".to_string(),
            token_lifetime: DEFAULT_TOKEN_LIFETIME,
            store_ttl: DEFAULT_STORE_TTL,
        }
    }
}

impl SessionConfig {
    /// Creates a configuration with the given secret and default lifetimes.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Sets the issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    /// Sets the token lifetime.
    pub fn with_token_lifetime(mut self, lifetime: Duration) -> Self {
        self.token_lifetime = lifetime;
        self
    }

    /// Sets the key-value store TTL.
    pub fn with_store_ttl(mut self, ttl: Duration) -> Self {
        self.store_ttl = ttl;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CoreResult<()> {
        if self.secret.is_empty() {
            return Err(CoreError::configuration("session secret is not configured"));
        }
        if self.secret.len() < 32 {
            warn!("Session secret is shorter than recommended (32 bytes)");
        }
        if self.token_lifetime.is_zero() {
            return Err(CoreError::configuration("token lifetime cannot be zero"));
        }
        if self.store_ttl < self.token_lifetime {
            return Err(CoreError::configuration(
                "store TTL must not be shorter than the token lifetime",
            ));
        }
        if self.store_ttl > MAX_SESSION_DURATION {
            return Err(CoreError::configuration(
                "token lifetime and store TTL cannot exceed 10 years",
            ));
        }
        Ok(())
    }
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("token_lifetime", &self.token_lifetime)
            .field("store_ttl", &self.store_ttl)
            .finish()
    }
}

// =============================================================================
// SessionManager
// =============================================================================

/// Issues, validates and revokes session tokens.
///
/// A token is live only while all three hold: the signature verifies, the
/// embedded expiry is in the future, and the token is still a key in the
/// session store. Revocation is deleting that key.
#[derive(Clone)]
pub struct SessionManager {
    config: Arc<SessionConfig>,
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Arc<Validation>,
    store: Arc<dyn SessionStore>,
}

impl SessionManager {
    /// Creates a session manager over the given store.
    pub fn new(config: SessionConfig, store: Arc<dyn SessionStore>) -> CoreResult<Self> {
        config.validate()?;

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        validation.validate_aud = false;
        validation.leeway = 0;

        Ok(Self {
            config: Arc::new(config),
            encoding_key: Arc::new(encoding_key),
            decoding_key: Arc::new(decoding_key),
            validation: Arc::new(validation),
            store,
        })
    }

    /// Issues a token for `user_id` and registers it in the session store.
    pub async fn issue_token(&self, user_id: &str) -> CoreResult<String> {
        let lifetime = i64::try_from(self.config.token_lifetime.as_secs())
            .map_err(|_| CoreError::configuration("token lifetime out of range"))?;
        let claims = SessionClaims::new(user_id, &self.config.issuer, lifetime);
        let token = self.sign(&claims)?;

        self.store.put(&token, user_id, self.config.store_ttl).await?;

        debug!(user_id = %user_id, jti = %claims.jti, "Session token issued");
        Ok(token)
    }

    /// Validates a token and returns the user ID it was issued to.
    ///
    /// Every rejection is `Unauthorized`; store I/O failures surface as
    /// `Store` errors instead.
    pub async fn validate_token(&self, token: &str) -> CoreResult<String> {
        let claims = self.decode(token)?;

        match self.store.lookup(token).await? {
            Some(owner) if owner == claims.sub => Ok(claims.sub),
            Some(_) => Err(CoreError::unauthorized("token owner mismatch")),
            None => Err(CoreError::unauthorized("token revoked or evicted")),
        }
    }

    /// Removes a token from the session store. Revoking an unknown token is
    /// not an error.
    pub async fn revoke_token(&self, token: &str) -> CoreResult<()> {
        let removed = self.store.remove(token).await?;
        debug!(removed, "Session token revoked");
        Ok(())
    }

    /// Signs arbitrary claims with the session secret.
    pub fn sign(&self, claims: &SessionClaims) -> CoreResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| CoreError::signing(format!("Failed to sign token: {}", e)))
    }

    /// Verifies the signature and expiry of a token and decodes its claims.
    ///
    /// Does not consult the session store.
    pub fn decode(&self, token: &str) -> CoreResult<SessionClaims> {
        decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                use jsonwebtoken::errors::ErrorKind;
                let reason = match e.kind() {
                    ErrorKind::ExpiredSignature => "token expired",
                    ErrorKind::InvalidSignature => "invalid token signature",
                    ErrorKind::InvalidIssuer => "invalid token issuer",
                    ErrorKind::MissingRequiredClaim(_) => "token is missing a required claim",
                    ErrorKind::Json(_) => "malformed token claims",
                    _ => "malformed token",
                };
                CoreError::unauthorized(reason)
            })
    }

    /// Returns the session store.
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Returns the configured token lifetime.
    pub fn token_lifetime(&self) -> Duration {
        self.config.token_lifetime
    }

    /// Returns the configured store TTL.
    pub fn store_ttl(&self) -> Duration {
        self.config.store_ttl
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("issuer", &self.config.issuer)
            .field("token_lifetime", &self.config.token_lifetime)
            .field("store_ttl", &self.config.store_ttl)
            .field("store", &self.store.name())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemorySessionStore;

    const SECRET: &str = "test-secret-key-that-is-long-enough-for-testing";

    fn manager() -> SessionManager {
        SessionManager::new(SessionConfig::new(SECRET), Arc::new(MemorySessionStore::new())).unwrap()
    }

    #[test]
    fn test_config_validation() {
        assert!(SessionConfig::default().validate().is_err());
        assert!(SessionConfig::new(SECRET).validate().is_ok());

        let short_ttl = SessionConfig::new(SECRET)
            .with_token_lifetime(Duration::from_secs(3600))
            .with_store_ttl(Duration::from_secs(60));
        assert!(short_ttl.validate().is_err());

        let zero = SessionConfig::new(SECRET).with_token_lifetime(Duration::ZERO);
        assert!(zero.validate().is_err());

        let huge = SessionConfig::new(SECRET)
            .with_token_lifetime(Duration::from_secs(u64::MAX))
            .with_store_ttl(Duration::from_secs(u64::MAX));
        assert!(huge.validate().is_err());
        assert!(SessionManager::new(huge, Arc::new(MemorySessionStore::new())).is_err());

        let longest = SessionConfig::new(SECRET)
            .with_token_lifetime(MAX_SESSION_DURATION)
            .with_store_ttl(MAX_SESSION_DURATION);
        assert!(longest.validate().is_ok());
    }

    #[test]
    fn test_default_ttl_covers_lifetime() {
        assert!(DEFAULT_STORE_TTL >= DEFAULT_TOKEN_LIFETIME);
    }

    #[tokio::test]
    async fn test_issue_and_validate() {
        let manager = manager();

        let token = manager.issue_token("Mousetri").await.unwrap();
        assert_eq!(token.split('.').count(), 3);

        let user_id = manager.validate_token(&token).await.unwrap();
        assert_eq!(user_id, "Mousetri");

        let claims = manager.decode(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, DEFAULT_TOKEN_LIFETIME.as_secs() as i64);
    }

    #[tokio::test]
    async fn test_revoke_invalidates() {
        let manager = manager();

        let token = manager.issue_token("Mousetri").await.unwrap();
        manager.revoke_token(&token).await.unwrap();

        let err = manager.validate_token(&token).await.unwrap_err();
        assert!(err.is_unauthorized());

        // Idempotent
        assert!(manager.revoke_token(&token).await.is_ok());
        assert!(manager.revoke_token("never-issued").await.is_ok());
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let manager = manager();

        let claims = SessionClaims::new("Mousetri", "tessera", -3600);
        let token = manager.sign(&claims).unwrap();
        manager
            .store()
            .put(&token, "Mousetri", Duration::from_secs(60))
            .await
            .unwrap();

        let err = manager.validate_token(&token).await.unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn test_signed_but_unregistered_token_rejected() {
        let manager = manager();

        let claims = SessionClaims::new("Mousetri", "tessera", 3600);
        let token = manager.sign(&claims).unwrap();

        assert!(manager.decode(&token).is_ok());
        assert!(manager.validate_token(&token).await.unwrap_err().is_unauthorized());
    }

    #[tokio::test]
    async fn test_wrong_secret_rejected() {
        let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
        let one = SessionManager::new(
            SessionConfig::new("secret-one-for-testing-purposes-xx"),
            store.clone(),
        )
        .unwrap();
        let two = SessionManager::new(
            SessionConfig::new("secret-two-for-testing-purposes-xx"),
            store,
        )
        .unwrap();

        let token = one.issue_token("Mousetri").await.unwrap();
        assert!(two.validate_token(&token).await.unwrap_err().is_unauthorized());
    }

    #[tokio::test]
    async fn test_garbage_token_rejected() {
        let manager = manager();

        for token in ["wrong", "", "a.b.c", "invalid.token.here"] {
            let err = manager.validate_token(token).await.unwrap_err();
            assert!(err.is_unauthorized(), "token {:?} should be unauthorized", token);
        }
    }

    #[tokio::test]
    async fn test_owner_mismatch_rejected() {
        let manager = manager();

        let claims = SessionClaims::new("Mousetri", "tessera", 3600);
        let token = manager.sign(&claims).unwrap();
        manager
            .store()
            .put(&token, "someone-else", Duration::from_secs(60))
            .await
            .unwrap();

        assert!(manager.validate_token(&token).await.unwrap_err().is_unauthorized());
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_eviction_invalidates() {
        let config = SessionConfig::new(SECRET)
            .with_token_lifetime(Duration::from_secs(60))
            .with_store_ttl(Duration::from_secs(60));
        let manager = SessionManager::new(config, Arc::new(MemorySessionStore::new())).unwrap();

        let token = manager.issue_token("Mousetri").await.unwrap();
        assert!(manager.validate_token(&token).await.is_ok());

        tokio::time::advance(Duration::from_secs(61)).await;

        // Signature and wall-clock expiry still pass; only the store entry is gone.
        assert!(manager.decode(&token).is_ok());
        assert!(manager.validate_token(&token).await.unwrap_err().is_unauthorized());
    }

    #[tokio::test]
    async fn test_tokens_are_unique() {
        let manager = manager();

        let a = manager.issue_token("Mousetri").await.unwrap();
        let b = manager.issue_token("Mousetri").await.unwrap();
        assert_ne!(a, b);

        manager.revoke_token(&a).await.unwrap();
        assert!(manager.validate_token(&b).await.is_ok());
    }
}
