// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Password hashing and verification using Argon2id.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::{CoreError, CoreResult};

/// Hashes a password with a fresh random salt.
///
/// Returns the PHC string, which embeds the salt and parameters.
pub fn hash_password(password: &str) -> CoreResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CoreError::password_hash(format!("Failed to hash password: {e}")))
}

/// Verifies a password against a stored PHC hash.
///
/// A mismatch and an unparsable hash are both `Unauthorized`.
pub fn verify_password(password: &str, hash: &str) -> CoreResult<()> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| CoreError::unauthorized(format!("stored hash is unreadable: {e}")))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| CoreError::unauthorized("password mismatch"))
}
