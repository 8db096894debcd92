// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One-way password hashing for queue credentials.
//!
//! Treated by the rest of the workspace as an opaque verify/hash pair; no
//! caller ever sees or stores a plaintext secret past this boundary.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};

use crate::error::Error;

/// Hash a plaintext secret into an encoded PHC string suitable for storage.
pub fn hash(plaintext: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| Error::internal(format!("failed to hash password: {e}")))
}

/// Verify a plaintext secret against a previously stored hash.
///
/// Returns `Ok(false)` (not an error) for a wrong password; only a malformed
/// stored hash is treated as an internal error.
pub fn verify(plaintext: &str, stored_hash: &str) -> Result<bool, Error> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| Error::internal(format!("stored password hash is malformed: {e}")))?;
    Ok(Argon2::default().verify_password(plaintext.as_bytes(), &parsed).is_ok())
}

#[cfg(test)]
#[path = "password_tests.rs"]
mod tests;
