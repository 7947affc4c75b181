//! Argon2id password hashing and verification.
//!
//! Every hash uses a cryptographically random salt from [`OsRng`] and is
//! returned in the PHC string format, so the algorithm parameters and salt
//! travel inside the stored value itself. The plaintext password is never
//! recoverable from a [`HashedPassword`], and this module never logs it.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use serde::{Deserialize, Serialize};

/// Opaque one-way encoding of a password plus its embedded salt.
///
/// Produced once at signup time; the caller persists it and later hands it
/// back to [`verify_password`] for comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// The PHC-formatted hash string, suitable for storage.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<HashedPassword> for String {
    fn from(hash: HashedPassword) -> Self {
        hash.0
    }
}

/// Hash a plaintext password using Argon2id with a fresh random salt.
///
/// Non-deterministic: two calls on the same password produce different
/// encodings, and both verify. Fails only if the hashing primitive does.
pub fn hash_password(password: &str) -> Result<HashedPassword, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(HashedPassword(hash.to_string()))
}

/// Verify a plaintext password against a stored PHC-formatted hash.
///
/// Returns `Ok(true)` on a match and `Ok(false)` on a mismatch; a
/// non-matching password is not an error. `Err` means the stored hash is
/// malformed or the primitive failed.
pub fn verify_password(
    password: &str,
    stored: &str,
) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(stored)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}
