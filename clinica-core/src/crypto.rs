//! Password hashing
//!
//! Passwords are hashed with Argon2 through the `password-auth` crate, which
//! generates a random salt per hash and encodes the parameters in the PHC
//! string format.
//!
//! Argon2 is deliberately slow, so async callers should use [`hash_password`]
//! and [`verify_password`], which run on tokio's blocking pool. The `_blocking`
//! variants are exposed for synchronous contexts such as seeding scripts.

use crate::{Error, error::CryptoError};

/// Hash a plaintext password on the current thread
pub fn hash_password_blocking(password: &str) -> String {
    password_auth::generate_hash(password)
}

/// Check a plaintext password against a stored hash on the current thread
///
/// A malformed hash never verifies.
pub fn verify_password_blocking(password: &str, hash: &str) -> bool {
    password_auth::verify_password(password, hash).is_ok()
}

/// Hash a plaintext password without blocking the async runtime
pub async fn hash_password(password: &str) -> Result<String, Error> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || hash_password_blocking(&password))
        .await
        .map_err(|e| CryptoError::PasswordHash(e.to_string()).into())
}

/// Check a plaintext password against a stored hash without blocking the async runtime
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, Error> {
    let password = password.to_owned();
    let hash = hash.to_owned();
    tokio::task::spawn_blocking(move || verify_password_blocking(&password, &hash))
        .await
        .map_err(|e| CryptoError::PasswordHash(e.to_string()).into())
}
