//! # Password Hashing
//!
//! Argon2id hashing with a random salt per password. Hashes are stored in
//! PHC string form, so parameters and salt travel with the hash.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use shop_core::{ShopError, ShopResult};
use tracing::{error, instrument};

/// Hash a plain-text password
#[instrument(skip(password), err(Display))]
pub fn hash_password(password: &str) -> ShopResult<String> {
    if password.is_empty() {
        return Err(ShopError::invalid("password cannot be empty"));
    }

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!(error = %e, "argon2 hashing failed");
            ShopError::Internal(format!("password hashing failed: {e}"))
        })
}

/// Check a plain-text password against a stored hash.
///
/// A mismatch is `Ok(false)`; only an unreadable stored hash is an error.
#[instrument(skip(hash, password), err(Display))]
pub fn verify_password(hash: &str, password: &str) -> ShopResult<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "stored password hash is unreadable");
        ShopError::Internal(format!("invalid stored password hash: {e}"))
    })?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(ShopError::Internal(format!("password verification failed: {e}"))),
    }
}
