//! Password hashing for the identity store.
//!
//! Argon2id in PHC string format. The salt is generated per-hash from the OS RNG, and the parameters travel
//! inside the hash string, so verification needs no configuration.
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::traits::UserApiError;

pub fn hash_password(password: &str) -> Result<String, UserApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| UserApiError::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, UserApiError> {
    let parsed = PasswordHash::new(hash).map_err(|e| UserApiError::PasswordHash(e.to_string()))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(UserApiError::PasswordHash(e.to_string())),
    }
}
