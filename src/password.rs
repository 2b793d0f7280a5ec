use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand_core::OsRng;
use std::sync::OnceLock;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

#[cfg(test)]
thread_local! {
    // Verifications started on this thread; the async half of `verify` runs on the caller.
    pub(crate) static VERIFY_CALLS: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

/// Hashes a plaintext password into a PHC string (argon2id, random salt).
///
/// CPU-bound; runs on the blocking pool so it never stalls the async workers.
pub async fn hash(password: String) -> AppResult<String> {
    tokio::task::spawn_blocking(move || hash_blocking(&password)).await?
}

/// Checks a plaintext password against a stored PHC string.
///
/// A malformed stored hash is an internal error, not a mismatch.
pub async fn verify(password: String, stored_hash: String) -> AppResult<bool> {
    #[cfg(test)]
    VERIFY_CALLS.with(|calls| calls.set(calls.get() + 1));
    tokio::task::spawn_blocking(move || verify_blocking(&password, &stored_hash)).await?
}

static DUMMY_HASH: OnceLock<String> = OnceLock::new();

/// Hash of a throwaway password, computed once. Checking a password against it costs as
/// much as a real check, for callers that must not return early on an unknown account.
pub async fn dummy_hash() -> AppResult<String> {
    if let Some(hash) = DUMMY_HASH.get() {
        return Ok(hash.clone());
    }
    let hash = hash(Uuid::new_v4().to_string()).await?;
    Ok(DUMMY_HASH.get_or_init(|| hash).clone())
}

pub fn hash_blocking(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))
}

pub fn verify_blocking(password: &str, stored_hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| AppError::Internal(format!("stored password hash is malformed: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
