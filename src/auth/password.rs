//! Password hashing.
//!
//! Hashes are stored as `sha256$<iterations>$<salt>$<hex digest>` so the work
//! factor can be raised without invalidating existing accounts.

use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

pub const DEFAULT_ITERATIONS: u32 = 20_000;

const ALGORITHM: &str = "sha256";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Malformed password hash")]
    Malformed,
    #[error("Password hash iterations must be at least 1")]
    ZeroIterations,
    #[error("Password hashing task failed: {0}")]
    Task(String),
}

/// Hash `password` with a fresh random salt.
pub fn hash_password(password: &str, iterations: u32) -> Result<String, PasswordError> {
    if iterations == 0 {
        return Err(PasswordError::ZeroIterations);
    }
    let salt = Uuid::new_v4().simple().to_string();
    let digest = derive(password, &salt, iterations);
    Ok(format!(
        "{}${}${}${}",
        ALGORITHM,
        iterations,
        salt,
        hex::encode(digest)
    ))
}

/// Check `password` against a stored hash.
///
/// # Errors
/// Returns `PasswordError::Malformed` if `encoded` was not produced by [`hash_password`].
pub fn verify_password(password: &str, encoded: &str) -> Result<bool, PasswordError> {
    let mut parts = encoded.splitn(4, '$');
    let (Some(algorithm), Some(iterations), Some(salt), Some(digest)) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(PasswordError::Malformed);
    };
    if algorithm != ALGORITHM {
        return Err(PasswordError::Malformed);
    }
    let iterations = iterations
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or(PasswordError::Malformed)?;
    let expected = hex::decode(digest).map_err(|_| PasswordError::Malformed)?;

    let actual = derive(password, salt, iterations);
    Ok(constant_time_eq(&actual, &expected))
}

/// [`hash_password`] on the blocking thread pool, keeping the derivation off
/// the async workers.
pub async fn hash_password_blocking(
    password: String,
    iterations: u32,
) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&password, iterations))
        .await
        .map_err(|e| PasswordError::Task(e.to_string()))?
}

/// [`verify_password`] on the blocking thread pool.
pub async fn verify_password_blocking(
    password: String,
    encoded: String,
) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &encoded))
        .await
        .map_err(|e| PasswordError::Task(e.to_string()))?
}

fn derive(password: &str, salt: &str, iterations: u32) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    let mut digest: [u8; 32] = hasher.finalize().into();

    for _ in 1..iterations {
        let mut hasher = Sha256::new();
        hasher.update(digest);
        hasher.update(password.as_bytes());
        digest = hasher.finalize().into();
    }
    digest
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
