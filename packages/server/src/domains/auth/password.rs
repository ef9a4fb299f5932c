use anyhow::{Context, Result};
use tokio::task;

/// bcrypt work factor for stored credentials.
const HASH_COST: u32 = 12;

/// Hash a plaintext password with bcrypt.
///
/// Runs on the blocking pool - cost 12 takes long enough to stall an async
/// worker otherwise.
pub async fn hash_password(password: &str) -> Result<String> {
    let password = password.to_owned();
    task::spawn_blocking(move || bcrypt::hash(password, HASH_COST))
        .await
        .context("password hashing task failed")?
        .context("failed to hash password")
}

/// Check a plaintext password against a stored bcrypt hash.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let password = password.to_owned();
    let hash = hash.to_owned();
    task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .context("password verification task failed")?
        .context("failed to verify password")
}
