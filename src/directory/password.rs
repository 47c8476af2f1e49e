//! Password hashing

use crate::error::{Error, Result};

/// Hash a password with bcrypt on the blocking pool
pub async fn hash_password(password: String, cost: u32) -> Result<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| Error::Other(format!("Password hashing task failed: {}", e)))?
        .map_err(Error::from)
}

/// Check a password against a stored bcrypt hash
pub async fn verify_password(password: String, hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| Error::Other(format!("Password check task failed: {}", e)))?
        .map_err(Error::from)
}
