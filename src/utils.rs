//! Helper functions could be used in api/, repo/, ...

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use anyhow::anyhow;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::str::FromStr;
use uuid::Uuid;

/// Opens the store. Foreign keys are enforced on every connection.
///
/// An in-memory database lives inside a single connection, so the pool is
/// capped to one connection that is never recycled.
pub async fn setup_sqlite_db_pool(db_host: &str) -> anyhow::Result<SqlitePool> {
    let connect_options = SqliteConnectOptions::from_str(db_host)?
        .create_if_missing(true)
        .pragma("foreign_keys", "ON");

    if db_host.contains(":memory:") {
        return Ok(SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(connect_options)
            .await?);
    }

    Ok(SqlitePool::connect_with(connect_options).await?)
}

pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
        .map_err(|err| anyhow!("password salt couldn't be created: {}", err))?;

    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| anyhow!("password couldn't be hashed: {}", err))?
        .to_string())
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    PasswordHash::new(password_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("user123").unwrap();

        assert_ne!(hash, "user123");
        assert!(verify_password("user123", &hash));
        assert!(!verify_password("user124", &hash));
    }

    #[test]
    fn test_salt_differs_between_hashes() {
        assert_ne!(
            hash_password("admin123").unwrap(),
            hash_password("admin123").unwrap()
        );
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        assert!(!verify_password("admin123", "admin123"));
    }
}
