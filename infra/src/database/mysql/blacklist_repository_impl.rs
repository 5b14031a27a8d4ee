//! MySQL implementation of the BlacklistRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};

use iam_core::domain::entities::token::BlacklistedToken;
use iam_core::errors::DomainError;
use iam_core::repositories::BlacklistRepository;

/// MySQL implementation of BlacklistRepository
///
/// `token_hash` carries a unique index; insertion is idempotent through
/// INSERT IGNORE rather than a check-then-act sequence, so concurrent
/// invalidations of the same token cannot error on the duplicate.
pub struct MySqlBlacklistRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlBlacklistRepository {
    /// Create a new MySQL blacklist repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlacklistRepository for MySqlBlacklistRepository {
    async fn save(&self, entry: BlacklistedToken) -> Result<(), DomainError> {
        let query = r#"
            INSERT IGNORE INTO blacklisted_tokens (
                id, token_hash, user_id, expires_at, revoked_at
            ) VALUES (?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(entry.id.to_string())
            .bind(&entry.token_hash)
            .bind(entry.user_id.to_string())
            .bind(entry.expires_at)
            .bind(entry.revoked_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Failed to blacklist token: {}", e)))?;

        Ok(())
    }

    async fn exists_by_hash(&self, token_hash: &str) -> Result<bool, DomainError> {
        let query = r#"
            SELECT EXISTS(
                SELECT 1 FROM blacklisted_tokens WHERE token_hash = ?
            ) AS present
        "#;

        let row = sqlx::query(query)
            .bind(token_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Failed to check blacklist: {}", e)))?;

        let present: i64 = row
            .try_get("present")
            .map_err(|e| DomainError::Database(format!("Failed to get existence: {}", e)))?;

        Ok(present == 1)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let query = r#"
            DELETE FROM blacklisted_tokens
            WHERE expires_at < ?
        "#;

        let result = sqlx::query(query)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Failed to purge blacklist: {}", e)))?;

        Ok(result.rows_affected() as usize)
    }
}
