//! MySQL implementation of the TokenRepository trait.
//!
//! Persists the per-user refresh ledger. The consume path is a single
//! conditional UPDATE judged by rows_affected, which is what makes
//! refresh token reuse detectable under concurrent rotations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use iam_core::domain::entities::token::RefreshToken;
use iam_core::errors::DomainError;
use iam_core::repositories::TokenRepository;

/// MySQL implementation of TokenRepository
pub struct MySqlTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlTokenRepository {
    /// Create a new MySQL token repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to RefreshToken entity
    fn row_to_token(row: &sqlx::mysql::MySqlRow) -> Result<RefreshToken, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| DomainError::Database(format!("Failed to get id: {}", e)))?;

        let user_id: String = row
            .try_get("user_id")
            .map_err(|e| DomainError::Database(format!("Failed to get user_id: {}", e)))?;

        Ok(RefreshToken {
            id: Uuid::parse_str(&id)
                .map_err(|e| DomainError::Database(format!("Invalid token UUID: {}", e)))?,
            user_id: Uuid::parse_str(&user_id)
                .map_err(|e| DomainError::Database(format!("Invalid user UUID: {}", e)))?,
            token_hash: row
                .try_get("token_hash")
                .map_err(|e| DomainError::Database(format!("Failed to get token_hash: {}", e)))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::Database(format!("Failed to get created_at: {}", e)))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| DomainError::Database(format!("Failed to get expires_at: {}", e)))?,
            is_revoked: row
                .try_get("is_revoked")
                .map_err(|e| DomainError::Database(format!("Failed to get is_revoked: {}", e)))?,
            last_used_at: row
                .try_get("last_used_at")
                .map_err(|e| DomainError::Database(format!("Failed to get last_used_at: {}", e)))?,
        })
    }

    async fn fetch_tokens(
        &self,
        query: &str,
        user_id: Uuid,
    ) -> Result<Vec<RefreshToken>, DomainError> {
        let rows = sqlx::query(query)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Failed to query ledger: {}", e)))?;

        let mut tokens = Vec::with_capacity(rows.len());
        for row in rows {
            tokens.push(Self::row_to_token(&row)?);
        }

        Ok(tokens)
    }
}

#[async_trait]
impl TokenRepository for MySqlTokenRepository {
    async fn save(&self, token: RefreshToken) -> Result<RefreshToken, DomainError> {
        let query = r#"
            INSERT INTO refresh_tokens (
                id, user_id, token_hash, created_at, expires_at, is_revoked, last_used_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(token.id.to_string())
            .bind(token.user_id.to_string())
            .bind(&token.token_hash)
            .bind(token.created_at)
            .bind(token.expires_at)
            .bind(token.is_revoked)
            .bind(token.last_used_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Failed to save refresh token: {}", e)))?;

        Ok(token)
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>, DomainError> {
        let query = r#"
            SELECT id, user_id, token_hash, created_at, expires_at, is_revoked, last_used_at
            FROM refresh_tokens
            WHERE token_hash = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Failed to find refresh token: {}", e)))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_token(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_active_by_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshToken>, DomainError> {
        let query = r#"
            SELECT id, user_id, token_hash, created_at, expires_at, is_revoked, last_used_at
            FROM refresh_tokens
            WHERE token_hash = ? AND is_revoked = FALSE
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Failed to find refresh token: {}", e)))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_token(&row)?)),
            None => Ok(None),
        }
    }

    async fn consume(&self, token_hash: &str, now: DateTime<Utc>) -> Result<bool, DomainError> {
        // Check and write in one statement; exactly one concurrent caller
        // can see rows_affected == 1
        let query = r#"
            UPDATE refresh_tokens
            SET is_revoked = TRUE, last_used_at = ?
            WHERE token_hash = ? AND is_revoked = FALSE
        "#;

        let result = sqlx::query(query)
            .bind(now)
            .bind(token_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Failed to consume token: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn revoke(&self, token_hash: &str) -> Result<bool, DomainError> {
        let query = r#"
            UPDATE refresh_tokens
            SET is_revoked = TRUE
            WHERE token_hash = ? AND is_revoked = FALSE
        "#;

        let result = sqlx::query(query)
            .bind(token_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Failed to revoke token: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_active_for_user(&self, user_id: Uuid) -> Result<usize, DomainError> {
        let query = r#"
            SELECT COUNT(*) AS active
            FROM refresh_tokens
            WHERE user_id = ? AND is_revoked = FALSE
        "#;

        let row = sqlx::query(query)
            .bind(user_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Failed to count tokens: {}", e)))?;

        let active: i64 = row
            .try_get("active")
            .map_err(|e| DomainError::Database(format!("Failed to get count: {}", e)))?;

        Ok(active as usize)
    }

    async fn oldest_active_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<RefreshToken>, DomainError> {
        let query = r#"
            SELECT id, user_id, token_hash, created_at, expires_at, is_revoked, last_used_at
            FROM refresh_tokens
            WHERE user_id = ? AND is_revoked = FALSE
            ORDER BY created_at ASC
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Failed to find oldest token: {}", e)))?;

        match result {
            Some(row) => Ok(Some(Self::row_to_token(&row)?)),
            None => Ok(None),
        }
    }

    async fn active_for_user_newest_first(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<RefreshToken>, DomainError> {
        let query = r#"
            SELECT id, user_id, token_hash, created_at, expires_at, is_revoked, last_used_at
            FROM refresh_tokens
            WHERE user_id = ? AND is_revoked = FALSE
            ORDER BY created_at DESC
        "#;

        self.fetch_tokens(query, user_id).await
    }

    async fn expired_active_for_user(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<RefreshToken>, DomainError> {
        let query = r#"
            SELECT id, user_id, token_hash, created_at, expires_at, is_revoked, last_used_at
            FROM refresh_tokens
            WHERE user_id = ? AND is_revoked = FALSE AND expires_at < ?
        "#;

        let rows = sqlx::query(query)
            .bind(user_id.to_string())
            .bind(now)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Failed to query ledger: {}", e)))?;

        let mut tokens = Vec::with_capacity(rows.len());
        for row in rows {
            tokens.push(Self::row_to_token(&row)?);
        }

        Ok(tokens)
    }
}
