//! Blacklist repository trait for revoked access tokens.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::token::BlacklistedToken;
use crate::errors::DomainError;

/// Append-only store of access tokens revoked before their natural expiry
///
/// Queried by the request-authorization boundary on every protected call.
#[async_trait]
pub trait BlacklistRepository: Send + Sync {
    /// Insert a blacklist row, keyed by token digest.
    ///
    /// Idempotent: inserting a digest that is already present is a no-op,
    /// never an error, including under concurrent insertion attempts for
    /// the same token (unique constraint + ignore-on-conflict, not
    /// check-then-act).
    async fn save(&self, entry: BlacklistedToken) -> Result<(), DomainError>;

    /// Whether a token digest is blacklisted
    async fn exists_by_hash(&self, token_hash: &str) -> Result<bool, DomainError>;

    /// Delete every row whose expiry has passed
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of rows deleted
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError>;
}
