//! Token repository trait defining the interface for the refresh ledger.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::token::RefreshToken;
use crate::errors::DomainError;

/// Repository trait for the per-user refresh token ledger
///
/// "Active" throughout this interface means `is_revoked = false`; expiry
/// is tracked separately and detected lazily on use or by the cleanup
/// sweep. Tokens are keyed by the SHA-256 digest of their string value.
///
/// # Security Considerations
/// - `consume` is the reuse-detection boundary and must be a single
///   conditional update, never a read followed by a write
/// - Revocation is monotonic; no operation ever reactivates a row
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Save a new refresh token ledger row
    ///
    /// # Returns
    /// * `Ok(RefreshToken)` - The saved row
    /// * `Err(DomainError)` - Save failed (e.g. duplicate token digest)
    async fn save(&self, token: RefreshToken) -> Result<RefreshToken, DomainError>;

    /// Find a row by token digest regardless of its state
    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>, DomainError>;

    /// Find a non-revoked row by token digest
    ///
    /// # Returns
    /// * `Ok(Some(RefreshToken))` - An active row exists
    /// * `Ok(None)` - No row, or the row was already consumed; callers
    ///   must not be able to tell the two apart
    async fn find_active_by_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<RefreshToken>, DomainError>;

    /// Atomically consume an active token: set `is_revoked = true` and
    /// stamp `last_used_at`, but only if the row is still active.
    ///
    /// Implementations must make the check and the write one atomic step
    /// (a conditional `UPDATE ... WHERE is_revoked = FALSE`, or a write
    /// lock spanning both). Under concurrent calls with the same digest
    /// exactly one may succeed.
    ///
    /// # Returns
    /// * `Ok(true)` - This call consumed the token
    /// * `Ok(false)` - The token was absent or already consumed
    async fn consume(&self, token_hash: &str, now: DateTime<Utc>) -> Result<bool, DomainError>;

    /// Revoke a token without stamping a use (expiry detection, sweeps)
    ///
    /// # Returns
    /// * `Ok(true)` - The row was active and is now revoked
    /// * `Ok(false)` - No active row with the given digest
    async fn revoke(&self, token_hash: &str) -> Result<bool, DomainError>;

    /// Count a user's active rows
    async fn count_active_for_user(&self, user_id: Uuid) -> Result<usize, DomainError>;

    /// The user's single oldest active row, ties broken by creation time
    async fn oldest_active_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<RefreshToken>, DomainError>;

    /// All of a user's active rows, newest first
    async fn active_for_user_newest_first(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<RefreshToken>, DomainError>;

    /// The user's active rows whose expiry has already passed
    async fn expired_active_for_user(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Vec<RefreshToken>, DomainError>;
}
