//! Background cleanup of refresh ledger and blacklist state.
//!
//! Sweeps only ever move rows monotonically toward revoked/deleted and
//! never resurrect anything, so they are idempotent and safe to run
//! concurrently with login and rotation.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::DomainResult;
use crate::repositories::{BlacklistRepository, TokenRepository};

/// Configuration for the token cleanup service
#[derive(Debug, Clone)]
pub struct TokenCleanupConfig {
    /// How often the interval-driven blacklist sweep runs (in seconds)
    pub interval_seconds: u64,
    /// Active refresh tokens a user may keep; the sweep revokes the rest
    pub max_active_refresh_tokens: usize,
    /// Whether the interval-driven sweep is enabled
    pub enabled: bool,
}

impl Default for TokenCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600,
            max_active_refresh_tokens: 5,
            enabled: true,
        }
    }
}

/// Outcome of a per-user ledger sweep
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UserSweepReport {
    /// Active rows revoked because their expiry had passed
    pub expired_revoked: usize,
    /// Active rows revoked because they exceeded the session ceiling
    pub excess_revoked: usize,
}

/// Service for cleaning up expired ledger rows and blacklist entries
pub struct TokenCleanupService<R: TokenRepository + 'static, B: BlacklistRepository + 'static> {
    tokens: Arc<R>,
    blacklist: Arc<B>,
    config: TokenCleanupConfig,
}

impl<R: TokenRepository + 'static, B: BlacklistRepository + 'static> TokenCleanupService<R, B> {
    /// Create a new token cleanup service
    pub fn new(tokens: Arc<R>, blacklist: Arc<B>, config: TokenCleanupConfig) -> Self {
        Self {
            tokens,
            blacklist,
            config,
        }
    }

    /// Sweep one user's ledger: revoke active rows past their expiry,
    /// then revoke everything beyond the newest `max_active_refresh_tokens`.
    pub async fn sweep_user(&self, user_id: Uuid) -> DomainResult<UserSweepReport> {
        let now = Utc::now();
        let mut report = UserSweepReport::default();

        for token in self.tokens.expired_active_for_user(user_id, now).await? {
            if self.tokens.revoke(&token.token_hash).await? {
                report.expired_revoked += 1;
            }
        }

        let active = self.tokens.active_for_user_newest_first(user_id).await?;
        for token in active.iter().skip(self.config.max_active_refresh_tokens) {
            if self.tokens.revoke(&token.token_hash).await? {
                report.excess_revoked += 1;
            }
        }

        if report.expired_revoked > 0 || report.excess_revoked > 0 {
            info!(
                user_id = %user_id,
                expired = report.expired_revoked,
                excess = report.excess_revoked,
                "Revoked stale refresh tokens"
            );
        }

        Ok(report)
    }

    /// Delete every blacklist row whose expiry has passed. Such tokens
    /// are already unverifiable, the rows are pure bookkeeping.
    pub async fn sweep_blacklist(&self) -> DomainResult<usize> {
        let deleted = self.blacklist.delete_expired(Utc::now()).await?;
        if deleted > 0 {
            info!(deleted, "Purged expired blacklist entries");
        }
        Ok(deleted)
    }

    /// Fire-and-forget sweep after logout.
    ///
    /// The triggering request never waits on this and never observes its
    /// failure; errors are logged and swallowed.
    pub fn spawn_sweep(self: &Arc<Self>, user_id: Uuid) {
        let service = Arc::clone(self);

        tokio::spawn(async move {
            if let Err(e) = service.sweep_user(user_id).await {
                error!(user_id = %user_id, "Ledger sweep failed: {}", e);
            }

            if let Err(e) = service.sweep_blacklist().await {
                error!("Blacklist sweep failed: {}", e);
            }
        });
    }

    /// Start the interval-driven blacklist sweep as a background task
    pub fn start_background_task(self: Arc<Self>) {
        if !self.config.enabled {
            warn!("Token cleanup service is disabled");
            return;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds);

        tokio::spawn(async move {
            info!(
                "Token cleanup service started - will run every {} seconds",
                self.config.interval_seconds
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                if let Err(e) = self.sweep_blacklist().await {
                    error!("Scheduled blacklist sweep failed: {}", e);
                }
            }
        });
    }
}
