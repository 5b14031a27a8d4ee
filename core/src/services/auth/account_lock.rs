//! Account lockout guard for brute force protection.
//!
//! A pure state machine over the user's failure counter and lock
//! timestamp. It performs no I/O; callers persist the mutated user,
//! including on the failure path where the mutation must be durable even
//! though the overall operation reports an error.

use chrono::Duration;
use tracing::warn;

use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainResult};

/// Configuration for the lockout policy
#[derive(Debug, Clone)]
pub struct AccountLockConfig {
    /// Consecutive failures at which the account locks
    pub max_failed_attempts: u32,
    /// How long a triggered lock lasts (in minutes)
    pub lock_duration_minutes: i64,
}

impl Default for AccountLockConfig {
    fn default() -> Self {
        Self {
            max_failed_attempts: 5,
            lock_duration_minutes: 30,
        }
    }
}

/// Lockout policy applied around every credential check
#[derive(Debug, Clone)]
pub struct AccountLockPolicy {
    config: AccountLockConfig,
}

impl AccountLockPolicy {
    /// Create a policy with the given configuration
    pub fn new(config: AccountLockConfig) -> Self {
        Self { config }
    }

    /// Create a policy with the default configuration
    pub fn with_defaults() -> Self {
        Self::new(AccountLockConfig::default())
    }

    /// Rejects disabled or currently-locked accounts.
    ///
    /// Runs before any secret comparison so a locked account never
    /// reaches the credential check.
    pub fn check_accessible(&self, user: &User) -> DomainResult<()> {
        if !user.is_enabled {
            return Err(AuthError::AccountDisabled.into());
        }

        if user.is_locked() {
            return Err(AuthError::AccountLocked.into());
        }

        Ok(())
    }

    /// Records a failed attempt and returns the error to surface.
    ///
    /// At the configured threshold the account locks and the transition
    /// itself is reported as `TooManyAttempts`; before it, the caller
    /// sees plain `InvalidCredentials`.
    pub fn on_failure(&self, user: &mut User) -> AuthError {
        let attempts = user.record_login_failure();

        if attempts >= self.config.max_failed_attempts {
            user.lock_for(Duration::minutes(self.config.lock_duration_minutes));
            warn!(
                user_id = %user.id,
                attempts,
                lock_minutes = self.config.lock_duration_minutes,
                "Account locked after repeated failed logins"
            );
            AuthError::TooManyAttempts
        } else {
            AuthError::InvalidCredentials
        }
    }

    /// Records a successful authentication: counter reset, login stamped
    pub fn on_success(&self, user: &mut User) {
        user.record_login_success();
    }
}
