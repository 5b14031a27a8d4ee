//! Configuration for the authentication service

use super::account_lock::AccountLockConfig;

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// Lockout policy configuration
    pub lock: AccountLockConfig,
    /// Role granted to newly registered users
    pub default_role: String,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            lock: AccountLockConfig::default(),
            default_role: "USER".to_string(),
        }
    }
}
