//! User entity representing a registered account in the IAM system.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::role::{derive_permissions, Role};

/// User entity representing a registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Unique display name chosen at registration
    pub nickname: String,

    /// Unique login identifier
    pub email: String,

    /// Hashed secret; never the plaintext
    pub password_hash: String,

    /// Whether the account may authenticate at all
    pub is_enabled: bool,

    /// Consecutive failed login attempts since the last success
    pub failed_login_attempts: u32,

    /// If set and in the future, the account rejects authentication
    pub account_locked_until: Option<DateTime<Utc>>,

    /// Timestamp of the user's last successful login
    pub last_login_at: Option<DateTime<Utc>>,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Roles attached to this user; every user has at least one
    pub roles: Vec<Role>,
}

impl User {
    /// Creates a new enabled user with a single role
    pub fn new(
        nickname: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            nickname: nickname.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            is_enabled: true,
            failed_login_attempts: 0,
            account_locked_until: None,
            last_login_at: None,
            created_at: Utc::now(),
            roles: vec![role],
        }
    }

    /// Whether the account is currently locked out
    pub fn is_locked(&self) -> bool {
        self.account_locked_until
            .map(|until| until > Utc::now())
            .unwrap_or(false)
    }

    /// Records a successful authentication: resets the failure counter
    /// and stamps the login time
    pub fn record_login_success(&mut self) {
        self.failed_login_attempts = 0;
        self.last_login_at = Some(Utc::now());
    }

    /// Records a failed authentication attempt and returns the new count
    pub fn record_login_failure(&mut self) -> u32 {
        self.failed_login_attempts += 1;
        self.failed_login_attempts
    }

    /// Locks the account for the given duration from now
    pub fn lock_for(&mut self, duration: Duration) {
        self.account_locked_until = Some(Utc::now() + duration);
    }

    /// Role names attached to this user
    pub fn role_names(&self) -> Vec<String> {
        self.roles.iter().map(|role| role.name.clone()).collect()
    }

    /// Permission names derived transitively from the user's roles
    pub fn permission_names(&self) -> BTreeSet<String> {
        derive_permissions(&self.roles)
    }
}
