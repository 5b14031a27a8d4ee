//! Business services containing domain logic and use cases.

pub mod auth;
pub mod token;

// Re-export commonly used types
pub use auth::{AccountLockConfig, AccountLockPolicy, AuthService, AuthServiceConfig, SecretHasher};
pub use token::{
    TokenCleanupConfig, TokenCleanupService, TokenCodec, TokenService, TokenServiceConfig,
    UserSweepReport,
};
