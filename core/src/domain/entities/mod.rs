//! Domain entities representing core business objects.

pub mod role;
pub mod token;
pub mod user;

// Re-export commonly used types
pub use role::{derive_permissions, Role};
pub use token::{
    BlacklistedToken, Claims, RefreshToken, TokenPair, TokenType,
    ACCESS_TOKEN_EXPIRY_SECONDS, JWT_ISSUER, REFRESH_TOKEN_EXPIRY_SECONDS,
};
pub use user::User;
