//! Error type definitions for authentication and token management.
//!
//! Callers at the request boundary map these to HTTP-equivalent statuses.
//! Variants are deliberately coarse where finer detail would aid credential
//! or token enumeration: an unknown user and a wrong secret both surface as
//! the same class of rejection, and a replayed refresh token is reported as
//! revoked whether or not it ever existed.

use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("User not found")]
    UserNotFound,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("Account is not enabled")]
    AccountDisabled,

    #[error("Account is temporarily locked")]
    AccountLocked,

    #[error("Too many failed attempts, account locked")]
    TooManyAttempts,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Role not found: {name}")]
    RoleNotFound { name: String },
}

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Bad signature, wrong issuer, malformed payload or a token of the
    /// wrong type. Collapsed into a single variant so callers cannot
    /// distinguish why verification failed.
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    /// Covers both "never existed" and "already consumed".
    #[error("Token revoked")]
    TokenRevoked,

    #[error("Token does not belong to this user")]
    TokenNotOwnedByUser,

    #[error("Token creation failed")]
    TokenCreationFailed,
}
