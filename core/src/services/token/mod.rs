//! Token service module for JWT management
//!
//! This module handles all token-related operations including:
//! - JWT access and refresh token signing and verification
//! - Refresh token ledger bookkeeping
//! - Access token blacklisting
//! - Background cleanup of expired ledger and blacklist state

mod cleanup;
mod codec;
mod config;
mod service;

#[cfg(test)]
mod tests;

pub use cleanup::{TokenCleanupConfig, TokenCleanupService, UserSweepReport};
pub use codec::TokenCodec;
pub use config::TokenServiceConfig;
pub use service::TokenService;
