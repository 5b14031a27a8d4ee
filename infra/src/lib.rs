//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the IAM backend.
//! It provides the concrete implementations of the core's capability
//! traits:
//! - **Database**: MySQL repositories using SQLx
//! - **Secret hashing**: bcrypt implementation of `SecretHasher`

pub mod auth;
pub mod database;

pub use auth::BcryptSecretHasher;
pub use database::connection::{DatabaseConfig, DatabasePool};
pub use database::mysql::{
    MySqlBlacklistRepository, MySqlRoleRepository, MySqlTokenRepository, MySqlUserRepository,
};
