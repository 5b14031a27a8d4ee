//! Bcrypt implementation of the secret hashing capability.

use iam_core::errors::{DomainError, DomainResult};
use iam_core::services::auth::SecretHasher;

/// Hashes and verifies user secrets with bcrypt
pub struct BcryptSecretHasher {
    cost: u32,
}

impl BcryptSecretHasher {
    /// Create a hasher with an explicit work factor
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptSecretHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl SecretHasher for BcryptSecretHasher {
    fn hash(&self, plaintext: &str) -> DomainResult<String> {
        bcrypt::hash(plaintext, self.cost).map_err(|e| DomainError::Internal {
            message: format!("Failed to hash secret: {}", e),
        })
    }

    fn verify(&self, plaintext: &str, hash: &str) -> DomainResult<bool> {
        bcrypt::verify(plaintext, hash).map_err(|e| DomainError::Internal {
            message: format!("Failed to verify secret: {}", e),
        })
    }
}
