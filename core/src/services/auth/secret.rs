//! Secret hashing capability consumed by registration and login.

use crate::errors::DomainResult;

/// Opaque hash-and-verify capability for user secrets.
///
/// The algorithm is an infrastructure concern; this core only ever asks
/// "does this plaintext match this hash".
pub trait SecretHasher: Send + Sync {
    /// Hash a plaintext secret for storage
    fn hash(&self, plaintext: &str) -> DomainResult<String>;

    /// Verify a plaintext secret against a stored hash
    fn verify(&self, plaintext: &str, hash: &str) -> DomainResult<bool>;
}
