//! User repository trait defining the interface for user data persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
///
/// Lookups always return the user with roles and permissions attached;
/// whether the storage layer fetches them eagerly or lazily is its own
/// concern. Token issuance needs the claim sets synchronously.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their login identifier
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found, roles and permissions populated
    /// * `Ok(None)` - No user with the given email
    /// * `Err(DomainError)` - Database error occurred
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by their unique identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Persist a new user
    ///
    /// # Returns
    /// * `Ok(User)` - The saved user
    /// * `Err(DomainError)` - Save failed (e.g. duplicate email)
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Persist mutations to an existing user
    ///
    /// Used for failure-counter, lock and last-login updates; these must
    /// be durable even when the surrounding operation reports failure.
    async fn update(&self, user: User) -> Result<User, DomainError>;
}
