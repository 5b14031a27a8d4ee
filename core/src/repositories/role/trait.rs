//! Role repository trait.
//!
//! Role and permission management lives outside this core; registration
//! only needs to resolve the default role by name.

use async_trait::async_trait;

use crate::domain::entities::role::Role;
use crate::errors::DomainError;

/// Read-only lookup of roles with their permission sets
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Find a role by its unique name
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, DomainError>;
}
