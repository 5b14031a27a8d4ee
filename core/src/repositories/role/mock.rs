//! Mock implementation of RoleRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::role::Role;
use crate::errors::DomainError;

use super::trait_::RoleRepository;

/// Mock role repository for testing
pub struct MockRoleRepository {
    roles: Arc<RwLock<HashMap<String, Role>>>,
}

impl MockRoleRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            roles: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Seed the repository with a role
    pub async fn insert(&self, role: Role) {
        self.roles.write().await.insert(role.name.clone(), role);
    }
}

impl Default for MockRoleRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoleRepository for MockRoleRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, DomainError> {
        let roles = self.roles.read().await;
        Ok(roles.get(name).cloned())
    }
}
