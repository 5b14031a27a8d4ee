//! MySQL implementation of the RoleRepository trait.

use std::collections::BTreeSet;

use async_trait::async_trait;
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use iam_core::domain::entities::role::Role;
use iam_core::errors::DomainError;
use iam_core::repositories::RoleRepository;

/// MySQL implementation of RoleRepository
pub struct MySqlRoleRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlRoleRepository {
    /// Create a new MySQL role repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for MySqlRoleRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, DomainError> {
        let query = r#"
            SELECT r.id AS role_id, r.name AS role_name, p.name AS permission_name
            FROM roles r
            LEFT JOIN role_permissions rp ON rp.role_id = r.id
            LEFT JOIN permissions p ON p.id = rp.permission_id
            WHERE r.name = ?
        "#;

        let rows = sqlx::query(query)
            .bind(name)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Failed to find role: {}", e)))?;

        let Some(first) = rows.first() else {
            return Ok(None);
        };

        let role_id: String = first
            .try_get("role_id")
            .map_err(|e| DomainError::Database(format!("Failed to get role_id: {}", e)))?;
        let role_name: String = first
            .try_get("role_name")
            .map_err(|e| DomainError::Database(format!("Failed to get role_name: {}", e)))?;

        let mut permissions = BTreeSet::new();
        for row in &rows {
            let permission: Option<String> = row.try_get("permission_name").map_err(|e| {
                DomainError::Database(format!("Failed to get permission_name: {}", e))
            })?;
            if let Some(permission) = permission {
                permissions.insert(permission);
            }
        }

        Ok(Some(Role {
            id: Uuid::parse_str(&role_id)
                .map_err(|e| DomainError::Database(format!("Invalid role UUID: {}", e)))?,
            name: role_name,
            permissions,
        }))
    }
}
