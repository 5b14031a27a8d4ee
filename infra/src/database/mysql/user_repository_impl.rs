//! MySQL implementation of the UserRepository trait.
//!
//! Lookups always return the user with roles and permissions attached;
//! the role graph is loaded in a second query and folded into the
//! entity, which keeps the repository contract eager without a wide
//! join on the hot user row.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use iam_core::domain::entities::role::Role;
use iam_core::domain::entities::user::User;
use iam_core::errors::DomainError;
use iam_core::repositories::UserRepository;

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlUserRepository {
    /// Create a new MySQL user repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a user row (without roles) to a User entity
    fn row_to_user(row: &sqlx::mysql::MySqlRow) -> Result<User, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| DomainError::Database(format!("Failed to get id: {}", e)))?;

        Ok(User {
            id: Uuid::parse_str(&id)
                .map_err(|e| DomainError::Database(format!("Invalid user UUID: {}", e)))?,
            nickname: row
                .try_get("nickname")
                .map_err(|e| DomainError::Database(format!("Failed to get nickname: {}", e)))?,
            email: row
                .try_get("email")
                .map_err(|e| DomainError::Database(format!("Failed to get email: {}", e)))?,
            password_hash: row
                .try_get("password_hash")
                .map_err(|e| DomainError::Database(format!("Failed to get password_hash: {}", e)))?,
            is_enabled: row
                .try_get("is_enabled")
                .map_err(|e| DomainError::Database(format!("Failed to get is_enabled: {}", e)))?,
            failed_login_attempts: row.try_get::<i32, _>("failed_login_attempts").map_err(|e| {
                DomainError::Database(format!("Failed to get failed_login_attempts: {}", e))
            })? as u32,
            account_locked_until: row.try_get("account_locked_until").map_err(|e| {
                DomainError::Database(format!("Failed to get account_locked_until: {}", e))
            })?,
            last_login_at: row
                .try_get("last_login_at")
                .map_err(|e| DomainError::Database(format!("Failed to get last_login_at: {}", e)))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::Database(format!("Failed to get created_at: {}", e)))?,
            roles: Vec::new(),
        })
    }

    /// Load the role graph for a user and fold it into Role entities
    async fn load_roles(&self, user_id: Uuid) -> Result<Vec<Role>, DomainError> {
        let query = r#"
            SELECT r.id AS role_id, r.name AS role_name, p.name AS permission_name
            FROM roles r
            INNER JOIN user_roles ur ON ur.role_id = r.id
            LEFT JOIN role_permissions rp ON rp.role_id = r.id
            LEFT JOIN permissions p ON p.id = rp.permission_id
            WHERE ur.user_id = ?
            ORDER BY r.name
        "#;

        let rows = sqlx::query(query)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Failed to load roles: {}", e)))?;

        let mut roles: Vec<Role> = Vec::new();
        for row in rows {
            let role_id: String = row
                .try_get("role_id")
                .map_err(|e| DomainError::Database(format!("Failed to get role_id: {}", e)))?;
            let role_id = Uuid::parse_str(&role_id)
                .map_err(|e| DomainError::Database(format!("Invalid role UUID: {}", e)))?;
            let role_name: String = row
                .try_get("role_name")
                .map_err(|e| DomainError::Database(format!("Failed to get role_name: {}", e)))?;
            let permission: Option<String> = row.try_get("permission_name").map_err(|e| {
                DomainError::Database(format!("Failed to get permission_name: {}", e))
            })?;

            match roles.iter_mut().find(|r| r.id == role_id) {
                Some(role) => {
                    if let Some(permission) = permission {
                        role.permissions.insert(permission);
                    }
                }
                None => {
                    let mut permissions = BTreeSet::new();
                    if let Some(permission) = permission {
                        permissions.insert(permission);
                    }
                    roles.push(Role {
                        id: role_id,
                        name: role_name,
                        permissions,
                    });
                }
            }
        }

        Ok(roles)
    }

    async fn hydrate(&self, row: sqlx::mysql::MySqlRow) -> Result<User, DomainError> {
        let mut user = Self::row_to_user(&row)?;
        user.roles = self.load_roles(user.id).await?;
        Ok(user)
    }
}

const USER_COLUMNS: &str = "id, nickname, email, password_hash, is_enabled, \
    failed_login_attempts, account_locked_until, last_login_at, created_at";

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ? LIMIT 1"
        );

        let result = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Failed to find user: {}", e)))?;

        match result {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ? LIMIT 1"
        );

        let result = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Failed to find user: {}", e)))?;

        match result {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let query = r#"
            INSERT INTO users (
                id, nickname, email, password_hash, is_enabled,
                failed_login_attempts, account_locked_until, last_login_at, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(user.id.to_string())
            .bind(&user.nickname)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.is_enabled)
            .bind(user.failed_login_attempts as i32)
            .bind(user.account_locked_until)
            .bind(user.last_login_at)
            .bind(user.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Failed to create user: {}", e)))?;

        for role in &user.roles {
            sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES (?, ?)")
                .bind(user.id.to_string())
                .bind(role.id.to_string())
                .execute(&self.pool)
                .await
                .map_err(|e| DomainError::Database(format!("Failed to link role: {}", e)))?;
        }

        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, DomainError> {
        // Role membership is managed elsewhere; only the account state
        // columns are written here
        let query = r#"
            UPDATE users
            SET nickname = ?, password_hash = ?, is_enabled = ?,
                failed_login_attempts = ?, account_locked_until = ?, last_login_at = ?
            WHERE id = ?
        "#;

        let result = sqlx::query(query)
            .bind(&user.nickname)
            .bind(&user.password_hash)
            .bind(user.is_enabled)
            .bind(user.failed_login_attempts as i32)
            .bind(user.account_locked_until)
            .bind(user.last_login_at)
            .bind(user.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Database(format!("Failed to update user: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound {
                resource: "User".to_string(),
            });
        }

        Ok(user)
    }
}
