//! Role and permission entities.
//!
//! Roles and permissions are flat name sets managed outside this core;
//! they are read here only to stamp claims into issued tokens.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named role carrying its permission name set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Unique identifier for the role
    pub id: Uuid,

    /// Role name (e.g. "USER", "ADMIN")
    pub name: String,

    /// Names of the permissions granted by this role
    pub permissions: BTreeSet<String>,
}

impl Role {
    /// Creates a new role with the given name and permissions
    pub fn new(name: impl Into<String>, permissions: impl IntoIterator<Item = String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            permissions: permissions.into_iter().collect(),
        }
    }
}

/// Flattens a role set into its de-duplicated permission name set.
///
/// Pure function independent of any entity-loading mechanism; the ordered
/// set keeps claim ordering stable across issuances.
pub fn derive_permissions(roles: &[Role]) -> BTreeSet<String> {
    roles
        .iter()
        .flat_map(|role| role.permissions.iter().cloned())
        .collect()
}
