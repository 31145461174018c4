//! Role model - named bundle of permissions.

use serde::{Deserialize, Serialize};

use super::{Permission, RoleId};

/// Role entity, with its granted permissions preloaded by the supplier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub permissions: Vec<Permission>,
}

impl Role {
    pub fn new(id: RoleId, name: impl Into<String>, permissions: Vec<Permission>) -> Self {
        Self {
            id,
            name: name.into(),
            permissions,
        }
    }
}
