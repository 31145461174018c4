//! Branch model - node in the organizational hierarchy.

use serde::{Deserialize, Serialize};

use super::BranchId;

/// Branch entity. Branches form a forest; a `None` parent marks a root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub id: BranchId,
    pub parent_id: Option<BranchId>,
    pub name: String,
    pub branch_type: String,
}

impl Branch {
    pub fn new(
        id: BranchId,
        parent_id: Option<BranchId>,
        name: impl Into<String>,
        branch_type: impl Into<String>,
    ) -> Self {
        Self {
            id,
            parent_id,
            name: name.into(),
            branch_type: branch_type.into(),
        }
    }

    /// Check if this is a root branch.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
