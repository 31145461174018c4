//! Permission model - atomic grant of authority with scoping and gates.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::PermissionId;

/// How far a grant's authority extends in the branch hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopingRule {
    Global,
    BranchOnly,
    BranchAndChildren,
}

/// Identifies a (resource-type, action) pair in a permission's policy map.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PolicyKey {
    pub resource: String,
    pub action: String,
}

impl PolicyKey {
    pub fn new(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            action: action.into(),
        }
    }
}

impl fmt::Display for PolicyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.resource, self.action)
    }
}

/// Permission entity.
///
/// `policies` maps resource-type names to the actions this permission
/// authorizes on them. Gate flags are checked per contributing role
/// assignment during resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    pub id: PermissionId,
    pub name: String,
    pub scoping_rule: ScopingRule,
    pub is_super_user: bool,
    pub requires_warrant: bool,
    pub require_active_membership: bool,
    pub require_active_background_check: bool,
    pub require_min_age: Option<u32>,
    pub policies: BTreeMap<String, BTreeSet<String>>,
}

impl Permission {
    /// Create an ungated permission with no policy map.
    pub fn new(id: PermissionId, name: impl Into<String>, scoping_rule: ScopingRule) -> Self {
        Self {
            id,
            name: name.into(),
            scoping_rule,
            is_super_user: false,
            requires_warrant: false,
            require_active_membership: false,
            require_active_background_check: false,
            require_min_age: None,
            policies: BTreeMap::new(),
        }
    }

    /// Declare an action this permission authorizes on a resource type.
    pub fn with_policy(mut self, resource: impl Into<String>, action: impl Into<String>) -> Self {
        self.policies
            .entry(resource.into())
            .or_default()
            .insert(action.into());
        self
    }

    /// Check whether this permission declares the given policy key.
    pub fn declares(&self, key: &PolicyKey) -> bool {
        self.policies
            .get(&key.resource)
            .is_some_and(|actions| actions.contains(&key.action))
    }

    /// All policy keys declared by this permission.
    pub fn policy_keys(&self) -> impl Iterator<Item = PolicyKey> + '_ {
        self.policies.iter().flat_map(|(resource, actions)| {
            actions
                .iter()
                .map(move |action| PolicyKey::new(resource.clone(), action.clone()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declares_policy_key() {
        let permission = Permission::new(1, "Can Manage Members", ScopingRule::Global)
            .with_policy("Members", "view")
            .with_policy("Members", "edit");

        assert!(permission.declares(&PolicyKey::new("Members", "view")));
        assert!(permission.declares(&PolicyKey::new("Members", "edit")));
        assert!(!permission.declares(&PolicyKey::new("Members", "delete")));
        assert!(!permission.declares(&PolicyKey::new("Branches", "view")));
    }

    #[test]
    fn test_policy_keys_enumerates_all_pairs() {
        let permission = Permission::new(1, "Can Review Warrants", ScopingRule::BranchOnly)
            .with_policy("Warrants", "view")
            .with_policy("Warrants", "approve")
            .with_policy("Members", "view");

        let keys: Vec<PolicyKey> = permission.policy_keys().collect();
        assert_eq!(keys.len(), 3);
        assert!(keys.contains(&PolicyKey::new("Warrants", "approve")));
    }
}
