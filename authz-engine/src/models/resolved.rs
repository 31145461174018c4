//! Resolved permission - the derived output of a resolution pass.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::{BranchId, Permission, PermissionId, ScopingRule};

/// The branch scope a resolved permission applies to.
///
/// `Unrestricted` is a sentinel, not a finite set: a globally scoped
/// grant is valid everywhere, including branches created later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BranchScope {
    Unrestricted,
    Branches(BTreeSet<BranchId>),
}

impl BranchScope {
    pub fn is_unrestricted(&self) -> bool {
        matches!(self, BranchScope::Unrestricted)
    }

    /// Check whether the scope covers a branch.
    pub fn covers(&self, branch_id: BranchId) -> bool {
        match self {
            BranchScope::Unrestricted => true,
            BranchScope::Branches(ids) => ids.contains(&branch_id),
        }
    }

    /// Merge a contribution from another assignment of the same
    /// permission: any unrestricted contribution wins, otherwise the
    /// branch sets are unioned.
    pub fn merge(&mut self, other: BranchScope) {
        match (&mut *self, other) {
            (BranchScope::Unrestricted, _) => {}
            (_, BranchScope::Unrestricted) => *self = BranchScope::Unrestricted,
            (BranchScope::Branches(mine), BranchScope::Branches(theirs)) => {
                mine.extend(theirs);
            }
        }
    }

    /// Intersect with a branch filter. Unrestricted scopes pass through
    /// unchanged.
    pub fn restrict_to(&self, filter: &[BranchId]) -> BranchScope {
        match self {
            BranchScope::Unrestricted => BranchScope::Unrestricted,
            BranchScope::Branches(ids) => BranchScope::Branches(
                ids.iter().copied().filter(|id| filter.contains(id)).collect(),
            ),
        }
    }

    /// A finite scope with no branches grants nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            BranchScope::Unrestricted => false,
            BranchScope::Branches(ids) => ids.is_empty(),
        }
    }
}

/// A permission that survived gating, annotated with its effective
/// branch scope. Owned exclusively by the resolution result and never
/// mutated after the pass completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedPermission {
    pub id: PermissionId,
    pub name: String,
    pub scoping_rule: ScopingRule,
    pub is_super_user: bool,
    pub scope: BranchScope,
    pub policies: BTreeMap<String, BTreeSet<String>>,
}

impl ResolvedPermission {
    pub fn from_permission(permission: &Permission, scope: BranchScope) -> Self {
        Self {
            id: permission.id,
            name: permission.name.clone(),
            scoping_rule: permission.scoping_rule,
            is_super_user: permission.is_super_user,
            scope,
            policies: permission.policies.clone(),
        }
    }

    /// Check whether this permission authorizes the given policy key.
    pub fn declares(&self, key: &super::PolicyKey) -> bool {
        self.policies
            .get(&key.resource)
            .is_some_and(|actions| actions.contains(&key.action))
    }

    /// All policy keys this permission authorizes.
    pub fn policy_keys(&self) -> impl Iterator<Item = super::PolicyKey> + '_ {
        self.policies.iter().flat_map(|(resource, actions)| {
            actions
                .iter()
                .map(move |action| super::PolicyKey::new(resource.clone(), action.clone()))
        })
    }
}

/// The effective permission set for one member at one instant.
pub type ResolvedPermissions = BTreeMap<PermissionId, ResolvedPermission>;
