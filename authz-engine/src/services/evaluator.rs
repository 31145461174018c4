//! Policy evaluation - allow/deny decisions over a resolved permission set.

use std::collections::HashMap;

use crate::error::AuthzError;
use crate::models::{BranchId, Member, MemberId, Permission, PolicyKey, ResolvedPermissions};

/// The target of an authorization check.
///
/// `branch_ids` is the branch context the resource belongs to; empty
/// means the resource has no branch affiliation, in which case holding
/// the policy anywhere suffices.
#[derive(Debug, Clone)]
pub struct Resource {
    pub kind: String,
    pub id: Option<i64>,
    pub branch_ids: Vec<BranchId>,
    pub owner_id: Option<MemberId>,
}

impl Resource {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: None,
            branch_ids: Vec::new(),
            owner_id: None,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn in_branch(mut self, branch_id: BranchId) -> Self {
        self.branch_ids.push(branch_id);
        self
    }

    pub fn owned_by(mut self, member_id: MemberId) -> Self {
        self.owner_id = Some(member_id);
        self
    }
}

/// Self-access rule for a resource kind: whether a member may always act
/// on a record they own, regardless of scoped permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelfAccess {
    #[default]
    Never,
    OwnerMatches,
}

/// Per-policy evaluation strategy. Kept deliberately small: the only
/// resource-specific variation the engine supports is the self-access
/// rule; branch extraction is uniform through [`Resource::branch_ids`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceRule {
    pub self_access: SelfAccess,
}

impl ResourceRule {
    pub fn scoped() -> Self {
        Self {
            self_access: SelfAccess::Never,
        }
    }

    pub fn scoped_or_own() -> Self {
        Self {
            self_access: SelfAccess::OwnerMatches,
        }
    }
}

/// Registration map from policy keys to evaluation rules, built at
/// startup. Replaces convention-based method lookup: an unregistered
/// key is a configuration error surfaced by [`PolicyRegistry::validate`],
/// never a silent miss at call time.
#[derive(Debug, Default)]
pub struct PolicyRegistry {
    rules: HashMap<PolicyKey, ResourceRule>,
}

impl PolicyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        mut self,
        resource: impl Into<String>,
        action: impl Into<String>,
        rule: ResourceRule,
    ) -> Self {
        self.rules.insert(PolicyKey::new(resource, action), rule);
        self
    }

    pub fn rule(&self, key: &PolicyKey) -> Option<&ResourceRule> {
        self.rules.get(key)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Check that every policy key declared anywhere in the permission
    /// catalog has a registered rule. Run once at startup; a miss is
    /// corrupt reference data and fatal.
    pub fn validate(&self, catalog: &[Permission]) -> Result<(), AuthzError> {
        for permission in catalog {
            for key in permission.policy_keys() {
                if !self.rules.contains_key(&key) {
                    return Err(AuthzError::UnboundPolicy(key));
                }
            }
        }
        Ok(())
    }
}

/// Decide whether the member may perform `key` on `resource`, given an
/// already-resolved permission set.
///
/// Order matters: the super-user bypass and the self-access exception
/// run before scope matching, so neither depends on branch context.
/// Returns plain `false` on denial - denial is not an error.
pub fn authorize(
    member: &Member,
    resolved: &ResolvedPermissions,
    key: &PolicyKey,
    resource: &Resource,
    rule: &ResourceRule,
) -> bool {
    if is_super_user(resolved) {
        return true;
    }

    if rule.self_access == SelfAccess::OwnerMatches && resource.owner_id == Some(member.id) {
        return true;
    }

    resolved.values().any(|permission| {
        if !permission.declares(key) {
            return false;
        }
        if permission.scope.is_unrestricted() || resource.branch_ids.is_empty() {
            return true;
        }
        resource
            .branch_ids
            .iter()
            .any(|branch_id| permission.scope.covers(*branch_id))
    })
}

/// Check whether the resolved set carries the designated bypass
/// permission.
pub fn is_super_user(resolved: &ResolvedPermissions) -> bool {
    resolved.values().any(|permission| permission.is_super_user)
}
