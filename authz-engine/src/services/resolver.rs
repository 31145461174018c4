//! Permission resolution - from raw assignments to the effective set.

use std::collections::btree_map::Entry;

use chrono::{DateTime, Utc};

use crate::config::EngineConfig;
use crate::models::{
    BranchScope, Member, Permission, ResolvedPermission, ResolvedPermissions, RoleAssignment,
    ScopingRule, Warrant,
};
use crate::services::{hierarchy::BranchHierarchy, temporal};

/// Produce the member's effective permission set at `now`.
///
/// Pure computation over already-fetched data. Assignments that fail
/// temporal validation contribute nothing; each (assignment, permission)
/// pair then runs the gate chain, and survivors contribute a branch
/// scope derived from the permission's scoping rule and the assignment's
/// anchor branch. Contributions for the same permission id merge with
/// "unrestricted wins, otherwise union".
pub fn resolve(
    member: &Member,
    assignments: &[RoleAssignment],
    warrants: &[Warrant],
    hierarchy: &BranchHierarchy,
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> ResolvedPermissions {
    // The warrant gate is a member-level fact, so evaluate it once.
    let has_current_warrant =
        member.warrantable && warrants.iter().any(|warrant| warrant.satisfies_gate(now));

    let mut resolved = ResolvedPermissions::new();

    for assignment in assignments {
        if !temporal::is_active(assignment, now) {
            tracing::debug!(
                assignment_id = assignment.id,
                member_id = member.id,
                "skipping inactive role assignment"
            );
            continue;
        }

        for permission in &assignment.role.permissions {
            if !passes_gates(member, permission, has_current_warrant, config, now) {
                continue;
            }

            let scope = scope_for(permission.scoping_rule, assignment, hierarchy);

            match resolved.entry(permission.id) {
                Entry::Occupied(mut existing) => existing.get_mut().scope.merge(scope),
                Entry::Vacant(vacant) => {
                    vacant.insert(ResolvedPermission::from_permission(permission, scope));
                }
            }
        }
    }

    resolved
}

/// Run the gate chain for one (member, permission) pair, short-circuiting
/// on the first failure.
fn passes_gates(
    member: &Member,
    permission: &Permission,
    has_current_warrant: bool,
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> bool {
    if config.require_active_warrant && permission.requires_warrant && !has_current_warrant {
        return false;
    }

    if permission.require_active_membership && !member.has_active_membership(now) {
        return false;
    }

    if permission.require_active_background_check && !member.has_active_background_check(now) {
        return false;
    }

    if let Some(min_age) = permission.require_min_age {
        if member.age_at(now) < min_age as i32 {
            return false;
        }
    }

    true
}

fn scope_for(
    rule: ScopingRule,
    assignment: &RoleAssignment,
    hierarchy: &BranchHierarchy,
) -> BranchScope {
    match rule {
        ScopingRule::Global => BranchScope::Unrestricted,
        ScopingRule::BranchOnly => {
            BranchScope::Branches([assignment.branch_id].into_iter().collect())
        }
        ScopingRule::BranchAndChildren => {
            BranchScope::Branches(hierarchy.descendants_including(assignment.branch_id))
        }
    }
}
