//! Role assignment model - time-bounded, revocable member-to-role grants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AssignmentId, BranchId, MemberId, Role};

/// A member's assignment to a role, anchored at a branch.
///
/// Created by an approval workflow, mutated only by revocation, and
/// expires passively by clock. A non-null `revoker_id` marks the
/// assignment revoked, which is terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub id: AssignmentId,
    pub member_id: MemberId,
    pub role: Role,
    pub branch_id: BranchId,
    pub start_on: DateTime<Utc>,
    pub expires_on: Option<DateTime<Utc>>,
    pub revoker_id: Option<MemberId>,
    pub approver_id: MemberId,
}

impl RoleAssignment {
    pub fn new(
        id: AssignmentId,
        member_id: MemberId,
        role: Role,
        branch_id: BranchId,
        start_on: DateTime<Utc>,
        approver_id: MemberId,
    ) -> Self {
        Self {
            id,
            member_id,
            role,
            branch_id,
            start_on,
            expires_on: None,
            revoker_id: None,
            approver_id,
        }
    }

    pub fn expiring(mut self, expires_on: DateTime<Utc>) -> Self {
        self.expires_on = Some(expires_on);
        self
    }

    pub fn revoked_by(mut self, revoker_id: MemberId) -> Self {
        self.revoker_id = Some(revoker_id);
        self
    }
}
