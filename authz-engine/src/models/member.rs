//! Member model - the identity a resolution pass runs for.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use super::{BranchId, MemberId};

/// Membership standing. Only verified states count as active membership
/// for gated permissions; the minor states track the verification
/// workflow and never satisfy an active-membership gate on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    Active,
    Deactivated,
    VerifiedMembership,
    UnverifiedMinor,
    VerifiedMinor,
    MinorMembershipVerified,
    MinorParentVerified,
}

impl MemberStatus {
    /// Statuses accepted by the active-membership gate.
    pub fn counts_as_active_membership(self) -> bool {
        matches!(
            self,
            MemberStatus::VerifiedMembership | MemberStatus::VerifiedMinor
        )
    }
}

/// Member entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub branch_id: BranchId,
    pub status: MemberStatus,
    pub warrantable: bool,
    pub membership_expires_on: Option<DateTime<Utc>>,
    pub background_check_expires_on: Option<DateTime<Utc>>,
    pub birth_month: u32,
    pub birth_year: i32,
}

impl Member {
    /// Age in whole years at `now`, from birth month and year. Members
    /// record no birth day, so the birthday is taken as the first of the
    /// birth month.
    pub fn age_at(&self, now: DateTime<Utc>) -> i32 {
        let mut age = now.year() - self.birth_year;
        if self.birth_month > now.month() {
            age -= 1;
        }
        age
    }

    /// Check whether the member has a current, verified membership.
    pub fn has_active_membership(&self, now: DateTime<Utc>) -> bool {
        self.status.counts_as_active_membership()
            && self.membership_expires_on.is_some_and(|expires| expires > now)
    }

    /// Check whether the member's background check is current.
    pub fn has_active_background_check(&self, now: DateTime<Utc>) -> bool {
        self.background_check_expires_on
            .is_some_and(|expires| expires > now)
    }
}
