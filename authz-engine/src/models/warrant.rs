//! Warrant model - time-bounded credential for warrant-gated permissions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MemberId, WarrantId};

/// Warrant lifecycle. `Requested`/`Pending` precede activation; only
/// `Current` can satisfy a warrant gate. `Expired`, `Deactivated`,
/// `Declined` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarrantStatus {
    Pending,
    Current,
    Expired,
    Deactivated,
    Declined,
    Cancelled,
}

/// Warrant entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warrant {
    pub id: WarrantId,
    pub member_id: MemberId,
    pub status: WarrantStatus,
    pub start_on: DateTime<Utc>,
    pub expires_on: DateTime<Utc>,
}

impl Warrant {
    pub fn new(
        id: WarrantId,
        member_id: MemberId,
        status: WarrantStatus,
        start_on: DateTime<Utc>,
        expires_on: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            member_id,
            status,
            start_on,
            expires_on,
        }
    }

    /// Check whether this warrant satisfies a warrant gate at `now`.
    ///
    /// Status must be `Current` and the interval must contain `now`; a
    /// non-current warrant never counts, even when a current one coexists
    /// on the same member.
    pub fn satisfies_gate(&self, now: DateTime<Utc>) -> bool {
        self.status == WarrantStatus::Current && self.start_on <= now && self.expires_on >= now
    }
}
