//! Temporal validation of role assignments.

use chrono::{DateTime, Utc};

use crate::models::RoleAssignment;

/// Check whether a role assignment is active at `now`.
///
/// Active means: started, not expired (a missing expiration is
/// open-ended), and not revoked. A start date in the future is a normal
/// "not yet active", not an error. Pure predicate, no I/O.
pub fn is_active(assignment: &RoleAssignment, now: DateTime<Utc>) -> bool {
    assignment.start_on <= now
        && assignment.expires_on.is_none_or(|expires| expires >= now)
        && assignment.revoker_id.is_none()
}
