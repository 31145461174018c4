//! Collaborator traits - the engine's only inputs.
//!
//! The engine never performs I/O itself; data suppliers hand it
//! already-fetched records through these traits. Store failures surface
//! as [`AuthzError::Store`], never as a denial.

use chrono::{DateTime, Utc};

use crate::error::AuthzError;
use crate::models::{Branch, MemberId, RoleAssignment, Warrant};

/// Supplies raw assignment, warrant and branch records.
///
/// Role assignments must arrive with role and permission data preloaded
/// (including each permission's policy map); warrants arrive in all
/// statuses, and the gating logic selects the current one.
pub trait AuthzStore: Send + Sync {
    fn assignments_for(&self, member_id: MemberId) -> Result<Vec<RoleAssignment>, AuthzError>;
    fn warrants_for(&self, member_id: MemberId) -> Result<Vec<Warrant>, AuthzError>;
    fn branches(&self) -> Result<Vec<Branch>, AuthzError>;
}

/// Wall-clock source for "now". Failure is an explicit
/// [`AuthzError::ClockUnavailable`], distinct from denial: "cannot
/// determine" must never masquerade as "not allowed".
pub trait Clock: Send + Sync {
    fn now(&self) -> Result<DateTime<Utc>, AuthzError>;
}

/// System wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Result<DateTime<Utc>, AuthzError> {
        Ok(Utc::now())
    }
}
