//! Shared fixtures for engine integration tests.
//!
//! Provides an in-memory store, deterministic clocks, and a small branch
//! tree: kingdom (1) -> principality (2) -> barony (3), with a second
//! kingdom child shire (4).

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Mutex, Once};

use authz_engine::services::AuthzStore;
use authz_engine::{
    AuthzError, Branch, Clock, Member, MemberStatus, Permission, Role, RoleAssignment,
    ScopingRule, Warrant, WarrantStatus,
};
use chrono::{DateTime, TimeZone, Utc};

static TRACING: Once = Once::new();

/// Install a test subscriber so engine traces surface under
/// `--nocapture` / `RUST_LOG`. Idempotent across tests.
pub fn init_tracing() {
    TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

pub const KINGDOM: i32 = 1;
pub const PRINCIPALITY: i32 = 2;
pub const BARONY: i32 = 3;
pub const SHIRE: i32 = 4;

pub fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

/// The reference instant every deterministic test runs at.
pub fn now() -> DateTime<Utc> {
    at(2025, 6, 1)
}

pub fn branch_tree() -> Vec<Branch> {
    vec![
        Branch::new(KINGDOM, None, "Kingdom", "kingdom"),
        Branch::new(PRINCIPALITY, Some(KINGDOM), "Principality", "principality"),
        Branch::new(BARONY, Some(PRINCIPALITY), "Barony", "barony"),
        Branch::new(SHIRE, Some(KINGDOM), "Shire", "shire"),
    ]
}

pub fn verified_member(id: i32, branch_id: i32) -> Member {
    Member {
        id,
        branch_id,
        status: MemberStatus::VerifiedMembership,
        warrantable: true,
        membership_expires_on: Some(at(2026, 1, 1)),
        background_check_expires_on: Some(at(2026, 1, 1)),
        birth_month: 1,
        birth_year: 1990,
    }
}

pub fn current_warrant(id: i32, member_id: i32) -> Warrant {
    Warrant::new(id, member_id, WarrantStatus::Current, at(2025, 1, 1), at(2025, 12, 31))
}

pub fn expired_warrant(id: i32, member_id: i32) -> Warrant {
    Warrant::new(id, member_id, WarrantStatus::Expired, at(2024, 1, 1), at(2024, 12, 31))
}

pub fn open_assignment(
    id: i32,
    member_id: i32,
    role: Role,
    branch_id: i32,
) -> RoleAssignment {
    RoleAssignment::new(id, member_id, role, branch_id, at(2025, 1, 1), 99)
}

pub fn officer_role(permission: Permission) -> Role {
    Role::new(50, "Officer", vec![permission])
}

pub fn member_view_permission(scoping: ScopingRule) -> Permission {
    Permission::new(10, "Can View Members", scoping).with_policy("Members", "view")
}

/// In-memory supplier with switchable failure modes.
#[derive(Default)]
pub struct TestStore {
    inner: Mutex<TestStoreInner>,
}

#[derive(Default)]
struct TestStoreInner {
    branches: Vec<Branch>,
    assignments: HashMap<i32, Vec<RoleAssignment>>,
    warrants: HashMap<i32, Vec<Warrant>>,
    fail: bool,
}

impl TestStore {
    pub fn new(branches: Vec<Branch>) -> Self {
        Self {
            inner: Mutex::new(TestStoreInner {
                branches,
                ..Default::default()
            }),
        }
    }

    pub fn add_assignment(&self, assignment: RoleAssignment) {
        self.inner
            .lock()
            .unwrap()
            .assignments
            .entry(assignment.member_id)
            .or_default()
            .push(assignment);
    }

    pub fn add_warrant(&self, warrant: Warrant) {
        self.inner
            .lock()
            .unwrap()
            .warrants
            .entry(warrant.member_id)
            .or_default()
            .push(warrant);
    }

    pub fn revoke_assignment(&self, member_id: i32, assignment_id: i32, revoker_id: i32) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(assignments) = inner.assignments.get_mut(&member_id) {
            for assignment in assignments.iter_mut() {
                if assignment.id == assignment_id {
                    assignment.revoker_id = Some(revoker_id);
                }
            }
        }
    }

    pub fn remove_warrants(&self, member_id: i32) {
        self.inner.lock().unwrap().warrants.remove(&member_id);
    }

    pub fn set_branches(&self, branches: Vec<Branch>) {
        self.inner.lock().unwrap().branches = branches;
    }

    pub fn set_failing(&self, fail: bool) {
        self.inner.lock().unwrap().fail = fail;
    }
}

impl AuthzStore for TestStore {
    fn assignments_for(&self, member_id: i32) -> Result<Vec<RoleAssignment>, AuthzError> {
        let inner = self.inner.lock().unwrap();
        if inner.fail {
            return Err(AuthzError::Store(anyhow::anyhow!("store offline")));
        }
        Ok(inner.assignments.get(&member_id).cloned().unwrap_or_default())
    }

    fn warrants_for(&self, member_id: i32) -> Result<Vec<Warrant>, AuthzError> {
        let inner = self.inner.lock().unwrap();
        if inner.fail {
            return Err(AuthzError::Store(anyhow::anyhow!("store offline")));
        }
        Ok(inner.warrants.get(&member_id).cloned().unwrap_or_default())
    }

    fn branches(&self) -> Result<Vec<Branch>, AuthzError> {
        Ok(self.inner.lock().unwrap().branches.clone())
    }
}

/// Clock pinned to a fixed instant.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> Result<DateTime<Utc>, AuthzError> {
        Ok(self.0)
    }
}

/// Clock that always fails, for "cannot determine" paths.
pub struct BrokenClock;

impl Clock for BrokenClock {
    fn now(&self) -> Result<DateTime<Utc>, AuthzError> {
        Err(AuthzError::ClockUnavailable("no time source".into()))
    }
}
