//! Domain models for the permission engine.
//!
//! All entities are keyed by integer ids and are immutable for the
//! duration of a resolution pass; the engine never writes them back.

pub mod branch;
pub mod member;
pub mod member_role;
pub mod permission;
pub mod resolved;
pub mod role;
pub mod warrant;

pub use branch::Branch;
pub use member::{Member, MemberStatus};
pub use member_role::RoleAssignment;
pub use permission::{Permission, PolicyKey, ScopingRule};
pub use resolved::{BranchScope, ResolvedPermission, ResolvedPermissions};
pub use role::Role;
pub use warrant::{Warrant, WarrantStatus};

pub type MemberId = i32;
pub type BranchId = i32;
pub type RoleId = i32;
pub type PermissionId = i32;
pub type AssignmentId = i32;
pub type WarrantId = i32;
