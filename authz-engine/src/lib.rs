//! Branch-scoped permission resolution and policy evaluation engine.
//!
//! Given a member, a point in time, and a requested action on a
//! resource, decides whether the action is allowed - honoring role
//! assignments that are temporally bounded, revocable, scoped to an
//! organizational branch hierarchy, and gated by external facts (warrant
//! status, membership standing, background checks, minimum age).
//!
//! The engine is a pure in-process library: data stores supply raw
//! records through [`services::AuthzStore`], a [`services::Clock`]
//! supplies "now", and [`services::AuthorizationService`] is the single
//! entry point callers use.

pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::EngineConfig;
pub use error::AuthzError;
pub use models::{
    Branch, BranchScope, Member, MemberStatus, Permission, PolicyKey, ResolvedPermission,
    ResolvedPermissions, Role, RoleAssignment, ScopingRule, Warrant, WarrantStatus,
};
pub use services::{
    AuthorizationService, AuthzStore, Clock, PolicyRegistry, Resource, ResourceRule, SelfAccess,
    SystemClock,
};
