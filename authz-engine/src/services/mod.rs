//! Engine services: temporal validation, hierarchy, resolution,
//! evaluation, caching, and the authorization facade.

pub mod authorization;
pub mod cache;
pub mod evaluator;
pub mod hierarchy;
pub mod resolver;
pub mod source;
pub mod temporal;

pub use authorization::{AuthorizationService, AuthzLogEntry, CheckContext, PolicyGrant};
pub use cache::PermissionCache;
pub use evaluator::{PolicyRegistry, Resource, ResourceRule, SelfAccess};
pub use hierarchy::BranchHierarchy;
pub use source::{AuthzStore, Clock, SystemClock};
