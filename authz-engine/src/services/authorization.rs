//! Authorization facade - the only entry point external code calls.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::AuthzError;
use crate::models::{
    BranchId, BranchScope, Member, MemberId, PermissionId, PolicyKey, ResolvedPermissions,
};
use crate::services::cache::PermissionCache;
use crate::services::evaluator::{self, PolicyRegistry, Resource};
use crate::services::hierarchy::BranchHierarchy;
use crate::services::resolver;
use crate::services::source::{AuthzStore, Clock};

/// One entry of the in-memory diagnostic log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthzLogEntry {
    pub at: DateTime<Utc>,
    pub member_id: MemberId,
    pub action: String,
    pub resource_kind: String,
    pub resource_id: Option<i64>,
    pub result: bool,
    pub extra: Vec<serde_json::Value>,
}

/// A policy key's merged grant for one member: the union of branch
/// scopes contributed by every permission declaring that key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyGrant {
    pub scope: BranchScope,
}

/// Marks that an authorization pass is already running on this call
/// chain.
///
/// Threaded by value through every check, never stored on the service:
/// a nested check (a policy evaluation that itself triggers `check_can`)
/// sees `in_authorization() == true`, and the outer chain's state is
/// restored on every exit path by construction, because nothing shared
/// was mutated. Concurrent requests each carry their own context.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckContext {
    in_authorization: bool,
}

impl CheckContext {
    pub fn in_authorization(&self) -> bool {
        self.in_authorization
    }

    /// The context for a check issued from inside an already-running
    /// evaluation.
    pub fn enter(self) -> Self {
        Self {
            in_authorization: true,
        }
    }
}

/// Public facade over resolution, evaluation, caching and diagnostics.
///
/// Constructed once at process start with an explicit store, clock and
/// policy registry - there is no global registry, and test code builds
/// isolated instances. The branch hierarchy is held as an immutable
/// snapshot behind an `RwLock<Arc<_>>`; `rebuild_hierarchy` swaps in a
/// complete replacement, so readers never observe a half-built tree.
pub struct AuthorizationService {
    config: EngineConfig,
    store: Arc<dyn AuthzStore>,
    clock: Arc<dyn Clock>,
    registry: PolicyRegistry,
    hierarchy: RwLock<Arc<BranchHierarchy>>,
    cache: PermissionCache,
    log: Mutex<VecDeque<AuthzLogEntry>>,
}

impl AuthorizationService {
    /// Build the service, constructing the branch hierarchy from the
    /// store's edge list. Corrupt reference data (a cycle, a dangling
    /// parent) fails construction - partial operation here would be a
    /// security hole, not a degradation.
    ///
    /// Integrators holding the permission catalog should run
    /// [`PolicyRegistry::validate`] against it before constructing the
    /// service, so a policy key with no registered rule surfaces at
    /// startup instead of as [`AuthzError::UnboundPolicy`] on the first
    /// check that reaches it.
    pub fn new(
        config: EngineConfig,
        store: Arc<dyn AuthzStore>,
        clock: Arc<dyn Clock>,
        registry: PolicyRegistry,
    ) -> Result<Self, AuthzError> {
        let hierarchy = BranchHierarchy::build(&store.branches()?)?;

        Ok(Self {
            config,
            store,
            clock,
            registry,
            hierarchy: RwLock::new(Arc::new(hierarchy)),
            cache: PermissionCache::new(),
            log: Mutex::new(VecDeque::new()),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The member's full effective permission set, cached per member
    /// until an invalidation hook fires.
    pub fn permissions(&self, member: &Member) -> Result<Arc<ResolvedPermissions>, AuthzError> {
        let now = self.clock.now()?;
        self.permissions_at(member, now)
    }

    fn permissions_at(
        &self,
        member: &Member,
        now: DateTime<Utc>,
    ) -> Result<Arc<ResolvedPermissions>, AuthzError> {
        if let Some(cached) = self.cache.get(member.id) {
            return Ok(cached);
        }

        let assignments = self.store.assignments_for(member.id)?;
        let warrants = self.store.warrants_for(member.id)?;
        let hierarchy = self.hierarchy_snapshot();

        let resolved = Arc::new(resolver::resolve(
            member,
            &assignments,
            &warrants,
            &hierarchy,
            &self.config,
            now,
        ));

        self.cache.insert(member.id, Arc::clone(&resolved));
        Ok(resolved)
    }

    /// Convenience projection of [`permissions`](Self::permissions);
    /// always in 1:1 correspondence with it.
    pub fn permission_ids(
        &self,
        member: &Member,
    ) -> Result<std::collections::BTreeSet<PermissionId>, AuthzError> {
        Ok(self.permissions(member)?.keys().copied().collect())
    }

    /// The member's policy map: every (resource-type, action) pair they
    /// can exercise somewhere, with the merged branch scope. An optional
    /// branch filter intersects each finite scope and drops entries left
    /// empty, so the filtered map is always a subset of the unfiltered
    /// one.
    pub fn policies(
        &self,
        member: &Member,
        branch_filter: Option<&[BranchId]>,
    ) -> Result<BTreeMap<PolicyKey, PolicyGrant>, AuthzError> {
        let resolved = self.permissions(member)?;
        let mut policies: BTreeMap<PolicyKey, PolicyGrant> = BTreeMap::new();

        for permission in resolved.values() {
            for key in permission.policy_keys() {
                policies
                    .entry(key)
                    .and_modify(|grant| grant.scope.merge(permission.scope.clone()))
                    .or_insert_with(|| PolicyGrant {
                        scope: permission.scope.clone(),
                    });
            }
        }

        if let Some(filter) = branch_filter {
            policies = policies
                .into_iter()
                .filter_map(|(key, grant)| {
                    let scope = grant.scope.restrict_to(filter);
                    if scope.is_empty() {
                        None
                    } else {
                        Some((key, PolicyGrant { scope }))
                    }
                })
                .collect();
        }

        Ok(policies)
    }

    /// Decide whether `member` may perform `action` on `resource`.
    ///
    /// `Ok(false)` is a normal denial. `Err` means the engine could not
    /// determine an answer (clock or store failure, unregistered policy
    /// key) and must not be conflated with denial.
    pub fn check_can(
        &self,
        member: &Member,
        action: &str,
        resource: &Resource,
        extra: &[serde_json::Value],
    ) -> Result<bool, AuthzError> {
        self.check_can_in(CheckContext::default(), member, action, resource, extra)
    }

    /// `check_can` with an explicit call-chain context, for policy code
    /// that needs to issue a nested check from inside an evaluation.
    pub fn check_can_in(
        &self,
        ctx: CheckContext,
        member: &Member,
        action: &str,
        resource: &Resource,
        extra: &[serde_json::Value],
    ) -> Result<bool, AuthzError> {
        let outermost = !ctx.in_authorization();
        let result = self.evaluate(member, action, resource);

        // Only the outermost check of a chain is logged; nested checks
        // are implementation detail of the outer decision.
        if outermost && self.config.debug_authorization {
            if let Ok(allowed) = &result {
                self.record(member, action, resource, *allowed, extra);
            }
        }

        result
    }

    fn evaluate(
        &self,
        member: &Member,
        action: &str,
        resource: &Resource,
    ) -> Result<bool, AuthzError> {
        let key = PolicyKey::new(resource.kind.clone(), action);
        let rule = self
            .registry
            .rule(&key)
            .copied()
            .ok_or_else(|| AuthzError::UnboundPolicy(key.clone()))?;

        let resolved = self.permissions(member)?;
        let allowed = evaluator::authorize(member, &resolved, &key, resource, &rule);

        if !allowed {
            tracing::debug!(
                member_id = member.id,
                policy = %key,
                "authorization denied"
            );
        }

        Ok(allowed)
    }

    /// Check whether the member carries the designated bypass
    /// permission.
    pub fn is_super_user(&self, member: &Member) -> Result<bool, AuthzError> {
        Ok(evaluator::is_super_user(&*self.permissions(member)?))
    }

    // Invalidation hooks. The owner of role/warrant mutation must call
    // these; the cache has no polling or TTL.

    pub fn role_granted(&self, member_id: MemberId) {
        self.cache.invalidate(member_id);
    }

    pub fn role_revoked(&self, member_id: MemberId) {
        self.cache.invalidate(member_id);
    }

    pub fn warrant_changed(&self, member_id: MemberId) {
        self.cache.invalidate(member_id);
    }

    /// Rebuild the branch hierarchy from the store and publish the new
    /// snapshot atomically. Every cached resolution may embed descendant
    /// sets from the old tree, so the whole cache is dropped.
    pub fn rebuild_hierarchy(&self) -> Result<(), AuthzError> {
        let rebuilt = Arc::new(BranchHierarchy::build(&self.store.branches()?)?);
        *self.hierarchy.write().unwrap_or_else(|e| e.into_inner()) = rebuilt;
        self.cache.invalidate_all();
        Ok(())
    }

    pub fn hierarchy_snapshot(&self) -> Arc<BranchHierarchy> {
        Arc::clone(&self.hierarchy.read().unwrap_or_else(|e| e.into_inner()))
    }

    /// Snapshot of the diagnostic log, oldest entry first. Empty unless
    /// `debug_authorization` is enabled.
    pub fn log(&self) -> Vec<AuthzLogEntry> {
        self.log
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect()
    }

    pub fn clear_log(&self) {
        self.log.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    fn record(
        &self,
        member: &Member,
        action: &str,
        resource: &Resource,
        result: bool,
        extra: &[serde_json::Value],
    ) {
        let at = self.clock.now().unwrap_or_else(|_| Utc::now());
        let mut log = self.log.lock().unwrap_or_else(|e| e.into_inner());
        while log.len() >= self.config.max_log_entries {
            log.pop_front();
        }
        log.push_back(AuthzLogEntry {
            at,
            member_id: member.id,
            action: action.to_string(),
            resource_kind: resource.kind.clone(),
            resource_id: resource.id,
            result,
            extra: extra.to_vec(),
        });
    }
}
