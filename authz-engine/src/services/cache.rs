//! Per-member memoization of resolution results.

use std::sync::Arc;

use dashmap::DashMap;

use crate::models::{MemberId, ResolvedPermissions};

/// Memoizes resolved permission sets per member for the life of a
/// request/session.
///
/// Each entry is an immutable `Arc` value replaced atomically on
/// invalidation, so concurrent readers never see a half-written set.
/// There is no TTL: staleness is prevented by push invalidation from the
/// owner of role/warrant mutations, not by expiry.
#[derive(Debug, Default)]
pub struct PermissionCache {
    entries: DashMap<MemberId, Arc<ResolvedPermissions>>,
}

impl PermissionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, member_id: MemberId) -> Option<Arc<ResolvedPermissions>> {
        self.entries.get(&member_id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn insert(&self, member_id: MemberId, resolved: Arc<ResolvedPermissions>) {
        self.entries.insert(member_id, resolved);
    }

    pub fn invalidate(&self, member_id: MemberId) {
        self.entries.remove(&member_id);
    }

    pub fn invalidate_all(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_reads_return_same_value() {
        let cache = PermissionCache::new();
        cache.insert(1, Arc::new(ResolvedPermissions::new()));

        let first = cache.get(1).unwrap();
        let second = cache.get(1).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_invalidate_drops_only_target_member() {
        let cache = PermissionCache::new();
        cache.insert(1, Arc::new(ResolvedPermissions::new()));
        cache.insert(2, Arc::new(ResolvedPermissions::new()));

        cache.invalidate(1);
        assert!(cache.get(1).is_none());
        assert!(cache.get(2).is_some());
    }

    #[test]
    fn test_invalidate_all_empties_cache() {
        let cache = PermissionCache::new();
        cache.insert(1, Arc::new(ResolvedPermissions::new()));
        cache.insert(2, Arc::new(ResolvedPermissions::new()));

        cache.invalidate_all();
        assert!(cache.is_empty());
    }
}
