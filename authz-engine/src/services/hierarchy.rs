//! Branch hierarchy - immutable descendant lookup over the branch forest.

use std::collections::{BTreeSet, HashMap};

use crate::error::AuthzError;
use crate::models::{Branch, BranchId};

/// Read-only snapshot of the branch tree with precomputed descendant
/// sets.
///
/// Built once from the full edge list and never mutated; a branch-tree
/// edit produces a whole new snapshot (see
/// [`AuthorizationService::rebuild_hierarchy`](crate::services::authorization::AuthorizationService::rebuild_hierarchy)),
/// so concurrent readers never observe a half-built tree. Construction
/// fails on a cycle or a dangling parent reference - corrupt reference
/// data is fatal, not a runtime outcome.
#[derive(Debug)]
pub struct BranchHierarchy {
    parents: HashMap<BranchId, Option<BranchId>>,
    descendants: HashMap<BranchId, BTreeSet<BranchId>>,
}

impl BranchHierarchy {
    pub fn build(branches: &[Branch]) -> Result<Self, AuthzError> {
        let mut parents: HashMap<BranchId, Option<BranchId>> = HashMap::new();
        let mut children: HashMap<BranchId, Vec<BranchId>> = HashMap::new();

        for branch in branches {
            parents.insert(branch.id, branch.parent_id);
        }

        for branch in branches {
            if let Some(parent) = branch.parent_id {
                if !parents.contains_key(&parent) {
                    return Err(AuthzError::MissingBranch {
                        branch: branch.id,
                        parent,
                    });
                }
                children.entry(parent).or_default().push(branch.id);
            }
        }

        // A branch that is its own ancestor makes descendant computation
        // diverge, so reject the whole edge list up front.
        for branch in branches {
            let mut chain = BTreeSet::new();
            let mut current = branch.id;
            chain.insert(current);
            while let Some(Some(parent)) = parents.get(&current) {
                if !chain.insert(*parent) {
                    return Err(AuthzError::HierarchyCycle(*parent));
                }
                current = *parent;
            }
        }

        let mut descendants: HashMap<BranchId, BTreeSet<BranchId>> = HashMap::new();
        for branch in branches {
            let mut set = BTreeSet::new();
            collect_descendants(&children, branch.id, &mut set);
            descendants.insert(branch.id, set);
        }

        tracing::debug!(branches = branches.len(), "built branch hierarchy snapshot");

        Ok(Self {
            parents,
            descendants,
        })
    }

    /// All transitive children of a branch, excluding the branch itself.
    /// Unknown branches have no descendants.
    pub fn descendants(&self, branch_id: BranchId) -> BTreeSet<BranchId> {
        self.descendants.get(&branch_id).cloned().unwrap_or_default()
    }

    /// The branch plus all of its transitive children.
    pub fn descendants_including(&self, branch_id: BranchId) -> BTreeSet<BranchId> {
        let mut set = self.descendants(branch_id);
        set.insert(branch_id);
        set
    }

    pub fn contains(&self, branch_id: BranchId) -> bool {
        self.parents.contains_key(&branch_id)
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }
}

fn collect_descendants(
    children: &HashMap<BranchId, Vec<BranchId>>,
    branch_id: BranchId,
    into: &mut BTreeSet<BranchId>,
) {
    if let Some(kids) = children.get(&branch_id) {
        for kid in kids {
            if into.insert(*kid) {
                collect_descendants(children, *kid, into);
            }
        }
    }
}
