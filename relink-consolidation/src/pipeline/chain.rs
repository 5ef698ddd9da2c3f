//! Transitive chain resolution via union-find with path compression.
//!
//! Accepted edges say "source folds into target"; chains (A→B, B→C) must
//! land every member on the final representative. The target side of
//! each union wins, so representatives are always ids that absorbed
//! others. Cycle-closing edges collapse to no-op unions and are counted
//! rather than followed — resolution can never loop.

use std::collections::{BTreeSet, HashMap};

use relink_core::models::{MergeCandidate, ResolvedIdentityMap};
use tracing::debug;

/// Union-find over entity ids. Ids without an entry are their own root.
#[derive(Debug, Default)]
pub struct ChainResolver {
    parent: HashMap<i64, i64>,
    cycles_broken: usize,
}

impl ChainResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current representative for `id`, with path compression.
    pub fn find(&mut self, id: i64) -> i64 {
        let mut root = id;
        while let Some(&parent) = self.parent.get(&root) {
            root = parent;
        }
        // Compress the walked path.
        let mut cursor = id;
        while cursor != root {
            let next = self.parent.insert(cursor, root).unwrap_or(root);
            cursor = next;
        }
        root
    }

    /// Record that `source` folds into `target`. Returns `false` when the
    /// edge would close a cycle; such edges are counted and ignored.
    pub fn merge(&mut self, source: i64, target: i64) -> bool {
        let source_root = self.find(source);
        let target_root = self.find(target);
        if source_root == target_root {
            self.cycles_broken += 1;
            debug!(source, target, "cycle-closing edge ignored");
            return false;
        }
        self.parent.insert(source_root, target_root);
        true
    }

    pub fn cycles_broken(&self) -> usize {
        self.cycles_broken
    }

    /// Produce a total map over `universe` (plus every id this resolver
    /// has seen through edges).
    pub fn resolve(&mut self, universe: impl IntoIterator<Item = i64>) -> ResolvedIdentityMap {
        let mut ids: BTreeSet<i64> = universe.into_iter().collect();
        for (&id, &parent) in &self.parent {
            ids.insert(id);
            ids.insert(parent);
        }
        ids.into_iter().map(|id| (id, self.find(id))).collect()
    }
}

/// Resolve a set of accepted merges into a total identity map.
///
/// Returns the map and the number of cycle-closing edges neutralized.
pub fn resolve_merges(
    accepted: &[MergeCandidate],
    universe: impl IntoIterator<Item = i64>,
) -> (ResolvedIdentityMap, usize) {
    let mut resolver = ChainResolver::new();
    for edge in accepted {
        resolver.merge(edge.source_id, edge.target_id);
    }
    let map = resolver.resolve(universe);
    (map, resolver.cycles_broken())
}
