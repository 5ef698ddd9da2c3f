//! Greedy conflict-free selection over the sorted candidate list.
//!
//! Invariant: no source id appears twice in the accepted set. When a
//! candidate's target is itself being merged away by an already-accepted
//! edge, the higher-scored of the two wins. If a target count was
//! supplied and the selection would over-shoot below it, the weakest
//! accepted edges are dropped again.

use std::collections::HashMap;

use relink_core::models::MergeCandidate;
use tracing::debug;

/// Outcome of conflict resolution.
#[derive(Debug)]
pub struct ConflictResolution {
    /// Accepted edges; each source id appears exactly once.
    pub accepted: Vec<MergeCandidate>,
    /// Accepted edges removed again by over-merge trimming.
    pub trimmed: usize,
}

/// Select a conflict-free subset of `candidates` (already sorted by
/// score descending).
pub fn resolve(
    candidates: &[MergeCandidate],
    pre_distinct: usize,
    target: Option<usize>,
) -> ConflictResolution {
    let mut slots: Vec<Option<MergeCandidate>> = Vec::new();
    let mut by_source: HashMap<i64, usize> = HashMap::new();

    for cand in candidates {
        if by_source.contains_key(&cand.source_id) {
            continue;
        }
        // The target is being merged away by an accepted edge: keep the
        // stronger of the two claims.
        if let Some(&idx) = by_source.get(&cand.target_id) {
            let existing_score = slots[idx].as_ref().map_or(0.0, |c| c.score);
            if cand.score <= existing_score {
                continue;
            }
            if let Some(evicted) = slots[idx].take() {
                debug!(
                    source = evicted.source_id,
                    target = evicted.target_id,
                    "edge evicted by higher-scored conflict"
                );
                by_source.remove(&evicted.source_id);
            }
        }
        by_source.insert(cand.source_id, slots.len());
        slots.push(Some(cand.clone()));
    }

    let mut accepted: Vec<MergeCandidate> = slots.into_iter().flatten().collect();

    // Over-merge trim: each accepted edge removes roughly one distinct
    // id; drop the weakest until the estimate meets the target.
    let mut trimmed = 0usize;
    if let Some(target) = target {
        while !accepted.is_empty() && pre_distinct - accepted.len() < target {
            let weakest = accepted
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| {
                    a.score
                        .partial_cmp(&b.score)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .map(|(i, _)| i);
            let Some(idx) = weakest else { break };
            let dropped = accepted.remove(idx);
            trimmed += 1;
            debug!(
                source = dropped.source_id,
                target = dropped.target_id,
                score = dropped.score,
                "accepted edge trimmed to avoid over-merge"
            );
        }
    }

    ConflictResolution { accepted, trimmed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relink_core::models::MergePhase;

    fn cand(source: i64, target: i64, score: f64) -> MergeCandidate {
        MergeCandidate {
            source_id: source,
            target_id: target,
            gap_frames: 0,
            endpoint_distance: 0.0,
            mean_distance: 0.0,
            score,
            phase: MergePhase::Endpoint,
            source_count: 10,
            target_count: 10,
        }
    }

    #[test]
    fn duplicate_sources_keep_first_highest() {
        let candidates = vec![cand(1, 2, 0.9), cand(1, 3, 0.5)];
        let result = resolve(&candidates, 10, None);
        assert_eq!(result.accepted.len(), 1);
        assert_eq!(result.accepted[0].target_id, 2);
    }

    #[test]
    fn no_source_appears_twice() {
        let candidates = vec![
            cand(1, 2, 0.9),
            cand(1, 3, 0.8),
            cand(4, 1, 0.7),
            cand(4, 2, 0.6),
        ];
        let result = resolve(&candidates, 10, None);
        let mut sources: Vec<i64> = result.accepted.iter().map(|c| c.source_id).collect();
        sources.sort_unstable();
        sources.dedup();
        assert_eq!(sources.len(), result.accepted.len());
    }

    #[test]
    fn weaker_edge_into_merged_target_loses() {
        // 2→3 accepted first; 1→2 targets an accepted source with a
        // lower score and is skipped.
        let candidates = vec![cand(2, 3, 0.9), cand(1, 2, 0.4)];
        let result = resolve(&candidates, 10, None);
        assert_eq!(result.accepted.len(), 1);
        assert_eq!(result.accepted[0].source_id, 2);
    }

    #[test]
    fn stronger_edge_into_merged_target_evicts() {
        // Candidates arrive sorted; a later higher-scored edge cannot
        // occur, but explicit eviction is still exercised via equal-order
        // input where the conflicting edge was accepted first.
        let candidates = vec![cand(2, 3, 0.5), cand(1, 2, 0.8)];
        let result = resolve(&candidates, 10, None);
        assert_eq!(result.accepted.len(), 1);
        assert_eq!(result.accepted[0].source_id, 1);
        assert_eq!(result.accepted[0].target_id, 2);
    }

    #[test]
    fn over_merge_is_trimmed_back_to_target() {
        // 10 distinct ids, target 8: only 2 merges may survive.
        let candidates = vec![
            cand(1, 2, 0.9),
            cand(3, 4, 0.8),
            cand(5, 6, 0.7),
            cand(7, 8, 0.6),
        ];
        let result = resolve(&candidates, 10, Some(8));
        assert_eq!(result.accepted.len(), 2);
        assert_eq!(result.trimmed, 2);
        // The weakest edges went first.
        assert!(result.accepted.iter().all(|c| c.score >= 0.8));
    }

    #[test]
    fn no_trim_without_target() {
        let candidates = vec![cand(1, 2, 0.9), cand(3, 4, 0.8)];
        let result = resolve(&candidates, 10, None);
        assert_eq!(result.accepted.len(), 2);
        assert_eq!(result.trimmed, 0);
    }
}
