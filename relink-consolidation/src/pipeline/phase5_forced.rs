//! Phase 5: Target-count pressure — only engaged when the current
//! distinct count is more than twice the operator's target. Remaining
//! entities are clustered by mean-position proximity in two passes
//! (loose pre-cluster, then a tight per-merge cap) and the smallest
//! fragments fold into the largest of their cluster until the estimate
//! reaches the target.
//!
//! The tight distance cap is absolute: target pressure never justifies a
//! geometrically implausible merge. Scores sit in a fixed low band so
//! every evidence-based phase outranks a forced merge.

use std::collections::BTreeMap;

use relink_core::config::PhaseThresholds;
use relink_core::models::{MergeCandidate, MergePhase};
use relink_core::track::{EntitySummary, Position};
use tracing::debug;

/// Propose forced merges toward the target count.
pub fn generate(
    summaries: &BTreeMap<i64, EntitySummary>,
    target: Option<usize>,
    thresholds: &PhaseThresholds,
) -> Vec<MergeCandidate> {
    let Some(target) = target else {
        return Vec::new();
    };
    let current = summaries.len();
    if current <= target.saturating_mul(2) {
        return Vec::new();
    }
    debug!(current, target, "target pressure engaged");

    // Largest fragments first; they seed the clusters. Entities without
    // a mean position cannot be force-merged.
    let mut ordered: Vec<(&EntitySummary, Position)> = summaries
        .values()
        .filter_map(|s| s.mean_position.map(|p| (s, p)))
        .collect();
    ordered.sort_by_key(|(s, _)| (std::cmp::Reverse(s.total_observations), s.entity_id));

    // Loose pre-cluster around the seeds.
    let mut clusters: Vec<Vec<(&EntitySummary, Position)>> = Vec::new();
    for (entity, position) in ordered {
        let slot = clusters.iter_mut().find(|cluster| {
            cluster[0].1.distance_to(position) <= thresholds.forced_loose_distance
        });
        match slot {
            Some(cluster) => cluster.push((entity, position)),
            None => clusters.push(vec![(entity, position)]),
        }
    }

    // Tight pass: fold smallest into the seed, stopping at the target.
    let mut candidates = Vec::new();
    let mut estimate = current;
    'clusters: for cluster in &clusters {
        let (seed, seed_pos) = cluster[0];
        for &(entity, position) in cluster.iter().skip(1).rev() {
            if estimate <= target {
                break 'clusters;
            }
            let distance = position.distance_to(seed_pos);
            if distance > thresholds.forced_tight_distance {
                continue;
            }
            let closeness = 1.0 - (distance / thresholds.forced_tight_distance) as f64;
            candidates.push(MergeCandidate {
                source_id: entity.entity_id,
                target_id: seed.entity_id,
                gap_frames: entity.frame_gap_to(seed).unwrap_or(0),
                endpoint_distance: entity.endpoint_distance_to(seed).unwrap_or(0.0),
                mean_distance: distance,
                score: thresholds.forced_score_base + thresholds.forced_score_span * closeness,
                phase: MergePhase::Forced,
                source_count: entity.total_observations,
                target_count: seed.total_observations,
            });
            estimate -= 1;
        }
    }
    candidates
}
