//! Phase 1: Identity hints — entities tagged with the same display name
//! are near-certain fragments of one subject.
//!
//! Eligible when the fragments overlap in time or their closest segments
//! sit within the configured gap. Fixed high score; the smaller fragment
//! folds into the larger.

use std::collections::{BTreeMap, HashMap};

use relink_core::config::PhaseThresholds;
use relink_core::models::{MergeCandidate, MergePhase};
use relink_core::track::{EntitySummary, IdentityTag};

/// Propose merges between entities sharing a usable identity hint.
///
/// External tags take precedence over hints carried on the observations
/// themselves; sentinel names never participate.
pub fn generate(
    summaries: &BTreeMap<i64, EntitySummary>,
    hints: &HashMap<i64, IdentityTag>,
    thresholds: &PhaseThresholds,
) -> Vec<MergeCandidate> {
    let mut by_name: BTreeMap<String, Vec<&EntitySummary>> = BTreeMap::new();
    for summary in summaries.values() {
        let name = hints
            .get(&summary.entity_id)
            .and_then(|tag| tag.effective_name())
            .or(summary.dominant_hint.as_deref());
        if let Some(name) = name {
            by_name
                .entry(name.to_ascii_lowercase())
                .or_default()
                .push(summary);
        }
    }

    let mut candidates = Vec::new();
    for group in by_name.values() {
        for (i, a) in group.iter().enumerate() {
            for b in &group[i + 1..] {
                if !a.overlaps(b) && a.min_segment_gap(b) > thresholds.hint_max_gap {
                    continue;
                }
                // Smaller fragment folds into the larger.
                let (source, target) = if (a.total_observations, b.entity_id)
                    < (b.total_observations, a.entity_id)
                {
                    (*a, *b)
                } else {
                    (*b, *a)
                };
                candidates.push(MergeCandidate {
                    source_id: source.entity_id,
                    target_id: target.entity_id,
                    gap_frames: source.frame_gap_to(target).unwrap_or(0),
                    endpoint_distance: source.endpoint_distance_to(target).unwrap_or(0.0),
                    mean_distance: source.mean_distance_to(target).unwrap_or(0.0),
                    score: thresholds.hint_score,
                    phase: MergePhase::IdentityHint,
                    source_count: source.total_observations,
                    target_count: target.total_observations,
                });
            }
        }
    }
    candidates
}
