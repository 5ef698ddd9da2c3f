//! Phase 4: Spatial clustering — well-observed fragments whose mean
//! positions nearly coincide. Catches re-detections that phase 2 misses
//! because the endpoints wandered.

use std::collections::BTreeMap;

use rayon::prelude::*;
use relink_core::config::PhaseThresholds;
use relink_core::models::{MergeCandidate, MergePhase};
use relink_core::track::EntitySummary;

use super::{count_ratio, dist_score, gap_score};

/// Propose merges for spatially co-located fragments.
pub fn generate(
    summaries: &BTreeMap<i64, EntitySummary>,
    thresholds: &PhaseThresholds,
) -> Vec<MergeCandidate> {
    let entities: Vec<&EntitySummary> = summaries.values().collect();
    entities
        .par_iter()
        .enumerate()
        .flat_map_iter(|(i, &a)| {
            entities[i + 1..]
                .iter()
                .filter_map(move |&b| pair_candidate(a, b, thresholds))
        })
        .collect()
}

fn pair_candidate(
    a: &EntitySummary,
    b: &EntitySummary,
    t: &PhaseThresholds,
) -> Option<MergeCandidate> {
    if a.total_observations < t.spatial_min_count || b.total_observations < t.spatial_min_count {
        return None;
    }
    let mean = a.mean_distance_to(b)?;
    if mean > t.spatial_max_distance {
        return None;
    }

    let overlapping = a.overlaps(b);
    let gap = if overlapping {
        0
    } else {
        let gap = a.frame_gap_to(b)?;
        if gap > t.spatial_max_gap {
            return None;
        }
        gap
    };

    let gs = if overlapping {
        1.0
    } else {
        gap_score(gap, t.spatial_gap_divisor)
    };
    let bonus = if overlapping { t.spatial_overlap_bonus } else { 1.0 };
    let score = dist_score(mean, t.spatial_distance_divisor)
        * gs
        * count_ratio(a.total_observations, b.total_observations)
        * bonus;
    if score < t.spatial_score_floor {
        return None;
    }

    // Smaller fragment folds into the larger.
    let (source, target) =
        if (a.total_observations, b.entity_id) < (b.total_observations, a.entity_id) {
            (a, b)
        } else {
            (b, a)
        };
    Some(MergeCandidate {
        source_id: source.entity_id,
        target_id: target.entity_id,
        gap_frames: gap,
        endpoint_distance: a.endpoint_distance_to(b).unwrap_or(0.0),
        mean_distance: mean,
        score,
        phase: MergePhase::SpatialCluster,
        source_count: source.total_observations,
        target_count: target.total_observations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use relink_core::config::ConsolidationConfig;
    use relink_core::track::{Position, TrackObservation};

    fn summary(entity: i64, frames: std::ops::RangeInclusive<i64>, x: f32, y: f32) -> EntitySummary {
        let observations: Vec<_> = frames
            .map(|f| TrackObservation::new(entity, f, Some(Position::new(x, y))))
            .collect();
        EntitySummary::from_observations(entity, &observations, 30)
    }

    fn summaries_of(list: Vec<EntitySummary>) -> BTreeMap<i64, EntitySummary> {
        list.into_iter().map(|s| (s.entity_id, s)).collect()
    }

    #[test]
    fn co_located_fragments_are_proposed() {
        let summaries = summaries_of(vec![
            summary(1, 0..=40, 200.0, 200.0),
            summary(2, 100..=140, 210.0, 205.0),
        ]);
        let t = ConsolidationConfig::default().thresholds;
        let candidates = generate(&summaries, &t);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].phase, MergePhase::SpatialCluster);
    }

    #[test]
    fn mean_distance_cap_is_hard() {
        let t = ConsolidationConfig::default().thresholds;
        let at_cap = summaries_of(vec![
            summary(1, 0..=40, 0.0, 0.0),
            summary(2, 100..=140, t.spatial_max_distance, 0.0),
        ]);
        assert_eq!(generate(&at_cap, &t).len(), 1, "distance at cap accepted");

        let over_cap = summaries_of(vec![
            summary(1, 0..=40, 0.0, 0.0),
            summary(2, 100..=140, t.spatial_max_distance + 0.5, 0.0),
        ]);
        assert!(generate(&over_cap, &t).is_empty(), "distance past cap rejected");
    }

    #[test]
    fn gap_beyond_cap_is_rejected() {
        let t = ConsolidationConfig::default().thresholds;
        // Gap of 201 frames: 41..=240 missing, start at 242.
        let summaries = summaries_of(vec![
            summary(1, 0..=40, 0.0, 0.0),
            summary(2, 242..=282, 5.0, 0.0),
        ]);
        assert!(generate(&summaries, &t).is_empty());
    }

    #[test]
    fn sparse_fragments_are_ineligible() {
        let summaries = summaries_of(vec![
            summary(1, 0..=10, 0.0, 0.0),
            summary(2, 50..=60, 1.0, 0.0),
        ]);
        let t = ConsolidationConfig::default().thresholds;
        assert!(generate(&summaries, &t).is_empty());
    }
}
