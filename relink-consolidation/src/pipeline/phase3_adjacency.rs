//! Phase 3: Adjacency — fragments that overlap in time or sit within a
//! couple of frames of each other. Detector flicker produces these:
//! the same subject briefly tracked under two ids at once.
//!
//! Overlapping pairs must stay spatially close on average; merely
//! adjacent pairs are judged by their facing endpoints.

use std::collections::BTreeMap;

use rayon::prelude::*;
use relink_core::config::PhaseThresholds;
use relink_core::models::{MergeCandidate, MergePhase};
use relink_core::track::EntitySummary;

use super::{count_ratio, gap_score};

/// Propose merges for adjacent or overlapping fragments.
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
    let overlapping = a.overlaps(b);
    let mean = a.mean_distance_to(b).unwrap_or(f32::INFINITY);

    let (gap, endpoint, bonus) = if overlapping {
        if mean > t.adjacency_max_overlap_distance {
            return None;
        }
        (0, a.endpoint_distance_to(b).unwrap_or(0.0), t.adjacency_overlap_bonus)
    } else {
        let gap = a.frame_gap_to(b)?;
        if gap > t.adjacency_max_gap {
            return None;
        }
        let endpoint = a.endpoint_distance_to(b)?;
        if endpoint > t.adjacency_max_endpoint_distance {
            return None;
        }
        (gap, endpoint, t.adjacency_touching_bonus)
    };

    let gs = if overlapping {
        1.0
    } else {
        gap_score(gap, t.adjacency_gap_divisor)
    };
    let score = bonus * gs * count_ratio(a.total_observations, b.total_observations);
    if score < t.adjacency_score_floor {
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
        endpoint_distance: endpoint,
        mean_distance: if mean.is_finite() { mean } else { 0.0 },
        score,
        phase: MergePhase::Adjacency,
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
    fn overlapping_close_fragments_are_proposed() {
        let summaries = summaries_of(vec![
            summary(1, 0..=30, 50.0, 50.0),
            summary(2, 20..=50, 55.0, 52.0),
        ]);
        let t = ConsolidationConfig::default().thresholds;
        let candidates = generate(&summaries, &t);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].phase, MergePhase::Adjacency);
        // Equal counts: higher id folds into lower.
        assert_eq!(candidates[0].source_id, 2);
        assert_eq!(candidates[0].target_id, 1);
    }

    #[test]
    fn overlapping_distant_fragments_are_rejected() {
        let summaries = summaries_of(vec![
            summary(1, 0..=30, 0.0, 0.0),
            summary(2, 20..=50, 500.0, 500.0),
        ]);
        let t = ConsolidationConfig::default().thresholds;
        assert!(generate(&summaries, &t).is_empty());
    }

    #[test]
    fn overlap_distance_boundary_is_exact() {
        let t = ConsolidationConfig::default().thresholds;
        let at_cap = summaries_of(vec![
            summary(1, 0..=30, 0.0, 0.0),
            summary(2, 20..=50, t.adjacency_max_overlap_distance, 0.0),
        ]);
        assert_eq!(generate(&at_cap, &t).len(), 1, "distance at cap accepted");

        let past_cap = summaries_of(vec![
            summary(1, 0..=30, 0.0, 0.0),
            summary(2, 20..=50, t.adjacency_max_overlap_distance + 0.5, 0.0),
        ]);
        assert!(generate(&past_cap, &t).is_empty(), "distance past cap rejected");
    }

    #[test]
    fn boundary_gap_at_cap_is_accepted() {
        let t = ConsolidationConfig::default().thresholds;
        // End frame 30, start frame 33: two missing frames, exactly at cap.
        let summaries = summaries_of(vec![
            summary(1, 0..=30, 10.0, 10.0),
            summary(2, 33..=60, 12.0, 10.0),
        ]);
        assert_eq!(generate(&summaries, &t).len(), 1);

        // One frame further: rejected.
        let summaries = summaries_of(vec![
            summary(1, 0..=30, 10.0, 10.0),
            summary(2, 34..=60, 12.0, 10.0),
        ]);
        assert!(generate(&summaries, &t).is_empty());
    }

    #[test]
    fn lopsided_counts_fall_below_score_floor() {
        // Overlap bonus 2.0 × ratio 3/31 ≈ 0.19 < 0.3 floor.
        let summaries = summaries_of(vec![
            summary(1, 0..=30, 10.0, 10.0),
            summary(2, 28..=30, 10.0, 10.0),
        ]);
        let t = ConsolidationConfig::default().thresholds;
        assert!(generate(&summaries, &t).is_empty());
    }
}
