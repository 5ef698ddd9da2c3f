//! Phase 2: Endpoint continuation — a fragment that stops and another
//! that starts shortly after, close to where the first one ended, is the
//! classic occlusion split.
//!
//! Both fragments need a minimum observation count; gap, endpoint
//! distance, and mean-position distance are all hard-capped. The later
//! fragment folds into the earlier one.

use std::collections::BTreeMap;

use rayon::prelude::*;
use relink_core::config::PhaseThresholds;
use relink_core::models::{MergeCandidate, MergePhase};
use relink_core::track::EntitySummary;

use super::{count_ratio, dist_score, gap_score};

/// Propose merges for direct endpoint continuations.
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
    if a.total_observations < t.endpoint_min_count || b.total_observations < t.endpoint_min_count {
        return None;
    }
    // Overlapping fragments are phase-3 territory.
    let gap = a.frame_gap_to(b)?;
    if gap > t.endpoint_max_gap {
        return None;
    }
    let endpoint = a.endpoint_distance_to(b)?;
    if endpoint > t.endpoint_max_distance {
        return None;
    }
    let mean = a.mean_distance_to(b)?;
    if mean > t.endpoint_max_mean_distance {
        return None;
    }

    let score = gap_score(gap, t.endpoint_gap_divisor)
        * dist_score(endpoint, t.endpoint_distance_divisor)
        * dist_score(mean, t.endpoint_mean_divisor)
        * count_ratio(a.total_observations, b.total_observations);
    if score < t.endpoint_score_floor {
        return None;
    }

    // Later fragment folds into the earlier one.
    let (source, target) = if a.first_frame() <= b.first_frame() {
        (b, a)
    } else {
        (a, b)
    };
    Some(MergeCandidate {
        source_id: source.entity_id,
        target_id: target.entity_id,
        gap_frames: gap,
        endpoint_distance: endpoint,
        mean_distance: mean,
        score,
        phase: MergePhase::Endpoint,
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
    fn close_continuation_is_proposed() {
        // Entity 5 at frames 0..=10 near (100,100); entity 9 at 15..=25
        // near (105,102): gap 4, distance ~5.4.
        let summaries = summaries_of(vec![
            summary(5, 0..=10, 100.0, 100.0),
            summary(9, 15..=25, 105.0, 102.0),
        ]);
        let t = ConsolidationConfig::default().thresholds;
        let candidates = generate(&summaries, &t);
        assert_eq!(candidates.len(), 1);
        let c = &candidates[0];
        assert_eq!(c.source_id, 9);
        assert_eq!(c.target_id, 5);
        assert_eq!(c.gap_frames, 4);
        assert!((c.endpoint_distance - 29f32.sqrt()).abs() < 1e-3);
        assert!(c.score > t.endpoint_score_floor);
    }

    #[test]
    fn gap_beyond_cap_is_rejected() {
        let t = ConsolidationConfig::default().thresholds;
        let near = summary(1, 0..=20, 0.0, 0.0);
        let at_cap = summary(2, 21 + t.endpoint_max_gap..=40 + t.endpoint_max_gap, 0.0, 0.0);
        let over_cap = summary(3, 22 + t.endpoint_max_gap..=41 + t.endpoint_max_gap, 0.0, 0.0);

        let s = summaries_of(vec![near.clone(), at_cap]);
        assert_eq!(generate(&s, &t).len(), 1, "gap exactly at cap accepted");

        let s = summaries_of(vec![near, over_cap]);
        assert!(generate(&s, &t).is_empty(), "gap past cap rejected");
    }

    #[test]
    fn distance_beyond_cap_is_rejected() {
        let t = ConsolidationConfig::default().thresholds;
        let a = summary(1, 0..=20, 0.0, 0.0);
        let close = summary(2, 25..=45, t.endpoint_max_distance - 0.5, 0.0);
        let s = summaries_of(vec![a.clone(), close]);
        // Mean distance cap (100) trips before the endpoint cap here.
        assert!(generate(&s, &t).is_empty());

        let near = summary(3, 25..=45, t.endpoint_max_mean_distance - 1.0, 0.0);
        let s = summaries_of(vec![a, near]);
        assert_eq!(generate(&s, &t).len(), 1);
    }

    #[test]
    fn gap_divisor_tunes_the_penalty() {
        // Same pair, softer configured gap divisor: the gap penalty
        // shrinks and the score rises.
        let summaries = summaries_of(vec![
            summary(1, 0..=20, 0.0, 0.0),
            summary(2, 60..=80, 0.0, 0.0),
        ]);
        let defaults = ConsolidationConfig::default().thresholds;
        let mut soft = defaults.clone();
        soft.endpoint_gap_divisor = 100.0;

        let base = generate(&summaries, &defaults);
        let softened = generate(&summaries, &soft);
        assert_eq!(base.len(), 1);
        assert_eq!(softened.len(), 1);
        assert!(softened[0].score > base[0].score);
    }

    #[test]
    fn sparse_fragments_are_ineligible() {
        // 5 observations each, below the 10-observation floor.
        let summaries = summaries_of(vec![
            summary(1, 0..=4, 0.0, 0.0),
            summary(2, 10..=14, 1.0, 1.0),
        ]);
        let t = ConsolidationConfig::default().thresholds;
        assert!(generate(&summaries, &t).is_empty());
    }

    #[test]
    fn overlapping_fragments_are_left_to_other_phases() {
        let summaries = summaries_of(vec![
            summary(1, 0..=30, 0.0, 0.0),
            summary(2, 20..=50, 1.0, 1.0),
        ]);
        let t = ConsolidationConfig::default().thresholds;
        assert!(generate(&summaries, &t).is_empty());
    }
}
