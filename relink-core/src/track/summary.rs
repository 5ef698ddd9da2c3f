use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::identity::is_sentinel;
use super::observation::{Position, TrackObservation};

/// A maximal run of frames for one entity with no internal gap larger
/// than the configured threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalSegment {
    pub start_frame: i64,
    pub end_frame: i64,
}

impl TemporalSegment {
    /// Frames strictly between this segment and a later one; `None` when
    /// the segments overlap or touch out of order.
    pub fn gap_to(&self, other: &TemporalSegment) -> Option<i64> {
        let (earlier, later) = if self.start_frame <= other.start_frame {
            (self, other)
        } else {
            (other, self)
        };
        if later.start_frame <= earlier.end_frame {
            None
        } else {
            // Saturating: adversarial frame indices must not overflow.
            Some(later.start_frame.saturating_sub(earlier.end_frame).saturating_sub(1))
        }
    }
}

/// Read-only per-entity summary built once per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySummary {
    pub entity_id: i64,
    /// Frame indices, ascending, duplicates removed.
    pub frames: Vec<i64>,
    pub segments: Vec<TemporalSegment>,
    /// All observations, including those without a position.
    pub total_observations: usize,
    /// Observations that contributed to the spatial stats.
    pub positioned_observations: usize,
    pub mean_position: Option<Position>,
    /// Mean squared distance from the mean position.
    pub position_variance: f32,
    /// Position at the earliest positioned observation.
    pub first_position: Option<Position>,
    /// Position at the latest positioned observation.
    pub last_position: Option<Position>,
    /// Most frequent non-sentinel hint across the observations.
    pub dominant_hint: Option<String>,
}

impl EntitySummary {
    /// Build a summary from one entity's observations.
    ///
    /// Observations are sorted by frame internally; a new segment starts
    /// whenever the gap to the previous frame exceeds `max_intra_segment_gap`.
    pub fn from_observations(
        entity_id: i64,
        observations: &[TrackObservation],
        max_intra_segment_gap: i64,
    ) -> Self {
        let mut ordered: Vec<&TrackObservation> = observations.iter().collect();
        ordered.sort_by_key(|o| o.frame_index);

        let mut frames: Vec<i64> = ordered.iter().map(|o| o.frame_index).collect();
        frames.dedup();

        let segments = build_segments(&frames, max_intra_segment_gap);

        let positioned: Vec<Position> = ordered.iter().filter_map(|o| o.position).collect();
        let mean_position = mean_of(&positioned);
        let position_variance = match mean_position {
            Some(mean) => {
                let sum: f32 = positioned
                    .iter()
                    .map(|p| {
                        let d = p.distance_to(mean);
                        d * d
                    })
                    .sum();
                sum / positioned.len() as f32
            }
            None => 0.0,
        };

        let mut hint_counts: HashMap<&str, usize> = HashMap::new();
        for obs in &ordered {
            if let Some(hint) = obs.identity_hint.as_deref() {
                let trimmed = hint.trim();
                if !is_sentinel(trimmed) {
                    *hint_counts.entry(trimmed).or_default() += 1;
                }
            }
        }
        let dominant_hint = hint_counts
            .into_iter()
            .max_by_key(|&(hint, count)| (count, std::cmp::Reverse(hint)))
            .map(|(hint, _)| hint.to_owned());

        Self {
            entity_id,
            frames,
            segments,
            total_observations: observations.len(),
            positioned_observations: positioned.len(),
            mean_position,
            position_variance,
            first_position: positioned.first().copied(),
            last_position: positioned.last().copied(),
            dominant_hint,
        }
    }

    pub fn first_frame(&self) -> i64 {
        self.frames.first().copied().unwrap_or(0)
    }

    pub fn last_frame(&self) -> i64 {
        self.frames.last().copied().unwrap_or(0)
    }

    /// Whether the overall frame ranges of the two entities intersect.
    pub fn overlaps(&self, other: &EntitySummary) -> bool {
        !self.frames.is_empty()
            && !other.frames.is_empty()
            && self.first_frame() <= other.last_frame()
            && other.first_frame() <= self.last_frame()
    }

    /// Frames strictly between the two entities' overall ranges;
    /// `None` when the ranges overlap.
    pub fn frame_gap_to(&self, other: &EntitySummary) -> Option<i64> {
        if self.overlaps(other) {
            return None;
        }
        let (earlier, later) = if self.first_frame() <= other.first_frame() {
            (self, other)
        } else {
            (other, self)
        };
        Some(later.first_frame().saturating_sub(earlier.last_frame()).saturating_sub(1))
    }

    /// Smallest gap between any pair of segments; 0 when any pair overlaps.
    pub fn min_segment_gap(&self, other: &EntitySummary) -> i64 {
        let mut best = i64::MAX;
        for a in &self.segments {
            for b in &other.segments {
                match a.gap_to(b) {
                    None => return 0,
                    Some(gap) => best = best.min(gap),
                }
            }
        }
        best
    }

    /// Distance between the facing endpoints of two fragments: the end of
    /// the earlier and the start of the later. `None` when either side has
    /// no positioned observation.
    pub fn endpoint_distance_to(&self, other: &EntitySummary) -> Option<f32> {
        let (earlier, later) = if self.first_frame() <= other.first_frame() {
            (self, other)
        } else {
            (other, self)
        };
        Some(earlier.last_position?.distance_to(later.first_position?))
    }

    /// Distance between the two mean positions.
    pub fn mean_distance_to(&self, other: &EntitySummary) -> Option<f32> {
        Some(self.mean_position?.distance_to(other.mean_position?))
    }
}

fn mean_of(positions: &[Position]) -> Option<Position> {
    if positions.is_empty() {
        return None;
    }
    let n = positions.len() as f32;
    let (sx, sy) = positions
        .iter()
        .fold((0.0f32, 0.0f32), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(Position::new(sx / n, sy / n))
}

fn build_segments(frames: &[i64], max_gap: i64) -> Vec<TemporalSegment> {
    let mut segments = Vec::new();
    let mut iter = frames.iter().copied();
    let Some(first) = iter.next() else {
        return segments;
    };
    let mut start = first;
    let mut prev = first;
    for frame in iter {
        if frame.saturating_sub(prev) > max_gap {
            segments.push(TemporalSegment {
                start_frame: start,
                end_frame: prev,
            });
            start = frame;
        }
        prev = frame;
    }
    segments.push(TemporalSegment {
        start_frame: start,
        end_frame: prev,
    });
    segments
}
