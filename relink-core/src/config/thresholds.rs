use serde::{Deserialize, Serialize};

use super::defaults;

/// Geometric and scoring thresholds for the five candidate phases.
///
/// Distances are in the coordinate units of the input positions
/// (typically pixels); gaps are in frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseThresholds {
    /// Identity-hint phase: maximum gap between the closest segments of
    /// two entities sharing a hint.
    pub hint_max_gap: i64,
    /// Fixed score for identity-hint candidates.
    pub hint_score: f64,

    /// Endpoint phase: minimum observation count for both entities.
    pub endpoint_min_count: usize,
    /// Endpoint phase: maximum frame gap between the fragments.
    pub endpoint_max_gap: i64,
    /// Endpoint phase: maximum distance between the facing endpoints.
    pub endpoint_max_distance: f32,
    /// Endpoint phase: maximum distance between mean positions.
    pub endpoint_max_mean_distance: f32,
    /// Endpoint phase: candidates scoring below this are rejected.
    pub endpoint_score_floor: f64,
    /// Endpoint phase: gap penalty divisor (larger = softer penalty).
    pub endpoint_gap_divisor: f64,
    /// Endpoint phase: endpoint-distance penalty divisor.
    pub endpoint_distance_divisor: f64,
    /// Endpoint phase: mean-position-distance penalty divisor.
    pub endpoint_mean_divisor: f64,

    /// Adjacency phase: maximum boundary gap for non-overlapping pairs.
    pub adjacency_max_gap: i64,
    /// Adjacency phase: maximum mean-position distance while overlapping.
    pub adjacency_max_overlap_distance: f32,
    /// Adjacency phase: maximum endpoint distance when merely adjacent.
    pub adjacency_max_endpoint_distance: f32,
    /// Score bonus for overlapping pairs.
    pub adjacency_overlap_bonus: f64,
    /// Score bonus for adjacent (non-overlapping) pairs.
    pub adjacency_touching_bonus: f64,
    /// Adjacency phase: candidates scoring below this are rejected.
    pub adjacency_score_floor: f64,
    /// Adjacency phase: gap penalty divisor for non-overlapping pairs.
    pub adjacency_gap_divisor: f64,

    /// Spatial phase: minimum observation count for both entities.
    pub spatial_min_count: usize,
    /// Spatial phase: maximum distance between mean positions.
    pub spatial_max_distance: f32,
    /// Spatial phase: maximum frame gap between the fragments.
    pub spatial_max_gap: i64,
    /// Score bonus when the fragments overlap in time.
    pub spatial_overlap_bonus: f64,
    /// Spatial phase: candidates scoring below this are rejected.
    pub spatial_score_floor: f64,
    /// Spatial phase: mean-position-distance penalty divisor.
    pub spatial_distance_divisor: f64,
    /// Spatial phase: gap penalty divisor for non-overlapping pairs.
    pub spatial_gap_divisor: f64,

    /// Forced phase: radius of the loose pre-clustering pass.
    pub forced_loose_distance: f32,
    /// Forced phase: hard cap on the merge distance. Target pressure never
    /// overrides this.
    pub forced_tight_distance: f32,
    /// Forced phase: bottom of the fixed low score band.
    pub forced_score_base: f64,
    /// Forced phase: width of the score band above the base.
    pub forced_score_span: f64,
}

impl Default for PhaseThresholds {
    fn default() -> Self {
        Self {
            hint_max_gap: defaults::DEFAULT_HINT_MAX_GAP,
            hint_score: defaults::DEFAULT_HINT_SCORE,
            endpoint_min_count: defaults::DEFAULT_ENDPOINT_MIN_COUNT,
            endpoint_max_gap: defaults::DEFAULT_ENDPOINT_MAX_GAP,
            endpoint_max_distance: defaults::DEFAULT_ENDPOINT_MAX_DISTANCE,
            endpoint_max_mean_distance: defaults::DEFAULT_ENDPOINT_MAX_MEAN_DISTANCE,
            endpoint_score_floor: defaults::DEFAULT_ENDPOINT_SCORE_FLOOR,
            endpoint_gap_divisor: defaults::DEFAULT_ENDPOINT_GAP_DIVISOR,
            endpoint_distance_divisor: defaults::DEFAULT_ENDPOINT_DISTANCE_DIVISOR,
            endpoint_mean_divisor: defaults::DEFAULT_ENDPOINT_MEAN_DIVISOR,
            adjacency_max_gap: defaults::DEFAULT_ADJACENCY_MAX_GAP,
            adjacency_max_overlap_distance: defaults::DEFAULT_ADJACENCY_MAX_OVERLAP_DISTANCE,
            adjacency_max_endpoint_distance: defaults::DEFAULT_ADJACENCY_MAX_ENDPOINT_DISTANCE,
            adjacency_overlap_bonus: defaults::DEFAULT_ADJACENCY_OVERLAP_BONUS,
            adjacency_touching_bonus: defaults::DEFAULT_ADJACENCY_TOUCHING_BONUS,
            adjacency_score_floor: defaults::DEFAULT_ADJACENCY_SCORE_FLOOR,
            adjacency_gap_divisor: defaults::DEFAULT_ADJACENCY_GAP_DIVISOR,
            spatial_min_count: defaults::DEFAULT_SPATIAL_MIN_COUNT,
            spatial_max_distance: defaults::DEFAULT_SPATIAL_MAX_DISTANCE,
            spatial_max_gap: defaults::DEFAULT_SPATIAL_MAX_GAP,
            spatial_overlap_bonus: defaults::DEFAULT_SPATIAL_OVERLAP_BONUS,
            spatial_score_floor: defaults::DEFAULT_SPATIAL_SCORE_FLOOR,
            spatial_distance_divisor: defaults::DEFAULT_SPATIAL_DISTANCE_DIVISOR,
            spatial_gap_divisor: defaults::DEFAULT_SPATIAL_GAP_DIVISOR,
            forced_loose_distance: defaults::DEFAULT_FORCED_LOOSE_DISTANCE,
            forced_tight_distance: defaults::DEFAULT_FORCED_TIGHT_DISTANCE,
            forced_score_base: defaults::DEFAULT_FORCED_SCORE_BASE,
            forced_score_span: defaults::DEFAULT_FORCED_SCORE_SPAN,
        }
    }
}
