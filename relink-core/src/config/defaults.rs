//! Default configuration values.
//!
//! The scoring and distance constants are empirically tuned against
//! 1080p footage at 30 fps. They are starting points, not law: expect to
//! recalibrate per video resolution and frame rate.

/// Frames of silence tolerated inside one temporal segment.
pub const DEFAULT_MAX_INTRA_SEGMENT_GAP: i64 = 30;

/// Records per chunk during dataset rewriting.
pub const DEFAULT_CHUNK_SIZE: usize = 100_000;

/// Upper bound on candidate-set memory before the run fails fast (256 MiB).
pub const DEFAULT_CANDIDATE_MEMORY_CEILING: usize = 256 * 1024 * 1024;

/// Identity-hint phase: maximum inter-segment gap and fixed score.
pub const DEFAULT_HINT_MAX_GAP: i64 = 300;
pub const DEFAULT_HINT_SCORE: f64 = 0.95;

/// Endpoint phase: eligibility and geometric caps.
pub const DEFAULT_ENDPOINT_MIN_COUNT: usize = 10;
pub const DEFAULT_ENDPOINT_MAX_GAP: i64 = 150;
pub const DEFAULT_ENDPOINT_MAX_DISTANCE: f32 = 150.0;
pub const DEFAULT_ENDPOINT_MAX_MEAN_DISTANCE: f32 = 100.0;
pub const DEFAULT_ENDPOINT_SCORE_FLOOR: f64 = 0.01;

/// Endpoint phase: score penalty divisors (gap, endpoint distance,
/// mean-position distance).
pub const DEFAULT_ENDPOINT_GAP_DIVISOR: f64 = 10.0;
pub const DEFAULT_ENDPOINT_DISTANCE_DIVISOR: f64 = 20.0;
pub const DEFAULT_ENDPOINT_MEAN_DIVISOR: f64 = 30.0;

/// Adjacency phase: boundary gap, distance caps, bonuses.
pub const DEFAULT_ADJACENCY_MAX_GAP: i64 = 2;
pub const DEFAULT_ADJACENCY_MAX_OVERLAP_DISTANCE: f32 = 100.0;
pub const DEFAULT_ADJACENCY_MAX_ENDPOINT_DISTANCE: f32 = 150.0;
pub const DEFAULT_ADJACENCY_OVERLAP_BONUS: f64 = 2.0;
pub const DEFAULT_ADJACENCY_TOUCHING_BONUS: f64 = 1.5;
pub const DEFAULT_ADJACENCY_SCORE_FLOOR: f64 = 0.3;

/// Adjacency phase: gap penalty divisor for non-overlapping pairs.
pub const DEFAULT_ADJACENCY_GAP_DIVISOR: f64 = 10.0;

/// Spatial-cluster phase: eligibility and geometric caps.
pub const DEFAULT_SPATIAL_MIN_COUNT: usize = 20;
pub const DEFAULT_SPATIAL_MAX_DISTANCE: f32 = 80.0;
pub const DEFAULT_SPATIAL_MAX_GAP: i64 = 200;
pub const DEFAULT_SPATIAL_OVERLAP_BONUS: f64 = 1.5;
pub const DEFAULT_SPATIAL_SCORE_FLOOR: f64 = 0.05;

/// Spatial-cluster phase: distance and gap penalty divisors.
pub const DEFAULT_SPATIAL_DISTANCE_DIVISOR: f64 = 20.0;
pub const DEFAULT_SPATIAL_GAP_DIVISOR: f64 = 50.0;

/// Forced phase: loose pre-cluster radius, hard merge cap, score band.
pub const DEFAULT_FORCED_LOOSE_DISTANCE: f32 = 150.0;
pub const DEFAULT_FORCED_TIGHT_DISTANCE: f32 = 70.0;
pub const DEFAULT_FORCED_SCORE_BASE: f64 = 0.2;
pub const DEFAULT_FORCED_SCORE_SPAN: f64 = 0.2;
