use std::fmt;

use serde::{Deserialize, Serialize};

/// Which scoring phase produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MergePhase {
    /// Shared external display name.
    IdentityHint,
    /// Direct endpoint continuation after a short gap.
    Endpoint,
    /// Temporally adjacent or overlapping fragments.
    Adjacency,
    /// Spatially co-located fragments.
    SpatialCluster,
    /// Target-count pressure (still geometry-capped).
    Forced,
}

impl MergePhase {
    pub const ALL: [MergePhase; 5] = [
        MergePhase::IdentityHint,
        MergePhase::Endpoint,
        MergePhase::Adjacency,
        MergePhase::SpatialCluster,
        MergePhase::Forced,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MergePhase::IdentityHint => "identity-hint",
            MergePhase::Endpoint => "endpoint",
            MergePhase::Adjacency => "adjacency",
            MergePhase::SpatialCluster => "spatial-cluster",
            MergePhase::Forced => "forced",
        }
    }
}

impl fmt::Display for MergePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A proposed directed merge: fold `source_id`'s observations into
/// `target_id`. Higher score means more confident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeCandidate {
    pub source_id: i64,
    pub target_id: i64,
    /// Frames strictly between the fragments; 0 when overlapping.
    pub gap_frames: i64,
    pub endpoint_distance: f32,
    pub mean_distance: f32,
    pub score: f64,
    pub phase: MergePhase,
    pub source_count: usize,
    pub target_count: usize,
}
