use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{defaults, PhaseThresholds};
use crate::errors::ConfigError;

/// Immutable configuration for one consolidation run.
///
/// Constructed once, validated before any processing, and never mutated.
/// Re-running with different parameters means building a fresh config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsolidationConfig {
    /// Frames of silence tolerated inside one temporal segment.
    pub max_intra_segment_gap: i64,
    /// Desired final distinct-entity count (roster size plus non-player
    /// roles). `None` disables the forced phase and over-merge trimming.
    pub target_entity_count: Option<usize>,
    /// Hard cap on accepted merge candidates. When absent, derived from
    /// the gap between current and target counts.
    pub max_merge_count: Option<usize>,
    /// Records per chunk during dataset rewriting.
    pub chunk_size: usize,
    /// Entity ids the operator has vetoed: every candidate touching one
    /// of these is dropped before conflict resolution.
    pub vetoed_entities: HashSet<i64>,
    /// Upper bound on candidate-set memory before the run fails fast.
    pub candidate_memory_ceiling_bytes: usize,
    /// Extra record fields carrying entity ids that must be remapped in
    /// lockstep with `entity_id` (e.g. a ball-possession reference).
    pub secondary_id_fields: Vec<String>,
    /// Per-phase geometric and scoring thresholds.
    pub thresholds: PhaseThresholds,
}

impl Default for ConsolidationConfig {
    fn default() -> Self {
        Self {
            max_intra_segment_gap: defaults::DEFAULT_MAX_INTRA_SEGMENT_GAP,
            target_entity_count: None,
            max_merge_count: None,
            chunk_size: defaults::DEFAULT_CHUNK_SIZE,
            vetoed_entities: HashSet::new(),
            candidate_memory_ceiling_bytes: defaults::DEFAULT_CANDIDATE_MEMORY_CEILING,
            secondary_id_fields: Vec::new(),
            thresholds: PhaseThresholds::default(),
        }
    }
}

impl ConsolidationConfig {
    /// Validate the configuration. Called by the engine before any
    /// records are touched; all failures here are fatal.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(target) = self.target_entity_count {
            if target == 0 {
                return Err(ConfigError::InvalidTargetCount { value: target });
            }
        }
        if self.chunk_size == 0 {
            return Err(ConfigError::InvalidChunkSize {
                value: self.chunk_size,
            });
        }
        if self.max_intra_segment_gap <= 0 {
            return Err(ConfigError::InvalidSegmentGap {
                value: self.max_intra_segment_gap,
            });
        }
        if self.candidate_memory_ceiling_bytes == 0 {
            return Err(ConfigError::InvalidMemoryCeiling);
        }

        let t = &self.thresholds;
        let positive: &[(&'static str, f64)] = &[
            ("hint_score", t.hint_score),
            ("endpoint_max_distance", t.endpoint_max_distance as f64),
            ("adjacency_max_overlap_distance", t.adjacency_max_overlap_distance as f64),
            ("spatial_max_distance", t.spatial_max_distance as f64),
            ("forced_loose_distance", t.forced_loose_distance as f64),
            ("forced_tight_distance", t.forced_tight_distance as f64),
            ("endpoint_gap_divisor", t.endpoint_gap_divisor),
            ("endpoint_distance_divisor", t.endpoint_distance_divisor),
            ("endpoint_mean_divisor", t.endpoint_mean_divisor),
            ("adjacency_gap_divisor", t.adjacency_gap_divisor),
            ("spatial_distance_divisor", t.spatial_distance_divisor),
            ("spatial_gap_divisor", t.spatial_gap_divisor),
        ];
        for &(name, value) in positive {
            if value <= 0.0 {
                return Err(ConfigError::InvalidThreshold { name, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(ConsolidationConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_target_rejected() {
        let config = ConsolidationConfig {
            target_entity_count: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTargetCount { value: 0 })
        ));
    }

    #[test]
    fn zero_chunk_size_rejected() {
        let config = ConsolidationConfig {
            chunk_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidChunkSize { value: 0 })
        ));
    }

    #[test]
    fn negative_segment_gap_rejected() {
        let config = ConsolidationConfig {
            max_intra_segment_gap: -5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_positive_divisor_rejected() {
        let mut config = ConsolidationConfig::default();
        config.thresholds.endpoint_gap_divisor = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidThreshold {
                name: "endpoint_gap_divisor",
                ..
            })
        ));
    }

    #[test]
    fn non_positive_threshold_rejected() {
        let mut config = ConsolidationConfig::default();
        config.thresholds.forced_tight_distance = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidThreshold {
                name: "forced_tight_distance",
                ..
            })
        ));
    }
}
