use serde::{Deserialize, Serialize};

use super::merge_candidate::{MergeCandidate, MergePhase};

/// Candidate count and score distribution for one scoring phase,
/// measured before the global cap is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseStats {
    pub phase: MergePhase,
    pub candidates: usize,
    pub min_score: f64,
    pub mean_score: f64,
    pub max_score: f64,
}

impl PhaseStats {
    /// Summarize one phase's slice of the candidate list.
    pub fn from_candidates(phase: MergePhase, candidates: &[MergeCandidate]) -> Self {
        let scores: Vec<f64> = candidates
            .iter()
            .filter(|c| c.phase == phase)
            .map(|c| c.score)
            .collect();
        if scores.is_empty() {
            return Self {
                phase,
                candidates: 0,
                min_score: 0.0,
                mean_score: 0.0,
                max_score: 0.0,
            };
        }
        let sum: f64 = scores.iter().sum();
        Self {
            phase,
            candidates: scores.len(),
            min_score: scores.iter().copied().fold(f64::INFINITY, f64::min),
            mean_score: sum / scores.len() as f64,
            max_score: scores.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

/// Everything a caller needs to accept, retune, or manually review a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Per-phase candidate counts and score distribution (pre-cap).
    pub phase_stats: Vec<PhaseStats>,
    /// Malformed records skipped during ingestion.
    pub skipped_records: usize,
    /// Candidates dropped because they touched a vetoed entity.
    pub vetoed_candidates: usize,
    /// Candidates surviving dedup, veto, and the global cap.
    pub generated_candidates: usize,
    /// Conflict-free merges that made it into the resolved map.
    pub accepted_merges: usize,
    /// Accepted merges removed again by over-merge trimming.
    pub trimmed_merges: usize,
    /// Cycle-closing edges neutralized during chain resolution.
    pub cycles_broken: usize,
    /// Distinct entity ids before merging.
    pub pre_distinct: usize,
    /// Distinct canonical ids after merging.
    pub post_distinct: usize,
    pub target: Option<usize>,
    /// Whether the post-merge count reached the target (vacuously true
    /// when no target was supplied).
    pub target_met: bool,
}
