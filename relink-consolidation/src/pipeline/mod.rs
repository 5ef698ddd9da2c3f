//! Candidate pipeline orchestrator.
//!
//! Phase 1: identity hints → Phase 2: endpoint continuation →
//! Phase 3: adjacency/overlap → Phase 4: spatial clustering →
//! Phase 5: target-count pressure. Phases are pure functions over the
//! summaries; their outputs are pooled, deduplicated, sorted by score,
//! and capped before conflict resolution.

pub mod chain;
pub mod conflict;
pub mod phase1_identity;
pub mod phase2_endpoint;
pub mod phase3_adjacency;
pub mod phase4_spatial;
pub mod phase5_forced;

use std::collections::{BTreeMap, HashMap};
use std::mem;

use relink_core::config::ConsolidationConfig;
use relink_core::constants::{CANDIDATE_CAP_FLOOR, CANDIDATE_CAP_SLACK};
use relink_core::errors::{ConsolidationError, RelinkResult};
use relink_core::models::{MergeCandidate, MergePhase, PhaseStats};
use relink_core::track::{EntitySummary, IdentityTag};
use tracing::{debug, info};

/// Pooled, deduplicated, capped candidates plus reporting data.
#[derive(Debug)]
pub struct GenerationResult {
    /// Sorted by score descending.
    pub candidates: Vec<MergeCandidate>,
    /// Per-phase stats measured before veto/dedup/cap.
    pub phase_stats: Vec<PhaseStats>,
    /// Candidates dropped because they touched a vetoed entity.
    pub vetoed: usize,
}

/// Run all five phases and pool their proposals.
pub fn generate_candidates(
    summaries: &BTreeMap<i64, EntitySummary>,
    hints: &HashMap<i64, IdentityTag>,
    config: &ConsolidationConfig,
) -> RelinkResult<GenerationResult> {
    let t = &config.thresholds;

    let mut pooled = phase1_identity::generate(summaries, hints, t);
    pooled.extend(phase2_endpoint::generate(summaries, t));
    pooled.extend(phase3_adjacency::generate(summaries, t));
    pooled.extend(phase4_spatial::generate(summaries, t));
    pooled.extend(phase5_forced::generate(
        summaries,
        config.target_entity_count,
        t,
    ));

    let phase_stats: Vec<PhaseStats> = MergePhase::ALL
        .iter()
        .map(|&phase| PhaseStats::from_candidates(phase, &pooled))
        .collect();
    for stats in &phase_stats {
        debug!(
            phase = %stats.phase,
            candidates = stats.candidates,
            max_score = stats.max_score,
            "phase complete"
        );
    }

    // Operator vetoes remove every candidate touching the entity.
    let before_veto = pooled.len();
    if !config.vetoed_entities.is_empty() {
        pooled.retain(|c| {
            !config.vetoed_entities.contains(&c.source_id)
                && !config.vetoed_entities.contains(&c.target_id)
        });
    }
    let vetoed = before_veto - pooled.len();

    // One entry per directed pair: the phases overlap and the best
    // score wins.
    let mut best: HashMap<(i64, i64), MergeCandidate> = HashMap::new();
    for cand in pooled {
        match best.entry((cand.source_id, cand.target_id)) {
            std::collections::hash_map::Entry::Occupied(mut slot) => {
                if cand.score > slot.get().score {
                    slot.insert(cand);
                }
            }
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(cand);
            }
        }
    }
    let mut candidates: Vec<MergeCandidate> = best.into_values().collect();
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| (a.source_id, a.target_id).cmp(&(b.source_id, b.target_id)))
    });

    let cap = candidate_cap(config, summaries.len());
    if candidates.len() > cap {
        debug!(cap, dropped = candidates.len() - cap, "candidate cap applied");
        candidates.truncate(cap);
    }

    let estimated_bytes = candidates.len() * mem::size_of::<MergeCandidate>();
    if estimated_bytes > config.candidate_memory_ceiling_bytes {
        return Err(ConsolidationError::CandidateSetOversized {
            candidates: candidates.len(),
            estimated_bytes,
            ceiling_bytes: config.candidate_memory_ceiling_bytes,
        }
        .into());
    }

    info!(
        candidates = candidates.len(),
        vetoed,
        cap,
        "candidate generation complete"
    );

    Ok(GenerationResult {
        candidates,
        phase_stats,
        vetoed,
    })
}

/// The accepted-merge cap: explicit, or derived from how far the current
/// count sits above the target.
fn candidate_cap(config: &ConsolidationConfig, current_count: usize) -> usize {
    if let Some(cap) = config.max_merge_count {
        return cap;
    }
    match config.target_entity_count {
        Some(target) if current_count > target => {
            let derived = ((current_count - target) as f64 * CANDIDATE_CAP_SLACK).ceil() as usize;
            derived.max(CANDIDATE_CAP_FLOOR)
        }
        _ => CANDIDATE_CAP_FLOOR,
    }
}

// Shared score helpers. Each phase supplies its divisors from the
// configured thresholds.

pub(crate) fn gap_score(gap: i64, divisor: f64) -> f64 {
    1.0 / (1.0 + gap as f64 / divisor)
}

pub(crate) fn dist_score(distance: f32, divisor: f64) -> f64 {
    1.0 / (1.0 + distance as f64 / divisor)
}

pub(crate) fn count_ratio(a: usize, b: usize) -> f64 {
    let (min, max) = if a <= b { (a, b) } else { (b, a) };
    if max == 0 {
        0.0
    } else {
        min as f64 / max as f64
    }
}
