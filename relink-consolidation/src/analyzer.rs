//! Sequence analysis: group raw observations per entity and build the
//! read-only summaries the scoring phases work from.

use std::collections::BTreeMap;

use relink_core::config::ConsolidationConfig;
use relink_core::track::{EntitySummary, TrackObservation};
use relink_core::traits::RawRecord;
use tracing::debug;

/// Output of the analysis pass.
#[derive(Debug)]
pub struct AnalysisResult {
    pub summaries: BTreeMap<i64, EntitySummary>,
    /// Records missing `entity_id` or `frame_index`; skipped, never fatal.
    pub skipped_records: usize,
}

/// Parse raw records and build per-entity summaries.
pub fn analyze(records: &[RawRecord], config: &ConsolidationConfig) -> AnalysisResult {
    let mut observations = Vec::with_capacity(records.len());
    let mut skipped = 0usize;
    for record in records {
        match TrackObservation::from_record(record) {
            Some(obs) => observations.push(obs),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        debug!(skipped, "malformed records skipped during ingestion");
    }

    AnalysisResult {
        summaries: analyze_observations(&observations, config),
        skipped_records: skipped,
    }
}

/// Build per-entity summaries from already-typed observations.
pub fn analyze_observations(
    observations: &[TrackObservation],
    config: &ConsolidationConfig,
) -> BTreeMap<i64, EntitySummary> {
    let mut grouped: BTreeMap<i64, Vec<TrackObservation>> = BTreeMap::new();
    for obs in observations {
        grouped.entry(obs.entity_id).or_default().push(obs.clone());
    }

    grouped
        .into_iter()
        .map(|(entity_id, group)| {
            (
                entity_id,
                EntitySummary::from_observations(entity_id, &group, config.max_intra_segment_gap),
            )
        })
        .collect()
}
