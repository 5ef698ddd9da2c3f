//! ConsolidationEngine: single-run guard, pipeline coordination, and
//! run reporting.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use relink_core::config::ConsolidationConfig;
use relink_core::errors::{ConsolidationError, RelinkResult};
use relink_core::models::{ResolvedIdentityMap, RunReport};
use relink_core::track::IdentityTag;
use relink_core::traits::RawRecord;
use tracing::info;

use crate::analyzer;
use crate::monitoring::{self, ConsolidationDashboard};
use crate::pipeline::{self, chain, conflict};

/// Result of one consolidation run.
#[derive(Debug, Clone)]
pub struct ConsolidationOutcome {
    pub resolved: ResolvedIdentityMap,
    pub report: RunReport,
}

/// The main consolidation engine.
///
/// Coordinates analysis, the five-phase candidate pipeline, conflict
/// resolution, and chain resolution. Enforces a single-execution guard;
/// all other state is scoped to one run, so re-running with a different
/// config starts clean.
pub struct ConsolidationEngine {
    /// Guard: only one consolidation can run at a time.
    is_running: Arc<AtomicBool>,
    config: ConsolidationConfig,
    dashboard: ConsolidationDashboard,
}

impl ConsolidationEngine {
    /// Create an engine. The configuration is validated up front; any
    /// invalid value is fatal before processing starts.
    pub fn new(config: ConsolidationConfig) -> RelinkResult<Self> {
        config.validate()?;
        Ok(Self {
            is_running: Arc::new(AtomicBool::new(false)),
            config,
            dashboard: ConsolidationDashboard::new(),
        })
    }

    /// Check if a consolidation is currently running.
    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Relaxed)
    }

    pub fn config(&self) -> &ConsolidationConfig {
        &self.config
    }

    /// Get the monitoring dashboard.
    pub fn dashboard(&self) -> &ConsolidationDashboard {
        &self.dashboard
    }

    /// Run a full consolidation over raw dataset records plus an
    /// optional external identity-hint table.
    pub fn consolidate(
        &mut self,
        records: &[RawRecord],
        hints: &HashMap<i64, IdentityTag>,
    ) -> RelinkResult<ConsolidationOutcome> {
        // Acquire the single-execution guard.
        if self
            .is_running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ConsolidationError::AlreadyRunning.into());
        }

        let result = self.run_locked(records, hints);

        // Release the guard.
        self.is_running.store(false, Ordering::SeqCst);

        let outcome = result?;

        let assessment = monitoring::assess_report(&outcome.report);
        self.dashboard
            .record_run(outcome.report.clone(), assessment);

        Ok(outcome)
    }

    fn run_locked(
        &self,
        records: &[RawRecord],
        hints: &HashMap<i64, IdentityTag>,
    ) -> RelinkResult<ConsolidationOutcome> {
        let analysis = analyzer::analyze(records, &self.config);
        let pre_distinct = analysis.summaries.len();
        info!(
            entities = pre_distinct,
            skipped = analysis.skipped_records,
            "sequence analysis complete"
        );

        let generation =
            pipeline::generate_candidates(&analysis.summaries, hints, &self.config)?;

        let resolution = conflict::resolve(
            &generation.candidates,
            pre_distinct,
            self.config.target_entity_count,
        );
        info!(
            accepted = resolution.accepted.len(),
            trimmed = resolution.trimmed,
            "conflict resolution complete"
        );

        let (resolved, cycles_broken) =
            chain::resolve_merges(&resolution.accepted, analysis.summaries.keys().copied());

        let post_distinct = resolved.distinct_targets();
        let target = self.config.target_entity_count;
        let target_met = target.map_or(true, |t| post_distinct <= t);

        let report = RunReport {
            phase_stats: generation.phase_stats,
            skipped_records: analysis.skipped_records,
            vetoed_candidates: generation.vetoed,
            generated_candidates: generation.candidates.len(),
            accepted_merges: resolution.accepted.len(),
            trimmed_merges: resolution.trimmed,
            cycles_broken,
            pre_distinct,
            post_distinct,
            target,
            target_met,
        };

        info!(
            pre_distinct,
            post_distinct,
            target = ?target,
            target_met,
            "consolidation run complete"
        );

        Ok(ConsolidationOutcome { resolved, report })
    }
}
