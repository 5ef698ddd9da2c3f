//! Aggregate dashboard over consolidation runs.

use relink_core::models::RunReport;
use serde::{Deserialize, Serialize};

use super::metrics::RunAssessment;

/// Rolling statistics across the engine's runs.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ConsolidationDashboard {
    pub total_runs: usize,
    pub target_met_runs: usize,
    pub total_merges: usize,
    pub latest_report: Option<RunReport>,
    pub latest_assessment: Option<RunAssessment>,
}

impl ConsolidationDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_run(&mut self, report: RunReport, assessment: RunAssessment) {
        self.total_runs += 1;
        if report.target_met {
            self.target_met_runs += 1;
        }
        self.total_merges += report.accepted_merges;
        self.latest_report = Some(report);
        self.latest_assessment = Some(assessment);
    }

    /// Fraction of runs that met their target; 0.0 before any run.
    pub fn target_hit_rate(&self) -> f64 {
        if self.total_runs == 0 {
            return 0.0;
        }
        self.target_met_runs as f64 / self.total_runs as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitoring::assess_report;

    fn report(target_met: bool) -> RunReport {
        RunReport {
            phase_stats: Vec::new(),
            skipped_records: 0,
            vetoed_candidates: 0,
            generated_candidates: 4,
            accepted_merges: 2,
            trimmed_merges: 0,
            cycles_broken: 0,
            pre_distinct: 6,
            post_distinct: 4,
            target: Some(4),
            target_met,
        }
    }

    #[test]
    fn dashboard_accumulates_runs() {
        let mut dashboard = ConsolidationDashboard::new();
        assert_eq!(dashboard.target_hit_rate(), 0.0);

        let r = report(true);
        let a = assess_report(&r);
        dashboard.record_run(r, a);
        let r = report(false);
        let a = assess_report(&r);
        dashboard.record_run(r, a);

        assert_eq!(dashboard.total_runs, 2);
        assert_eq!(dashboard.target_met_runs, 1);
        assert_eq!(dashboard.total_merges, 4);
        assert_eq!(dashboard.target_hit_rate(), 0.5);
        assert!(!dashboard.latest_report.as_ref().unwrap().target_met);
    }
}
