//! Per-run quality assessment derived from the run report.

use relink_core::models::RunReport;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Pass/fail checks for one consolidation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunAssessment {
    /// The run reached the configured target (or none was set).
    pub target_ok: bool,
    /// Candidate generation found merges when fragmentation was present.
    pub merges_found_ok: bool,
    /// No records were dropped during ingest.
    pub clean_ingest: bool,
    pub overall_pass: bool,
    /// Human-readable notes for every failed check.
    pub issues: Vec<String>,
}

/// Assess one run report against the quality checks.
pub fn assess_report(report: &RunReport) -> RunAssessment {
    let mut issues = Vec::new();

    let target_ok = report.target_met;
    if !target_ok {
        if let Some(target) = report.target {
            issues.push(format!(
                "target not met: {} distinct ids remain against a target of {}",
                report.post_distinct, target
            ));
        }
    }

    // A heavily fragmented dataset with zero candidates usually means
    // thresholds are miscalibrated for the capture geometry.
    let fragmented = report
        .target
        .map_or(report.pre_distinct > 1, |t| report.pre_distinct > t);
    let merges_found_ok = !fragmented || report.generated_candidates > 0;
    if !merges_found_ok {
        issues.push(format!(
            "no merge candidates found across {} distinct ids",
            report.pre_distinct
        ));
    }

    let clean_ingest = report.skipped_records == 0;
    if !clean_ingest {
        issues.push(format!(
            "{} malformed records skipped during ingest",
            report.skipped_records
        ));
    }

    let overall_pass = target_ok && merges_found_ok && clean_ingest;
    if !overall_pass {
        warn!(issues = issues.len(), "consolidation run failed quality checks");
    }

    RunAssessment {
        target_ok,
        merges_found_ok,
        clean_ingest,
        overall_pass,
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> RunReport {
        RunReport {
            phase_stats: Vec::new(),
            skipped_records: 0,
            vetoed_candidates: 0,
            generated_candidates: 5,
            accepted_merges: 3,
            trimmed_merges: 0,
            cycles_broken: 0,
            pre_distinct: 10,
            post_distinct: 7,
            target: Some(8),
            target_met: true,
        }
    }

    #[test]
    fn clean_run_passes() {
        let assessment = assess_report(&report());
        assert!(assessment.overall_pass);
        assert!(assessment.issues.is_empty());
    }

    #[test]
    fn missed_target_is_flagged() {
        let r = RunReport {
            target: Some(5),
            target_met: false,
            ..report()
        };
        let assessment = assess_report(&r);
        assert!(!assessment.target_ok);
        assert!(!assessment.overall_pass);
        assert_eq!(assessment.issues.len(), 1);
    }

    #[test]
    fn zero_candidates_on_fragmented_data_is_flagged() {
        let r = RunReport {
            generated_candidates: 0,
            accepted_merges: 0,
            post_distinct: 10,
            target_met: false,
            ..report()
        };
        let assessment = assess_report(&r);
        assert!(!assessment.merges_found_ok);
    }

    #[test]
    fn skipped_records_are_flagged_but_informational() {
        let r = RunReport {
            skipped_records: 2,
            ..report()
        };
        let assessment = assess_report(&r);
        assert!(!assessment.clean_ingest);
        assert!(assessment.target_ok);
    }
}
