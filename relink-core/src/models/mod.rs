//! Shared model types: merge candidates, the resolved identity map, and
//! the per-run report.

mod merge_candidate;
mod resolved_map;
mod run_report;

pub use merge_candidate::{MergeCandidate, MergePhase};
pub use resolved_map::ResolvedIdentityMap;
pub use run_report::{PhaseStats, RunReport};
