//! Run-quality monitoring: per-run assessment and an aggregate dashboard.

pub mod dashboard;
pub mod metrics;

pub use dashboard::ConsolidationDashboard;
pub use metrics::{assess_report, RunAssessment};
