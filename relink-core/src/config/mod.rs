//! Run configuration: one immutable settings object per consolidation run.

mod consolidation_config;
pub mod defaults;
mod thresholds;

pub use consolidation_config::ConsolidationConfig;
pub use thresholds::PhaseThresholds;
