//! # relink-consolidation
//!
//! Offline repair of fragmented track identities. Five scoring phases
//! (identity hints → endpoint continuation → adjacency → spatial
//! clustering → target-count pressure) propose merges; greedy conflict
//! resolution and union-find chain resolution collapse them into one
//! canonical id per subject; the applier rewrites the dataset in
//! bounded-memory chunks.

pub mod analyzer;
pub mod applier;
pub mod engine;
pub mod monitoring;
pub mod pipeline;

pub use engine::{ConsolidationEngine, ConsolidationOutcome};
pub use monitoring::{ConsolidationDashboard, RunAssessment};
