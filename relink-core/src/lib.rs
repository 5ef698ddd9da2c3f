//! # relink-core
//!
//! Foundation crate for the Relink track-identity repair engine.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod track;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::{ConsolidationConfig, PhaseThresholds};
pub use errors::{RelinkError, RelinkResult};
pub use models::{MergeCandidate, MergePhase, PhaseStats, ResolvedIdentityMap, RunReport};
pub use track::{EntitySummary, IdentityTag, Position, TemporalSegment, TrackObservation};
pub use traits::{RawRecord, RecordSink, RecordSource};
