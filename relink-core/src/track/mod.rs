//! Track-level types: observations, identity tags, temporal segments,
//! and per-entity summaries.

mod identity;
mod observation;
mod summary;

pub use identity::IdentityTag;
pub use observation::{Position, TrackObservation};
pub use summary::{EntitySummary, TemporalSegment};
