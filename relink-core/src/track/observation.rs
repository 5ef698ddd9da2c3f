use serde::{Deserialize, Serialize};

use crate::traits::RawRecord;

/// A 2D position in the coordinate space of the source footage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    pub fn distance_to(self, other: Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// One detection of an entity in one frame. Immutable once ingested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackObservation {
    /// Upstream tracker id. One physical subject may fragment across
    /// several of these.
    pub entity_id: i64,
    pub frame_index: i64,
    /// Missing when the detector produced a box without a usable center.
    pub position: Option<Position>,
    /// Display name attached by an external tagging step, if any.
    pub identity_hint: Option<String>,
}

impl TrackObservation {
    pub fn new(entity_id: i64, frame_index: i64, position: Option<Position>) -> Self {
        Self {
            entity_id,
            frame_index,
            position,
            identity_hint: None,
        }
    }

    /// Parse a loosely-shaped record. Returns `None` when `entity_id` or
    /// `frame_index` is missing or non-numeric — the caller counts these
    /// as skipped rather than failing the run.
    pub fn from_record(record: &RawRecord) -> Option<Self> {
        let entity_id = record.get("entity_id")?.as_i64()?;
        let frame_index = record.get("frame_index")?.as_i64()?;

        let position = match (
            record.get("x").and_then(|v| v.as_f64()),
            record.get("y").and_then(|v| v.as_f64()),
        ) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => {
                Some(Position::new(x as f32, y as f32))
            }
            _ => None,
        };

        let identity_hint = record
            .get("identity_hint")
            .and_then(|v| v.as_str())
            .map(str::to_owned);

        Some(Self {
            entity_id,
            frame_index,
            position,
            identity_hint,
        })
    }
}
