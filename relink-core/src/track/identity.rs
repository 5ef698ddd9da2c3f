use serde::{Deserialize, Serialize};

use crate::constants::SENTINEL_HINTS;

/// Externally supplied identity for a track id.
///
/// One tagged shape regardless of how the upstream tagger stores it;
/// the engine never branches on source shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityTag {
    pub name: String,
    pub team: Option<String>,
    pub jersey: Option<u32>,
}

impl IdentityTag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            team: None,
            jersey: None,
        }
    }

    /// The usable display name, or `None` when the tag is a sentinel
    /// ("unassigned", "guest", empty, ...).
    pub fn effective_name(&self) -> Option<&str> {
        let trimmed = self.name.trim();
        if is_sentinel(trimmed) {
            None
        } else {
            Some(trimmed)
        }
    }
}

/// Whether a raw hint string carries no real identity.
pub fn is_sentinel(name: &str) -> bool {
    SENTINEL_HINTS
        .iter()
        .any(|s| name.eq_ignore_ascii_case(s))
}
