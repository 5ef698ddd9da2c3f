/// Relink system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Floor for the auto-derived merge-candidate cap.
pub const CANDIDATE_CAP_FLOOR: usize = 300;

/// Multiplier applied to the (current − target) entity gap when deriving
/// the candidate cap.
pub const CANDIDATE_CAP_SLACK: f64 = 1.2;

/// Display-name values treated as "no identity assigned".
pub const SENTINEL_HINTS: &[&str] = &["", "unassigned", "guest", "unknown"];
