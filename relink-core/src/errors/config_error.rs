/// Configuration errors. All of these are fatal and must be surfaced
/// before any processing starts.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("target entity count must be at least 1, got {value}")]
    InvalidTargetCount { value: usize },

    #[error("chunk size must be at least 1, got {value}")]
    InvalidChunkSize { value: usize },

    #[error("max intra-segment gap must be positive, got {value}")]
    InvalidSegmentGap { value: i64 },

    #[error("candidate memory ceiling must be positive")]
    InvalidMemoryCeiling,

    #[error("threshold `{name}` must be positive, got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },
}
