/// Errors raised while rewriting the dataset. Any of these fails the
/// whole run: a half-written output is worse than no output.
#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    #[error("I/O error during chunked rewrite: {message}")]
    Io { message: String },

    #[error("record serialization failed: {message}")]
    Serialization { message: String },

    #[error("sink already finalized; cannot accept more chunks")]
    SinkFinalized,
}

impl From<std::io::Error> for ApplyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ApplyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}
