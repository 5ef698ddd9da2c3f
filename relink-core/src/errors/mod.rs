//! Error types for the Relink workspace.

mod apply_error;
mod config_error;
mod consolidation_error;

pub use apply_error::ApplyError;
pub use config_error::ConfigError;
pub use consolidation_error::ConsolidationError;

/// Top-level error for all Relink operations.
#[derive(Debug, thiserror::Error)]
pub enum RelinkError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Consolidation(#[from] ConsolidationError),

    #[error(transparent)]
    Apply(#[from] ApplyError),
}

/// Convenience alias used throughout the workspace.
pub type RelinkResult<T> = Result<T, RelinkError>;
