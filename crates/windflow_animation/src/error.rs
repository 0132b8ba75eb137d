//! Error types for windflow_animation

use thiserror::Error;

/// Errors that can occur when starting an animation run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// The run's parameters cannot produce a meaningful interpolation
    /// (non-positive or non-finite duration, non-finite start/end values)
    #[error("invalid animation configuration: {0}")]
    InvalidConfiguration(String),

    /// A key is present in only one of the `from` / `to` value sets
    #[error("key `{key}` is missing from the {missing_in} value set")]
    MismatchedKeys {
        key: String,
        missing_in: &'static str,
    },

    /// The scheduler behind a handle was dropped, or no global scheduler is installed
    #[error("animation scheduler is not available")]
    SchedulerUnavailable,

    /// The global scheduler was already installed
    #[error("global animation scheduler is already initialized")]
    AlreadyInitialized,
}

/// Result type for windflow_animation operations
pub type Result<T> = std::result::Result<T, AnimationError>;
