//! Error types for windflow_app

use std::path::PathBuf;
use thiserror::Error;
use windflow_animation::AnimationError;

/// Errors that can occur in the Windflow application
#[derive(Error, Debug)]
pub enum AppError {
    /// Failed to read the configuration file
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the configuration file
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration parsed but holds unusable values
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A control produced a value the renderer cannot take
    #[error("invalid value `{value}` for {param}")]
    InvalidParameter { param: &'static str, value: String },

    /// An event came from a control this app does not know
    #[error("unknown control `{0}`")]
    UnknownControl(String),

    /// Starting a panel transition failed
    #[error(transparent)]
    Animation(#[from] AnimationError),
}

/// Result type for windflow_app operations
pub type Result<T> = std::result::Result<T, AppError>;
