//! Runtime error types

use sketch_platform::PlatformError;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Document is not valid TOML for the option set
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// An option holds a value the runtime cannot use
    #[error("Invalid value for `{option}`: {reason}")]
    Invalid {
        option: &'static str,
        reason: String,
    },
}

/// Runtime errors
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration rejected at create time
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// Context id was never created or is already destroyed
    #[error("Unknown context: {0}")]
    UnknownContext(String),

    /// Host refused an operation
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;
