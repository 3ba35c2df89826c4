//! Platform error types

use thiserror::Error;

/// Platform-related errors
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Container is unknown to the host
    #[error("Unknown container: {0}")]
    UnknownContainer(u64),

    /// Surface kind not supported by this host
    #[error("Surface kind not supported: {0}")]
    Unsupported(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
