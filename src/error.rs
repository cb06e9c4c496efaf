//! Error types shared by every facefinder module

use thiserror::Error;

/// Result alias for facefinder operations.
pub type Result<T> = std::result::Result<T, FaceFinderError>;

/// Errors raised while building faces, talking to storage or reading config.
#[derive(Debug, Error)]
pub enum FaceFinderError {
    #[error("Parameter `{parameter}` out of range ({value}), allowed min: {min}, max: {max}")]
    OutOfRange {
        parameter: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config error: {0}")]
    Config(String),
}

impl FaceFinderError {
    /// True for descriptor validation failures, false for storage/io/config.
    pub fn is_validation(&self) -> bool {
        matches!(self, FaceFinderError::OutOfRange { .. })
    }
}
