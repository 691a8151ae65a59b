//! Error handling module for ClipLy

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for ClipLy operations
#[derive(Error, Debug)]
pub enum ClipLyError {
    /// External tool could not be resolved by the locator
    #[error("{tool} not found. Please ensure it's installed and in your PATH")]
    ToolNotFound { tool: String },

    /// Probing tool failed or produced unusable output
    #[error("Failed to probe {}: {message}", .path.display())]
    ProbeFailure { path: PathBuf, message: String },

    /// Every encode strategy failed for a file
    #[error("Encoding failed for {}: {message}", .path.display())]
    EncodeFailure { path: PathBuf, message: String },

    /// Trim bounds are inconsistent or exceed the media duration
    #[error("Invalid trim range for {}: {message}", .path.display())]
    InvalidTrimRange { path: PathBuf, message: String },

    /// Unparseable time specification
    #[error("Invalid time format: {time}. Expected HH:MM:SS.ms, MM:SS.ms, or seconds")]
    InvalidTimeFormat { time: String },

    /// Configuration loading or validation error
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ClipLyError {
    pub(crate) fn probe(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ProbeFailure {
            path: path.into(),
            message: message.into(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }
}

/// Result type alias for ClipLy operations
pub type ClipLyResult<T> = std::result::Result<T, ClipLyError>;
