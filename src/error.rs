//! Error types
//!
//! [`SyncError`] is the only error a caller of the provider API can
//! observe. [`FrameError`] stays inside the stream plumbing: a broken
//! subscriber stream never surfaces to the peer that published the
//! update.

use std::fmt;

/// Result alias for provider API operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// Error type for the provider API surface
#[derive(Debug)]
pub enum SyncError {
    /// Subscription descriptor could not be encoded
    Serialization(serde_json::Error),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::Serialization(err) => {
                write!(f, "Unable to encode subscription descriptor: {}", err)
            }
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::Serialization(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Serialization(err)
    }
}

/// Error type for reading or writing one framed message
#[derive(Debug)]
pub enum FrameError {
    /// Underlying stream failure (includes end-of-stream)
    Io(std::io::Error),
    /// Payload failed to encode or decode
    Codec(serde_json::Error),
    /// Inbound frame exceeded the configured maximum
    TooLarge { size: usize, max: usize },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::Io(err) => write!(f, "Stream failure: {}", err),
            FrameError::Codec(err) => write!(f, "Malformed message payload: {}", err),
            FrameError::TooLarge { size, max } => {
                write!(f, "Frame of {} bytes exceeds maximum of {} bytes", size, max)
            }
        }
    }
}

impl std::error::Error for FrameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FrameError::Io(err) => Some(err),
            FrameError::Codec(err) => Some(err),
            FrameError::TooLarge { .. } => None,
        }
    }
}

impl From<std::io::Error> for FrameError {
    fn from(err: std::io::Error) -> Self {
        FrameError::Io(err)
    }
}

impl From<serde_json::Error> for FrameError {
    fn from(err: serde_json::Error) -> Self {
        FrameError::Codec(err)
    }
}
