//! Error type for the engine crate.

use rir2d_core::RoomError;
use thiserror::Error;

/// Error type for scene loading, rendering and export.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Geometry or query validation failed in the core.
    #[error(transparent)]
    Room(#[from] RoomError),

    /// A scene or render setting is out of range.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// What was wrong.
        message: String,
    },

    /// I/O error wrapper.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WAV encoding/decoding error.
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

impl EngineError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        EngineError::InvalidConfig { message: message.into() }
    }

    /// Returns true if the error is an input-validation failure.
    ///
    /// Malformed or mistyped JSON counts as invalid input.
    pub fn is_validation_error(&self) -> bool {
        match self {
            EngineError::Room(_) | EngineError::InvalidConfig { .. } => true,
            EngineError::Json(e) => !e.is_io(),
            _ => false,
        }
    }

    /// Returns true if this is a file/format error.
    pub fn is_io_error(&self) -> bool {
        match self {
            EngineError::Io(_) | EngineError::Wav(_) => true,
            EngineError::Json(e) => e.is_io(),
            _ => false,
        }
    }
}
