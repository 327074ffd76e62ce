//! Error types for playback management

use groove_core::{GrooveError, TrackId};
use thiserror::Error;

/// Playback errors
///
/// None of these stop the queue: the player logs them, reports them as
/// events and falls back to "nothing plays".
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The audio engine refused or failed an operation
    #[error("Playback session error: {0}")]
    Session(String),

    /// The active track has no cached metadata to play from
    #[error("Track not cached: {0}")]
    TrackNotCached(TrackId),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog provider failure
    #[error(transparent)]
    Catalog(#[from] GrooveError),
}

impl PlaybackError {
    /// Create a session error
    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }
}

impl From<config::ConfigError> for PlaybackError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
