/// Core error types for Groove
use thiserror::Error;

/// Result type alias using `GrooveError`
pub type Result<T> = std::result::Result<T, GrooveError>;

/// Core error type for Groove
#[derive(Error, Debug)]
pub enum GrooveError {
    /// A catalog row failed validation
    #[error("Invalid track {id}: {reason}")]
    InvalidTrack { id: String, reason: String },

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The catalog backend could not answer
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl GrooveError {
    /// Create an invalid track error
    pub fn invalid_track(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTrack {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create a catalog error
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }
}
