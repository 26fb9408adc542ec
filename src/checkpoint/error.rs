//! Checkpoint error types.

use thiserror::Error;

/// Errors that can occur while storing or loading snapshots
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// Nothing has been stored at this location yet
    #[error("No snapshot found at {location}")]
    NotFound { location: String },

    /// Reading or writing the underlying storage failed
    #[error("Snapshot I/O failed at {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization to JSON or binary format failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization from JSON or binary format failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Format name not recognised
    #[error("Unknown snapshot format '{0}', expected 'json' or 'binary'")]
    UnknownFormat(String),
}
