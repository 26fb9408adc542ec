//! Snapshot persistence.
//!
//! A [`Snapshot`] is the only thing that survives between invocations: the
//! current state's name and the data payload. This module encodes snapshots
//! (pretty JSON or compact binary) and provides the storage collaborators
//! that read and write them.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod error;
pub mod store;

pub use error::CheckpointError;
pub use store::{FileStore, MemoryStore, SnapshotStore};

/// Serializable form of a machine.
///
/// Serializes as a record with the fields `currentStateName` and `data`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot<T> {
    pub current_state_name: String,
    pub data: T,
}

/// Encoding used for stored snapshots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SnapshotFormat {
    /// Pretty-printed JSON, human readable
    #[default]
    Json,

    /// bincode, compact
    Binary,
}

impl SnapshotFormat {
    pub fn encode<T: Serialize>(&self, snapshot: &Snapshot<T>) -> Result<Vec<u8>, CheckpointError> {
        match self {
            Self::Json => serde_json::to_vec_pretty(snapshot)
                .map_err(|e| CheckpointError::SerializationFailed(e.to_string())),
            Self::Binary => bincode::serialize(snapshot)
                .map_err(|e| CheckpointError::SerializationFailed(e.to_string())),
        }
    }

    pub fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<Snapshot<T>, CheckpointError> {
        match self {
            Self::Json => serde_json::from_slice(bytes)
                .map_err(|e| CheckpointError::DeserializationFailed(e.to_string())),
            Self::Binary => bincode::deserialize(bytes)
                .map_err(|e| CheckpointError::DeserializationFailed(e.to_string())),
        }
    }
}

impl FromStr for SnapshotFormat {
    type Err = CheckpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "binary" | "bin" | "bincode" => Ok(Self::Binary),
            _ => Err(CheckpointError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for SnapshotFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Binary => f.write_str("binary"),
        }
    }
}
