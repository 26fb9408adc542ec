//! Storage collaborators for snapshots.

use super::{CheckpointError, Snapshot, SnapshotFormat};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

/// Somewhere a snapshot can be loaded from and saved to.
///
/// `load` must report an empty store as [`CheckpointError::NotFound`] so
/// callers can tell "never saved" apart from "saved but unreadable".
pub trait SnapshotStore<T> {
    fn load(&self) -> Result<Snapshot<T>, CheckpointError>;

    fn save(&self, snapshot: &Snapshot<T>) -> Result<(), CheckpointError>;
}

/// Snapshot stored in a single file.
///
/// Saves write a uniquely named sibling file first and rename it over the
/// target, so an interrupted save leaves the previous snapshot intact.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
    format: SnapshotFormat,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>, format: SnapshotFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    /// JSON file store.
    pub fn json(path: impl Into<PathBuf>) -> Self {
        Self::new(path, SnapshotFormat::Json)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> SnapshotFormat {
        self.format
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn io_error(&self, source: io::Error) -> CheckpointError {
        CheckpointError::Io {
            location: self.location(),
            source,
        }
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "snapshot".to_string());
        self.path
            .with_file_name(format!(".{file_name}.{}.tmp", Uuid::new_v4()))
    }
}

impl<T> SnapshotStore<T> for FileStore
where
    T: Serialize + DeserializeOwned,
{
    fn load(&self) -> Result<Snapshot<T>, CheckpointError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(CheckpointError::NotFound {
                    location: self.location(),
                })
            }
            Err(err) => return Err(self.io_error(err)),
        };
        debug!(path = %self.path.display(), bytes = bytes.len(), "loaded snapshot");
        self.format.decode(&bytes)
    }

    fn save(&self, snapshot: &Snapshot<T>) -> Result<(), CheckpointError> {
        let bytes = self.format.encode(snapshot)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let temp = self.temp_path();
        fs::write(&temp, &bytes).map_err(|e| self.io_error(e))?;
        if let Err(err) = fs::rename(&temp, &self.path) {
            let _ = fs::remove_file(&temp);
            return Err(self.io_error(err));
        }

        debug!(
            path = %self.path.display(),
            state = %snapshot.current_state_name,
            bytes = bytes.len(),
            "saved snapshot"
        );
        Ok(())
    }
}

/// Snapshot kept in memory, encoded with a chosen format.
#[derive(Debug, Default)]
pub struct MemoryStore {
    format: SnapshotFormat,
    bytes: Mutex<Option<Vec<u8>>>,
}

impl MemoryStore {
    pub fn new(format: SnapshotFormat) -> Self {
        Self {
            format,
            bytes: Mutex::new(None),
        }
    }

    /// Encoded bytes of the last saved snapshot.
    pub fn bytes(&self) -> Option<Vec<u8>> {
        self.bytes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Drop whatever is stored.
    pub fn clear(&self) {
        *self
            .bytes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }
}

impl<T> SnapshotStore<T> for MemoryStore
where
    T: Serialize + DeserializeOwned,
{
    fn load(&self) -> Result<Snapshot<T>, CheckpointError> {
        match self.bytes() {
            Some(bytes) => self.format.decode(&bytes),
            None => Err(CheckpointError::NotFound {
                location: "memory".to_string(),
            }),
        }
    }

    fn save(&self, snapshot: &Snapshot<T>) -> Result<(), CheckpointError> {
        let encoded = self.format.encode(snapshot)?;
        *self
            .bytes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(encoded);
        Ok(())
    }
}
