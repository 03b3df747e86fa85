//! Durable session storage.
//!
//! The session survives process restarts as two untyped keys: the raw
//! access token and the serialized user identity JSON. There is no schema
//! versioning; an unreadable identity value is treated as absent and
//! cleared by the session store on restore.
//!
//! [`FileStorage`] keeps both keys in one small JSON file. [`MemoryStorage`]
//! backs tests and embedders that manage persistence themselves.

use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur reading or writing durable session state.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored state could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// The raw persisted session: two independent keys, either of which may
/// be absent.
///
/// `user` is the identity serialized to JSON; the session store owns
/// parsing it and decides what to do when only one key is present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    /// Raw bearer token string.
    pub token: Option<String>,
    /// Serialized `UserIdentity` JSON.
    pub user: Option<String>,
}

impl StoredSession {
    /// True if neither key is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.token.is_none() && self.user.is_none()
    }
}

/// Durable storage for the session's two keys.
pub trait SessionStorage: Send + Sync + fmt::Debug {
    /// Read the persisted session.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be read.
    fn load(&self) -> Result<StoredSession, StorageError>;

    /// Replace the persisted session.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be written.
    fn store(&self, session: &StoredSession) -> Result<(), StorageError>;

    /// Remove both keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be written.
    fn clear(&self) -> Result<(), StorageError>;
}

// =============================================================================
// FileStorage
// =============================================================================

/// File-backed session storage.
///
/// A missing file reads as an empty session; `clear` removes the file.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Create a file-backed store at the given path.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> Result<StoredSession, StorageError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(StoredSession::default());
            }
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_str(&contents)?)
    }

    fn store(&self, session: &StoredSession) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// MemoryStorage
// =============================================================================

/// In-memory session storage.
///
/// Nothing survives the process; used by tests and by embedders that do
/// not want a session file.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    state: Mutex<StoredSession>,
}

impl MemoryStorage {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<StoredSession, StorageError> {
        Ok(self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone())
    }

    fn store(&self, session: &StoredSession) -> Result<(), StorageError> {
        *self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = session.clone();
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = StoredSession::default();
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> StoredSession {
        StoredSession {
            token: Some("tok-abc".to_string()),
            user: Some(r#"{"id":1,"username":"alice"}"#.to_string()),
        }
    }

    #[test]
    fn test_memory_round_trip() {
        let storage = MemoryStorage::new();
        assert!(storage.load().unwrap().is_empty());

        storage.store(&sample()).unwrap();
        assert_eq!(storage.load().unwrap(), sample());

        storage.clear().unwrap();
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("session.json"));

        // Missing file reads as empty
        assert!(storage.load().unwrap().is_empty());

        storage.store(&sample()).unwrap();
        assert_eq!(storage.load().unwrap(), sample());

        // A second store instance at the same path sees the same state
        let reopened = FileStorage::new(dir.path().join("session.json"));
        assert_eq!(reopened.load().unwrap(), sample());

        storage.clear().unwrap();
        assert!(storage.load().unwrap().is_empty());
        // Clearing twice is fine
        storage.clear().unwrap();
    }

    #[test]
    fn test_file_storage_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested/dir/session.json"));
        storage.store(&sample()).unwrap();
        assert_eq!(storage.load().unwrap(), sample());
    }
}
