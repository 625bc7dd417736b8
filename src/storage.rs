//! Local key-value persistence.
//!
//! Each key is a file under the storage root:
//!
//! ```text
//! <root>/
//!   workouts.json    # Snapshot of the workout store
//! ```
//!
//! A missing file is a missing key. Writes replace the whole value.

mod snapshot;

use std::{fs, io, path::PathBuf};

pub use snapshot::SnapshotError;
pub(crate) use snapshot::{decode, encode};

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// Local file-based key-value storage.
#[derive(Debug)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Creates a new storage instance rooted at the given directory.
    ///
    /// The directory is created if it doesn't exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Returns the default storage root: `~/.trailmark/`.
    pub fn default_root() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".trailmark"))
    }

    /// Reads the value stored under `key`, or `None` if there is none.
    pub fn read(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.key_path(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn write(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;
        // Write beside the target and rename so a crash never leaves half a value.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(tmp, path)?;
        Ok(())
    }

    /// Removes `key`.
    ///
    /// Idempotent: does nothing if the key doesn't exist.
    pub fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.key_path(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    fn test_storage() -> (TempDir, Storage) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("data")).unwrap();
        (dir, storage)
    }

    #[test]
    fn new_creates_root() {
        let (dir, _storage) = test_storage();
        assert!(dir.path().join("data").is_dir());
    }

    #[test]
    fn read_missing_key_is_none() {
        let (_dir, storage) = test_storage();
        assert_eq!(storage.read("workouts").unwrap(), None);
    }

    #[test]
    fn write_then_read() {
        let (_dir, storage) = test_storage();

        storage.write("workouts", "[]").unwrap();
        assert_eq!(storage.read("workouts").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn write_overwrites_previous_value() {
        let (dir, storage) = test_storage();

        storage.write("workouts", "first").unwrap();
        storage.write("workouts", "second").unwrap();

        assert_eq!(storage.read("workouts").unwrap().as_deref(), Some("second"));
        assert!(!dir.path().join("data").join("workouts.json.tmp").exists());
    }

    #[test]
    fn remove_deletes_value() {
        let (_dir, storage) = test_storage();

        storage.write("workouts", "[]").unwrap();
        storage.remove("workouts").unwrap();

        assert_eq!(storage.read("workouts").unwrap(), None);
    }

    #[test]
    fn remove_idempotent() {
        let (_dir, storage) = test_storage();

        // Remove with no file — should not error.
        storage.remove("workouts").unwrap();
    }

    #[test]
    fn path_like_keys_are_rejected() {
        let (_dir, storage) = test_storage();

        for key in ["", "../escape", "a/b", "with space"] {
            let err = storage.write(key, "x").unwrap_err();
            assert!(matches!(err, StorageError::InvalidKey(_)));
        }
    }
}
