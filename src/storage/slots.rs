//! Persisted slots
//!
//! A slot is a named, origin-scoped string value that survives across
//! sessions. Writes always replace the whole value; there are no partial
//! or incremental updates.

use crate::storage::error::{StorageError, StorageResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Slot holding the JSON array of messages
pub const MESSAGES_KEY: &str = "familyChatMessages";

/// Slot holding the local display name
pub const USERNAME_KEY: &str = "familyChatUsername";

/// Origin-scoped key→string storage
pub trait SlotStore {
    /// Read a slot, `None` if it was never written
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Overwrite a slot with `value`
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
}

/// Check that `key` can name a slot.
///
/// Keys become file names in [`FileSlotStore`], so they are limited to
/// ASCII letters, digits, `_`, `-` and `.`, and may not start with `.`.
pub fn validate_key(key: &str) -> StorageResult<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

/// Slot store keeping one file per slot inside a data directory
#[derive(Debug, Clone)]
pub struct FileSlotStore {
    dir: PathBuf,
}

impl FileSlotStore {
    /// Open (and create if needed) the data directory
    pub fn open(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        tracing::debug!("Opened slot store at {:?}", dir);
        Ok(Self { dir })
    }

    /// Directory backing this store
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`
    pub fn slot_path(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(key))
    }
}

impl SlotStore for FileSlotStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.slot_path(key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.slot_path(key)?;
        std::fs::write(&path, value)?;
        tracing::trace!(key, bytes = value.len(), "Wrote slot");
        Ok(())
    }
}

/// In-memory slot store
#[derive(Debug, Clone, Default)]
pub struct MemorySlotStore {
    slots: HashMap<String, String>,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: pre-populate a slot
    pub fn with_slot(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.slots.insert(key.into(), value.into());
        self
    }

    /// Number of written slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl SlotStore for MemorySlotStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        validate_key(key)?;
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        validate_key(key)?;
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Slot store that reads as empty and refuses every write
#[cfg(test)]
pub(crate) struct ReadOnlySlots;

#[cfg(test)]
impl SlotStore for ReadOnlySlots {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        validate_key(key)?;
        Ok(None)
    }

    fn set(&mut self, _key: &str, _value: &str) -> StorageResult<()> {
        Err(StorageError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_validate_key() {
        assert!(validate_key(MESSAGES_KEY).is_ok());
        assert!(validate_key(USERNAME_KEY).is_ok());
        assert!(validate_key("backup-1.json").is_ok());

        assert!(validate_key("").is_err());
        assert!(validate_key(".hidden").is_err());
        assert!(validate_key("../escape").is_err());
        assert!(validate_key("a/b").is_err());
        assert!(validate_key("with space").is_err());
    }

    #[test]
    fn test_file_store_absent_slot() {
        let dir = tempdir().unwrap();
        let store = FileSlotStore::open(dir.path()).unwrap();

        assert_eq!(store.get(MESSAGES_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_store_set_and_get() {
        let dir = tempdir().unwrap();
        let mut store = FileSlotStore::open(dir.path()).unwrap();

        store.set(USERNAME_KEY, "Alice").unwrap();
        assert_eq!(store.get(USERNAME_KEY).unwrap().as_deref(), Some("Alice"));

        // Overwrites replace the whole value
        store.set(USERNAME_KEY, "Al").unwrap();
        assert_eq!(store.get(USERNAME_KEY).unwrap().as_deref(), Some("Al"));

        let on_disk = std::fs::read_to_string(dir.path().join(USERNAME_KEY)).unwrap();
        assert_eq!(on_disk, "Al");
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempdir().unwrap();

        {
            let mut store = FileSlotStore::open(dir.path()).unwrap();
            store.set(MESSAGES_KEY, "[]").unwrap();
        }

        let store = FileSlotStore::open(dir.path()).unwrap();
        assert_eq!(store.get(MESSAGES_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_file_store_creates_nested_dir() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");

        let store = FileSlotStore::open(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(store.dir(), nested.as_path());
    }

    #[test]
    fn test_file_store_rejects_bad_key() {
        let dir = tempdir().unwrap();
        let mut store = FileSlotStore::open(dir.path()).unwrap();

        let err = store.set("../outside", "x").unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
        assert!(!dir.path().parent().unwrap().join("outside").exists());
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemorySlotStore::new().with_slot(USERNAME_KEY, "Bob");
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(USERNAME_KEY).unwrap().as_deref(), Some("Bob"));
        assert_eq!(store.get(MESSAGES_KEY).unwrap(), None);

        store.set(MESSAGES_KEY, "[]").unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.set("no/slashes", "x").is_err());
    }
}
