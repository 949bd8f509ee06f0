//! Durable client-side storage.
//!
//! A small keyed slot store, private to one client. Each slot holds a JSON
//! document; the cart and the view-mode preference live here and survive a
//! restart of the client.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;
use tracing::warn;

use stockroom_core::ViewMode;

/// Slot keys used by Stockroom.
pub mod keys {
    /// Serialized cart entries.
    pub const CART: &str = "cart";

    /// Customer/manager view preference.
    pub const VIEW_MODE: &str = "view_mode";
}

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be encoded.
    #[error("storage encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Keyed string slots that persist across client restarts.
pub trait ClientStorage: Send + Sync {
    /// Read a slot. Absent slots are `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the slot exists but cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite a slot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the slot cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a slot. Deleting an absent slot is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the slot exists but cannot be removed.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Storage backed by one `<key>.json` file per slot in a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (and create if needed) a storage directory.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// The directory backing this storage.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl ClientStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.slot_path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        // Write-then-rename so a crash never leaves a half-written slot.
        let path = self.slot_path(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.slot_path(key)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Process-local storage, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClientStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.remove(key);
        Ok(())
    }
}

/// Read the saved view mode, defaulting to customer on absent or bad data.
#[must_use]
pub fn load_view_mode(storage: &dyn ClientStorage) -> ViewMode {
    match storage.get(keys::VIEW_MODE) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "Ignoring unreadable view mode preference");
            ViewMode::default()
        }),
        Ok(None) => ViewMode::default(),
        Err(e) => {
            warn!(error = %e, "Failed to read view mode preference");
            ViewMode::default()
        }
    }
}

/// Persist the view mode preference.
///
/// # Errors
///
/// Returns `StorageError` if the slot cannot be written.
pub fn save_view_mode(storage: &dyn ClientStorage, mode: ViewMode) -> Result<(), StorageError> {
    let raw = serde_json::to_string(&mode)?;
    storage.set(keys::VIEW_MODE, &raw)
}
