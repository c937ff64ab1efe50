//! Durable local key-value slot.
//!
//! The cart is mirrored to exactly one serialized blob. Access is synchronous
//! so a mutation and its write happen within the same call.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

/// Errors that can occur when reading or writing the slot.
#[derive(Debug, Error)]
pub enum SlotError {
    /// Reading or writing the backing storage failed.
    #[error("slot I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored blob could not be decoded.
    #[error("slot contents corrupt: {0}")]
    Corrupt(String),
}

/// A single durable blob.
pub trait LocalSlot: Send + Sync {
    /// Read the blob. Returns `None` if the slot is empty.
    ///
    /// # Errors
    ///
    /// Returns `SlotError::Io` if the backing storage can't be read.
    fn get(&self) -> Result<Option<String>, SlotError>;

    /// Replace the blob.
    ///
    /// # Errors
    ///
    /// Returns `SlotError::Io` if the backing storage can't be written.
    fn set(&self, value: &str) -> Result<(), SlotError>;

    /// Delete the blob entirely. Removing an empty slot succeeds.
    ///
    /// # Errors
    ///
    /// Returns `SlotError::Io` if the backing storage can't be modified.
    fn remove(&self) -> Result<(), SlotError>;
}

/// Slot stored as one file on disk.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    /// Create a slot at `path`. Nothing is touched until the first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the slot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LocalSlot for FileSlot {
    fn get(&self) -> Result<Option<String>, SlotError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SlotError::Io(e)),
        }
    }

    fn set(&self, value: &str) -> Result<(), SlotError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, value)?;
        Ok(())
    }

    fn remove(&self) -> Result<(), SlotError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SlotError::Io(e)),
        }
    }
}

/// Slot held in memory, for tests.
#[derive(Debug, Default)]
pub struct MemorySlot {
    value: Mutex<Option<String>>,
}

impl MemorySlot {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot holding `value`.
    #[must_use]
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(Some(value.into())),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>, SlotError> {
        self.value
            .lock()
            .map_err(|_| SlotError::Io(std::io::Error::other("slot lock poisoned")))
    }
}

impl LocalSlot for MemorySlot {
    fn get(&self) -> Result<Option<String>, SlotError> {
        Ok(self.lock()?.clone())
    }

    fn set(&self, value: &str) -> Result<(), SlotError> {
        *self.lock()? = Some(value.to_owned());
        Ok(())
    }

    fn remove(&self) -> Result<(), SlotError> {
        *self.lock()? = None;
        Ok(())
    }
}
