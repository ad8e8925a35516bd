//! Persistent key-value slots.
//!
//! Modeled on browser local storage: string keys, string values, every write
//! replaces the whole value.

mod file;
mod memory;

use std::path::PathBuf;

use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors that can occur when reading or writing a slot.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The value could not be encoded for storage.
    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),

    /// The key cannot be used as a slot name.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// Durable string storage keyed by name.
pub trait KeyValueStore: Send + Sync {
    /// Read a slot. A missing slot is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns error if the slot exists but cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite a slot.
    ///
    /// # Errors
    ///
    /// Returns error if the value could not be stored; the previous value is
    /// then left in place.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a slot. Deleting a missing slot is not an error.
    ///
    /// # Errors
    ///
    /// Returns error if the slot exists but cannot be deleted.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}
