//! In-memory slots.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::{KeyValueStore, StorageError};

/// Slots held in memory; clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: Arc<RwLock<HashMap<String, String>>>,
    read_only: Arc<RwLock<bool>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every write until switched back, as a full disk would.
    pub fn set_read_only(&self, read_only: bool) {
        *self.read_only.write().unwrap_or_else(PoisonError::into_inner) = read_only;
    }

    fn is_read_only(&self) -> bool {
        *self.read_only.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_writable(&self, key: &str) -> Result<(), StorageError> {
        if self.is_read_only() {
            return Err(StorageError::Io {
                path: key.into(),
                source: std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "store is read-only",
                ),
            });
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_writable(key)?;
        self.items
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.check_writable(key)?;
        self.items
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}
