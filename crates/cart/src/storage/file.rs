//! Slots stored as files in a directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

use super::{KeyValueStore, StorageError};

/// One file per key inside `dir`.
///
/// Keys are percent-encoded into file names (`@RocketShoes:cart` becomes
/// `%40RocketShoes%3Acart.json`). Each write goes to its own temporary
/// sibling that is renamed over the slot, so readers see the old value or the
/// new one and concurrent writers never share a temp file.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store slots under `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the slots.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    ///
    /// # Errors
    ///
    /// Returns error if the key is empty.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        Ok(self.dir.join(format!("{}.json", urlencoding::encode(key))))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|e| io_error(&self.dir, e))?;

        let tmp = path.with_extension(format!("json.{}.tmp", Uuid::new_v4()));
        fs::write(&tmp, value).map_err(|e| io_error(&tmp, e))?;
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(io_error(&path, e));
        }

        debug!(path = %path.display(), bytes = value.len(), "slot written");
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path, e)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_store() -> FileStore {
        FileStore::new(std::env::temp_dir().join(format!("rocketshoes-{}", Uuid::new_v4())))
    }

    #[test]
    fn test_key_encoding() {
        let store = FileStore::new("/data");
        assert_eq!(
            store.path_for("@RocketShoes:cart").unwrap(),
            PathBuf::from("/data/%40RocketShoes%3Acart.json")
        );
        assert_eq!(
            store.path_for("../escape").unwrap(),
            PathBuf::from("/data/..%2Fescape.json")
        );
        assert!(matches!(
            store.path_for(""),
            Err(StorageError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_missing_slot_is_none() {
        let store = temp_store();
        assert_eq!(store.get_item("@RocketShoes:cart").unwrap(), None);
    }

    #[test]
    fn test_write_creates_dir_and_overwrites() {
        let store = temp_store();
        store.set_item("@RocketShoes:cart", "[1]").unwrap();
        store.set_item("@RocketShoes:cart", "[2]").unwrap();
        assert_eq!(
            store.get_item("@RocketShoes:cart").unwrap().as_deref(),
            Some("[2]")
        );

        // No temp file left behind
        let entries = fs::read_dir(store.dir()).unwrap().count();
        assert_eq!(entries, 1);

        fs::remove_dir_all(store.dir()).unwrap();
    }

    #[test]
    fn test_remove_missing_is_ok() {
        let store = temp_store();
        store.remove_item("nothing").unwrap();
        store.set_item("k", "v").unwrap();
        store.remove_item("k").unwrap();
        assert_eq!(store.get_item("k").unwrap(), None);

        fs::remove_dir_all(store.dir()).unwrap();
    }

    #[test]
    fn test_concurrent_writers_replace_whole_slot() {
        let dir = temp_store().dir().to_path_buf();
        let writers = [FileStore::new(&dir), FileStore::new(&dir)];
        let payload = |writer: usize| serde_json::to_string(&vec![writer; 50_000]).unwrap();

        for _ in 0..20 {
            let results: Vec<Result<(), StorageError>> = std::thread::scope(|scope| {
                let handles: Vec<_> = writers
                    .iter()
                    .enumerate()
                    .map(|(i, store)| {
                        let value = payload(i);
                        scope.spawn(move || store.set_item("k", &value))
                    })
                    .collect();
                handles.into_iter().map(|h| h.join().unwrap()).collect()
            });
            assert!(results.iter().all(Result::is_ok), "{results:?}");

            let raw = writers[0].get_item("k").unwrap().unwrap();
            let slot: Vec<usize> = serde_json::from_str(&raw).unwrap();
            assert_eq!(slot.len(), 50_000);
            assert!(slot == vec![0; 50_000] || slot == vec![1; 50_000]);
        }

        let names: Vec<String> = fs::read_dir(&dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["k.json".to_string()]);

        fs::remove_dir_all(&dir).unwrap();
    }
}
