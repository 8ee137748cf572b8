//! Directory-backed key-value store.
//!
//! Each key is stored as `<dir>/<key>.json`. Writes go to a sibling
//! temporary file which is then renamed over the target, so a reader sees
//! either the previous or the new value of a key, never a partial one.
//! Atomicity is per key only.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::KeyValueStore;
use crate::error::{ParkingError, ParkingResult};

/// Key-value store persisting one JSON file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens (and creates if needed) a store rooted at `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ParkingError::Persistence`] if the directory cannot be
    /// created.
    pub fn open(dir: impl Into<PathBuf>) -> ParkingResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            ParkingError::Persistence(format!("cannot create {}: {e}", dir.display()))
        })?;
        tracing::debug!(dir = %dir.display(), "file store opened");
        Ok(Self { dir })
    }

    /// Root directory of the store.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> ParkingResult<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ParkingError::Persistence(format!("cannot read {key}: {e}"))),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> ParkingResult<()> {
        let target = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        std::fs::write(&tmp, value)
            .map_err(|e| ParkingError::Persistence(format!("cannot write {key}: {e}")))?;
        std::fs::rename(&tmp, &target)
            .map_err(|e| ParkingError::Persistence(format!("cannot replace {key}: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn temp_store() -> FileStore {
        let dir = std::env::temp_dir().join(format!("smartpark-test-{}", uuid::Uuid::new_v4()));
        let Ok(store) = FileStore::open(&dir) else {
            panic!("temp dir should be writable");
        };
        store
    }

    #[test]
    fn missing_key_reads_as_none() {
        let store = temp_store();
        let Ok(value) = store.get("smartpark_slots") else {
            panic!("read should not fail");
        };
        assert!(value.is_none());
        let _ = std::fs::remove_dir_all(store.dir());
    }

    #[test]
    fn write_replaces_previous_value() {
        let mut store = temp_store();
        assert!(store.set("smartpark_cars", "[]").is_ok());
        assert!(store.set("smartpark_cars", "[1]").is_ok());
        assert_eq!(
            store.get("smartpark_cars").ok().flatten().as_deref(),
            Some("[1]")
        );
        assert!(!store.dir().join("smartpark_cars.json.tmp").exists());
        let _ = std::fs::remove_dir_all(store.dir());
    }

    #[test]
    fn reopening_sees_existing_files() {
        let mut store = temp_store();
        let _ = store.set("smartpark_payments", "[]");
        let Ok(reopened) = FileStore::open(store.dir()) else {
            panic!("reopen failed");
        };
        assert_eq!(
            reopened.get("smartpark_payments").ok().flatten().as_deref(),
            Some("[]")
        );
        let _ = std::fs::remove_dir_all(store.dir());
    }
}
