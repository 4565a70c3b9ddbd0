//! Persisted mode preference.
//!
//! The last-used mode survives restarts as a single integer stored under
//! [`MODE_KEY`], scoped by screen name.

use crate::error::Result;

use log::{debug, warn};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Preference key holding the last-used mode identifier.
pub const MODE_KEY: &str = "mode_type";

/// Storage for the last-used mode identifier.
pub trait ModePreferenceStore {
    /// Read the stored mode identifier, if any.
    fn read_mode(&self) -> Result<Option<i32>>;

    /// Store a mode identifier.
    fn write_mode(&mut self, mode_id: i32) -> Result<()>;
}

/// JSON file preference store.
///
/// Each screen gets its own `<dir>/<screen>.json` holding a flat object of
/// integer preferences. Writes go through a temporary file and a rename.
#[derive(Debug, Clone)]
pub struct JsonPreferenceStore {
    path: PathBuf,
}

impl JsonPreferenceStore {
    /// Create a store for `screen` inside `dir`.
    pub fn new(dir: impl AsRef<Path>, screen: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{screen}.json")),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, i32>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let json = std::fs::read_to_string(&self.path)?;
        match serde_json::from_str(&json) {
            Ok(values) => Ok(values),
            Err(e) => {
                warn!(
                    "ignoring corrupt preferences in {}: {}",
                    self.path.display(),
                    e
                );
                Ok(BTreeMap::new())
            }
        }
    }
}

impl ModePreferenceStore for JsonPreferenceStore {
    fn read_mode(&self) -> Result<Option<i32>> {
        Ok(self.load()?.get(MODE_KEY).copied())
    }

    fn write_mode(&mut self, mode_id: i32) -> Result<()> {
        let mut values = self.load()?;
        values.insert(MODE_KEY.to_string(), mode_id);

        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, serde_json::to_string_pretty(&values)?)?;
        std::fs::rename(&temp_path, &self.path)?;

        debug!("stored {}={} in {}", MODE_KEY, mode_id, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonPreferenceStore::new(dir.path(), "SearchLight");
        assert_eq!(store.read_mode().unwrap(), None);
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonPreferenceStore::new(dir.path().join("prefs"), "SearchLight");

        store.write_mode(3).unwrap();
        assert_eq!(store.read_mode().unwrap(), Some(3));

        store.write_mode(2).unwrap();
        let reopened = JsonPreferenceStore::new(dir.path().join("prefs"), "SearchLight");
        assert_eq!(reopened.read_mode().unwrap(), Some(2));
        assert!(!reopened.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_screens_are_scoped() {
        let dir = tempfile::tempdir().unwrap();
        let mut first = JsonPreferenceStore::new(dir.path(), "SearchLight");
        let second = JsonPreferenceStore::new(dir.path(), "Other");

        first.write_mode(4).unwrap();
        assert_eq!(second.read_mode().unwrap(), None);
    }

    #[test]
    fn test_other_keys_survive_write() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonPreferenceStore::new(dir.path(), "SearchLight");
        std::fs::write(store.path(), r#"{"launch_count": 7}"#).unwrap();

        store.write_mode(1).unwrap();
        let json = std::fs::read_to_string(store.path()).unwrap();
        let values: BTreeMap<String, i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(values.get("launch_count"), Some(&7));
        assert_eq!(values.get(MODE_KEY), Some(&1));
    }

    #[test]
    fn test_corrupt_file_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonPreferenceStore::new(dir.path(), "SearchLight");
        std::fs::write(store.path(), "{ not json").unwrap();

        assert_eq!(store.read_mode().unwrap(), None);
        store.write_mode(2).unwrap();
        assert_eq!(store.read_mode().unwrap(), Some(2));
    }
}
