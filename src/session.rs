//! Browser-style key/value storage.
//!
//! Session storage lives for one run and carries the `createNew` flag.
//! Local storage survives restarts and carries the dashboard's selected
//! property.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

use crate::error::Result;

/// Session flag set before navigating to the wizard with "create new"
pub const CREATE_NEW_KEY: &str = "createNew";

/// Local-storage key for the booking dashboard's property context
pub const SELECTED_PROPERTY_KEY: &str = "selectedProperty";

const LOCAL_STORAGE_FILE: &str = "local_storage.json";

pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;

    /// Read and delete in one step
    fn take(&self, key: &str) -> Result<Option<String>> {
        let value = self.get(key);
        if value.is_some() {
            self.remove(key)?;
        }
        Ok(value)
    }
}

/// In-memory storage scoped to the current session
#[derive(Debug, Default)]
pub struct SessionStorage {
    values: Mutex<BTreeMap<String, String>>,
}

impl SessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for SessionStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

/// JSON-file backed storage that survives restarts
#[derive(Debug)]
pub struct LocalStorage {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl LocalStorage {
    /// Open (or create) the storage file under `dir`
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        let path = dir.join(LOCAL_STORAGE_FILE);
        let values = if path.exists() {
            let data = fs::read_to_string(&path)?;
            match serde_json::from_str(&data) {
                Ok(values) => values,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Local storage unreadable, starting empty");
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };
        debug!(path = %path.display(), entries = values.len(), "Opened local storage");
        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<()> {
        let json = serde_json::to_string_pretty(values)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStorage for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        self.persist(&values)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        if values.remove(key).is_some() {
            self.persist(&values)?;
        }
        Ok(())
    }
}

/// Ask the next wizard mount to skip the draft picker
pub fn request_new_draft(session: &dyn KeyValueStorage) -> Result<()> {
    session.set(CREATE_NEW_KEY, "true")
}

/// Property the booking dashboard is scoped to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SelectedProperty {
    pub id: String,
    pub place_name: String,
}

impl SelectedProperty {
    pub fn save(&self, storage: &dyn KeyValueStorage) -> Result<()> {
        storage.set(SELECTED_PROPERTY_KEY, &serde_json::to_string(self)?)
    }

    /// Re-hydrate on dashboard layout mount. Corrupt entries are dropped.
    pub fn hydrate(storage: &dyn KeyValueStorage) -> Option<Self> {
        let raw = storage.get(SELECTED_PROPERTY_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(selected) => Some(selected),
            Err(e) => {
                warn!(error = %e, "Discarding corrupt selected-property entry");
                if let Err(e) = storage.remove(SELECTED_PROPERTY_KEY) {
                    warn!(error = %e, "Could not clear selected-property entry");
                }
                None
            }
        }
    }

    pub fn clear(storage: &dyn KeyValueStorage) -> Result<()> {
        storage.remove(SELECTED_PROPERTY_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_consumes_the_flag() {
        let session = SessionStorage::new();
        request_new_draft(&session).unwrap();
        assert_eq!(session.take(CREATE_NEW_KEY).unwrap().as_deref(), Some("true"));
        assert_eq!(session.take(CREATE_NEW_KEY).unwrap(), None);
    }

    #[test]
    fn local_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let storage = LocalStorage::open(dir.path()).unwrap();
            SelectedProperty {
                id: "p9".into(),
                place_name: "Parmarth Niketan".into(),
            }
            .save(&storage)
            .unwrap();
        }
        let storage = LocalStorage::open(dir.path()).unwrap();
        let selected = SelectedProperty::hydrate(&storage).unwrap();
        assert_eq!(selected.id, "p9");
    }

    #[test]
    fn cleared_selection_stays_cleared_after_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let storage = LocalStorage::open(dir.path()).unwrap();
            SelectedProperty {
                id: "p9".into(),
                place_name: "Parmarth Niketan".into(),
            }
            .save(&storage)
            .unwrap();
            SelectedProperty::clear(&storage).unwrap();
        }
        let storage = LocalStorage::open(dir.path()).unwrap();
        assert_eq!(SelectedProperty::hydrate(&storage), None);
    }

    #[test]
    fn corrupt_selection_is_discarded() {
        let session = SessionStorage::new();
        session.set(SELECTED_PROPERTY_KEY, "{not json").unwrap();
        assert_eq!(SelectedProperty::hydrate(&session), None);
        assert_eq!(session.get(SELECTED_PROPERTY_KEY), None);
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(LOCAL_STORAGE_FILE), "garbage").unwrap();
        let storage = LocalStorage::open(dir.path()).unwrap();
        assert_eq!(storage.get(SELECTED_PROPERTY_KEY), None);
    }
}
