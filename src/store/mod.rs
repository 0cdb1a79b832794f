//! Persistence for the starred set.
//!
//! The backing store only knows how to keep lists of strings under string
//! keys. [`StarredSet`] layers set semantics over one well-known key.

pub mod starred;

use indexmap::IndexMap;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use starred::{StarredSet, STARRED_KEY};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("store file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Key/value store holding lists of strings.
pub trait StringListStore {
    fn get_string_list(&self, key: &str) -> Result<Option<Vec<String>>, StoreError>;
    fn set_string_list(&mut self, key: &str, list: &[String]) -> Result<(), StoreError>;
}

/// A JSON object on disk mapping each key to its list.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<IndexMap<String, Vec<String>>, StoreError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(IndexMap::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if contents.trim().is_empty() {
            return Ok(IndexMap::new());
        }
        serde_json::from_str(&contents).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }
}

impl StringListStore for JsonFileStore {
    fn get_string_list(&self, key: &str) -> Result<Option<Vec<String>>, StoreError> {
        Ok(self.read_all()?.shift_remove(key))
    }

    fn set_string_list(&mut self, key: &str, list: &[String]) -> Result<(), StoreError> {
        let mut all = self.read_all()?;
        all.insert(key.to_string(), list.to_vec());

        let io_err = |source: std::io::Error| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let contents = serde_json::to_string_pretty(&all).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, contents).map_err(io_err)?;
        tracing::debug!(key, count = list.len(), path = %self.path.display(), "saved list");
        Ok(())
    }
}

/// In-memory store, used when no data directory is available and in tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    lists: HashMap<String, Vec<String>>,
}

impl StringListStore for MemoryStore {
    fn get_string_list(&self, key: &str) -> Result<Option<Vec<String>>, StoreError> {
        Ok(self.lists.get(key).cloned())
    }

    fn set_string_list(&mut self, key: &str, list: &[String]) -> Result<(), StoreError> {
        self.lists.insert(key.to_string(), list.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_store_missing_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("store.json"));
        assert_eq!(store.get_string_list("k").unwrap(), None);
    }

    #[test]
    fn test_json_store_round_trip_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");
        let mut store = JsonFileStore::new(&path);
        store.set_string_list("a", &["x".into(), "y".into()]).unwrap();
        store.set_string_list("b", &["z".into()]).unwrap();

        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.path(), path.as_path());
        assert_eq!(
            reopened.get_string_list("a").unwrap(),
            Some(vec!["x".to_string(), "y".to_string()])
        );
        assert_eq!(reopened.get_string_list("b").unwrap(), Some(vec!["z".to_string()]));
    }

    #[test]
    fn test_json_store_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "not json").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(
            store.get_string_list("a"),
            Err(StoreError::Corrupt { .. })
        ));
    }
}
