use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use tracing::debug;

/// String-keyed persistent storage, the moral equivalent of a browser's
/// local storage. Every call is atomic on its own; there are no multi-key
/// transactions.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

fn lock(entries: &Mutex<BTreeMap<String, String>>) -> MutexGuard<'_, BTreeMap<String, String>> {
    // A panic while holding the lock cannot leave the map half-written
    entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// In-process store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        lock(&self.entries).remove(key);
        Ok(())
    }
}

/// Store backed by a single JSON object file.
///
/// The file is read once on open, so each store holds its own snapshot:
/// changes another process (or another store) makes afterwards are not seen. Each
/// write replaces the whole file with this snapshot by writing a sibling
/// temp file and renaming it into place, so a crash never leaves a truncated
/// file behind. The last write wins, including over keys another writer set.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`, loading existing entries if the file exists
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read storage file {}", path.display()))?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&contents)
                    .with_context(|| format!("Failed to parse storage file {}", path.display()))?
            }
        } else {
            BTreeMap::new()
        };
        debug!(path = %path.display(), keys = entries.len(), "Storage loaded");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Sibling temp file, unique per process so concurrent writers never
    /// share one
    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(format!(".{}.tmp", std::process::id()));
        self.path.with_file_name(name)
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create storage directory {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(entries)?;
        let tmp = self.temp_path();
        std::fs::write(&tmp, contents).context("Failed to write storage file")?;
        std::fs::rename(&tmp, &self.path).context("Failed to replace storage file")?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = lock(&self.entries);
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)?;
        debug!(key, "Stored value");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = lock(&self.entries);
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
            debug!(key, "Removed value");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("jwt_token"), None);

        store.set("jwt_token", "abc").unwrap();
        assert_eq!(store.get("jwt_token").as_deref(), Some("abc"));

        store.set("jwt_token", "def").unwrap();
        assert_eq!(store.get("jwt_token").as_deref(), Some("def"));

        store.remove("jwt_token").unwrap();
        assert_eq!(store.get("jwt_token"), None);

        // Removing a missing key is not an error
        store.remove("jwt_token").unwrap();
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        {
            let store = FileStore::open(&path).unwrap();
            store.set("jwt_token", "abc123").unwrap();
            store.set("user", r#"{"id":1}"#).unwrap();
        }

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("jwt_token").as_deref(), Some("abc123"));
        assert_eq!(reopened.get("user").as_deref(), Some(r#"{"id":1}"#));

        reopened.remove("user").unwrap();
        let again = FileStore::open(&path).unwrap();
        assert_eq!(again.get("user"), None);
        assert_eq!(again.get("jwt_token").as_deref(), Some("abc123"));
        let leftovers: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("storage.json")]);
    }

    #[test]
    fn test_file_store_missing_and_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("jwt_token"), None);
        assert!(!path.exists());

        std::fs::write(&path, "").unwrap();
        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("jwt_token"), None);
    }

    #[test]
    fn test_file_store_snapshot_last_write_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let first = FileStore::open(&path).unwrap();
        let second = FileStore::open(&path).unwrap();

        first.set("jwt_token", "from-first").unwrap();
        assert_eq!(second.get("jwt_token"), None);

        // The second snapshot never saw the token, so its write drops it
        second.set("user", r#"{"id":2}"#).unwrap();
        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("jwt_token"), None);
        assert_eq!(reopened.get("user").as_deref(), Some(r#"{"id":2}"#));
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(FileStore::open(&path).is_err());
    }
}
