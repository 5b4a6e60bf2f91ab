use crate::app::ports::SessionStorePort;
use crate::error::Result;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// In-memory session storage for development/testing
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorePort for InMemorySessionStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|p| p.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }
}

/// Session storage persisted as one JSON object file, so consecutive CLI
/// invocations share a session the way tabs share `sessionStorage`.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join("session.json"),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> HashMap<String, String> {
        let Ok(content) = fs::read_to_string(&self.path) else {
            return HashMap::new();
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            debug!("Discarding unreadable session file {}: {}", self.path.display(), e);
            HashMap::new()
        })
    }

    fn write_all(&self, entries: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        // Write-then-rename so a crash never leaves a half-written file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SessionStorePort for FileSessionStore {
    fn get_item(&self, key: &str) -> Option<String> {
        let _guard = self.lock.lock().ok()?;
        self.read_all().remove(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(|p| p.into_inner());
        let mut entries = self.read_all();
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove_item(&self, key: &str) {
        let _guard = self.lock.lock().unwrap_or_else(|p| p.into_inner());
        let mut entries = self.read_all();
        if entries.remove(key).is_some() {
            if let Err(e) = self.write_all(&entries) {
                debug!("Could not update session file: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_set_get_remove() {
        let store = InMemorySessionStore::new();
        assert!(store.get_item("k").is_none());
        store.set_item("k", "v").unwrap();
        assert_eq!(store.get_item("k").as_deref(), Some("v"));
        store.remove_item("k");
        assert!(store.get_item("k").is_none());
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        FileSessionStore::new(dir.path()).set_item("works", "[1]").unwrap();

        let reopened = FileSessionStore::new(dir.path());
        assert_eq!(reopened.get_item("works").as_deref(), Some("[1]"));
        reopened.remove_item("works");
        assert!(FileSessionStore::new(dir.path()).get_item("works").is_none());
    }

    #[test]
    fn test_file_store_treats_garbage_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path());
        fs::write(store.path(), "not json").unwrap();

        assert!(store.get_item("works").is_none());
        store.set_item("works", "[]").unwrap();
        assert_eq!(store.get_item("works").as_deref(), Some("[]"));
    }

    #[test]
    fn test_file_store_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested").join("session"));
        store.set_item("k", "v").unwrap();
        assert!(store.path().exists());
    }
}
