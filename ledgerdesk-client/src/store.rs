//! Durable key-value storage for session state
//!
//! The console keeps exactly two entries, `token` and `adminInfo`. Writes and
//! removals take several keys at once and apply them all-or-nothing so the
//! two entries can never drift apart.

use ledgerdesk_core::{storage_error, ErrorContext, LedgerError, LedgerResult};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tempfile::NamedTempFile;
use tracing::debug;

/// Minimal storage capability handed to the session manager.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> LedgerResult<Option<String>>;

    /// Write every entry in one step.
    fn set(&self, entries: &[(&str, &str)]) -> LedgerResult<()>;

    /// Remove every key in one step. Missing keys are ignored.
    fn clear(&self, keys: &[&str]) -> LedgerResult<()>;
}

/// JSON map persisted to a single file.
///
/// Each write replaces the file through a temporary sibling and a rename, so
/// a crash mid-write leaves either the old or the new map on disk.
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> LedgerResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| LedgerError::Storage {
            message: format!("Failed to read session file {}: {}", self.path.display(), e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("file_store").with_operation("read"),
        })?;

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).map_err(|e| LedgerError::Storage {
            message: format!("Session file {} is corrupt: {}", self.path.display(), e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("file_store")
                .with_operation("parse")
                .with_suggestion("Run 'ledgerdesk logout' to reset the session file"),
        })
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> LedgerResult<()> {
        let parent = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                std::fs::create_dir_all(parent)?;
                parent.to_path_buf()
            }
            None => PathBuf::from("."),
        };

        let json = serde_json::to_string_pretty(map)?;

        let mut tmp = NamedTempFile::new_in(&parent).map_err(|e| LedgerError::Storage {
            message: format!("Failed to create temp file in {}: {}", parent.display(), e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("file_store").with_operation("write"),
        })?;
        tmp.write_all(json.as_bytes())
            .and_then(|_| tmp.flush())
            .map_err(|e| LedgerError::Storage {
                message: format!("Failed to write {}: {}", tmp.path().display(), e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("file_store").with_operation("write"),
            })?;
        restrict_permissions(tmp.path())?;

        tmp.persist(&self.path).map_err(|e| LedgerError::Storage {
            message: format!("Failed to replace {}: {}", self.path.display(), e.error),
            source: Some(Box::new(e.error)),
            context: ErrorContext::new("file_store").with_operation("rename"),
        })?;

        debug!("Saved session file {}", self.path.display());
        Ok(())
    }

    fn guard(&self) -> LedgerResult<std::sync::MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| storage_error!("Session file lock poisoned", "file_store"))
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> LedgerResult<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> LedgerResult<()> {
    Ok(())
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> LedgerResult<Option<String>> {
        let _guard = self.guard()?;
        Ok(self.read_map()?.remove(key))
    }

    fn set(&self, entries: &[(&str, &str)]) -> LedgerResult<()> {
        let _guard = self.guard()?;
        let mut map = self.read_map()?;
        for (key, value) in entries {
            map.insert((*key).to_string(), (*value).to_string());
        }
        self.write_map(&map)
    }

    fn clear(&self, keys: &[&str]) -> LedgerResult<()> {
        let _guard = self.guard()?;
        if !self.path.exists() {
            return Ok(());
        }
        // A corrupt file cannot hold a usable session; start over.
        let mut map = self.read_map().unwrap_or_default();
        for key in keys {
            map.remove(*key);
        }
        self.write_map(&map)
    }
}

/// In-process store, used by tests and short-lived embedders.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: &[(&str, &str)]) -> Self {
        let map = entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Self {
            entries: Mutex::new(map),
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of `set`/`clear` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().map(|m| m.is_empty()).unwrap_or(true)
    }

    fn entries(&self) -> LedgerResult<std::sync::MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| storage_error!("Memory store lock poisoned", "memory_store"))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> LedgerResult<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, entries: &[(&str, &str)]) -> LedgerResult<()> {
        let mut map = self.entries()?;
        for (key, value) in entries {
            map.insert((*key).to_string(), (*value).to_string());
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn clear(&self, keys: &[&str]) -> LedgerResult<()> {
        let mut map = self.entries()?;
        for key in keys {
            map.remove(*key);
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("state").join("session.json"));

        assert_eq!(store.get("token").unwrap(), None);

        store
            .set(&[("token", "abc"), ("adminInfo", r#"{"uuid":"u-1","name":"admin"}"#)])
            .unwrap();
        assert_eq!(store.get("token").unwrap().as_deref(), Some("abc"));

        // A second handle on the same file sees the same state
        let reopened = FileStore::new(store.path());
        assert!(reopened.get("adminInfo").unwrap().is_some());

        store.clear(&["token", "adminInfo"]).unwrap();
        assert_eq!(reopened.get("token").unwrap(), None);
        assert_eq!(reopened.get("adminInfo").unwrap(), None);
    }

    #[test]
    fn test_file_store_keeps_unrelated_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("session.json"));

        store.set(&[("theme", "dark"), ("token", "abc")]).unwrap();
        store.clear(&["token"]).unwrap();

        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(store.get("token").unwrap(), None);
    }

    #[test]
    fn test_file_store_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = FileStore::new(&path);

        assert!(matches!(store.get("token"), Err(LedgerError::Storage { .. })));

        // Clearing recovers from a corrupt file
        store.clear(&["token", "adminInfo"]).unwrap();
        assert_eq!(store.get("token").unwrap(), None);
    }

    #[test]
    fn test_independent_handles_write_concurrently() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        // Separate handles share no lock, like two processes on one file
        let writers: Vec<_> = (0..8)
            .map(|i| {
                let path = path.clone();
                std::thread::spawn(move || {
                    let store = FileStore::new(&path);
                    let token = format!("token-{}", i);
                    for _ in 0..20 {
                        store.set(&[("token", token.as_str())])?;
                    }
                    Ok::<_, LedgerError>(())
                })
            })
            .collect();

        for writer in writers {
            writer.join().unwrap().unwrap();
        }

        let token = FileStore::new(&path).get("token").unwrap().unwrap();
        assert!(token.starts_with("token-"));
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path() != path)
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_clear_on_missing_file_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("never-written.json"));
        store.clear(&["token"]).unwrap();
        assert!(!store.path().exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("session.json"));
        store.set(&[("token", "secret")]).unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_memory_store_counts_writes() {
        let store = MemoryStore::with_entries(&[("token", "abc")]);
        assert_eq!(store.write_count(), 0);
        assert_eq!(store.get("token").unwrap().as_deref(), Some("abc"));

        store.clear(&["token"]).unwrap();
        assert_eq!(store.write_count(), 1);
        assert!(store.is_empty());
    }
}
