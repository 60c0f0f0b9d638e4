// mangrove-client/src/session/store.rs
// 凭证存储 - 支持 JSON 文件存储

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Persisted bearer credential
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCredential {
    /// Opaque bearer token issued by the backend on login
    pub token: String,
    /// Unix timestamp of when the credential was saved
    pub saved_at: i64,
}

impl StoredCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            saved_at: Utc::now().timestamp(),
        }
    }
}

/// Durable key-value store for the session credential
///
/// Written on login, read on startup for session restore, cleared on
/// logout. Load failures are treated as "no credential" so a corrupt file
/// can never block startup.
pub trait CredentialStore: Send + Sync + fmt::Debug {
    /// Load the persisted credential, if any
    fn load(&self) -> Option<StoredCredential>;

    /// Persist the credential
    fn save(&self, credential: &StoredCredential) -> std::io::Result<()>;

    /// Remove the persisted credential (no-op when absent)
    fn clear(&self) -> std::io::Result<()>;
}

/// File-backed credential store
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Create a store writing `base_path/filename`
    pub fn new(base_path: impl Into<PathBuf>, filename: &str) -> Self {
        let path = base_path.into().join(filename);
        Self { path }
    }

    /// Get the backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_dir(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Option<StoredCredential> {
        if !self.path.exists() {
            return None;
        }
        let json = fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&json).ok()
    }

    fn save(&self, credential: &StoredCredential) -> std::io::Result<()> {
        self.ensure_dir()?;
        let json = serde_json::to_string_pretty(credential)?;
        fs::write(&self.path, json)
    }

    fn clear(&self) -> std::io::Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// In-memory credential store (tests and credential-less configurations)
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    inner: Mutex<Option<StoredCredential>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoryCredentialStore {
    // A poisoned lock only means another thread panicked mid-access; the
    // slot itself is always a valid Option
    fn slot(&self) -> std::sync::MutexGuard<'_, Option<StoredCredential>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Option<StoredCredential> {
        self.slot().clone()
    }

    fn save(&self, credential: &StoredCredential) -> std::io::Result<()> {
        *self.slot() = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> std::io::Result<()> {
        *self.slot() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileCredentialStore::new(temp_dir.path(), "session.json");

        assert!(store.load().is_none());

        let credential = StoredCredential::new("opaque-bearer");
        store.save(&credential).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.token, "opaque-bearer");
        assert_eq!(loaded.saved_at, credential.saved_at);

        store.clear().unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_file_store_clear_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileCredentialStore::new(temp_dir.path(), "session.json");
        store.clear().unwrap();
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_corrupt_file_loads_as_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileCredentialStore::new(temp_dir.path(), "session.json");
        std::fs::write(store.path(), "not json at all").unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_file_store_creates_missing_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("work").join("auth");
        let store = FileCredentialStore::new(&nested, "session.json");
        store.save(&StoredCredential::new("t")).unwrap();
        assert!(store.load().is_some());
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryCredentialStore::new();
        assert!(store.load().is_none());

        store.save(&StoredCredential::new("tok")).unwrap();
        assert_eq!(store.load().unwrap().token, "tok");

        store.clear().unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_memory_store_survives_poisoned_lock() {
        let store = std::sync::Arc::new(MemoryCredentialStore::new());

        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.inner.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        // Reads and writes keep working after the panic
        store.save(&StoredCredential::new("tok")).unwrap();
        assert_eq!(store.load().unwrap().token, "tok");
        store.clear().unwrap();
        assert!(store.load().is_none());
    }
}
