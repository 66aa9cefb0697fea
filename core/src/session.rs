//! Persisted session state.
//!
//! # Design
//! The authenticated user lives under a single key, `currentUser`, in a
//! key-value `Storage`. `SessionStore` owns the (de)serialization; the
//! storage only moves strings. API clients never reach for the store
//! directly: they receive a `SessionProvider` at construction time.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::RwLock;

use tracing::warn;

use crate::error::SessionError;
use crate::types::SessionUser;

pub const CURRENT_USER_KEY: &str = "currentUser";

/// String key-value storage, scoped to one client installation.
pub trait Storage: Send + Sync {
    fn get_item(&self, key: &str) -> io::Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> io::Result<()>;
    fn remove_item(&self, key: &str) -> io::Result<()>;
}

/// Process-local storage. Lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> io::Error {
    io::Error::other("storage lock poisoned")
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> io::Result<Option<String>> {
        let items = self.items.read().map_err(|_| poisoned())?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> io::Result<()> {
        let mut items = self.items.write().map_err(|_| poisoned())?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> io::Result<()> {
        let mut items = self.items.write().map_err(|_| poisoned())?;
        items.remove(key);
        Ok(())
    }
}

/// One file per key under `dir`. The directory is created on first write.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        // Replaced via rename; readers never see a partial value.
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, self.path_for(key))
    }

    fn remove_item(&self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// Supplies the identity attached to outgoing requests.
pub trait SessionProvider: Send + Sync {
    /// The authenticated user, or `None` when signed out.
    fn current(&self) -> Option<SessionUser>;
}

impl<T: SessionProvider + ?Sized> SessionProvider for std::sync::Arc<T> {
    fn current(&self) -> Option<SessionUser> {
        (**self).current()
    }
}

/// A fixed identity. Handy for tools and tests that never log in.
#[derive(Debug, Clone, Default)]
pub struct StaticSession(pub Option<SessionUser>);

impl StaticSession {
    pub fn signed_in(user: SessionUser) -> Self {
        Self(Some(user))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl SessionProvider for StaticSession {
    fn current(&self) -> Option<SessionUser> {
        self.0.clone()
    }
}

/// Reads and writes the current user in a `Storage`.
pub struct SessionStore<S> {
    storage: S,
}

impl<S: Storage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// `Ok(None)` when nothing is stored. A stored value that does not parse
    /// is reported as `SessionError::Corrupt`.
    pub fn get_current_user(&self) -> Result<Option<SessionUser>, SessionError> {
        match self.storage.get_item(CURRENT_USER_KEY)? {
            None => Ok(None),
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        }
    }

    /// Replace the stored user.
    pub fn save_current_user(&self, user: &SessionUser) -> Result<(), SessionError> {
        let raw = serde_json::to_string(user)?;
        self.storage.set_item(CURRENT_USER_KEY, &raw)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        self.storage.remove_item(CURRENT_USER_KEY)?;
        Ok(())
    }
}

impl<S: Storage> SessionProvider for SessionStore<S> {
    fn current(&self) -> Option<SessionUser> {
        match self.get_current_user() {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "ignoring unreadable session");
                None
            }
        }
    }
}
