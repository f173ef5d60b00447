//! Named-document persistence.
//!
//! Every store in this crate persists through a [`Storage`]: a flat map
//! from key to JSON bytes. [`DirStorage`] keeps one `<key>.json` file per
//! document under a root directory; [`MemoryStorage`] keeps them in a
//! map for tests and ephemeral sessions.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StoreError;

/// Flat key → bytes document store.
pub trait Storage: Send + Sync {
    /// Read a document. `Ok(None)` if the key has never been written.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the key is invalid or the backend fails.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Create or replace a document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the key is invalid or the backend fails.
    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError>;

    /// Delete a document. Returns `true` if it existed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the key is invalid or the backend fails.
    fn remove(&self, key: &str) -> Result<bool, StoreError>;

    /// All keys starting with `prefix`, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be listed.
    fn keys(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}

/// Read and deserialize a JSON document.
///
/// # Errors
///
/// Propagates backend errors and returns [`StoreError::Json`] for a
/// document that does not match `T`.
pub fn read_json<T: DeserializeOwned>(
    storage: &dyn Storage,
    key: &str,
) -> Result<Option<T>, StoreError> {
    storage
        .read(key)?
        .map(|bytes| serde_json::from_slice(&bytes))
        .transpose()
        .map_err(StoreError::from)
}

/// Serialize and write a JSON document.
///
/// # Errors
///
/// Propagates backend and serialization errors.
pub fn write_json<T: Serialize + ?Sized>(
    storage: &dyn Storage,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(value)?;
    storage.write(key, &bytes)
}

/// Check that `key` is safe to use as a file stem.
///
/// Keys are non-empty, do not start with `.`, and contain only ASCII
/// alphanumerics, `_`, `-` and `.`.
///
/// # Errors
///
/// Returns [`StoreError::InvalidKey`] otherwise.
pub fn validate_key(key: &str) -> Result<(), StoreError> {
    let ok = !key.is_empty()
        && !key.starts_with('.')
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.'));
    if ok {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_owned()))
    }
}

/// Documents as `<root>/<key>.json` files.
#[derive(Debug, Clone)]
pub struct DirStorage {
    root: PathBuf,
}

impl DirStorage {
    /// Use `root`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl Storage for DirStorage {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match fs::read(self.path(key)?) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let path = self.path(key)?;
        // Write-then-rename so a crash never leaves a truncated document.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, StoreError> {
        match fs::remove_file(self.path(key)?) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let name = entry?.file_name();
            let Some(stem) = name.to_str().and_then(|n| n.strip_suffix(".json")) else {
                continue;
            };
            if stem.starts_with(prefix) && validate_key(stem).is_ok() {
                keys.push(stem.to_owned());
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// Documents in memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    docs: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    /// Empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn docs(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Vec<u8>>> {
        // A panicked writer cannot leave a half-written entry behind.
        self.docs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        validate_key(key)?;
        Ok(self.docs().get(key).cloned())
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        validate_key(key)?;
        self.docs().insert(key.to_owned(), bytes.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, StoreError> {
        validate_key(key)?;
        Ok(self.docs().remove(key).is_some())
    }

    fn keys(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .docs()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}
