//! Segmentation asset lookup.
//!
//! Assets are addressed by name without the `.json` extension, matching
//! the [`CatalogEntry::asset`](tessera_canvas::CatalogEntry::asset) keys.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tessera_canvas::Artwork;

use crate::error::StoreError;

/// Read-only source of segmentation documents.
pub trait AssetStore: Send + Sync {
    /// Raw bytes of asset `name`, or `Ok(None)` if there is no such asset.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn load(&self, name: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Names of every available asset, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be listed.
    fn available(&self) -> Result<Vec<String>, StoreError>;
}

/// Load and decode asset `name`.
///
/// Every failure (missing asset, I/O error, malformed document) is
/// logged and reported as `None`; the caller keeps its previous state.
#[must_use]
pub fn load_artwork(store: &dyn AssetStore, name: &str) -> Option<Artwork> {
    let bytes = match store.load(name) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            log::warn!("segmentation asset {name:?} not found");
            return None;
        }
        Err(e) => {
            log::warn!("failed to read segmentation asset {name:?}: {e}");
            return None;
        }
    };
    match tessera_canvas::decode(&bytes) {
        Ok(artwork) => {
            log::debug!("loaded {name:?}: {} regions", artwork.len());
            Some(artwork)
        }
        Err(e) => {
            log::warn!("failed to decode segmentation asset {name:?}: {e}");
            None
        }
    }
}

/// Assets as `<root>/<name>.json` files.
#[derive(Debug, Clone)]
pub struct DirAssetStore {
    root: PathBuf,
}

impl DirAssetStore {
    /// Serve assets from `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The asset directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetStore for DirAssetStore {
    fn load(&self, name: &str) -> Result<Option<Vec<u8>>, StoreError> {
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(StoreError::InvalidKey(name.to_owned()));
        }
        match fs::read(self.root.join(format!("{name}.json"))) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn available(&self) -> Result<Vec<String>, StoreError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let name = entry?.file_name();
            if let Some(stem) = name.to_str().and_then(|n| n.strip_suffix(".json")) {
                names.push(stem.to_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Assets held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetStore {
    assets: BTreeMap<String, Vec<u8>>,
}

impl MemoryAssetStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace asset `name`.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(name, bytes);
        self
    }

    /// Add or replace asset `name`.
    pub fn insert(&mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.assets.insert(name.into(), bytes.into());
    }
}

impl AssetStore for MemoryAssetStore {
    fn load(&self, name: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.assets.get(name).cloned())
    }

    fn available(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.assets.keys().cloned().collect())
    }
}
