//! Per-artwork progress and saved paint.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tessera_canvas::{Color, PaintState, Progress, RegionId};

use crate::error::StoreError;
use crate::storage::{Storage, read_json, write_json};

/// Everything saved for one artwork.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    /// Artwork this record belongs to.
    pub artwork_id: String,
    /// Number of regions when last saved.
    pub total_regions: usize,
    /// Paint-order indices of filled regions.
    pub completed: BTreeSet<usize>,
    /// Completion percentage, `0..=100`.
    pub percentage: u8,
    /// Region identity → user fill.
    pub fills: BTreeMap<RegionId, Color>,
    /// When the record was written, ms since the Unix epoch.
    pub last_updated_ms: u64,
}

impl ProgressRecord {
    /// Snapshot `progress` and the fills of `paint`.
    #[must_use]
    pub fn new(
        artwork_id: impl Into<String>,
        progress: Progress,
        paint: &PaintState,
        now_ms: u64,
    ) -> Self {
        Self {
            artwork_id: artwork_id.into(),
            total_regions: progress.total_regions,
            completed: progress.completed,
            percentage: progress.percentage,
            fills: paint.fills().clone(),
            last_updated_ms: now_ms,
        }
    }

    /// The saved fills as a fresh [`PaintState`] with the default brush.
    #[must_use]
    pub fn paint_state(&self) -> PaintState {
        PaintState::with_fills(self.fills.clone())
    }
}

/// Progress persistence keyed by artwork id. Last write wins.
pub trait ProgressStore: Send + Sync {
    /// The saved record for `artwork_id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails or the record is
    /// corrupt.
    fn load(&self, artwork_id: &str) -> Result<Option<ProgressRecord>, StoreError>;

    /// Create or replace the record for `record.artwork_id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn save(&self, record: &ProgressRecord) -> Result<(), StoreError>;

    /// Forget the record for `artwork_id`. Returns `true` if it existed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn remove(&self, artwork_id: &str) -> Result<bool, StoreError>;

    /// Every saved record, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn all(&self) -> Result<Vec<ProgressRecord>, StoreError>;
}

const KEY_PREFIX: &str = "progress-";

/// [`ProgressStore`] with one JSON document per artwork.
#[derive(Clone)]
pub struct StoredProgress {
    storage: Arc<dyn Storage>,
}

impl StoredProgress {
    /// Persist through `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Storage key for `artwork_id`.
    ///
    /// ASCII alphanumerics, `_` and `-` pass through; every other byte
    /// becomes `.XX` (uppercase hex), so any id maps to a distinct valid
    /// key.
    fn key(artwork_id: &str) -> String {
        let mut key = String::with_capacity(KEY_PREFIX.len() + artwork_id.len());
        key.push_str(KEY_PREFIX);
        for b in artwork_id.bytes() {
            if b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-') {
                key.push(char::from(b));
            } else {
                key.push_str(&format!(".{b:02X}"));
            }
        }
        key
    }
}

impl ProgressStore for StoredProgress {
    fn load(&self, artwork_id: &str) -> Result<Option<ProgressRecord>, StoreError> {
        read_json(self.storage.as_ref(), &Self::key(artwork_id))
    }

    fn save(&self, record: &ProgressRecord) -> Result<(), StoreError> {
        write_json(self.storage.as_ref(), &Self::key(&record.artwork_id), record)
    }

    fn remove(&self, artwork_id: &str) -> Result<bool, StoreError> {
        self.storage.remove(&Self::key(artwork_id))
    }

    fn all(&self) -> Result<Vec<ProgressRecord>, StoreError> {
        let mut records = Vec::new();
        for key in self.storage.keys(KEY_PREFIX)? {
            if let Some(record) = read_json::<ProgressRecord>(self.storage.as_ref(), &key)? {
                records.push(record);
            }
        }
        records.sort_by(|a, b| b.last_updated_ms.cmp(&a.last_updated_ms));
        Ok(records)
    }
}
