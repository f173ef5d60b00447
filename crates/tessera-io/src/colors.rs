//! Favorite and recently used colors.
//!
//! Favorites are keyed by color. Adding a color that is already a
//! favorite bumps its usage count and last-used time instead of
//! inserting a duplicate. Recents are an append-only log, newest first,
//! trimmed to [`LibraryConfig::recents_cap`] after every insert.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tessera_canvas::Color;

use crate::clock::Clock;
use crate::config::LibraryConfig;
use crate::error::StoreError;
use crate::storage::{Storage, read_json, write_json};

/// A favorited color and how often it was re-added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteColor {
    /// The color.
    pub color: Color,
    /// Times the color was added, starting at 1.
    pub usage_count: u32,
    /// Last add, ms since the Unix epoch.
    pub last_used_ms: u64,
}

/// One entry of the recent-color log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentColor {
    /// The color.
    pub color: Color,
    /// When it was used, ms since the Unix epoch.
    pub used_at_ms: u64,
    /// Artwork the color was used on, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artwork_id: Option<String>,
}

/// Favorites and recents.
pub trait ColorHistory: Send + Sync {
    /// Add `color` to favorites, or bump it if already present.
    /// Returns the updated entry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn add_favorite(&self, color: Color) -> Result<FavoriteColor, StoreError>;

    /// Remove `color` from favorites. Returns `true` if it was present.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn remove_favorite(&self, color: Color) -> Result<bool, StoreError>;

    /// Favorites by usage count, then most recently used.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn favorites(&self) -> Result<Vec<FavoriteColor>, StoreError>;

    /// Number of favorites.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn favorite_count(&self) -> Result<usize, StoreError> {
        Ok(self.favorites()?.len())
    }

    /// Log a use of `color`, optionally on a specific artwork.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn record_recent(&self, color: Color, artwork_id: Option<&str>) -> Result<(), StoreError>;

    /// Up to `limit` most recent uses, newest first. `None` uses the
    /// configured default limit.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn recents(&self, limit: Option<usize>) -> Result<Vec<RecentColor>, StoreError>;

    /// Every logged use on `artwork_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn recents_for(&self, artwork_id: &str) -> Result<Vec<RecentColor>, StoreError>;

    /// Empty the recent-color log.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn clear_recents(&self) -> Result<(), StoreError>;
}

const FAVORITES_KEY: &str = "favorites";
const RECENTS_KEY: &str = "recents";

/// [`ColorHistory`] with favorites and recents as two JSON documents.
///
/// Read-modify-write cycles are not locked; route concurrent writers
/// through the [`WriteQueue`](crate::writer::WriteQueue).
#[derive(Clone)]
pub struct StoredColorHistory {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    config: LibraryConfig,
}

impl StoredColorHistory {
    /// Persist through `storage`, stamping entries with `clock`.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>, config: LibraryConfig) -> Self {
        Self {
            storage,
            clock,
            config,
        }
    }

    fn load_favorites(&self) -> Result<Vec<FavoriteColor>, StoreError> {
        Ok(read_json(self.storage.as_ref(), FAVORITES_KEY)?.unwrap_or_default())
    }

    fn load_recents(&self) -> Result<Vec<RecentColor>, StoreError> {
        Ok(read_json(self.storage.as_ref(), RECENTS_KEY)?.unwrap_or_default())
    }
}

impl ColorHistory for StoredColorHistory {
    fn add_favorite(&self, color: Color) -> Result<FavoriteColor, StoreError> {
        let mut favorites = self.load_favorites()?;
        let now = self.clock.now_ms();
        let entry = if let Some(existing) = favorites.iter_mut().find(|f| f.color == color) {
            existing.usage_count = existing.usage_count.saturating_add(1);
            existing.last_used_ms = now;
            *existing
        } else {
            let fresh = FavoriteColor {
                color,
                usage_count: 1,
                last_used_ms: now,
            };
            favorites.push(fresh);
            fresh
        };
        write_json(self.storage.as_ref(), FAVORITES_KEY, &favorites)?;
        Ok(entry)
    }

    fn remove_favorite(&self, color: Color) -> Result<bool, StoreError> {
        let mut favorites = self.load_favorites()?;
        let before = favorites.len();
        favorites.retain(|f| f.color != color);
        if favorites.len() == before {
            return Ok(false);
        }
        write_json(self.storage.as_ref(), FAVORITES_KEY, &favorites)?;
        Ok(true)
    }

    fn favorites(&self) -> Result<Vec<FavoriteColor>, StoreError> {
        let mut favorites = self.load_favorites()?;
        favorites.sort_by(|a, b| {
            b.usage_count
                .cmp(&a.usage_count)
                .then(b.last_used_ms.cmp(&a.last_used_ms))
        });
        Ok(favorites)
    }

    fn record_recent(&self, color: Color, artwork_id: Option<&str>) -> Result<(), StoreError> {
        let mut recents = self.load_recents()?;
        recents.insert(
            0,
            RecentColor {
                color,
                used_at_ms: self.clock.now_ms(),
                artwork_id: artwork_id.map(str::to_owned),
            },
        );
        recents.truncate(self.config.recents_cap);
        write_json(self.storage.as_ref(), RECENTS_KEY, &recents)
    }

    fn recents(&self, limit: Option<usize>) -> Result<Vec<RecentColor>, StoreError> {
        let mut recents = self.load_recents()?;
        recents.truncate(limit.unwrap_or(self.config.recents_limit));
        Ok(recents)
    }

    fn recents_for(&self, artwork_id: &str) -> Result<Vec<RecentColor>, StoreError> {
        let mut recents = self.load_recents()?;
        recents.retain(|r| r.artwork_id.as_deref() == Some(artwork_id));
        Ok(recents)
    }

    fn clear_recents(&self) -> Result<(), StoreError> {
        self.storage.remove(RECENTS_KEY).map(drop)
    }
}
