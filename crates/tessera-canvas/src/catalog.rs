//! Artwork catalog: categories, entries, and premium gating.
//!
//! Premium entries are still ordinary artwork at the geometry layer; the
//! gate is applied when choosing what may be opened, via
//! [`Catalog::is_locked`].

use serde::{Deserialize, Serialize};

/// Category reserved for user-imported photos, which never lists
/// catalog artwork.
pub const USER_PHOTOS_CATEGORY: &str = "user_photos";

/// How hard an artwork is to complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Difficulty {
    /// Few, large regions.
    Easy,
    /// The default.
    #[default]
    Medium,
    /// Many small regions.
    Hard,
}

impl Difficulty {
    /// Star rating shown next to the artwork (1..=3).
    #[must_use]
    pub const fn rating(self) -> u8 {
        match self {
            Self::Easy => 1,
            Self::Medium => 2,
            Self::Hard => 3,
        }
    }
}

/// A gallery grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Stable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// One artwork offered in the gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Stable identifier, also the progress key.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Owning [`Category::id`].
    pub category_id: String,
    /// Difficulty rating.
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Number of distinct colors the artwork is designed for.
    pub color_count: u32,
    /// Requires a premium entitlement to open.
    #[serde(default)]
    pub is_premium: bool,
    /// Asset-store key of the segmentation document.
    pub asset: String,
}

/// Categories and artwork entries.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Catalog {
    categories: Vec<Category>,
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Create a catalog from parts.
    #[must_use]
    pub const fn new(categories: Vec<Category>, entries: Vec<CatalogEntry>) -> Self {
        Self {
            categories,
            entries,
        }
    }

    /// The catalog shipped with the application.
    #[must_use]
    pub fn builtin() -> Self {
        let category = |id: &str, name: &str| Category {
            id: id.into(),
            name: name.into(),
        };
        let entry = |id: &str,
                     title: &str,
                     category_id: &str,
                     difficulty: Difficulty,
                     color_count: u32,
                     is_premium: bool,
                     asset: &str| CatalogEntry {
            id: id.into(),
            title: title.into(),
            category_id: category_id.into(),
            difficulty,
            color_count,
            is_premium,
            asset: asset.into(),
        };
        Self::new(
            vec![
                category("animals", "Animals"),
                category("gardens", "Gardens"),
                category("fantasy", "Fantasy Scenes"),
                category("mandalas", "Mandalas"),
                category("crystals", "Crystals / Moonstones"),
            ],
            vec![
                entry("art_001", "Mystic Fox", "animals", Difficulty::Medium, 8, false, "fox"),
                entry("art_002", "Crystal Garden", "crystals", Difficulty::Hard, 12, true, "garden_seg"),
                entry("art_003", "Zenith Bloom", "mandalas", Difficulty::Easy, 6, false, "mandala_seg"),
                entry("art_004", "Starlight Spire", "fantasy", Difficulty::Hard, 15, true, "spire_seg"),
            ],
        )
    }

    /// All categories in display order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Look up a category.
    #[must_use]
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Entries in a category. The user-photo category is always empty.
    pub fn by_category<'a>(&'a self, category_id: &'a str) -> impl Iterator<Item = &'a CatalogEntry> {
        let listed = category_id != USER_PHOTOS_CATEGORY;
        self.entries
            .iter()
            .filter(move |e| listed && e.category_id == category_id)
    }

    /// Look up an entry.
    #[must_use]
    pub fn entry(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Whether `entry` may not be opened without premium.
    #[must_use]
    pub const fn is_locked(entry: &CatalogEntry, premium: bool) -> bool {
        entry.is_premium && !premium
    }
}
