//! Named color palettes.
//!
//! Five built-in palettes are seeded the first time the store is found
//! empty. Users can add their own; listing always shows the built-in
//! ones first, then custom palettes newest first.

use std::cmp::Ordering;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tessera_canvas::Color;

use crate::clock::Clock;
use crate::error::StoreError;
use crate::storage::{Storage, read_json, write_json};

/// A named, ordered list of colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    /// Store-assigned identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Colors in display order.
    pub colors: Vec<Color>,
    /// Seeded by the application rather than created by the user.
    pub is_default: bool,
    /// Creation time, ms since the Unix epoch.
    pub created_ms: u64,
}

/// CRUD over palettes.
pub trait PaletteStore: Send + Sync {
    /// Every palette: defaults first in seeding order, then custom
    /// palettes newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn list(&self) -> Result<Vec<Palette>, StoreError>;

    /// Look up one palette.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn get(&self, id: u64) -> Result<Option<Palette>, StoreError>;

    /// Add a palette and return it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn create(&self, name: &str, colors: Vec<Color>, is_default: bool)
    -> Result<Palette, StoreError>;

    /// Replace the name and colors of an existing palette.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if `palette.id` does not exist.
    fn update(&self, palette: &Palette) -> Result<(), StoreError>;

    /// Delete a palette. Returns `true` if it existed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn delete(&self, id: u64) -> Result<bool, StoreError>;

    /// Insert the built-in palettes if the store is empty. Returns `true`
    /// if anything was inserted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend fails.
    fn seed_defaults(&self) -> Result<bool, StoreError>;
}

/// The built-in palettes, in seeding order.
#[must_use]
pub fn default_palettes() -> Vec<(&'static str, Vec<Color>)> {
    let rgb = |hex: &[&str]| hex.iter().filter_map(|h| Color::parse_hex(h)).collect::<Vec<_>>();
    vec![
        (
            "Basic Colors",
            rgb(&[
                "FF0000", "0000FF", "00FF00", "FFFF00",
                "FFA500", "FF00FF", "000000", "FFFFFF",
            ]),
        ),
        (
            "Pastels",
            rgb(&[
                "FFB3BA", "FFDFBA", "FFFFBA", "BAFFC9",
                "BAE1FF", "D4BAFF", "FFBAE8", "F0F0F0",
            ]),
        ),
        (
            "Earth Tones",
            rgb(&[
                "8B4513", "D2691E", "CD853F", "DEB887",
                "9ACD32", "556B2F", "8FBC8F", "2F4F4F",
            ]),
        ),
        (
            "Ocean",
            rgb(&[
                "000080", "0000CD", "1E90FF", "00BFFF",
                "87CEEB", "40E0D0", "00CED1", "20B2AA",
            ]),
        ),
        (
            "Vibrant",
            rgb(&[
                "FF1493", "FF4500", "FFD700", "7FFF00",
                "00FF7F", "00FFFF", "8A2BE2", "FF00FF",
            ]),
        ),
    ]
}

const KEY: &str = "palettes";

#[derive(Debug, Default, Serialize, Deserialize)]
struct PaletteDoc {
    next_id: u64,
    palettes: Vec<Palette>,
}

/// [`PaletteStore`] keeping every palette in one JSON document.
#[derive(Clone)]
pub struct StoredPalettes {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
}

impl StoredPalettes {
    /// Persist through `storage`, stamping new palettes with `clock`.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    fn doc(&self) -> Result<PaletteDoc, StoreError> {
        Ok(read_json(self.storage.as_ref(), KEY)?.unwrap_or_default())
    }

    fn save(&self, doc: &PaletteDoc) -> Result<(), StoreError> {
        write_json(self.storage.as_ref(), KEY, doc)
    }

    fn push(&self, doc: &mut PaletteDoc, name: &str, colors: Vec<Color>, is_default: bool) -> Palette {
        doc.next_id += 1;
        let palette = Palette {
            id: doc.next_id,
            name: name.to_owned(),
            colors,
            is_default,
            created_ms: self.clock.now_ms(),
        };
        doc.palettes.push(palette.clone());
        palette
    }
}

impl PaletteStore for StoredPalettes {
    fn list(&self) -> Result<Vec<Palette>, StoreError> {
        let mut palettes = self.doc()?.palettes;
        palettes.sort_by(|a, b| match (a.is_default, b.is_default) {
            (true, true) => a.id.cmp(&b.id),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => b.created_ms.cmp(&a.created_ms).then(b.id.cmp(&a.id)),
        });
        Ok(palettes)
    }

    fn get(&self, id: u64) -> Result<Option<Palette>, StoreError> {
        Ok(self.doc()?.palettes.into_iter().find(|p| p.id == id))
    }

    fn create(
        &self,
        name: &str,
        colors: Vec<Color>,
        is_default: bool,
    ) -> Result<Palette, StoreError> {
        let mut doc = self.doc()?;
        let palette = self.push(&mut doc, name, colors, is_default);
        self.save(&doc)?;
        Ok(palette)
    }

    fn update(&self, palette: &Palette) -> Result<(), StoreError> {
        let mut doc = self.doc()?;
        let slot = doc
            .palettes
            .iter_mut()
            .find(|p| p.id == palette.id)
            .ok_or_else(|| StoreError::NotFound(format!("palette {}", palette.id)))?;
        slot.name.clone_from(&palette.name);
        slot.colors.clone_from(&palette.colors);
        self.save(&doc)
    }

    fn delete(&self, id: u64) -> Result<bool, StoreError> {
        let mut doc = self.doc()?;
        let before = doc.palettes.len();
        doc.palettes.retain(|p| p.id != id);
        if doc.palettes.len() == before {
            return Ok(false);
        }
        self.save(&doc)?;
        Ok(true)
    }

    fn seed_defaults(&self) -> Result<bool, StoreError> {
        let mut doc = self.doc()?;
        if !doc.palettes.is_empty() {
            return Ok(false);
        }
        for (name, colors) in default_palettes() {
            self.push(&mut doc, name, colors, true);
        }
        self.save(&doc)?;
        log::info!("seeded {} default palettes", doc.palettes.len());
        Ok(true)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::MemoryStorage;

    fn store() -> StoredPalettes {
        StoredPalettes::new(Arc::new(MemoryStorage::new()), Arc::new(ManualClock::new(1_000, 1)))
    }

    #[test]
    fn defaults_have_eight_opaque_colors() {
        let defaults = default_palettes();
        assert_eq!(defaults.len(), 5);
        for (_, colors) in &defaults {
            assert_eq!(colors.len(), 8);
            assert!(colors.iter().all(|c| c.alpha() == 0xFF));
        }
        assert_eq!(defaults[0].1[4], Color::parse_hex("#FFA500").unwrap());
    }

    #[test]
    fn seeding_is_idempotent() {
        let s = store();
        assert!(s.seed_defaults().unwrap());
        assert!(!s.seed_defaults().unwrap());
        assert_eq!(s.list().unwrap().len(), 5);
    }

    #[test]
    fn seeding_skips_non_empty_store() {
        let s = store();
        s.create("Mine", vec![Color::BLACK], false).unwrap();
        assert!(!s.seed_defaults().unwrap());
        assert_eq!(s.list().unwrap().len(), 1);
    }

    #[test]
    fn list_orders_defaults_then_newest() {
        let s = store();
        s.seed_defaults().unwrap();
        let older = s.create("Older", vec![], false).unwrap();
        let newer = s.create("Newer", vec![], false).unwrap();
        let names: Vec<String> = s.list().unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names[0], "Basic Colors");
        assert_eq!(names[4], "Vibrant");
        assert_eq!(names[5], newer.name);
        assert_eq!(names[6], older.name);
    }

    #[test]
    fn update_and_delete() {
        let s = store();
        let mut p = s.create("Draft", vec![Color::BLACK], false).unwrap();
        p.name = "Final".into();
        p.colors.push(Color::WHITE);
        s.update(&p).unwrap();
        let back = s.get(p.id).unwrap().unwrap();
        assert_eq!(back.name, "Final");
        assert_eq!(back.colors.len(), 2);

        assert!(s.delete(p.id).unwrap());
        assert!(!s.delete(p.id).unwrap());
        assert!(matches!(s.update(&p), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn ids_are_not_reused() {
        let s = store();
        let a = s.create("a", vec![], false).unwrap();
        s.delete(a.id).unwrap();
        let b = s.create("b", vec![], false).unwrap();
        assert!(b.id > a.id);
    }
}
