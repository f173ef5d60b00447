//! Read-only snapshot of the color picker.
//!
//! The picker shows palettes, favorites, recents and the premium flag
//! together. [`combine`] merges already-fetched values into one
//! [`ColorPanel`] without touching any store; [`load_panel`] fetches
//! them, falling back to empty collections and "not premium" on any
//! store failure.

use serde::Serialize;
use tessera_canvas::Color;

use crate::colors::{ColorHistory, FavoriteColor, RecentColor};
use crate::entitlements::{Entitlements, premium_status};
use crate::palettes::{Palette, PaletteStore};

/// Everything the color picker renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorPanel {
    /// Palettes in display order.
    pub palettes: Vec<Palette>,
    /// Favorite colors, most used first.
    pub favorites: Vec<Color>,
    /// Recently used colors, newest first, without repeats.
    pub recents: Vec<Color>,
    /// Premium content is unlocked.
    pub premium: bool,
    /// The brush color.
    pub active: Color,
    /// The brush color is among the favorites.
    pub active_is_favorite: bool,
}

/// Merge fetched values into a [`ColorPanel`].
#[must_use]
pub fn combine(
    palettes: Vec<Palette>,
    favorites: &[FavoriteColor],
    recents: &[RecentColor],
    premium: bool,
    active: Color,
) -> ColorPanel {
    let favorites: Vec<Color> = favorites.iter().map(|f| f.color).collect();
    let mut seen = Vec::with_capacity(recents.len());
    for r in recents {
        if !seen.contains(&r.color) {
            seen.push(r.color);
        }
    }
    ColorPanel {
        palettes,
        active_is_favorite: favorites.contains(&active),
        favorites,
        recents: seen,
        premium,
        active,
    }
}

/// Fetch everything and [`combine`] it.
#[must_use]
pub fn load_panel(
    palettes: &dyn PaletteStore,
    colors: &dyn ColorHistory,
    entitlements: &dyn Entitlements,
    active: Color,
) -> ColorPanel {
    let palettes = palettes.list().unwrap_or_else(|e| {
        log::warn!("failed to list palettes: {e}");
        Vec::new()
    });
    let favorites = colors.favorites().unwrap_or_else(|e| {
        log::warn!("failed to list favorite colors: {e}");
        Vec::new()
    });
    let recents = colors.recents(None).unwrap_or_else(|e| {
        log::warn!("failed to list recent colors: {e}");
        Vec::new()
    });
    combine(
        palettes,
        &favorites,
        &recents,
        premium_status(entitlements),
        active,
    )
}
