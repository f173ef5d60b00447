//! Paint state: user-applied colors keyed by region identity.
//!
//! The active brush color is independent of the mapping; tapping a
//! region copies the brush into the mapping. Identities are not checked
//! against any loaded region set, so an entry for an unknown identity is
//! kept but never drawn.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::normalize::{Region, RegionId};
use crate::types::Color;

/// Region fills plus the active brush.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaintState {
    fills: BTreeMap<RegionId, Color>,
    active: Color,
}

impl PaintState {
    /// Brush color before the user picks one.
    pub const DEFAULT_BRUSH: Color = Color::BLACK;

    /// Empty mapping with the default brush.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fills: BTreeMap::new(),
            active: Self::DEFAULT_BRUSH,
        }
    }

    /// Restore a previously saved mapping with the default brush.
    #[must_use]
    pub const fn with_fills(fills: BTreeMap<RegionId, Color>) -> Self {
        Self {
            fills,
            active: Self::DEFAULT_BRUSH,
        }
    }

    /// The color the next tap will apply.
    #[must_use]
    pub const fn active_color(&self) -> Color {
        self.active
    }

    /// Set the brush color.
    pub const fn select_color(&mut self, color: Color) {
        self.active = color;
    }

    /// Fill `id` with the active brush.
    ///
    /// Returns `true` if the mapping changed. Tapping the empty identity
    /// or re-applying the same color is a no-op.
    pub fn tap_region(&mut self, id: &RegionId) -> bool {
        if id.is_empty() {
            return false;
        }
        if self.fills.get(id) == Some(&self.active) {
            return false;
        }
        self.fills.insert(id.clone(), self.active);
        true
    }

    /// Remove every fill. The brush color is kept.
    pub fn clear(&mut self) {
        self.fills.clear();
    }

    /// The user-applied color for `id`, if any.
    #[must_use]
    pub fn fill(&self, id: &str) -> Option<Color> {
        self.fills.get(id).copied()
    }

    /// All user-applied fills.
    #[must_use]
    pub const fn fills(&self) -> &BTreeMap<RegionId, Color> {
        &self.fills
    }

    /// Returns `true` if no region has been filled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fills.is_empty()
    }

    /// The color to draw `region` with: user fill, then the asset's hint,
    /// then `fallback`.
    #[must_use]
    pub fn color_for(&self, region: &Region, fallback: Color) -> Color {
        self.fill(region.id().as_str())
            .or_else(|| region.fill_hint_color())
            .unwrap_or(fallback)
    }
}

impl Default for PaintState {
    fn default() -> Self {
        Self::new()
    }
}
