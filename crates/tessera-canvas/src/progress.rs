//! Completion progress of one artwork.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::paint::PaintState;
use crate::segmentation::Artwork;

/// How much of an artwork has been painted.
///
/// `completed` holds paint-order indices of regions whose identity has a
/// user fill. Regions with an empty identity count toward the total but
/// can never complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Number of regions in the artwork.
    pub total_regions: usize,
    /// Paint-order indices of filled regions.
    pub completed: BTreeSet<usize>,
    /// `floor(completed / total × 100)`, or 0 for an empty artwork.
    pub percentage: u8,
}

impl Progress {
    /// Compute progress of `paint` against `artwork`.
    #[must_use]
    pub fn compute(artwork: &Artwork, paint: &PaintState) -> Self {
        let completed: BTreeSet<usize> = artwork
            .regions()
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.id().is_empty() && paint.fill(r.id().as_str()).is_some())
            .map(|(i, _)| i)
            .collect();
        let total_regions = artwork.len();
        Self {
            percentage: percentage(completed.len(), total_regions),
            total_regions,
            completed,
        }
    }

    /// Returns `true` once every region is filled.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total_regions > 0 && self.completed.len() == self.total_regions
    }
}

fn percentage(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = done.min(total) * 100 / total;
    u8::try_from(pct).unwrap_or(100)
}
