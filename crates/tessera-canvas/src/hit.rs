//! Hit testing: which region is under a point.
//!
//! Regions are tested in reverse paint order so that the region drawn
//! on top wins where outlines overlap. Each subpath of a region is
//! tested independently; a region is hit if any of its subpaths contains
//! the point.
//!
//! The query point is rounded to the nearest integer artwork unit before
//! testing (halves to even, not truncation). Points exactly on an edge are
//! never contained, so results are deterministic for a given point and
//! region set.

use crate::normalize::{Region, RegionId};
use crate::segmentation::Artwork;
use crate::transform::ViewTransform;
use crate::types::Point;

/// Find the topmost region containing `point` (artwork space).
///
/// Regions with an empty identity are skipped: they can be drawn but
/// never tapped.
#[must_use]
pub fn region_at(point: Point, regions: &[Region]) -> Option<&RegionId> {
    if !point.is_finite() {
        return None;
    }
    let at = point.rounded();
    regions
        .iter()
        .rev()
        .find(|region| !region.id().is_empty() && region.contains(at))
        .map(Region::id)
}

/// Map a viewport point through `transform` and hit test the artwork.
///
/// Returns `None` when no transform is available yet (viewport not laid
/// out or artwork not loaded), or nothing is under the point.
#[must_use]
pub fn region_at_screen<'a>(
    screen: Point,
    transform: Option<&ViewTransform>,
    artwork: &'a Artwork,
) -> Option<&'a RegionId> {
    let transform = transform?;
    region_at(transform.to_artwork(screen), artwork.regions())
}
