//! tessera-canvas: Region geometry, view transform, hit testing, and
//! paint state for coloring-book artwork (sans-IO).
//!
//! A tap on the paint canvas flows through:
//! viewport point -> inverse view transform -> artwork point ->
//! topmost containing region -> paint state update.
//!
//! This crate has **no I/O dependencies** -- segmentation assets are
//! decoded from in-memory byte slices and every operation is a pure
//! function or a method on a plain value. Asset storage, persistence,
//! and background loading live in `tessera-io`.

pub mod catalog;
pub mod hit;
pub mod normalize;
pub mod paint;
pub mod progress;
pub mod segmentation;
pub mod transform;
pub mod types;

pub use catalog::{Catalog, CatalogEntry, Category, Difficulty};
pub use hit::{region_at, region_at_screen};
pub use normalize::{Region, RegionId, Subpath};
pub use paint::PaintState;
pub use progress::Progress;
pub use segmentation::{Artwork, decode, decode_str};
pub use transform::{ViewTransform, ZoomLimits, ZoomPan};
pub use types::{ArtworkSize, CanvasConfig, Color, Point, SegmentationError, Viewport};

/// A tap that landed on a region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapHit {
    /// The topmost region under the tap.
    pub region: RegionId,
    /// Whether the region's fill changed. `false` when it already had
    /// the active color.
    pub changed: bool,
}

/// Handle one tap on the canvas.
///
/// Returns `None` (and leaves `paint` untouched) when nothing is under
/// the point.
///
/// # Pipeline steps
///
/// 1. Guard: no transform means the viewport or artwork is not ready
/// 2. Map the viewport point into artwork space
/// 3. Round and hit test regions in reverse paint order
/// 4. Fill the hit region with the active brush color
pub fn tap(
    screen: Point,
    transform: Option<&ViewTransform>,
    artwork: &Artwork,
    paint: &mut PaintState,
) -> Option<TapHit> {
    // 1-3. Guard, inverse transform, hit test.
    let region = region_at_screen(screen, transform, artwork)?.clone();

    // 4. Paint.
    let changed = paint.tap_region(&region);
    if changed {
        log::debug!("filled region {region} with {}", paint.active_color());
    }
    Some(TapHit { region, changed })
}
