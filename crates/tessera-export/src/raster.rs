//! PNG export through the canvas view transform.
//!
//! Renders exactly what the paint screen shows for a given viewport,
//! zoom and pan: a white background, every region filled with its
//! resolved color, and black outlines whose width stays constant on
//! screen regardless of zoom.

use tiny_skia::{FillRule, LineJoin, Paint, Path, PathBuilder, Pixmap, Stroke, Transform};

use tessera_canvas::{Artwork, Color, PaintState, Region, ViewTransform, Viewport, ZoomPan};

/// Outline width in viewport pixels.
pub const OUTLINE_PX: f64 = 2.0;

/// Errors from raster export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The viewport cannot back a pixmap (zero or too large).
    #[error("cannot allocate a {width}x{height} pixmap")]
    Pixmap {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },

    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

/// Render painted artwork into a viewport-sized pixmap.
///
/// Returns `Ok(None)` when no view transform exists for `viewport`
/// (degenerate viewport or artwork size), matching the paint screen
/// drawing nothing in that state.
///
/// # Errors
///
/// Returns [`ExportError::Pixmap`] if the pixmap cannot be allocated.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn render(
    artwork: &Artwork,
    paint: &PaintState,
    default_fill: Color,
    viewport: Viewport,
    view: &ZoomPan,
) -> Result<Option<Pixmap>, ExportError> {
    let Some(transform) = ViewTransform::new(artwork.size(), viewport, view) else {
        return Ok(None);
    };
    let width = viewport.width.ceil() as u32;
    let height = viewport.height.ceil() as u32;
    let mut pixmap = Pixmap::new(width, height).ok_or(ExportError::Pixmap { width, height })?;
    pixmap.fill(tiny_skia::Color::WHITE);

    let ts = to_skia(&transform);
    // Stroke width is in artwork units; the transform scales it back to
    // OUTLINE_PX on screen.
    let stroke = Stroke {
        width: (OUTLINE_PX / transform.total_scale()) as f32,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };
    let mut outline = Paint::default();
    outline.set_color_rgba8(0, 0, 0, u8::MAX);
    outline.anti_alias = true;

    for region in artwork.regions() {
        let Some(path) = region_path(region) else {
            continue;
        };
        let fill = paint.color_for(region, default_fill);
        let mut brush = Paint::default();
        brush.set_color_rgba8(fill.red(), fill.green(), fill.blue(), fill.alpha());
        brush.anti_alias = true;
        pixmap.fill_path(&path, &brush, FillRule::EvenOdd, ts, None);
        pixmap.stroke_path(&path, &outline, &stroke, ts, None);
    }
    Ok(Some(pixmap))
}

/// Render and encode as PNG.
///
/// Returns `Ok(None)` under the same conditions as [`render`].
///
/// # Errors
///
/// Returns [`ExportError`] if the pixmap cannot be allocated or encoded.
pub fn to_png(
    artwork: &Artwork,
    paint: &PaintState,
    default_fill: Color,
    viewport: Viewport,
    view: &ZoomPan,
) -> Result<Option<Vec<u8>>, ExportError> {
    render(artwork, paint, default_fill, viewport, view)?
        .map(|pixmap| {
            pixmap
                .encode_png()
                .map_err(|e| ExportError::Encode(e.to_string()))
        })
        .transpose()
}

#[allow(clippy::cast_possible_truncation)]
fn to_skia(transform: &ViewTransform) -> Transform {
    let [sx, ky, kx, sy, tx, ty] = transform.affine();
    Transform::from_row(
        sx as f32, ky as f32, kx as f32, sy as f32, tx as f32, ty as f32,
    )
}

/// All subpaths of `region` as one closed tiny-skia path.
#[allow(clippy::cast_possible_truncation)]
fn region_path(region: &Region) -> Option<Path> {
    let mut pb = PathBuilder::new();
    for subpath in region.subpaths() {
        let Some((first, rest)) = subpath.points().split_first() else {
            continue;
        };
        pb.move_to(first.x as f32, first.y as f32);
        for p in rest {
            pb.line_to(p.x as f32, p.y as f32);
        }
        pb.close();
    }
    pb.finish()
}
