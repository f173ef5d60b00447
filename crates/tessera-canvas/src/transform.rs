//! Artwork-to-viewport coordinate transform and pan/zoom gesture state.
//!
//! The artwork is drawn centered in the viewport, uniformly scaled to
//! fit, then magnified by the user's zoom and shifted by the pan offset:
//!
//! ```text
//! fit_scale   = min(viewport_w / artwork_w, viewport_h / artwork_h)
//! total_scale = fit_scale × zoom
//! screen      = viewport_center + pan + (artwork − artwork_center) × total_scale
//! artwork     = (screen − viewport_center − pan) / total_scale + artwork_center
//! ```
//!
//! The inverse is exact up to floating-point rounding, so a point drawn
//! at some screen location hit-tests back to the artwork point it came
//! from.
//!
//! [`ViewTransform`] is derived and never persisted: it is recomputed
//! whenever the viewport, zoom or pan changes. It cannot be built until
//! both the viewport and the artwork size are known and non-degenerate,
//! which is how drawing and hit testing no-op before the first load.

use serde::{Deserialize, Serialize};

use crate::types::{ArtworkSize, Point, Viewport};

/// Inclusive bounds for the user zoom factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLimits {
    min: f64,
    max: f64,
}

impl ZoomLimits {
    /// Create limits, swapping inverted bounds and replacing non-finite
    /// or non-positive ones with the 1x..5x defaults.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        let sane = |v: f64, fallback: f64| if v.is_finite() && v > 0.0 { v } else { fallback };
        let a = sane(min, 1.0);
        let b = sane(max, 5.0);
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Smallest allowed zoom.
    #[must_use]
    pub const fn min(self) -> f64 {
        self.min
    }

    /// Largest allowed zoom.
    #[must_use]
    pub const fn max(self) -> f64 {
        self.max
    }

    /// Clamp `zoom` into range. NaN clamps to the minimum.
    #[must_use]
    pub fn clamp(self, zoom: f64) -> f64 {
        if zoom.is_nan() {
            return self.min;
        }
        zoom.max(self.min).min(self.max)
    }
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self::new(1.0, 5.0)
    }
}

/// User-controlled zoom and pan, updated by pinch and drag gestures.
///
/// Invariants maintained by every mutator:
/// - `zoom` stays within the configured [`ZoomLimits`];
/// - at minimum zoom the pan offset is exactly zero;
/// - each pan axis stays within `±artwork_extent × (zoom − 1) / 2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomPan {
    zoom: f64,
    pan: Point,
}

impl ZoomPan {
    /// Unzoomed, centered view.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            zoom: 1.0,
            pan: Point::ZERO,
        }
    }

    /// Unzoomed view at the given limits' minimum.
    #[must_use]
    pub const fn at_min(limits: ZoomLimits) -> Self {
        Self {
            zoom: limits.min,
            pan: Point::ZERO,
        }
    }

    /// Current zoom factor.
    #[must_use]
    pub const fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Current pan offset in viewport pixels.
    #[must_use]
    pub const fn pan(&self) -> Point {
        self.pan
    }

    /// Apply one transform-gesture event.
    ///
    /// `zoom_change` multiplies the current zoom (pinch ratio, 1.0 for a
    /// pure drag). `pan_delta` is the drag translation in viewport
    /// pixels. A non-finite or non-positive `zoom_change` is ignored
    /// entirely; a non-finite `pan_delta` keeps the previous pan.
    pub fn apply(
        &mut self,
        zoom_change: f64,
        pan_delta: Point,
        artwork: ArtworkSize,
        limits: ZoomLimits,
    ) {
        if !zoom_change.is_finite() || zoom_change <= 0.0 {
            return;
        }
        let zoom = limits.clamp(self.zoom * zoom_change);
        self.zoom = zoom;

        if zoom <= limits.min {
            self.pan = Point::ZERO;
            return;
        }

        let max_x = (artwork.width * (zoom - 1.0) / 2.0).max(0.0);
        let max_y = (artwork.height * (zoom - 1.0) / 2.0).max(0.0);
        let moved = if pan_delta.is_finite() {
            self.pan + pan_delta
        } else {
            self.pan
        };
        self.pan = Point::new(
            moved.x.max(-max_x).min(max_x),
            moved.y.max(-max_y).min(max_y),
        );
    }

    /// Return to the unzoomed, centered view.
    pub fn reset(&mut self, limits: ZoomLimits) {
        *self = Self::at_min(limits);
    }
}

impl Default for ZoomPan {
    fn default() -> Self {
        Self::new()
    }
}

/// Uniform scale that fits `artwork` entirely inside `viewport`.
///
/// Returns `None` if either size is degenerate.
#[must_use]
pub fn fit_scale(artwork: ArtworkSize, viewport: Viewport) -> Option<f64> {
    if !artwork.is_valid() || !viewport.is_valid() {
        return None;
    }
    Some((viewport.width / artwork.width).min(viewport.height / artwork.height))
}

/// The affine mapping between artwork space and viewport space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    artwork_center: Point,
    origin: Point,
    fit_scale: f64,
    total_scale: f64,
}

impl ViewTransform {
    /// Compose fit scale, zoom and pan for the current frame.
    ///
    /// Returns `None` when the viewport or artwork is degenerate, or the
    /// zoom is not a positive finite number. Callers treat `None` as
    /// "nothing to draw, nothing to hit".
    #[must_use]
    pub fn new(artwork: ArtworkSize, viewport: Viewport, view: &ZoomPan) -> Option<Self> {
        let fit = fit_scale(artwork, viewport)?;
        let total = fit * view.zoom;
        if !total.is_finite() || total <= 0.0 || !view.pan.is_finite() {
            return None;
        }
        Some(Self {
            artwork_center: artwork.center(),
            origin: viewport.center() + view.pan,
            fit_scale: fit,
            total_scale: total,
        })
    }

    /// Scale that fits the artwork before user zoom.
    #[must_use]
    pub const fn fit_scale(&self) -> f64 {
        self.fit_scale
    }

    /// Fit scale multiplied by user zoom.
    #[must_use]
    pub const fn total_scale(&self) -> f64 {
        self.total_scale
    }

    /// Viewport position of the artwork's center (viewport center plus pan).
    #[must_use]
    pub const fn origin(&self) -> Point {
        self.origin
    }

    /// Map an artwork point to viewport pixels.
    #[must_use]
    pub fn to_screen(&self, artwork: Point) -> Point {
        let d = artwork - self.artwork_center;
        Point::new(
            d.x.mul_add(self.total_scale, self.origin.x),
            d.y.mul_add(self.total_scale, self.origin.y),
        )
    }

    /// Map a viewport point back to artwork space.
    #[must_use]
    pub fn to_artwork(&self, screen: Point) -> Point {
        let d = screen - self.origin;
        Point::new(
            d.x / self.total_scale + self.artwork_center.x,
            d.y / self.total_scale + self.artwork_center.y,
        )
    }

    /// Row-major affine coefficients `(sx, ky, kx, sy, tx, ty)` for
    /// renderers that take a matrix rather than per-point calls.
    #[must_use]
    pub fn affine(&self) -> [f64; 6] {
        let s = self.total_scale;
        [
            s,
            0.0,
            0.0,
            s,
            self.artwork_center.x.mul_add(-s, self.origin.x),
            self.artwork_center.y.mul_add(-s, self.origin.y),
        ]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    fn assert_close(a: Point, b: Point) {
        assert!(
            (a.x - b.x).abs() < TOL && (a.y - b.y).abs() < TOL,
            "expected {b:?}, got {a:?}"
        );
    }

    fn view(zoom: f64, pan: Point) -> ZoomPan {
        ZoomPan { zoom, pan }
    }

    #[test]
    fn fit_scale_uses_limiting_axis() {
        let s = fit_scale(ArtworkSize::new(1000.0, 500.0), Viewport::new(500.0, 500.0)).unwrap();
        assert!((s - 0.5).abs() < TOL);
        let s = fit_scale(ArtworkSize::new(100.0, 400.0), Viewport::new(500.0, 200.0)).unwrap();
        assert!((s - 0.5).abs() < TOL);
    }

    #[test]
    fn degenerate_viewport_has_no_transform() {
        let art = ArtworkSize::default();
        assert!(ViewTransform::new(art, Viewport::new(0.0, 100.0), &ZoomPan::new()).is_none());
        assert!(ViewTransform::new(art, Viewport::new(100.0, -1.0), &ZoomPan::new()).is_none());
        assert!(
            ViewTransform::new(
                ArtworkSize::new(0.0, 0.0),
                Viewport::new(100.0, 100.0),
                &ZoomPan::new()
            )
            .is_none()
        );
    }

    #[test]
    fn unzoomed_tap_maps_to_artwork() {
        // 1000x1000 artwork in a 500x500 viewport: fit scale 0.5.
        let t = ViewTransform::new(
            ArtworkSize::default(),
            Viewport::new(500.0, 500.0),
            &ZoomPan::new(),
        )
        .unwrap();
        assert_close(t.to_artwork(Point::new(125.0, 125.0)), Point::new(250.0, 250.0));
        assert_close(t.to_screen(Point::new(500.0, 500.0)), Point::new(250.0, 250.0));
    }

    #[test]
    fn letterboxed_artwork_is_centered() {
        // 1000x500 artwork in 500x500 viewport: drawn 500x250, top at y=125.
        let t = ViewTransform::new(
            ArtworkSize::new(1000.0, 500.0),
            Viewport::new(500.0, 500.0),
            &ZoomPan::new(),
        )
        .unwrap();
        assert_close(t.to_screen(Point::new(0.0, 0.0)), Point::new(0.0, 125.0));
        assert_close(t.to_screen(Point::new(1000.0, 500.0)), Point::new(500.0, 375.0));
    }

    #[test]
    fn zoom_and_pan_compose() {
        let t = ViewTransform::new(
            ArtworkSize::default(),
            Viewport::new(500.0, 500.0),
            &view(2.0, Point::new(30.0, -20.0)),
        )
        .unwrap();
        assert!((t.total_scale() - 1.0).abs() < TOL);
        assert_close(t.to_screen(Point::new(500.0, 500.0)), Point::new(280.0, 230.0));
        assert_close(t.to_screen(Point::new(600.0, 400.0)), Point::new(380.0, 130.0));
    }

    #[test]
    fn round_trip_over_grid_of_views() {
        let art = ArtworkSize::new(1200.0, 800.0);
        let viewports = [
            Viewport::new(500.0, 500.0),
            Viewport::new(1080.0, 1920.0),
            Viewport::new(37.0, 911.0),
        ];
        let views = [
            view(1.0, Point::ZERO),
            view(2.5, Point::new(100.0, -300.0)),
            view(5.0, Point::new(-2399.0, 1599.0)),
        ];
        for vp in viewports {
            for v in &views {
                let t = ViewTransform::new(art, vp, v).unwrap();
                for &(x, y) in &[(0.0, 0.0), (1200.0, 800.0), (333.3, 17.25), (-50.0, 900.0)] {
                    let p = Point::new(x, y);
                    let back = t.to_artwork(t.to_screen(p));
                    assert!(
                        (back.x - p.x).abs() < 1e-6 && (back.y - p.y).abs() < 1e-6,
                        "round trip drifted: {p:?} -> {back:?} ({vp:?}, {v:?})"
                    );
                }
            }
        }
    }

    #[test]
    fn affine_matches_to_screen() {
        let t = ViewTransform::new(
            ArtworkSize::new(640.0, 480.0),
            Viewport::new(300.0, 700.0),
            &view(3.0, Point::new(12.0, 5.0)),
        )
        .unwrap();
        let [sx, _, _, sy, tx, ty] = t.affine();
        let p = Point::new(123.0, 456.0);
        assert_close(Point::new(p.x.mul_add(sx, tx), p.y.mul_add(sy, ty)), t.to_screen(p));
    }

    #[test]
    fn zoom_is_clamped() {
        let limits = ZoomLimits::default();
        let art = ArtworkSize::default();
        let mut zp = ZoomPan::new();
        zp.apply(100.0, Point::ZERO, art, limits);
        assert!((zp.zoom() - 5.0).abs() < TOL);
        zp.apply(0.0001, Point::ZERO, art, limits);
        assert!((zp.zoom() - 1.0).abs() < TOL);
    }

    #[test]
    fn zoom_stays_in_range_over_gesture_sequence() {
        let limits = ZoomLimits::default();
        let art = ArtworkSize::default();
        let mut zp = ZoomPan::new();
        let changes = [1.3, 1.9, 2.2, 0.4, 7.0, 0.99, 0.1, 1.01, 3.3, 0.5, 0.5, 0.5];
        for (i, &c) in changes.iter().enumerate() {
            let delta = Point::new(f64::from(u8::try_from(i).unwrap()) * 40.0 - 200.0, 75.0);
            zp.apply(c, delta, art, limits);
            assert!((1.0..=5.0).contains(&zp.zoom()), "zoom escaped: {}", zp.zoom());
            let max = art.width * (zp.zoom() - 1.0) / 2.0;
            assert!(zp.pan().x.abs() <= max + TOL && zp.pan().y.abs() <= max + TOL);
        }
    }

    #[test]
    fn pan_resets_when_zoom_returns_to_one() {
        let limits = ZoomLimits::default();
        let art = ArtworkSize::default();
        let mut zp = ZoomPan::new();
        zp.apply(2.0, Point::new(100.0, 100.0), art, limits);
        assert_eq!(zp.pan(), Point::new(100.0, 100.0));
        zp.apply(0.5, Point::new(10.0, 10.0), art, limits);
        assert!((zp.zoom() - 1.0).abs() < TOL);
        assert_eq!(zp.pan(), Point::ZERO);
    }

    #[test]
    fn pan_ignored_at_minimum_zoom() {
        let mut zp = ZoomPan::new();
        zp.apply(1.0, Point::new(50.0, 50.0), ArtworkSize::default(), ZoomLimits::default());
        assert_eq!(zp.pan(), Point::ZERO);
    }

    #[test]
    fn pan_is_clamped_per_axis() {
        // zoom 2 on 1000x600: max pan 500 horizontally, 300 vertically.
        let mut zp = ZoomPan::new();
        zp.apply(
            2.0,
            Point::new(9999.0, -9999.0),
            ArtworkSize::new(1000.0, 600.0),
            ZoomLimits::default(),
        );
        assert_eq!(zp.pan(), Point::new(500.0, -300.0));
    }

    #[test]
    fn invalid_zoom_change_is_ignored() {
        let limits = ZoomLimits::default();
        let art = ArtworkSize::default();
        let mut zp = ZoomPan::new();
        zp.apply(2.0, Point::new(10.0, 0.0), art, limits);
        let before = zp;
        zp.apply(f64::NAN, Point::new(10.0, 0.0), art, limits);
        zp.apply(0.0, Point::new(10.0, 0.0), art, limits);
        zp.apply(-1.0, Point::new(10.0, 0.0), art, limits);
        assert_eq!(zp, before);
    }

    #[test]
    fn reset_returns_to_identity_view() {
        let limits = ZoomLimits::default();
        let mut zp = ZoomPan::new();
        zp.apply(3.0, Point::new(40.0, 40.0), ArtworkSize::default(), limits);
        zp.reset(limits);
        assert_eq!(zp, ZoomPan::new());
    }

    #[test]
    fn zoom_limits_are_sanitized() {
        let l = ZoomLimits::new(4.0, 2.0);
        assert!((l.min() - 2.0).abs() < TOL && (l.max() - 4.0).abs() < TOL);
        let l = ZoomLimits::new(f64::NAN, -3.0);
        assert!((l.min() - 1.0).abs() < TOL && (l.max() - 5.0).abs() < TOL);
        assert!((ZoomLimits::default().clamp(f64::NAN) - 1.0).abs() < TOL);
    }
}
