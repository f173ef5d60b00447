//! Region geometry normalization.
//!
//! Segmentation assets describe region outlines in one of two historical
//! encodings:
//!
//! ```text
//! nested:  "paths":  [[[10, 10], [90, 10], [90, 90]], [[...], ...]]
//! string:  "points": "10,10 90,10 90,90"
//! ```
//!
//! Both decode into the same canonical [`Region`]: an identity, an
//! ordered list of closed [`Subpath`]s, and an optional fill hint. Nothing
//! downstream of this module branches on the source encoding.
//!
//! Each [`Subpath`] precomputes its containment polygon and bounding
//! rectangle once, so hit testing never rebuilds geometry per tap.

use std::borrow::Borrow;
use std::fmt;

use geo::{BoundingRect, Contains, Coord, LineString, Polygon, Rect};
use serde::{Deserialize, Serialize};

use crate::types::{Color, Point};

/// Stable identity of a region within one artwork.
///
/// Derived from the layer's `number` (stringified) or, failing that, its
/// `label`. The empty identity marks a region that can be drawn but is
/// never matched by hit testing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(String);

impl RegionId {
    /// Create an identity from any string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the degenerate, non-matchable identity.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for RegionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RegionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// One closed polygon of a region, in artwork space.
///
/// The outline is implicitly closed from the last point back to the
/// first. Construction requires at least two points.
#[derive(Debug, Clone, PartialEq)]
pub struct Subpath {
    points: Vec<Point>,
    polygon: Polygon<f64>,
    bounds: Option<Rect<f64>>,
}

impl Subpath {
    /// Minimum number of points for a drawable subpath.
    pub const MIN_POINTS: usize = 2;

    /// Build a subpath, or `None` if fewer than [`MIN_POINTS`](Self::MIN_POINTS)
    /// points are given.
    #[must_use]
    pub fn new(points: Vec<Point>) -> Option<Self> {
        if points.len() < Self::MIN_POINTS {
            return None;
        }
        let ring: Vec<Coord<f64>> = points.iter().map(|p| Coord { x: p.x, y: p.y }).collect();
        let polygon = Polygon::new(LineString::new(ring), Vec::new());
        let bounds = polygon.bounding_rect();
        Some(Self {
            points,
            polygon,
            bounds,
        })
    }

    /// The outline points in declared order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Axis-aligned bounds of the outline.
    #[must_use]
    pub const fn bounds(&self) -> Option<Rect<f64>> {
        self.bounds
    }

    /// Whether `point` lies strictly inside the outline.
    ///
    /// Points on an edge are not contained. Degenerate (zero-area)
    /// outlines contain nothing.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        let Some(bounds) = self.bounds else {
            return false;
        };
        let (min, max) = (bounds.min(), bounds.max());
        if point.x < min.x || point.x > max.x || point.y < min.y || point.y > max.y {
            return false;
        }
        self.polygon.contains(&geo::Point::new(point.x, point.y))
    }
}

/// A fillable area of the artwork: identity, outline, and color hint.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    id: RegionId,
    subpaths: Vec<Subpath>,
    fill_hint: Option<String>,
}

impl Region {
    /// Create a region from already-normalized parts.
    #[must_use]
    pub const fn new(id: RegionId, subpaths: Vec<Subpath>, fill_hint: Option<String>) -> Self {
        Self {
            id,
            subpaths,
            fill_hint,
        }
    }

    /// The region's identity.
    #[must_use]
    pub const fn id(&self) -> &RegionId {
        &self.id
    }

    /// The region's closed outlines in declared order.
    #[must_use]
    pub fn subpaths(&self) -> &[Subpath] {
        &self.subpaths
    }

    /// The raw color hint from the asset, unparsed.
    #[must_use]
    pub fn fill_hint(&self) -> Option<&str> {
        self.fill_hint.as_deref()
    }

    /// The color hint parsed as hex, if present and valid.
    #[must_use]
    pub fn fill_hint_color(&self) -> Option<Color> {
        self.fill_hint.as_deref().and_then(Color::parse_hex)
    }

    /// Whether any subpath contains `point`.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        self.subpaths.iter().any(|s| s.contains(point))
    }
}

/// One entry of an asset's `layers` array, in either encoding.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawLayer {
    pub number: Option<serde_json::Number>,
    pub label: Option<String>,
    pub paths: Option<Vec<Vec<Vec<f64>>>>,
    pub points: Option<String>,
    pub color: Option<String>,
    pub color_hex: Option<String>,
}

/// Normalize one raw layer into a canonical [`Region`].
///
/// Nested `paths` subpaths come first in declared order, followed by the
/// single subpath encoded in `points` (if any). Subpaths with fewer than
/// two usable points are dropped.
pub(crate) fn normalize_layer(raw: RawLayer) -> Region {
    let id = resolve_id(raw.number.as_ref(), raw.label.as_deref());

    let mut subpaths = raw
        .paths
        .as_deref()
        .map(subpaths_from_nested)
        .unwrap_or_default();
    if let Some(encoded) = raw.points.as_deref()
        && let Some(subpath) = subpath_from_string(encoded)
    {
        subpaths.push(subpath);
    }

    let fill_hint = raw.color.or(raw.color_hex);
    Region::new(id, subpaths, fill_hint)
}

/// Resolve a layer identity: `number` wins over `label`, else empty.
fn resolve_id(number: Option<&serde_json::Number>, label: Option<&str>) -> RegionId {
    if let Some(n) = number {
        return RegionId::new(number_to_id(n));
    }
    RegionId::new(label.unwrap_or_default())
}

/// Stringify a JSON number the way an integer layer number reads.
///
/// `3` and `3.0` both become `"3"`; fractional values keep their
/// decimal form.
fn number_to_id(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.is_finite() => format!("{f:.0}"),
        _ => n.to_string(),
    }
}

/// Convert nested `[x, y]` pairs into points.
///
/// Pairs with fewer than two numbers or non-finite values are skipped;
/// extra numbers beyond the first two are ignored.
#[must_use]
pub fn points_from_pairs(pairs: &[Vec<f64>]) -> Vec<Point> {
    pairs
        .iter()
        .filter_map(|pair| match pair.as_slice() {
            [x, y, ..] => Some(Point::new(*x, *y)),
            _ => None,
        })
        .filter(|p| p.is_finite())
        .collect()
}

/// Convert the nested encoding (a list of shapes) into subpaths.
#[must_use]
pub fn subpaths_from_nested(shapes: &[Vec<Vec<f64>>]) -> Vec<Subpath> {
    shapes
        .iter()
        .filter_map(|shape| Subpath::new(points_from_pairs(shape)))
        .collect()
}

/// Parse a space-delimited string of `x,y` tokens into points.
///
/// Malformed tokens are skipped and parsing continues with the next
/// token, so `"10,10 bad 20,20"` yields two points.
#[must_use]
pub fn parse_point_string(encoded: &str) -> Vec<Point> {
    encoded.split_whitespace().filter_map(parse_token).collect()
}

fn parse_token(token: &str) -> Option<Point> {
    let (x, y) = token.split_once(',')?;
    let x: f64 = x.trim().parse().ok()?;
    let y: f64 = y.trim().parse().ok()?;
    let p = Point::new(x, y);
    p.is_finite().then_some(p)
}

/// Convert the string encoding into its single subpath.
#[must_use]
pub fn subpath_from_string(encoded: &str) -> Option<Subpath> {
    Subpath::new(parse_point_string(encoded))
}
