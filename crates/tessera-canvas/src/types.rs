//! Shared types for the tessera canvas core.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A 2D point, in artwork units or viewport pixels depending on context.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position (from the left edge).
    pub x: f64,
    /// Vertical position (from the top edge).
    pub y: f64,
}

impl Point {
    /// The origin, also used as the zero pan offset.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Round both coordinates to the nearest integer, halves to even.
    #[must_use]
    pub fn rounded(self) -> Self {
        Self::new(self.x.round_ties_even(), self.y.round_ties_even())
    }

    /// Returns `true` if both coordinates are finite.
    #[must_use]
    pub const fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::ops::Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Logical size of the artwork coordinate space.
///
/// All region geometry is authored in this space. Defaults to
/// 1000 x 1000 when the asset does not say otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArtworkSize {
    /// Width in artwork units.
    pub width: f64,
    /// Height in artwork units.
    pub height: f64,
}

impl ArtworkSize {
    /// Width and height used when an asset omits or corrupts them.
    pub const DEFAULT_EXTENT: f64 = 1000.0;

    /// Create a new artwork size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Center of the artwork space.
    #[must_use]
    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Both extents are finite and strictly positive.
    #[must_use]
    pub fn is_valid(self) -> bool {
        is_positive_extent(self.width) && is_positive_extent(self.height)
    }
}

impl Default for ArtworkSize {
    fn default() -> Self {
        Self::new(Self::DEFAULT_EXTENT, Self::DEFAULT_EXTENT)
    }
}

/// Size of the on-screen canvas in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Viewport {
    /// Create a new viewport.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Center of the viewport.
    #[must_use]
    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Both extents are finite and strictly positive.
    ///
    /// A zero-sized viewport occurs before the first layout pass; every
    /// transform-dependent operation must no-op until this holds.
    #[must_use]
    pub fn is_valid(self) -> bool {
        is_positive_extent(self.width) && is_positive_extent(self.height)
    }
}

fn is_positive_extent(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

/// A 32-bit ARGB color.
///
/// Serialized as a hex string (`#RRGGBB` when opaque, `#AARRGGBB`
/// otherwise) so stored palettes and progress records stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Color(u32);

impl Color {
    /// Opaque black, used for region outlines.
    pub const BLACK: Self = Self::from_rgb(0x00, 0x00, 0x00);
    /// Opaque white.
    pub const WHITE: Self = Self::from_rgb(0xFF, 0xFF, 0xFF);
    /// Light gray, the fill for regions with no paint and no usable hint.
    pub const LIGHT_GRAY: Self = Self::from_rgb(0xD3, 0xD3, 0xD3);

    /// Create a color from a packed `0xAARRGGBB` value.
    #[must_use]
    pub const fn from_argb(argb: u32) -> Self {
        Self(argb)
    }

    /// Create an opaque color from its channels.
    #[must_use]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    /// The packed `0xAARRGGBB` value.
    #[must_use]
    pub const fn argb(self) -> u32 {
        self.0
    }

    /// Alpha channel.
    #[must_use]
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Red channel.
    #[must_use]
    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Green channel.
    #[must_use]
    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Blue channel.
    #[must_use]
    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Parse `#RRGGBB` or `#AARRGGBB` (the `#` is optional, hex digits
    /// are case-insensitive).
    ///
    /// Returns `None` for anything else; callers fall back to a default
    /// fill rather than failing.
    #[must_use]
    pub fn parse_hex(input: &str) -> Option<Self> {
        let digits = input.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let value = u32::from_str_radix(digits, 16).ok()?;
        match digits.len() {
            6 => Some(Self(0xFF00_0000 | value)),
            8 => Some(Self(value)),
            _ => None,
        }
    }

    /// Format as `#RRGGBB` when opaque, `#AARRGGBB` otherwise.
    #[must_use]
    pub fn to_hex(self) -> String {
        if self.alpha() == 0xFF {
            format!("#{:06X}", self.0 & 0x00FF_FFFF)
        } else {
            format!("#{:08X}", self.0)
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex color: {s:?}")))
    }
}

/// Configuration for the canvas core.
///
/// All parameters have defaults matching the paint screen's behavior:
/// zoom between 1x and 5x, light gray for unpainted regions.
///
/// Fields are public with no construction-time validation. Inverted
/// zoom bounds are tolerated by [`CanvasConfig::zoom_limits`], which
/// never produces `min > max`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Smallest allowed user zoom. Reaching it resets the pan offset.
    pub min_zoom: f64,

    /// Largest allowed user zoom.
    pub max_zoom: f64,

    /// Fill for regions with no paint and no parseable color hint.
    pub default_fill: Color,
}

impl CanvasConfig {
    /// Default for [`min_zoom`](Self::min_zoom).
    pub const DEFAULT_MIN_ZOOM: f64 = 1.0;
    /// Default for [`max_zoom`](Self::max_zoom).
    pub const DEFAULT_MAX_ZOOM: f64 = 5.0;
    /// Default for [`default_fill`](Self::default_fill).
    pub const DEFAULT_FILL: Color = Color::LIGHT_GRAY;

    /// The zoom bounds as a [`ZoomLimits`](crate::transform::ZoomLimits).
    #[must_use]
    pub fn zoom_limits(&self) -> crate::transform::ZoomLimits {
        crate::transform::ZoomLimits::new(self.min_zoom, self.max_zoom)
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            min_zoom: Self::DEFAULT_MIN_ZOOM,
            max_zoom: Self::DEFAULT_MAX_ZOOM,
            default_fill: Self::DEFAULT_FILL,
        }
    }
}

/// Errors that can occur while decoding a segmentation asset.
#[derive(Debug, thiserror::Error)]
pub enum SegmentationError {
    /// The asset bytes were empty.
    #[error("segmentation asset is empty")]
    EmptyInput,

    /// The asset is not a valid segmentation document.
    #[error("failed to parse segmentation asset: {0}")]
    Json(#[from] serde_json::Error),
}
