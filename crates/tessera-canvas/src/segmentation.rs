//! Segmentation asset decoding.
//!
//! A segmentation asset is a JSON document describing one artwork:
//!
//! ```json
//! {
//!   "artworkId": "art_001",
//!   "name": "Mystic Fox",
//!   "width": 1000,
//!   "height": 1000,
//!   "palette": { "fur": "#D2691E" },
//!   "layers": [
//!     { "number": 1, "paths": [[[0, 0], [500, 0], [500, 500]]], "color": "#FFFFFF" },
//!     { "label": "roof", "points": "10,10 90,10 90,90", "colorHex": "#8B4513" }
//!   ]
//! }
//! ```
//!
//! Layers may use either geometry encoding (see [`crate::normalize`]).
//! Decoding produces an [`Artwork`] whose regions keep declared order,
//! which is also paint order: later regions draw on top of earlier ones.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use crate::normalize::{RawLayer, Region, RegionId, normalize_layer};
use crate::types::{ArtworkSize, Color, SegmentationError};

/// Top-level document shape shared by both historical variants.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSegmentation {
    layers: Vec<RawLayer>,
    width: Option<f64>,
    height: Option<f64>,
    artwork_id: Option<String>,
    name: Option<String>,
    palette: Option<BTreeMap<String, String>>,
}

/// A decoded artwork: logical size, regions in paint order, metadata.
///
/// Immutable once built. Region lookup by identity is last-declared-wins
/// when identities repeat; repeated identities are reported by
/// [`duplicate_ids`](Self::duplicate_ids).
#[derive(Debug, Clone, PartialEq)]
pub struct Artwork {
    id: Option<String>,
    name: Option<String>,
    size: ArtworkSize,
    regions: Vec<Region>,
    index: HashMap<RegionId, usize>,
    duplicates: Vec<RegionId>,
    palette: BTreeMap<String, Color>,
}

impl Artwork {
    /// Build an artwork from regions in paint order.
    #[must_use]
    pub fn new(size: ArtworkSize, regions: Vec<Region>) -> Self {
        let mut index = HashMap::with_capacity(regions.len());
        let mut duplicates = Vec::new();
        for (i, region) in regions.iter().enumerate() {
            if region.id().is_empty() {
                continue;
            }
            if index.insert(region.id().clone(), i).is_some() && !duplicates.contains(region.id())
            {
                duplicates.push(region.id().clone());
            }
        }
        Self {
            id: None,
            name: None,
            size,
            regions,
            index,
            duplicates,
            palette: BTreeMap::new(),
        }
    }

    /// Attach the asset's own identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// The identifier declared by the asset, if any.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The display name declared by the asset, if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Logical artwork size.
    #[must_use]
    pub const fn size(&self) -> ArtworkSize {
        self.size
    }

    /// Regions in paint order.
    #[must_use]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Number of regions, including ones with empty identity.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.regions.len()
    }

    /// Returns `true` if the artwork has no regions.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Look up a region by identity (last declared wins on repeats).
    #[must_use]
    pub fn region(&self, id: &str) -> Option<&Region> {
        self.index.get(id).map(|&i| &self.regions[i])
    }

    /// Identities declared by more than one region, in first-repeat order.
    #[must_use]
    pub fn duplicate_ids(&self) -> &[RegionId] {
        &self.duplicates
    }

    /// Named colors suggested by the asset. Unparseable entries are dropped.
    #[must_use]
    pub const fn palette(&self) -> &BTreeMap<String, Color> {
        &self.palette
    }
}

/// Decode a segmentation asset from raw bytes.
///
/// # Errors
///
/// Returns [`SegmentationError::EmptyInput`] if `bytes` is empty or
/// whitespace, and [`SegmentationError::Json`] if the document is not a
/// segmentation container (malformed JSON, missing `layers`, wrong
/// field types).
pub fn decode(bytes: &[u8]) -> Result<Artwork, SegmentationError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(SegmentationError::EmptyInput);
    }
    let raw: RawSegmentation = serde_json::from_slice(bytes)?;
    Ok(build(raw))
}

/// Decode a segmentation asset from a string.
///
/// # Errors
///
/// Same as [`decode`].
pub fn decode_str(json: &str) -> Result<Artwork, SegmentationError> {
    decode(json.as_bytes())
}

fn build(raw: RawSegmentation) -> Artwork {
    let size = ArtworkSize::new(
        extent_or_default(raw.width, "width"),
        extent_or_default(raw.height, "height"),
    );

    let regions: Vec<Region> = raw.layers.into_iter().map(normalize_layer).collect();
    let mut artwork = Artwork::new(size, regions);

    for dup in &artwork.duplicates {
        log::warn!("segmentation layer id {dup:?} declared more than once; last declaration wins");
    }
    let empty = artwork.regions.iter().filter(|r| r.id().is_empty()).count();
    if empty > 0 {
        log::debug!("{empty} segmentation layer(s) have no number or label and cannot be tapped");
    }

    artwork.id = raw.artwork_id;
    artwork.name = raw.name;
    artwork.palette = raw
        .palette
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(name, hex)| match Color::parse_hex(&hex) {
            Some(color) => Some((name, color)),
            None => {
                log::debug!("dropping palette entry {name:?}: invalid color {hex:?}");
                None
            }
        })
        .collect();
    artwork
}

fn extent_or_default(value: Option<f64>, field: &str) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        Some(v) => {
            log::warn!(
                "segmentation {field} {v} is not a positive number; using {}",
                ArtworkSize::DEFAULT_EXTENT
            );
            ArtworkSize::DEFAULT_EXTENT
        }
        None => ArtworkSize::DEFAULT_EXTENT,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Point;

    const FOX: &str = r##"{
        "artworkId": "art_001",
        "name": "Mystic Fox",
        "width": 800,
        "height": 600,
        "palette": { "fur": "#D2691E", "bogus": "orange" },
        "layers": [
            { "number": 1, "paths": [[[0, 0], [400, 0], [400, 300], [0, 300]]], "color": "#FFFFFF" },
            { "number": 2, "paths": [[[400, 300], [800, 300], [800, 600]], [[1, 1]]] }
        ]
    }"##;

    const HOUSE: &str = r##"{
        "layers": [
            { "label": "wall", "points": "0,0 100,0 100,100 0,100", "colorHex": "#EEEEEE" },
            { "label": "door", "points": "40,60 60,60 60,100 oops 40,100" }
        ]
    }"##;

    #[test]
    fn decodes_nested_variant() {
        let art = decode_str(FOX).unwrap();
        assert_eq!(art.id(), Some("art_001"));
        assert_eq!(art.name(), Some("Mystic Fox"));
        assert_eq!(art.size(), ArtworkSize::new(800.0, 600.0));
        assert_eq!(art.len(), 2);
        assert_eq!(art.regions()[0].id().as_str(), "1");
        // The single-point shape in layer 2 is dropped.
        assert_eq!(art.region("2").unwrap().subpaths().len(), 1);
    }

    #[test]
    fn decodes_string_variant_with_default_size() {
        let art = decode_str(HOUSE).unwrap();
        assert_eq!(art.size(), ArtworkSize::default());
        assert_eq!(art.id(), None);
        let door = art.region("door").unwrap();
        assert_eq!(door.subpaths()[0].points().len(), 4);
        assert_eq!(door.subpaths()[0].points()[3], Point::new(40.0, 100.0));
        assert_eq!(art.region("wall").unwrap().fill_hint(), Some("#EEEEEE"));
    }

    #[test]
    fn palette_drops_invalid_colors() {
        let art = decode_str(FOX).unwrap();
        assert_eq!(art.palette().len(), 1);
        assert_eq!(
            art.palette().get("fur"),
            Some(&Color::from_rgb(0xD2, 0x69, 0x1E))
        );
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(decode(b""), Err(SegmentationError::EmptyInput)));
        assert!(matches!(decode(b"  \n"), Err(SegmentationError::EmptyInput)));
    }

    #[test]
    fn malformed_container_is_an_error() {
        assert!(matches!(decode(b"{not json"), Err(SegmentationError::Json(_))));
        assert!(matches!(decode(b"[1, 2, 3]"), Err(SegmentationError::Json(_))));
        assert!(matches!(
            decode(br#"{"width": 10}"#),
            Err(SegmentationError::Json(_))
        ));
    }

    #[test]
    fn invalid_extent_falls_back_to_default() {
        let art = decode_str(r#"{"width": 0, "height": -5, "layers": []}"#).unwrap();
        assert_eq!(art.size(), ArtworkSize::default());
        assert!(art.is_empty());
    }

    #[test]
    fn duplicate_ids_last_declared_wins() {
        let art = decode_str(
            r#"{"layers": [
                {"number": 1, "points": "0,0 10,0 10,10"},
                {"label": "1", "points": "50,50 60,50 60,60"},
                {"number": 1, "points": "90,90 95,90 95,95"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(art.len(), 3);
        assert_eq!(art.duplicate_ids(), &[RegionId::new("1")]);
        let winner = art.region("1").unwrap();
        assert_eq!(winner.subpaths()[0].points()[0], Point::new(90.0, 90.0));
    }

    #[test]
    fn empty_identities_are_not_indexed() {
        let art = decode_str(r#"{"layers": [{"points": "0,0 1,0 1,1"}]}"#).unwrap();
        assert_eq!(art.len(), 1);
        assert!(art.region("").is_none());
        assert!(art.duplicate_ids().is_empty());
    }
}
