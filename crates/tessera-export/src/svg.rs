//! SVG export serializer.
//!
//! Converts painted artwork into an SVG string using the [`svg`] crate
//! for document construction, XML escaping, and path data formatting.
//!
//! Each region becomes one `<path>` element. All of its subpaths share
//! the element's `d` attribute as separate closed `M … L … Z` runs, and
//! `fill-rule="evenodd"` makes nested subpaths read as holes. The
//! `viewBox` is the artwork's own coordinate space, so geometry is
//! emitted untransformed.
//!
//! This is a pure function with no I/O -- it returns a `String`.

use svg::Document;
use svg::node::element::path::Data;
use svg::node::element::{Description, Path, Title};
use svg::node::{Text, Value};

use tessera_canvas::{Artwork, Color, PaintState, Region};

/// Metadata to embed in the SVG document.
///
/// When present, a `<title>` and/or `<desc>` element is emitted
/// immediately after the opening `<svg>` tag. Text values are
/// XML-escaped by the `svg` crate.
#[derive(Debug, Clone, Default)]
pub struct SvgMetadata<'a> {
    /// Document title, emitted as `<title>`.
    pub title: Option<&'a str>,

    /// Document description, emitted as `<desc>`.
    pub description: Option<&'a str>,
}

/// Build the `d` attribute for every subpath of `region`.
///
/// Returns an empty string for a region with no subpaths.
#[must_use]
pub fn build_region_data(region: &Region) -> String {
    let mut data = Data::new();
    let mut any = false;
    for subpath in region.subpaths() {
        let Some((first, rest)) = subpath.points().split_first() else {
            continue;
        };
        any = true;
        data = data.move_to((first.x, first.y));
        for p in rest {
            data = data.line_to((p.x, p.y));
        }
        data = data.close();
    }
    if !any {
        return String::new();
    }
    String::from(Value::from(data))
}

/// `#RRGGBB`, ignoring alpha.
fn rgb_hex(color: Color) -> String {
    format!("#{:02X}{:02X}{:02X}", color.red(), color.green(), color.blue())
}

/// Serialize painted artwork to an SVG string.
///
/// Regions are drawn in paint order with fills resolved by
/// [`PaintState::color_for`]: the user's fill, then the asset's hint,
/// then `default_fill`. Translucent colors set `fill-opacity`.
#[must_use]
pub fn to_svg(
    artwork: &Artwork,
    paint: &PaintState,
    default_fill: Color,
    metadata: &SvgMetadata<'_>,
) -> String {
    let size = artwork.size();
    let mut doc = Document::new()
        .set("width", size.width)
        .set("height", size.height)
        .set("viewBox", (0, 0, size.width, size.height));

    if let Some(title) = metadata.title {
        doc = doc.add(Title::new(title));
    }
    if let Some(description) = metadata.description {
        doc = doc.add(Description::new().add(Text::new(description)));
    }

    for region in artwork.regions() {
        let d = build_region_data(region);
        if d.is_empty() {
            continue;
        }
        let fill = paint.color_for(region, default_fill);
        let mut path = Path::new()
            .set("d", d)
            .set("fill", rgb_hex(fill))
            .set("fill-rule", "evenodd")
            .set("stroke", "black")
            .set("stroke-width", 1);
        if fill.alpha() < u8::MAX {
            path = path.set("fill-opacity", f64::from(fill.alpha()) / 255.0);
        }
        if !region.id().is_empty() {
            path = path.set("data-region", region.id().as_str());
        }
        doc = doc.add(path);
    }

    // The svg crate omits the XML declaration, so we prepend it.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tessera_canvas::{RegionId, decode_str};

    const TWO: &str = r##"{"width": 200, "height": 100, "layers": [
        {"number": 1, "points": "0,0 100,0 100,100 0,100", "color": "#00FF00"},
        {"label": "hole", "paths": [[[10, 10], [90, 10], [90, 90]], [[20, 20], [30, 20], [30, 30]]]}
    ]}"##;

    #[test]
    fn one_path_per_region() {
        let art = decode_str(TWO).unwrap();
        let svg = to_svg(&art, &PaintState::new(), Color::LIGHT_GRAY, &SvgMetadata::default());
        assert!(svg.starts_with("<?xml"));
        assert_eq!(svg.matches("<path").count(), 2);
        assert!(svg.contains("viewBox=\"0 0 200 100\""));
        assert!(svg.contains("fill-rule=\"evenodd\""));
    }

    #[test]
    fn fills_resolve_paint_then_hint_then_default() {
        let art = decode_str(TWO).unwrap();
        let svg = to_svg(&art, &PaintState::new(), Color::LIGHT_GRAY, &SvgMetadata::default());
        assert!(svg.contains("fill=\"#00FF00\""));
        assert!(svg.contains("fill=\"#D3D3D3\""));

        let mut paint = PaintState::new();
        paint.select_color(Color::from_rgb(0xAB, 0xCD, 0xEF));
        paint.tap_region(&RegionId::new("1"));
        let svg = to_svg(&art, &paint, Color::LIGHT_GRAY, &SvgMetadata::default());
        assert!(svg.contains("fill=\"#ABCDEF\""));
        assert!(!svg.contains("fill=\"#00FF00\""));
    }

    #[test]
    fn multi_subpath_region_has_two_runs() {
        let art = decode_str(TWO).unwrap();
        let d = build_region_data(art.region("hole").unwrap());
        assert_eq!(d.matches('M').count(), 2);
        assert_eq!(d.matches('z').count() + d.matches('Z').count(), 2);
    }

    #[test]
    fn translucent_fill_sets_opacity() {
        let art = decode_str(TWO).unwrap();
        let mut paint = PaintState::new();
        paint.select_color(Color::from_argb(0x8000_00FF));
        paint.tap_region(&RegionId::new("1"));
        let svg = to_svg(&art, &paint, Color::LIGHT_GRAY, &SvgMetadata::default());
        assert!(svg.contains("fill-opacity"));
    }

    #[test]
    fn metadata_is_escaped() {
        let art = decode_str(TWO).unwrap();
        let meta = SvgMetadata {
            title: Some("Fox & <Friends>"),
            description: Some("50% done"),
        };
        let svg = to_svg(&art, &PaintState::new(), Color::LIGHT_GRAY, &meta);
        assert!(svg.contains("<title>Fox &amp; &lt;Friends&gt;</title>"));
        assert!(svg.contains("<desc>50% done</desc>"));
    }
}
