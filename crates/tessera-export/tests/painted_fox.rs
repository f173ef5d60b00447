//! Integration test: decode a segmentation asset, paint it through the
//! canvas tap pipeline, and export to both formats.

#![allow(clippy::unwrap_used)]

use tessera_canvas::{CanvasConfig, Color, PaintState, Point, ViewTransform, Viewport, ZoomPan};
use tessera_export::{SvgMetadata, to_png, to_svg};

const FOX: &str = r##"{
    "artworkId": "art_001",
    "name": "Mystic Fox",
    "layers": [
        {"number": 1, "label": "body", "paths": [[[100, 100], [900, 100], [900, 900], [100, 900]]], "color": "#FFA500"},
        {"label": "eye", "points": "400,300 450,300 450,350 400,350"},
        {"number": 3, "points": "bad 0,0 50,0 x,y 50,50"}
    ]
}"##;

#[test]
fn painted_fox_exports() {
    let art = tessera_canvas::decode_str(FOX).unwrap();
    let config = CanvasConfig::default();
    let viewport = Viewport::new(400.0, 400.0);
    let view = ZoomPan::new();
    let transform = ViewTransform::new(art.size(), viewport, &view).unwrap();

    let mut paint = PaintState::new();
    paint.select_color(Color::from_rgb(0x33, 0x66, 0x99));
    let eye = transform.to_screen(Point::new(425.0, 325.0));
    let hit = tessera_canvas::tap(eye, Some(&transform), &art, &mut paint).unwrap();
    assert_eq!(hit.region.as_str(), "eye");

    let svg = to_svg(
        &art,
        &paint,
        config.default_fill,
        &SvgMetadata {
            title: art.name(),
            description: None,
        },
    );
    assert_eq!(svg.matches("<path").count(), 3);
    assert!(svg.contains("<title>Mystic Fox</title>"));
    assert!(svg.contains("#336699"));
    assert!(svg.contains("#FFA500"));

    let png = to_png(&art, &paint, config.default_fill, viewport, &view)
        .unwrap()
        .unwrap();
    assert!(png.starts_with(b"\x89PNG"));
}
