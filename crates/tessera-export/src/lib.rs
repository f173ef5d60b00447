//! tessera-export: Pure format serializers (sans-IO)
//!
//! Converts painted artwork into output formats: SVG in artwork
//! coordinates, and PNG rendered through the canvas view transform.

pub mod raster;
pub mod svg;

pub use raster::{ExportError, render, to_png};
pub use svg::{SvgMetadata, build_region_data, to_svg};
