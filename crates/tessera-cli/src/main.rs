//! tessera: CLI tool for exercising the paint canvas headlessly.
//!
//! Loads a segmentation asset, lays it out in a viewport, applies a
//! zoom/pan gesture, taps screen points with a brush color, and reports
//! which region each tap hit plus the resulting progress. Useful for:
//!
//! - Checking that a new asset decodes and hit-tests as expected
//! - Reproducing tap/transform bugs from screen coordinates
//! - Rendering painted artwork to SVG or PNG for inspection
//!
//! # Usage
//!
//! ```text
//! cargo run --bin tessera -- [OPTIONS] <ASSET>
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod logging;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use serde::Serialize;
use tessera_canvas::{CanvasConfig, Color, Point, Progress, Viewport};
use tessera_io::{
    AppConfig, DirStorage, Library, PaintSession, ProgressStore, Storage, SystemClock, WriteQueue,
};

/// Headless paint canvas for tessera segmentation assets.
///
/// Taps are given in viewport pixels, exactly as a touch screen would
/// report them.
#[derive(Parser, Debug)]
#[command(name = "tessera", version)]
struct Cli {
    /// Path to the segmentation asset (JSON).
    asset: PathBuf,

    /// Viewport size in pixels, as `WIDTHxHEIGHT`.
    #[arg(long, default_value = "1000x1000", value_parser = parse_viewport)]
    viewport: Viewport,

    /// Zoom factor applied before tapping (clamped to the zoom limits).
    #[arg(long, default_value_t = 1.0)]
    zoom: f64,

    /// Pan offset in viewport pixels, as `X,Y` (clamped; ignored at
    /// minimum zoom).
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    pan: Option<Point>,

    /// Brush color as `#RRGGBB` or `#AARRGGBB`.
    #[arg(long, value_parser = parse_color)]
    color: Option<Color>,

    /// Tap at viewport point `X,Y`. Repeatable; taps run in order.
    #[arg(long = "tap", value_parser = parse_point, allow_hyphen_values = true)]
    taps: Vec<Point>,

    /// Smallest allowed zoom.
    #[arg(long, default_value_t = CanvasConfig::DEFAULT_MIN_ZOOM)]
    min_zoom: f64,

    /// Largest allowed zoom.
    #[arg(long, default_value_t = CanvasConfig::DEFAULT_MAX_ZOOM)]
    max_zoom: f64,

    /// Persist and restore progress in this directory.
    #[arg(long)]
    data: Option<PathBuf>,

    /// Write SVG output to file.
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Write PNG output (rendered through the viewport) to file.
    #[arg(long)]
    png: Option<PathBuf>,

    /// Output the report as JSON instead of human-readable text.
    #[arg(long)]
    json: bool,

    /// Full configuration as a JSON string.
    ///
    /// When provided, `--min-zoom` and `--max-zoom` are ignored. The JSON
    /// must be a valid `AppConfig` serialization; omitted fields take
    /// their defaults.
    #[arg(long)]
    config_json: Option<String>,

    /// Log filter (`env_logger` syntax). Defaults to `RUST_LOG`, then `info`.
    #[arg(long)]
    log: Option<String>,
}

fn parse_pair(s: &str, sep: char) -> Result<(f64, f64), String> {
    let (a, b) = s
        .split_once(sep)
        .ok_or_else(|| format!("expected two numbers separated by '{sep}', got {s:?}"))?;
    let a: f64 = a.trim().parse().map_err(|e| format!("{a:?}: {e}"))?;
    let b: f64 = b.trim().parse().map_err(|e| format!("{b:?}: {e}"))?;
    if !a.is_finite() || !b.is_finite() {
        return Err(format!("non-finite value in {s:?}"));
    }
    Ok((a, b))
}

fn parse_viewport(s: &str) -> Result<Viewport, String> {
    let (w, h) = parse_pair(s, 'x')?;
    let viewport = Viewport::new(w, h);
    if viewport.is_valid() {
        Ok(viewport)
    } else {
        Err(format!("viewport must be positive, got {s:?}"))
    }
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = parse_pair(s, ',')?;
    Ok(Point::new(x, y))
}

fn parse_color(s: &str) -> Result<Color, String> {
    Color::parse_hex(s).ok_or_else(|| format!("not a hex color: {s:?}"))
}

/// Build an [`AppConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and the
/// individual zoom flags are ignored.
fn config_from_cli(cli: &Cli) -> Result<AppConfig, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }

    Ok(AppConfig {
        canvas: CanvasConfig {
            min_zoom: cli.min_zoom,
            max_zoom: cli.max_zoom,
            ..CanvasConfig::default()
        },
        ..AppConfig::default()
    })
}

/// One tap and what it hit.
#[derive(Debug, Serialize)]
struct TapReport {
    screen: Point,
    artwork: Option<Point>,
    region: Option<String>,
}

/// Everything printed after a run.
#[derive(Debug, Serialize)]
struct Report {
    artwork_id: Option<String>,
    regions: usize,
    duplicate_ids: Vec<String>,
    zoom: f64,
    pan: Point,
    taps: Vec<TapReport>,
    progress: Option<Progress>,
}

impl Report {
    fn print_text(&self) {
        println!(
            "Artwork: {} ({} regions)",
            self.artwork_id.as_deref().unwrap_or("<unnamed>"),
            self.regions
        );
        if !self.duplicate_ids.is_empty() {
            println!("Duplicate region ids: {}", self.duplicate_ids.join(", "));
        }
        println!("View: zoom {:.3}, pan ({:.1}, {:.1})", self.zoom, self.pan.x, self.pan.y);
        for tap in &self.taps {
            let at = tap
                .artwork
                .map_or_else(|| "-".to_owned(), |p| format!("({:.1}, {:.1})", p.x, p.y));
            println!(
                "Tap ({:.1}, {:.1}) -> artwork {at} -> {}",
                tap.screen.x,
                tap.screen.y,
                tap.region.as_deref().unwrap_or("miss")
            );
        }
        if let Some(p) = &self.progress {
            println!(
                "Progress: {}/{} regions ({}%)",
                p.completed.len(),
                p.total_regions,
                p.percentage
            );
        }
    }
}

/// Attach persistence from `dir`, restoring saved progress for the
/// installed artwork.
fn attach_data_dir(
    session: PaintSession,
    dir: &Path,
    config: &AppConfig,
) -> Result<PaintSession, String> {
    let storage: Arc<dyn Storage> = Arc::new(
        DirStorage::open(dir).map_err(|e| format!("Error opening {}: {e}", dir.display()))?,
    );
    let library = Library::open(storage, Arc::new(SystemClock), config.library.clone());
    let writer = WriteQueue::spawn(library.write_targets())
        .map_err(|e| format!("Error starting write queue: {e}"))?;
    let mut session = session.with_writer(writer);

    if let Some(artwork) = session.artwork().cloned() {
        let saved = artwork.id().and_then(|id| {
            library.progress.load(id).unwrap_or_else(|e| {
                log::warn!("ignoring unreadable saved progress for {id:?}: {e}");
                None
            })
        });
        session.install(artwork, saved.as_ref());
    }
    Ok(session)
}

fn export(session: &PaintSession, cli: &Cli) {
    let Some(artwork) = session.artwork() else {
        return;
    };
    let default_fill = session.config().default_fill;

    if let Some(ref path) = cli.svg {
        let metadata = tessera_export::SvgMetadata {
            title: artwork.name().or_else(|| artwork.id()),
            description: None,
        };
        let svg = tessera_export::to_svg(artwork, session.paint(), default_fill, &metadata);
        match std::fs::write(path, &svg) {
            Ok(()) => eprintln!("SVG written to {} ({} bytes)", path.display(), svg.len()),
            Err(e) => eprintln!("Error writing SVG to {}: {e}", path.display()),
        }
    }

    if let Some(ref path) = cli.png {
        match tessera_export::to_png(
            artwork,
            session.paint(),
            default_fill,
            cli.viewport,
            session.view(),
        ) {
            Ok(Some(png)) => match std::fs::write(path, &png) {
                Ok(()) => eprintln!("PNG written to {} ({} bytes)", path.display(), png.len()),
                Err(e) => eprintln!("Error writing PNG to {}: {e}", path.display()),
            },
            Ok(None) => eprintln!("Nothing to render: viewport or artwork is degenerate"),
            Err(e) => eprintln!("Error rendering PNG: {e}"),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.log.as_deref());

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let bytes = match std::fs::read(&cli.asset) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error reading {}: {e}", cli.asset.display());
            return ExitCode::FAILURE;
        }
    };
    let artwork = match tessera_canvas::decode(&bytes) {
        Ok(artwork) if artwork.id().is_some() => artwork,
        Ok(artwork) => {
            let stem = cli
                .asset
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("artwork");
            artwork.with_id(stem)
        }
        Err(e) => {
            eprintln!("Error decoding {}: {e}", cli.asset.display());
            return ExitCode::FAILURE;
        }
    };

    let mut session = PaintSession::new(config.canvas.clone(), Arc::new(SystemClock));
    session.install(artwork, None);
    if let Some(ref dir) = cli.data {
        session = match attach_data_dir(session, dir, &config) {
            Ok(s) => s,
            Err(msg) => {
                eprintln!("{msg}");
                return ExitCode::FAILURE;
            }
        };
    }

    session.set_viewport(cli.viewport.width, cli.viewport.height);
    session.gesture(cli.zoom, cli.pan.unwrap_or(Point::ZERO));
    if let Some(color) = cli.color {
        session.select_color(color);
    }

    let mut taps = Vec::with_capacity(cli.taps.len());
    for &screen in &cli.taps {
        let artwork = session.transform().map(|t| t.to_artwork(screen));
        let region = session.tap(screen).map(|id| id.to_string());
        taps.push(TapReport {
            screen,
            artwork,
            region,
        });
    }

    let report = Report {
        artwork_id: session.artwork().and_then(|a| a.id()).map(str::to_owned),
        regions: session.artwork().map_or(0, tessera_canvas::Artwork::len),
        duplicate_ids: session
            .artwork()
            .map(|a| a.duplicate_ids().iter().map(ToString::to_string).collect())
            .unwrap_or_default(),
        zoom: session.view().zoom(),
        pan: session.view().pan(),
        taps,
        progress: session.progress(),
    };

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing report: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        report.print_text();
    }

    export(&session, &cli);
    ExitCode::SUCCESS
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_command_line() {
        let cli = Cli::try_parse_from([
            "tessera",
            "fox.json",
            "--viewport",
            "500x400",
            "--zoom",
            "2",
            "--pan",
            "-10,5",
            "--color",
            "#FF0000",
            "--tap",
            "125,125",
            "--tap",
            "10.5,-3",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.viewport, Viewport::new(500.0, 400.0));
        assert_eq!(cli.pan, Some(Point::new(-10.0, 5.0)));
        assert_eq!(cli.color, Some(Color::from_rgb(0xFF, 0, 0)));
        assert_eq!(cli.taps, vec![Point::new(125.0, 125.0), Point::new(10.5, -3.0)]);
        assert!(cli.json);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(parse_viewport("0x100").is_err());
        assert!(parse_viewport("100").is_err());
        assert!(parse_point("1;2").is_err());
        assert!(parse_point("nan,2").is_err());
        assert!(parse_color("#GG0000").is_err());
    }

    #[test]
    fn zoom_flags_build_config() {
        let cli = Cli::try_parse_from(["tessera", "a.json", "--max-zoom", "8"]).unwrap();
        let config = config_from_cli(&cli).unwrap();
        assert!((config.canvas.max_zoom - 8.0).abs() < f64::EPSILON);
        assert_eq!(config.library.recents_cap, 50);
    }

    #[test]
    fn config_json_overrides_flags() {
        let cli = Cli::try_parse_from([
            "tessera",
            "a.json",
            "--max-zoom",
            "8",
            "--config-json",
            r#"{"canvas": {"max_zoom": 3.0}}"#,
        ])
        .unwrap();
        let config = config_from_cli(&cli).unwrap();
        assert!((config.canvas.max_zoom - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn invalid_config_json_is_an_error() {
        let cli =
            Cli::try_parse_from(["tessera", "a.json", "--config-json", "{nope"]).unwrap();
        assert!(config_from_cli(&cli).unwrap_err().contains("--config-json"));
    }
}
