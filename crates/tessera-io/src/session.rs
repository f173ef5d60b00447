//! The paint session: one artwork on screen and everything the user has
//! done to it.
//!
//! The session is the single owner of the loaded region set, the gesture
//! state, the paint mapping, and the viewport size. Loading happens on
//! the [`AssetLoader`] thread and persistence on the [`WriteQueue`]
//! thread; the session itself never blocks on either unless asked to
//! with [`wait_loaded`](PaintSession::wait_loaded) or
//! [`flush`](PaintSession::flush).

use std::sync::Arc;
use std::time::Duration;

use tessera_canvas::{
    Artwork, CanvasConfig, Color, PaintState, Point, Progress, RegionId, ViewTransform, Viewport,
    ZoomPan,
};

use crate::clock::Clock;
use crate::progress::ProgressRecord;
use crate::worker::{AssetLoader, LoadResult};
use crate::writer::{WriteCommand, WriteQueue};

/// Interactive state of the paint screen.
pub struct PaintSession {
    config: CanvasConfig,
    clock: Arc<dyn Clock>,
    artwork: Option<Artwork>,
    view: ZoomPan,
    paint: PaintState,
    viewport: Option<Viewport>,
    loader: Option<AssetLoader>,
    writer: Option<WriteQueue>,
}

impl PaintSession {
    /// An empty session: no artwork, no viewport, nothing persisted.
    #[must_use]
    pub fn new(config: CanvasConfig, clock: Arc<dyn Clock>) -> Self {
        let view = ZoomPan::at_min(config.zoom_limits());
        Self {
            config,
            clock,
            artwork: None,
            view,
            paint: PaintState::new(),
            viewport: None,
            loader: None,
            writer: None,
        }
    }

    /// Load artwork through `loader`.
    #[must_use]
    pub fn with_loader(mut self, loader: AssetLoader) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Persist progress and color use through `writer`.
    #[must_use]
    pub fn with_writer(mut self, writer: WriteQueue) -> Self {
        self.writer = Some(writer);
        self
    }

    /// Request asset `name` from the loader.
    ///
    /// The current artwork is dropped immediately, so drawing and hit
    /// testing are disabled until the result is installed by
    /// [`poll`](Self::poll) or [`wait_loaded`](Self::wait_loaded).
    /// Returns the request generation, or `None` without a loader.
    pub fn open(&mut self, name: &str) -> Option<u64> {
        let loader = self.loader.as_mut()?;
        self.artwork = None;
        Some(loader.request(name))
    }

    /// Install the latest load result if it has arrived. Returns `true`
    /// if artwork was installed.
    pub fn poll(&mut self) -> bool {
        let result = self.loader.as_ref().and_then(AssetLoader::poll);
        result.is_some_and(|r| self.install_result(r))
    }

    /// Block until the latest load request is answered (or `timeout`
    /// elapses) and install it. Returns `true` if artwork was installed.
    pub fn wait_loaded(&mut self, timeout: Duration) -> bool {
        let result = self.loader.as_ref().and_then(|l| l.wait(timeout));
        result.is_some_and(|r| self.install_result(r))
    }

    fn install_result(&mut self, result: LoadResult) -> bool {
        let Some(artwork) = result.artwork else {
            return false;
        };
        self.install(artwork, result.saved.as_ref());
        true
    }

    /// Replace the region set.
    ///
    /// Resets the view and restores `saved` fills when they belong to
    /// this artwork; otherwise starts with no fills. The brush color is
    /// kept across artworks.
    pub fn install(&mut self, artwork: Artwork, saved: Option<&ProgressRecord>) {
        let brush = self.paint.active_color();
        self.paint = saved
            .filter(|r| artwork.id() == Some(r.artwork_id.as_str()))
            .map_or_else(PaintState::new, ProgressRecord::paint_state);
        self.paint.select_color(brush);
        self.view.reset(self.config.zoom_limits());
        log::info!(
            "installed artwork {:?}: {} regions, {} saved fills",
            artwork.id().unwrap_or("<unnamed>"),
            artwork.len(),
            self.paint.fills().len()
        );
        self.artwork = Some(artwork);
    }

    /// The installed artwork.
    #[must_use]
    pub const fn artwork(&self) -> Option<&Artwork> {
        self.artwork.as_ref()
    }

    /// Current paint mapping and brush.
    #[must_use]
    pub const fn paint(&self) -> &PaintState {
        &self.paint
    }

    /// Current zoom and pan.
    #[must_use]
    pub const fn view(&self) -> &ZoomPan {
        &self.view
    }

    /// Canvas configuration.
    #[must_use]
    pub const fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Record the viewport size after layout.
    pub const fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Some(Viewport::new(width, height));
    }

    /// Apply a pinch/drag gesture. No-op until artwork is installed.
    pub fn gesture(&mut self, zoom_change: f64, pan_delta: Point) {
        let Some(artwork) = &self.artwork else {
            return;
        };
        self.view.apply(
            zoom_change,
            pan_delta,
            artwork.size(),
            self.config.zoom_limits(),
        );
    }

    /// Return to the unzoomed, centered view.
    pub fn reset_view(&mut self) {
        self.view.reset(self.config.zoom_limits());
    }

    /// The current artwork ↔ viewport mapping, if both are known.
    #[must_use]
    pub fn transform(&self) -> Option<ViewTransform> {
        let artwork = self.artwork.as_ref()?;
        ViewTransform::new(artwork.size(), self.viewport?, &self.view)
    }

    /// Tap at viewport point `screen`.
    ///
    /// Returns the region under the point. If its fill changed, a
    /// progress save is queued.
    pub fn tap(&mut self, screen: Point) -> Option<RegionId> {
        let transform = self.transform();
        let artwork = self.artwork.as_ref()?;
        let hit = tessera_canvas::tap(screen, transform.as_ref(), artwork, &mut self.paint)?;
        if hit.changed {
            self.save_progress();
        }
        Some(hit.region)
    }

    /// Change the brush color and log it as a recent color.
    pub fn select_color(&mut self, color: Color) {
        self.paint.select_color(color);
        self.submit(WriteCommand::RecordRecent {
            color,
            artwork_id: self.artwork_id(),
        });
    }

    /// Add the current brush color to favorites.
    pub fn favorite_active_color(&self) {
        self.submit(WriteCommand::AddFavorite(self.paint.active_color()));
    }

    /// Remove every fill and save the emptied progress.
    pub fn clear(&mut self) {
        self.paint.clear();
        self.save_progress();
    }

    /// Progress of the installed artwork.
    #[must_use]
    pub fn progress(&self) -> Option<Progress> {
        self.artwork
            .as_ref()
            .map(|artwork| Progress::compute(artwork, &self.paint))
    }

    /// The color region `id` is drawn with.
    #[must_use]
    pub fn color_of(&self, id: &str) -> Option<Color> {
        let region = self.artwork.as_ref()?.region(id)?;
        Some(self.paint.color_for(region, self.config.default_fill))
    }

    /// Block until every queued write has been applied.
    pub fn flush(&self) {
        if let Some(writer) = &self.writer {
            writer.flush();
        }
    }

    fn artwork_id(&self) -> Option<String> {
        self.artwork.as_ref()?.id().map(str::to_owned)
    }

    fn save_progress(&self) {
        let (Some(artwork), Some(_)) = (&self.artwork, &self.writer) else {
            return;
        };
        let Some(id) = artwork.id() else {
            log::debug!("artwork has no id, not saving progress");
            return;
        };
        let record = ProgressRecord::new(
            id,
            Progress::compute(artwork, &self.paint),
            &self.paint,
            self.clock.now_ms(),
        );
        self.submit(WriteCommand::SaveProgress(record));
    }

    fn submit(&self, command: WriteCommand) {
        if let Some(writer) = &self.writer {
            writer.submit(command);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    const SQUARE: &str = r#"{"artworkId": "sq", "layers": [
        {"number": 1, "paths": [[[0, 0], [500, 0], [500, 500], [0, 500]]]},
        {"number": 2, "points": "500,500 1000,500 1000,1000 500,1000"}
    ]}"#;

    fn session() -> PaintSession {
        PaintSession::new(CanvasConfig::default(), Arc::new(ManualClock::new(0, 1)))
    }

    fn square() -> Artwork {
        tessera_canvas::decode_str(SQUARE).unwrap()
    }

    #[test]
    fn tap_is_noop_until_laid_out_and_loaded() {
        let mut s = session();
        assert!(s.tap(Point::new(125.0, 125.0)).is_none());
        s.set_viewport(500.0, 500.0);
        assert!(s.tap(Point::new(125.0, 125.0)).is_none());
        s.install(square(), None);
        assert_eq!(s.tap(Point::new(125.0, 125.0)).unwrap().as_str(), "1");
    }

    #[test]
    fn tap_paints_with_brush() {
        let mut s = session();
        s.set_viewport(500.0, 500.0);
        s.install(square(), None);
        let red = Color::from_rgb(0xFF, 0, 0);
        s.select_color(red);
        s.tap(Point::new(375.0, 375.0));
        assert_eq!(s.paint().fill("2"), Some(red));
        assert_eq!(s.color_of("2"), Some(red));
        assert_eq!(s.color_of("1"), Some(Color::LIGHT_GRAY));
        assert_eq!(s.progress().unwrap().percentage, 50);
    }

    #[test]
    fn gesture_and_reset() {
        let mut s = session();
        s.gesture(2.0, Point::ZERO);
        assert!((s.view().zoom() - 1.0).abs() < f64::EPSILON);
        s.install(square(), None);
        s.gesture(3.0, Point::new(50.0, -50.0));
        assert!((s.view().zoom() - 3.0).abs() < f64::EPSILON);
        s.reset_view();
        assert!((s.view().zoom() - 1.0).abs() < f64::EPSILON);
        assert_eq!(s.view().pan(), Point::ZERO);
    }

    #[test]
    fn install_restores_matching_saved_fills_and_keeps_brush() {
        let mut s = session();
        let blue = Color::from_rgb(0, 0, 0xFF);
        s.select_color(blue);

        let mut saved_paint = PaintState::new();
        saved_paint.tap_region(&RegionId::new("1"));
        let art = square();
        let record =
            ProgressRecord::new("sq", Progress::compute(&art, &saved_paint), &saved_paint, 5);
        s.install(art, Some(&record));
        assert_eq!(s.paint().fill("1"), Some(PaintState::DEFAULT_BRUSH));
        assert_eq!(s.paint().active_color(), blue);

        let other = ProgressRecord {
            artwork_id: "other".into(),
            ..record
        };
        s.install(square(), Some(&other));
        assert!(s.paint().is_empty());
    }

    #[test]
    fn clear_empties_fills() {
        let mut s = session();
        s.set_viewport(500.0, 500.0);
        s.install(square(), None);
        s.tap(Point::new(125.0, 125.0));
        s.clear();
        assert!(s.paint().is_empty());
        assert_eq!(s.progress().unwrap().percentage, 0);
    }

    #[test]
    fn open_without_loader_is_none() {
        let mut s = session();
        assert!(s.open("fox").is_none());
        assert!(!s.poll());
    }
}
