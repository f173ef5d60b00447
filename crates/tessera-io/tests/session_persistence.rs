//! End-to-end: load from disk, paint, persist, reopen.

#![allow(clippy::unwrap_used)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tessera_canvas::{CanvasConfig, Color, Point};
use tessera_io::{
    AssetLoader, ColorHistory, DirAssetStore, DirStorage, Library, LibraryConfig, ManualClock,
    MemoryStorage, PaintSession, ProgressStore, Storage, WriteQueue,
};

const WAIT: Duration = Duration::from_secs(5);

const FOX: &str = r##"{
    "artworkId": "art_001",
    "name": "Mystic Fox",
    "width": 1000,
    "height": 1000,
    "layers": [
        {"number": 1, "paths": [[[0, 0], [500, 0], [500, 500], [0, 500]]], "color": "#FFA500"},
        {"label": "tail", "points": "500,500 1000,500 1000,1000 500,1000"}
    ]
}"##;

/// A fresh directory under the system temp dir, removed on drop.
struct TempDir(PathBuf);

impl TempDir {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!("tessera-io-{}-{name}", std::process::id()));
        std::fs::remove_dir_all(&path).ok();
        std::fs::create_dir_all(&path).unwrap();
        Self(path)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.0).ok();
    }
}

fn open_session(assets: &DirAssetStore, library: &Library) -> PaintSession {
    let loader = AssetLoader::spawn(Arc::new(assets.clone()), library.progress.clone()).unwrap();
    let writer = WriteQueue::spawn(library.write_targets()).unwrap();
    PaintSession::new(CanvasConfig::default(), Arc::new(ManualClock::new(1_000, 10)))
        .with_loader(loader)
        .with_writer(writer)
}

#[test]
fn painted_regions_survive_a_restart() {
    let dir = TempDir::new("restart");
    let asset_dir = dir.0.join("assets");
    std::fs::create_dir_all(&asset_dir).unwrap();
    std::fs::write(asset_dir.join("fox.json"), FOX).unwrap();
    let assets = DirAssetStore::new(&asset_dir);

    let storage: Arc<dyn Storage> = Arc::new(DirStorage::open(dir.0.join("data")).unwrap());
    let library = Library::open(
        storage.clone(),
        Arc::new(ManualClock::new(0, 1)),
        LibraryConfig::default(),
    );

    let red = Color::from_rgb(0xFF, 0, 0);
    {
        let mut session = open_session(&assets, &library);
        session.set_viewport(500.0, 500.0);
        session.open("fox").unwrap();
        assert!(session.wait_loaded(WAIT));

        session.select_color(red);
        let hit = session.tap(Point::new(375.0, 375.0)).unwrap();
        assert_eq!(hit.as_str(), "tail");
        // Session dropped here: the write queue drains before returning.
    }

    let saved = library.progress.load("art_001").unwrap().unwrap();
    assert_eq!(saved.percentage, 50);
    assert_eq!(saved.fills.len(), 1);
    let recents = library.colors.recents(None).unwrap();
    assert_eq!(recents[0].color, red);
    assert_eq!(recents[0].artwork_id.as_deref(), Some("art_001"));

    let mut session = open_session(&assets, &library);
    session.set_viewport(500.0, 500.0);
    session.open("fox").unwrap();
    assert!(session.wait_loaded(WAIT));
    assert_eq!(session.color_of("tail"), Some(red));
    assert_eq!(session.color_of("1"), Color::parse_hex("#FFA500"));
    assert_eq!(session.progress().unwrap().percentage, 50);
}

#[test]
fn clear_is_persisted() {
    let dir = TempDir::new("clear");
    let asset_dir = dir.0.join("assets");
    std::fs::create_dir_all(&asset_dir).unwrap();
    std::fs::write(asset_dir.join("fox.json"), FOX).unwrap();
    let assets = DirAssetStore::new(&asset_dir);
    let storage: Arc<dyn Storage> = Arc::new(DirStorage::open(dir.0.join("data")).unwrap());
    let library = Library::open(storage, Arc::new(ManualClock::new(0, 1)), LibraryConfig::default());

    let mut session = open_session(&assets, &library);
    session.set_viewport(500.0, 500.0);
    session.open("fox").unwrap();
    assert!(session.wait_loaded(WAIT));
    session.tap(Point::new(125.0, 125.0)).unwrap();
    session.tap(Point::new(375.0, 375.0)).unwrap();
    session.flush();
    assert_eq!(library.progress.load("art_001").unwrap().unwrap().percentage, 100);

    session.clear();
    session.flush();
    let saved = library.progress.load("art_001").unwrap().unwrap();
    assert_eq!(saved.percentage, 0);
    assert!(saved.fills.is_empty());
}

#[test]
fn missing_asset_leaves_session_unloaded() {
    let dir = TempDir::new("missing");
    let assets = DirAssetStore::new(&dir.0);
    let storage: Arc<dyn Storage> = Arc::new(DirStorage::open(dir.0.join("data")).unwrap());
    let library = Library::open(storage, Arc::new(ManualClock::new(0, 1)), LibraryConfig::default());

    let mut session = open_session(&assets, &library);
    session.set_viewport(500.0, 500.0);
    session.open("nope").unwrap();
    assert!(!session.wait_loaded(WAIT));
    assert!(session.artwork().is_none());
    assert!(session.tap(Point::new(125.0, 125.0)).is_none());
}

#[test]
fn progress_saves_for_ids_with_spaces_and_unicode() {
    let library = Library::open(
        Arc::new(MemoryStorage::new()),
        Arc::new(ManualClock::new(0, 1)),
        LibraryConfig::default(),
    );
    for id in ["Mystic Fox", "ü/1"] {
        let art = tessera_canvas::decode_str(FOX).unwrap().with_id(id);
        let writer = WriteQueue::spawn(library.write_targets()).unwrap();
        let mut session =
            PaintSession::new(CanvasConfig::default(), Arc::new(ManualClock::new(0, 1)))
                .with_writer(writer);
        session.set_viewport(500.0, 500.0);
        session.install(art, None);
        session.tap(Point::new(125.0, 125.0)).unwrap();
        session.flush();

        let saved = library.progress.load(id).unwrap().unwrap();
        assert_eq!(saved.artwork_id, id);
        assert_eq!(saved.percentage, 50);
    }
}
