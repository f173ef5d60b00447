//! tessera-io: Asset loading, local persistence, and the paint session.
//!
//! Wraps the sans-IO `tessera-canvas` core with the collaborators a
//! running application needs: asset stores, JSON document persistence
//! for progress, palettes, colors, settings and purchases, a background
//! loader with last-requested-wins semantics, and a serialized
//! background write queue.
//!
//! Nothing here is global. Every store is constructed explicitly and
//! passed to whatever uses it.

pub mod assets;
pub mod clock;
pub mod colors;
pub mod config;
pub mod entitlements;
pub mod error;
pub mod library;
pub mod palettes;
pub mod progress;
pub mod session;
pub mod settings;
pub mod storage;
pub mod view;
pub mod worker;
pub mod writer;

pub use assets::{AssetStore, DirAssetStore, MemoryAssetStore, load_artwork};
pub use clock::{Clock, ManualClock, SystemClock};
pub use colors::{ColorHistory, FavoriteColor, RecentColor, StoredColorHistory};
pub use config::{AppConfig, LibraryConfig};
pub use entitlements::{Entitlements, PurchaseLedger, premium_status};
pub use error::StoreError;
pub use library::Library;
pub use palettes::{Palette, PaletteStore, StoredPalettes, default_palettes};
pub use progress::{ProgressRecord, ProgressStore, StoredProgress};
pub use session::PaintSession;
pub use settings::{Settings, SettingsStore, StoredSettings};
pub use storage::{DirStorage, MemoryStorage, Storage};
pub use view::{ColorPanel, combine, load_panel};
pub use worker::{AssetLoader, LoadResult};
pub use writer::{WriteCommand, WriteQueue, WriteTargets};
