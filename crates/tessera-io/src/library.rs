//! All persistence stores over one [`Storage`].

use std::sync::Arc;

use crate::clock::Clock;
use crate::colors::StoredColorHistory;
use crate::config::LibraryConfig;
use crate::entitlements::PurchaseLedger;
use crate::palettes::{PaletteStore, StoredPalettes};
use crate::progress::StoredProgress;
use crate::settings::StoredSettings;
use crate::storage::Storage;
use crate::writer::WriteTargets;

/// Every store the application persists through, sharing one backend
/// and one clock.
#[derive(Clone)]
pub struct Library {
    /// Per-artwork progress and fills.
    pub progress: Arc<StoredProgress>,
    /// Named palettes.
    pub palettes: Arc<StoredPalettes>,
    /// Favorites and recents.
    pub colors: Arc<StoredColorHistory>,
    /// User preferences.
    pub settings: Arc<StoredSettings>,
    /// Purchases and premium status.
    pub entitlements: Arc<PurchaseLedger>,
}

impl Library {
    /// Build every store over `storage` and seed the default palettes
    /// if none exist yet.
    ///
    /// A seeding failure is logged; the library is still usable.
    #[must_use]
    pub fn open(storage: Arc<dyn Storage>, clock: Arc<dyn Clock>, config: LibraryConfig) -> Self {
        let library = Self {
            progress: Arc::new(StoredProgress::new(storage.clone())),
            palettes: Arc::new(StoredPalettes::new(storage.clone(), clock.clone())),
            colors: Arc::new(StoredColorHistory::new(storage.clone(), clock, config)),
            settings: Arc::new(StoredSettings::new(storage.clone())),
            entitlements: Arc::new(PurchaseLedger::new(storage)),
        };
        if let Err(e) = library.palettes.seed_defaults() {
            log::warn!("failed to seed default palettes: {e}");
        }
        library
    }

    /// The stores a [`WriteQueue`](crate::writer::WriteQueue) writes to.
    #[must_use]
    pub fn write_targets(&self) -> WriteTargets {
        WriteTargets {
            progress: self.progress.clone(),
            colors: self.colors.clone(),
        }
    }
}
