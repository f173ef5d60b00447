//! Configuration for the persistence layer.

use serde::{Deserialize, Serialize};
use tessera_canvas::CanvasConfig;

/// Limits for the color library stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Maximum number of recent-color entries kept. Older entries are
    /// trimmed after every insert.
    pub recents_cap: usize,

    /// Number of recent colors returned when the caller does not ask
    /// for a specific count.
    pub recents_limit: usize,
}

impl LibraryConfig {
    /// Default for [`recents_cap`](Self::recents_cap).
    pub const DEFAULT_RECENTS_CAP: usize = 50;
    /// Default for [`recents_limit`](Self::recents_limit).
    pub const DEFAULT_RECENTS_LIMIT: usize = 10;
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            recents_cap: Self::DEFAULT_RECENTS_CAP,
            recents_limit: Self::DEFAULT_RECENTS_LIMIT,
        }
    }
}

/// Everything a paint session is configured with.
///
/// Deserializes from partial JSON; omitted sections and fields take
/// their defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Canvas behavior.
    pub canvas: CanvasConfig,
    /// Color library limits.
    pub library: LibraryConfig,
}
