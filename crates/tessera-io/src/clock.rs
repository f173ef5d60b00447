//! Wall-clock source for persisted timestamps.
//!
//! Stores stamp records with milliseconds since the Unix epoch. The
//! source is a trait so tests can drive time explicitly.

use std::sync::atomic::{AtomicU64, Ordering};

use web_time::{SystemTime, UNIX_EPOCH};

/// Source of wall-clock timestamps.
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64;
}

/// [`Clock`] backed by the system clock (`Date.now()` on WASM).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        // A clock set before 1970 reads as the epoch.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }
}

/// [`Clock`] that only moves when told to.
///
/// Public so downstream crates and integration tests can drive time
/// deterministically; applications use [`SystemClock`]. Every read
/// advances the clock by `step` milliseconds so consecutive records get
/// distinct, increasing timestamps.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
    step: u64,
}

impl ManualClock {
    /// Start at `start_ms`, advancing by `step_ms` per read.
    #[must_use]
    pub const fn new(start_ms: u64, step_ms: u64) -> Self {
        Self {
            now: AtomicU64::new(start_ms),
            step: step_ms,
        }
    }

    /// Jump to `ms`.
    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.fetch_add(self.step, Ordering::SeqCst)
    }
}
