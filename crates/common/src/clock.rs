//! Session clocks.
//!
//! Recording sessions stamp their start and end with seconds read from a
//! [`SessionClock`]. Live hosts use [`MonotonicClock`]; replays and tests
//! drive a [`ManualClock`] explicitly.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Source of session timestamps, in seconds.
pub trait SessionClock: Send + Sync {
    /// Current time in seconds. Must never go backwards.
    fn now_secs(&self) -> f64;
}

/// A clock that reports seconds elapsed since it was created.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    /// The instant the clock was created.
    epoch: Instant,

    /// Wall-clock time at epoch (ISO 8601 string).
    epoch_wall: String,
}

impl MonotonicClock {
    /// Create a new clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Wall-clock time at the clock's epoch.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }

    /// Get seconds elapsed since the epoch.
    pub fn elapsed_secs(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::start()
    }
}

impl SessionClock for MonotonicClock {
    fn now_secs(&self) -> f64 {
        self.elapsed_secs()
    }
}

/// An externally driven clock. Clones share the same time value.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    bits: Arc<AtomicU64>,
}

impl ManualClock {
    /// Create a clock reading `secs`.
    pub fn new(secs: f64) -> Self {
        Self {
            bits: Arc::new(AtomicU64::new(secs.to_bits())),
        }
    }

    /// Jump to an absolute time. Earlier values are ignored.
    pub fn set(&self, secs: f64) {
        let current = self.now_secs();
        if secs >= current {
            self.bits.store(secs.to_bits(), Ordering::SeqCst);
        }
    }

    /// Move the clock forward by `secs`.
    pub fn advance(&self, secs: f64) {
        self.set(self.now_secs() + secs.max(0.0));
    }
}

impl SessionClock for ManualClock {
    fn now_secs(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::SeqCst))
    }
}
