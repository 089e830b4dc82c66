//! Simulated time source.
//!
//! Wraps a shared atomic counter so the session, the simulated robot and the
//! op-mode all read one consistent clock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use reach_core::traits::TimeSource;

/// How simulated time relates to wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeMode {
    /// Ticks run back to back; only simulated time advances.
    #[default]
    Lockstep,
    /// Each tick sleeps for the loop period.
    Realtime,
}

/// Simulated time source backed by a shared atomic counter.
///
/// Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct SitlTimeSource {
    time_ns: Arc<AtomicU64>,
}

impl SitlTimeSource {
    /// Create a new time source starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance simulation time by the given number of nanoseconds.
    pub fn advance_ns(&self, ns: u64) {
        self.time_ns.fetch_add(ns, Ordering::Relaxed);
    }

    /// Advance simulation time by the given number of milliseconds.
    pub fn advance_ms(&self, ms: u64) {
        self.advance_ns(ms * 1_000_000);
    }

    /// Set simulation time to an absolute value.
    pub fn set_ns(&self, ns: u64) {
        self.time_ns.store(ns, Ordering::Relaxed);
    }
}

impl TimeSource for SitlTimeSource {
    fn now_ns(&self) -> u64 {
        self.time_ns.load(Ordering::Relaxed)
    }
}
